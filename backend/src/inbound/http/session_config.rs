//! Session cookie configuration and validation.
//!
//! Toggles come from application settings. Debug builds fall back to lenient
//! defaults with a warning; release builds require every toggle and reject
//! insecure combinations.

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroize;

/// Key file read when no path is configured.
pub const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_RELEASE_MIN_LEN: usize = 64;
// `Key::derive_from` needs at least 256 bits of master key.
const SESSION_KEY_MIN_LEN: usize = 32;
const FINGERPRINT_BYTES: usize = 8;
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings for missing toggles.
    Debug,
    /// Release builds require explicit, valid session toggles.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use foodgram::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Raw session toggles as loaded from settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionToggles {
    pub key_file: Option<PathBuf>,
    pub cookie_secure: Option<bool>,
    pub same_site: Option<String>,
    pub allow_ephemeral: Option<bool>,
}

/// Validated session settings.
#[derive(Clone)]
pub struct SessionSettings {
    /// Signing and encryption key for cookie sessions.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    /// `SameSite` policy for session cookies.
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    /// A toggle release builds require is unset.
    #[error("missing required session setting: {name}")]
    Missing { name: &'static str },
    /// A toggle holds an unrecognised value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file is too short.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` requires a secure cookie in release builds.
    #[error("same_site=None requires cookie_secure=true")]
    InsecureSameSiteNone,
    /// Release builds must not allow ephemeral session keys.
    #[error("allow_ephemeral_session_key must be false in release builds")]
    EphemeralNotAllowed,
}

/// Validate `toggles` for `mode` and load the session key.
///
/// # Examples
///
/// ```rust
/// use foodgram::inbound::http::session_config::{
///     BuildMode, SessionToggles, session_settings,
/// };
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_path = std::env::temp_dir().join("foodgram_session_key_example");
/// std::fs::write(&key_path, vec![b'a'; 64])?;
///
/// let toggles = SessionToggles {
///     key_file: Some(key_path.clone()),
///     cookie_secure: Some(true),
///     same_site: Some("Strict".to_owned()),
///     allow_ephemeral: Some(false),
/// };
/// let settings = session_settings(&toggles, BuildMode::Release)?;
/// assert!(settings.cookie_secure);
///
/// std::fs::remove_file(&key_path)?;
/// # Ok(())
/// # }
/// ```
pub fn session_settings(
    toggles: &SessionToggles,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = required_or_default(
        toggles.cookie_secure,
        mode,
        true,
        "session_cookie_secure",
    )?;
    let same_site = same_site(toggles.same_site.as_deref(), mode, cookie_secure)?;
    let allow_ephemeral = match required_or_default(
        toggles.allow_ephemeral,
        mode,
        false,
        "allow_ephemeral_session_key",
    )? {
        true if !mode.is_debug() => return Err(SessionConfigError::EphemeralNotAllowed),
        flag => flag,
    };
    let key = session_key(toggles.key_file.as_ref(), mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn required_or_default(
    value: Option<bool>,
    mode: BuildMode,
    fallback: bool,
    name: &'static str,
) -> Result<bool, SessionConfigError> {
    match value {
        Some(flag) => Ok(flag),
        None if mode.is_debug() => {
            warn!(setting = name, fallback, "session setting not set; using default");
            Ok(fallback)
        }
        None => Err(SessionConfigError::Missing { name }),
    }
}

fn same_site(
    value: Option<&str>,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };

    let Some(value) = value else {
        if mode.is_debug() {
            warn!("session_same_site not set; using default");
            return Ok(default_same_site);
        }
        return Err(SessionConfigError::Missing {
            name: "session_same_site",
        });
    };

    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" if mode.is_debug() => {
            warn!("same_site=None without a secure cookie; browsers may reject it");
            Ok(SameSite::None)
        }
        "none" => Err(SessionConfigError::InsecureSameSiteNone),
        _ if mode.is_debug() => {
            warn!(value, "invalid session_same_site; using default");
            Ok(default_same_site)
        }
        _ => Err(SessionConfigError::Invalid {
            name: "session_same_site",
            value: value.to_owned(),
            expected: SAMESITE_EXPECTED,
        }),
    }
}

fn session_key(
    key_file: Option<&PathBuf>,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = key_file
        .cloned()
        .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH));

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            let min_len = if mode.is_debug() {
                SESSION_KEY_MIN_LEN
            } else {
                SESSION_KEY_RELEASE_MIN_LEN
            };
            if length < min_len {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path,
            source: error,
        }),
    }
}

/// Truncated SHA-256 fingerprint of the key's signing material.
///
/// Logged at startup so operators can tell which key is active without
/// exposing it.
///
/// ```rust
/// use actix_web::cookie::Key;
/// use foodgram::inbound::http::session_config::key_fingerprint;
///
/// let fp = key_fingerprint(&Key::generate());
/// assert_eq!(fp.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(digest.get(..FINGERPRINT_BYTES).unwrap_or_default())
}
