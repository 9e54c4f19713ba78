//! Application settings loaded via OrthoConfig.
//!
//! Every field may come from the command line, a configuration file or a
//! `FOODGRAM_*` environment variable. Accessors supply defaults so the
//! struct itself stays a faithful record of what was configured.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use serde::Deserialize;

use crate::domain::ShoppingListLayout;
use crate::inbound::http::session_config::SessionToggles;
use crate::outbound::media::MediaConfig;
use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MEDIA_ROOT: &str = "media";
const DEFAULT_MEDIA_BASE_URL: &str = "/media";
/// Conventional variable consulted when `FOODGRAM_DATABASE_URL` is unset.
pub const DATABASE_URL_FALLBACK_ENV: &str = "DATABASE_URL";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {message}")]
    BindAddr { value: String, message: String },
    #[error("no database URL: set FOODGRAM_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,
    #[error("page size must be between 1 and {max}, got {value}")]
    PageSize { value: u32, max: u32 },
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FOODGRAM")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    pub pool_max_size: Option<u32>,
    /// Path to the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`.
    pub session_cookie_secure: Option<bool>,
    /// `Strict`, `Lax` or `None`.
    pub session_same_site: Option<String>,
    /// Permit a generated key when the key file is missing.
    pub session_allow_ephemeral: Option<bool>,
    /// Directory receiving recipe images.
    pub media_root: Option<PathBuf>,
    /// Public URL prefix for `media_root`.
    pub media_base_url: Option<String>,
    /// Page size used when a request omits `limit`.
    pub page_size: Option<u32>,
    /// Put each shopping list entry on its own line.
    #[ortho_config(default = false)]
    pub shopping_list_line_breaks: bool,
}

impl AppSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Connection string, falling back to `DATABASE_URL`.
    pub fn database_url(&self) -> Result<String, SettingsError> {
        self.database_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| {
                std::env::var(DATABASE_URL_FALLBACK_ENV)
                    .ok()
                    .filter(|url| !url.trim().is_empty())
            })
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Pool configuration for the persistence adapters.
    pub fn pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let config = PoolConfig::new(self.database_url()?);
        Ok(match self.pool_max_size {
            Some(max_size) => config.with_max_size(max_size),
            None => config,
        })
    }

    pub fn session_toggles(&self) -> SessionToggles {
        SessionToggles {
            key_file: self.session_key_file.clone(),
            cookie_secure: self.session_cookie_secure,
            same_site: self.session_same_site.clone(),
            allow_ephemeral: self.session_allow_ephemeral,
        }
    }

    pub fn media_config(&self) -> MediaConfig {
        MediaConfig {
            root: self
                .media_root
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_ROOT)),
            base_url: self
                .media_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_MEDIA_BASE_URL.to_owned()),
        }
    }

    /// Default page size, validated against the pagination bounds.
    pub fn page_size(&self) -> Result<u32, SettingsError> {
        match self.page_size {
            None => Ok(DEFAULT_PAGE_SIZE),
            Some(value) if (1..=MAX_PAGE_SIZE).contains(&value) => Ok(value),
            Some(value) => Err(SettingsError::PageSize {
                value,
                max: MAX_PAGE_SIZE,
            }),
        }
    }

    pub fn shopping_list_layout(&self) -> ShoppingListLayout {
        ShoppingListLayout::from_line_breaks(self.shopping_list_line_breaks)
    }
}
