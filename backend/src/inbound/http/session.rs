//! Cookie-session identity for handlers.
//!
//! The identity provider writes a positive `user_id` into the encrypted
//! `session` cookie. Handlers extract a [`SessionContext`] and ask it for a
//! [`Viewer`] (read paths) or a required [`UserId`] (write paths).

use actix_session::{Session, SessionExt};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use tracing::warn;

use crate::domain::{Error, UserId, Viewer};

pub(crate) const USER_ID_KEY: &str = "user_id";

/// The caller's session, as seen by a handler.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Record `user_id` as the signed-in user.
    ///
    /// # Errors
    /// `internal_error` when the value cannot be serialised into the cookie.
    pub fn persist_user(&self, user_id: UserId) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user_id.get())
            .map_err(|err| Error::internal(format!("session write failed: {err}")))
    }

    /// Signed-in user, or `None` for anonymous callers. Tampered or
    /// non-positive values count as anonymous.
    pub fn user_id(&self) -> Option<UserId> {
        let raw = self
            .0
            .get::<i64>(USER_ID_KEY)
            .inspect_err(|err| warn!(error = %err, "unreadable user id in session"))
            .ok()
            .flatten()?;
        if raw <= 0 {
            warn!(raw, "non-positive user id in session");
            return None;
        }
        Some(UserId::new(raw))
    }

    pub fn viewer(&self) -> Viewer {
        Viewer::from(self.user_id())
    }

    /// # Errors
    /// `unauthorized` for anonymous callers.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()
            .ok_or_else(|| Error::unauthorized("authentication required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(Self(req.get_session())))
    }
}
