//! User profiles and the identity a request acts as.

use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// Public profile of a registered user.
///
/// Profiles are owned by the identity provider; this service only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// A profile as seen by a particular viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorView {
    pub profile: UserProfile,
    /// Whether the viewer follows this user. Always `false` for anonymous
    /// viewers.
    pub is_subscribed: bool,
}

/// Who is making a request.
///
/// Passed explicitly to every read operation whose result depends on the
/// requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Viewer {
    #[default]
    Anonymous,
    Authenticated(UserId),
}

impl Viewer {
    /// The acting user, if authenticated.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::{UserId, Viewer};
    ///
    /// assert_eq!(Viewer::Anonymous.user_id(), None);
    /// let id = UserId::new(3);
    /// assert_eq!(Viewer::Authenticated(id).user_id(), Some(id));
    /// ```
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(id) => Some(*id),
        }
    }
}

impl From<Option<UserId>> for Viewer {
    fn from(value: Option<UserId>) -> Self {
        value.map_or(Self::Anonymous, Self::Authenticated)
    }
}
