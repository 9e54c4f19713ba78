//! Correlation identifiers for log lines and error payloads.
//!
//! One identifier lives in task-local storage for the lifetime of an HTTP
//! request. [`super::Error`] picks it up on construction. Task-locals stay
//! with the task that set them, so background work started with
//! `tokio::spawn` must be wrapped in [`TraceId::scope`] explicitly.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use uuid::Uuid;

/// Header used both to accept an upstream identifier and to echo it back.
pub const TRACE_ID_HEADER: &str = "trace-id";

tokio::task_local! {
    static CURRENT: TraceId;
}

/// Request correlation identifier, a UUID underneath.
///
/// # Examples
/// ```
/// use foodgram::TraceId;
///
/// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
/// let id = TraceId::accept("3f2b8c1e-9d4a-4e7b-8a6f-1c2d3e4f5a6b").expect("uuid");
/// assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// A new random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Adopt an identifier supplied by a caller, ignoring anything that is
    /// not a UUID.
    #[must_use]
    pub fn accept(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }

    /// Identifier of the enclosing request, when there is one.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Drive `fut` to completion with `self` as the current identifier.
    pub async fn scope<Fut: Future>(self, fut: Fut) -> Fut::Output {
        CURRENT.scope(self, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn scoped_futures_observe_the_identifier() {
        let id = TraceId::generate();
        assert_eq!(id.scope(async { TraceId::current() }).await, Some(id));
        assert!(TraceId::current().is_none());
    }

    #[rstest]
    #[case("3f2b8c1e-9d4a-4e7b-8a6f-1c2d3e4f5a6b", true)]
    #[case("  3f2b8c1e-9d4a-4e7b-8a6f-1c2d3e4f5a6b ", true)]
    #[case("req-42", false)]
    #[case("", false)]
    fn accept_only_takes_uuids(#[case] raw: &str, #[case] accepted: bool) {
        assert_eq!(TraceId::accept(raw).is_some(), accepted);
    }

    #[test]
    fn display_round_trips_through_parse() {
        let id = TraceId::generate();
        assert_eq!(id.to_string().parse::<TraceId>().ok(), Some(id));
    }
}
