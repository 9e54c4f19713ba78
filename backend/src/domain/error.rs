//! Domain-level error type.
//!
//! Errors are transport agnostic. Inbound adapters map them to HTTP status
//! codes and JSON bodies; services build them from port failures.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::trace_id::TraceId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The referenced entity or relation does not exist.
    NotFound,
    /// The relation already exists.
    Conflict,
    /// The shopping cart has no recipes to aggregate.
    EmptyCart,
    /// A backing service is temporarily unreachable.
    ServiceUnavailable,
    /// An unexpected failure inside the service.
    InternalError,
}

impl ErrorCode {
    fn fallback_message(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid request",
            Self::Unauthorized => "authentication required",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not found",
            Self::Conflict => "conflict",
            Self::EmptyCart => "shopping cart is empty",
            Self::ServiceUnavailable => "service unavailable",
            Self::InternalError => "internal server error",
        }
    }
}

/// Error payload returned to clients.
///
/// `trace_id` is captured from the request scope when the error is built, so
/// handlers never thread it through explicitly.
///
/// # Examples
/// ```
/// use foodgram::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("recipe 7 not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "recipe 7 not found");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    #[schema(example = "invalid_request")]
    code: ErrorCode,
    #[schema(example = "cooking_time must be > 0")]
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "trace_id")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Build an error, substituting a generic message for a blank one.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.fallback_message().to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier of the request that failed, if in scope.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Supplementary structured details.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("amount must be > 0")
    ///     .with_details(json!({ "field": "ingredients", "index": 1 }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Override the captured trace identifier.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// The cart export was requested with nothing in the cart.
    pub fn empty_cart() -> Self {
        Self::new(ErrorCode::EmptyCart, "")
    }
}

macro_rules! shorthand_constructors {
    ($($name:ident => $code:ident),+ $(,)?) => {
        impl Error {
            $(
                #[doc = concat!("An [`ErrorCode::", stringify!($code), "`] error.")]
                pub fn $name(message: impl Into<String>) -> Self {
                    Self::new(ErrorCode::$code, message)
                }
            )+
        }
    };
}

shorthand_constructors! {
    invalid_request => InvalidRequest,
    unauthorized => Unauthorized,
    forbidden => Forbidden,
    not_found => NotFound,
    conflict => Conflict,
    service_unavailable => ServiceUnavailable,
    internal => InternalError,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}
