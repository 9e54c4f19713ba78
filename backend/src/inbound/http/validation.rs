//! Shared query-string parsing for inbound HTTP adapters.
//!
//! Recipe filters repeat keys (`?tags=soup&tags=salat`), which the serde
//! query extractor cannot express, so handlers read [`QueryParams`] instead.

use pagination::{LIMIT_PARAM, PAGE_PARAM, PageRequest, PaginationError};
use serde_json::json;

use crate::domain::{Error, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidInteger,
    InvalidFlag,
    InvalidPage,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidInteger => "invalid_integer",
            ErrorCode::InvalidFlag => "invalid_flag",
            ErrorCode::InvalidPage => "invalid_page",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn invalid_value(field: FieldName, code: ErrorCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// Parse a numeric path segment.
///
/// Non-numeric ids cannot name any row, so they answer `404` like an unknown
/// id does.
pub(crate) fn path_id<T: std::str::FromStr>(raw: &str, entity: &str) -> Result<T, Error> {
    raw.parse::<T>()
        .map_err(|_| Error::not_found(format!("{entity} {raw} not found")))
}

/// Decoded query-string pairs in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub(crate) fn parse(query_string: &str) -> Self {
        Self(
            url::form_urlencoded::parse(query_string.as_bytes())
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect(),
        )
    }

    /// First value for `key`; blank values count as absent.
    pub(crate) fn first(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(candidate, value)| candidate == key && !value.trim().is_empty())
            .map(|(_, value)| value.as_str())
    }

    /// Every non-blank value for `key`.
    pub(crate) fn all(&self, key: &str) -> Vec<String> {
        self.0
            .iter()
            .filter(|(candidate, value)| candidate == key && !value.trim().is_empty())
            .map(|(_, value)| value.trim().to_owned())
            .collect()
    }

    /// `page`/`limit` window, defaulting the size to `default_limit`.
    pub(crate) fn page_request(&self, default_limit: u32) -> Result<PageRequest, Error> {
        PageRequest::parse(
            self.first(PAGE_PARAM),
            self.first(LIMIT_PARAM),
            default_limit,
        )
        .map_err(map_pagination_error)
    }

    /// A `0|1|true|false` flag; absent means `false`.
    pub(crate) fn flag(&self, field: FieldName) -> Result<bool, Error> {
        let Some(raw) = self.first(field.as_str()) else {
            return Ok(false);
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            _ => Err(invalid_value(
                field,
                ErrorCode::InvalidFlag,
                format!("{} must be 0 or 1", field.as_str()),
                raw,
            )),
        }
    }

    /// A positive user id.
    pub(crate) fn user_id(&self, field: FieldName) -> Result<Option<UserId>, Error> {
        self.first(field.as_str())
            .map(|raw| {
                raw.trim().parse::<UserId>().map_err(|_| {
                    invalid_value(
                        field,
                        ErrorCode::InvalidInteger,
                        format!("{} must be a positive integer", field.as_str()),
                        raw,
                    )
                })
            })
            .transpose()
    }

    /// A non-negative count such as `recipes_limit`.
    pub(crate) fn count(&self, field: FieldName) -> Result<Option<u32>, Error> {
        self.first(field.as_str())
            .map(|raw| {
                raw.trim().parse::<u32>().map_err(|_| {
                    invalid_value(
                        field,
                        ErrorCode::InvalidInteger,
                        format!("{} must be a non-negative integer", field.as_str()),
                        raw,
                    )
                })
            })
            .transpose()
    }
}

fn map_pagination_error(error: PaginationError) -> Error {
    let message = error.to_string();
    match error {
        PaginationError::InvalidPage { value } => invalid_value(
            FieldName::new(PAGE_PARAM),
            ErrorCode::InvalidPage,
            message,
            &value,
        ),
        PaginationError::InvalidLimit { value, .. } => invalid_value(
            FieldName::new(LIMIT_PARAM),
            ErrorCode::InvalidPage,
            message,
            &value,
        ),
    }
}
