//! Classification of Diesel failures shared by every repository.
//!
//! Repositories turn a [`DieselFailure`] into their own port error so that
//! constraint handling stays in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// What kind of failure a Diesel error represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: String },
    /// A foreign key pointed at a missing row.
    ForeignKeyViolation { constraint: String },
    /// The connection dropped mid-operation.
    Connection,
    /// Anything else.
    Query { message: String },
}

/// Classify `error`, logging it at debug level with the operation name.
pub(crate) fn classify_diesel_error(error: DieselError, operation: &str) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                operation,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(operation, %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation {
                constraint: info.constraint_name().unwrap_or("unique").to_owned(),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            DieselFailure::ForeignKeyViolation {
                constraint: info.constraint_name().unwrap_or("foreign key").to_owned(),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection
        }
        DieselError::NotFound => DieselFailure::Query {
            message: "record not found".to_owned(),
        },
        DieselError::QueryBuilderError(_) => DieselFailure::Query {
            message: "database query error".to_owned(),
        },
        _ => DieselFailure::Query {
            message: format!("{operation} failed"),
        },
    }
}

/// Escape `LIKE` metacharacters so user input matches literally.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(escape_like("50%_off"), "50\\%\\_off");
/// ```
pub(crate) fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Convert a page window into SQL `LIMIT`/`OFFSET` values.
pub(crate) fn limit_offset(request: pagination::PageRequest) -> (i64, i64) {
    let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);
    (i64::from(request.limit()), offset)
}

/// Convert a `COUNT(*)` result into a page total.
pub(crate) fn count_to_total(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}
