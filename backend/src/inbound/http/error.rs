//! Turns domain failures into JSON error responses.
//!
//! Infrastructure failures (`internal_error`, `service_unavailable`) carry
//! adapter messages such as pool or filesystem errors. Those are logged here
//! and replaced with the code's generic wording before reaching the client;
//! every other code is sent as built by the service layer.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result type returned by every HTTP handler.
pub type ApiResult<T> = Result<T, Error>;

fn is_infrastructure(code: ErrorCode) -> bool {
    matches!(
        code,
        ErrorCode::InternalError | ErrorCode::ServiceUnavailable
    )
}

/// Build the body the client sees for `error`.
///
/// Keeps the code and trace id; infrastructure failures lose their message
/// and details.
fn public_body(error: &Error) -> Error {
    if !is_infrastructure(error.code()) {
        return error.clone();
    }
    let body = Error::new(error.code(), "");
    match error.trace_id() {
        Some(id) => body.with_trace_id(id.to_owned()),
        None => body,
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest | ErrorCode::EmptyCart => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self.code() {
            ErrorCode::InternalError => {
                error!(trace_id = ?self.trace_id(), message = %self.message(), "request failed");
            }
            ErrorCode::ServiceUnavailable => {
                warn!(trace_id = ?self.trace_id(), message = %self.message(), "dependency unavailable");
            }
            _ => {}
        }

        let mut response = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        response.json(public_body(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "framework error surfaced in handler");
        Error::new(ErrorCode::InternalError, "")
    }
}
