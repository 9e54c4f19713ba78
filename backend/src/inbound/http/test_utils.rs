//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test as actix_test, web};

use crate::domain::UserId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;

/// Route that plays the identity provider in handler tests.
pub const SIGN_IN_PATH: &str = "/test/sign-in/{id}";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Store the path's user id in the session, as the identity provider would.
pub async fn sign_in(session: SessionContext, path: web::Path<i64>) -> ApiResult<HttpResponse> {
    session.persist_user(UserId::new(path.into_inner()))?;
    Ok(HttpResponse::NoContent().finish())
}

/// Register [`sign_in`] at [`SIGN_IN_PATH`].
pub fn configure_sign_in(cfg: &mut web::ServiceConfig) {
    cfg.route(SIGN_IN_PATH, web::post().to(sign_in));
}

/// Obtain a session cookie for `user` from an app that mounts
/// [`configure_sign_in`].
pub async fn session_cookie<S>(app: &S, user: i64) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = actix_test::TestRequest::post()
        .uri(&format!("/test/sign-in/{user}"))
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success(), "sign-in failed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}
