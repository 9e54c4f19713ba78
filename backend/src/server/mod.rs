//! Assembles the Actix application and binds the listener.

mod config;
mod state_builders;

pub use config::ServerConfig;

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::time::Duration;
use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};

use foodgram::Trace;
use foodgram::inbound::http::health::{HealthState, live, ready};
use foodgram::inbound::http::media::media_scope;
use foodgram::inbound::http::session_config::SessionSettings;
use foodgram::inbound::http::{configure_api, json_config};
use foodgram::outbound::media::MediaConfig;

use state_builders::build_http_state;

/// Name of the cookie holding the encrypted session.
const SESSION_COOKIE: &str = "session";
const SESSION_TTL_DAYS: i64 = 14;

fn session_middleware(settings: &SessionSettings) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), settings.key.clone())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_path("/".to_owned())
        .cookie_http_only(true)
        .cookie_secure(settings.cookie_secure)
        .cookie_same_site(settings.same_site)
        .cookie_content_security(CookieContentSecurity::Private)
        .session_lifecycle(PersistentSession::default().session_ttl(Duration::days(SESSION_TTL_DAYS)))
        .build()
}

/// Bind the HTTP server and flip readiness once the socket is open.
///
/// Session cookies only wrap `/api`; probes, media files and the Swagger UI
/// (debug builds) are served without them.
///
/// # Errors
/// Returns the [`std::io::Error`] raised when binding fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config);
    let ServerConfig {
        session,
        bind_addr,
        media,
        ..
    } = config;
    let probes = health_state.clone();

    let server = HttpServer::new(move || {
        let MediaConfig { root, base_url } = media.clone();
        let api = web::scope("/api")
            .wrap(session_middleware(&session))
            .configure(configure_api);

        let app = App::new()
            .wrap(Trace)
            .app_data(probes.clone())
            .app_data(http_state.clone())
            .app_data(json_config())
            .service(ready)
            .service(live)
            .service(api);
        let app = match media_scope(&base_url, root) {
            Some(files) => app.service(files),
            None => app,
        };

        #[cfg(debug_assertions)]
        let app = {
            use utoipa::OpenApi;
            app.service(
                utoipa_swagger_ui::SwaggerUi::new("/docs")
                    .url("/api-docs/openapi.json", foodgram::doc::ApiDoc::openapi()),
            )
        };

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
