//! Server construction and middleware wiring.

mod config;
mod shutdown;

pub use config::ServerConfig;
pub use shutdown::{first_signal, shutdown_signal};

use actix_cors::Cors;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{Method, header};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::configure_api;
use crate::inbound::http::health::{HealthState, health, live, ready};
use crate::inbound::http::state::HttpState;
use crate::middleware::{CatchPanic, Trace};

/// Shared state handed to every worker's [`App`].
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
}

/// Permissive CORS policy: any origin, the CRUD verbs and the usual request
/// headers.
fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
}

/// Build the application: health endpoints at the root, user routes under
/// `/api/v1`, CORS, trace and panic middleware around everything, and
/// Swagger UI at `/docs` in debug builds.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(cors())
        .wrap(CatchPanic)
        .wrap(Trace)
        .service(health)
        .service(ready)
        .service(live)
        .service(web::scope("/api/v1").configure(configure_api));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the listener and start serving.
///
/// Readiness is flagged once the socket is bound. The returned [`Server`]
/// must be awaited to drive it; signal handling is left to the caller via
/// [`Server::handle`].
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(http_state);
    let server_health_state = health_state.clone();
    let ServerConfig {
        host,
        port,
        shutdown_timeout,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .disable_signals()
    .shutdown_timeout(shutdown_timeout.as_secs())
    .bind((host.as_str(), port))?
    .run();

    health_state.mark_ready();
    Ok(server)
}
