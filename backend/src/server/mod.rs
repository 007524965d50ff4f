//! Server construction and middleware wiring.

mod adapters;
mod config;

pub use adapters::{StartupError, build_auth_service};
pub use config::{AppSettings, UPLOADS_ROUTE};

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use actix_files::Files;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::domain::ports::AuthService;
use backend::inbound::http::configure_api;
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::session::SessionCookieConfig;
use backend::inbound::http::state::HttpState;

/// Everything the HTTP server needs once adapters are wired.
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub auth: Arc<dyn AuthService>,
    pub cookies: SessionCookieConfig,
    /// Directory served read-only under [`UPLOADS_ROUTE`].
    pub upload_dir: PathBuf,
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    cookies: web::Data<SessionCookieConfig>,
    upload_dir: PathBuf,
}

fn build_app(
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
        cookies,
        upload_dir,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(cookies)
        .wrap(Trace)
        .configure(configure_api)
        .service(ready)
        .service(live)
        .service(Files::new(UPLOADS_ROUTE, upload_dir));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

#[cfg(feature = "metrics")]
fn make_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("instaclone")
        .endpoint("/metrics")
        .build()
        .map_err(|e| std::io::Error::other(format!("configure Prometheus metrics: {e}")))
}

/// Bind the listener and return the running server.
///
/// Readiness flips once the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        auth,
        cookies,
        upload_dir,
    } = config;
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state: web::Data::new(HttpState::new(auth)),
        cookies: web::Data::new(cookies),
        upload_dir,
    };
    #[cfg(feature = "metrics")]
    let prometheus = make_metrics()?;

    let server = HttpServer::new(move || {
        let app = build_app(deps.clone());
        #[cfg(feature = "metrics")]
        let app = app.wrap(prometheus.clone());
        app
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "listening");
    health_state.mark_ready();
    Ok(server)
}
