//! Backend entry-point: loads settings, wires adapters and serves the API.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::session::SessionCookieConfig;
use backend::inbound::http::session_config::{
    BuildMode, key_fingerprint, session_settings_from_env,
};
use server::{AppSettings, ServerConfig, StartupError, build_auth_service, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let session_settings = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(|e| std::io::Error::other(format!("invalid session configuration: {e}")))?;
    info!(
        fingerprint = %key_fingerprint(&session_settings.key),
        "session signing key loaded"
    );

    let auth = build_auth_service(&settings).await?;
    let cookies = SessionCookieConfig::from_settings(session_settings)
        .with_name(settings.cookie_name().map_err(StartupError::from)?)
        .with_max_age(auth.session_ttl());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state,
        ServerConfig {
            bind_addr: settings.bind_addr(),
            auth: Arc::new(auth),
            cookies,
            upload_dir: settings.upload_dir(),
        },
    )?;
    server.await
}
