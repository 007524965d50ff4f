//! HTTP inbound adapter exposing the identity endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::web;

pub use error::ApiResult;

/// Upper bound on a profile image upload body.
pub const MAX_PROFILE_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Register the `/api/v1` scope.
///
/// Callers provide [`state::HttpState`] and [`session::SessionCookieConfig`]
/// as `web::Data`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use backend::inbound::http::configure_api;
///
/// let app = App::new().configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(web::PayloadConfig::new(MAX_PROFILE_IMAGE_BYTES))
            .service(auth::register)
            .service(auth::login)
            .service(auth::logout)
            .service(auth::me)
            .service(auth::update_profile_image)
            .service(users::find_user),
    );
}
