//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::Trace;
use crate::domain::ports::AuthService;
use crate::inbound::http::configure_api;
use crate::inbound::http::session::SessionCookieConfig;
use crate::inbound::http::state::HttpState;

/// Cookie settings for plain-HTTP test requests with a fresh key.
pub fn test_cookie_config() -> SessionCookieConfig {
    SessionCookieConfig::new(Key::generate()).with_secure(false)
}

/// App serving the API scope over the given service.
pub fn test_app(
    auth: Arc<dyn AuthService>,
    cookies: SessionCookieConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(HttpState::new(auth)))
        .app_data(web::Data::new(cookies))
        .wrap(Trace)
        .configure(configure_api)
}

/// The session cookie set by a response, if any.
pub fn session_cookie<B>(res: &ServiceResponse<B>, name: &str) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == name)
        .map(Cookie::into_owned)
}
