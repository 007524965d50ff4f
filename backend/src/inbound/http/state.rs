//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and only ever talk
//! to the [`AuthService`] driving port, so they can be exercised against
//! in-memory adapters or mocks.

use std::sync::Arc;

use crate::domain::ports::AuthService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthService>,
}

impl HttpState {
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::AuthService;
    /// use backend::inbound::http::state::HttpState;
    ///
    /// fn wire(service: Arc<dyn AuthService>) -> HttpState {
    ///     HttpState::new(service)
    /// }
    /// ```
    pub fn new(auth: Arc<dyn AuthService>) -> Self {
        Self { auth }
    }
}
