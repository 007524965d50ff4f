//! Port for the keyed session store.
//!
//! Records are single-key and expire passively once their TTL elapses. The
//! TTL is fixed at creation; reads never extend it.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{SessionId, SessionPayload};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session store adapters.
    pub enum SessionStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "session store connection failed: {message}",
        /// Command failed or the stored record could not be decoded.
        Query { message: String } => "session store query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store `payload` under a fresh identifier that expires after `ttl`.
    async fn create(
        &self,
        payload: &SessionPayload,
        ttl: Duration,
    ) -> Result<SessionId, SessionStoreError>;

    /// Read a live session; expired and unknown identifiers yield `None`.
    async fn read(&self, id: &SessionId) -> Result<Option<SessionPayload>, SessionStoreError>;

    /// Remove a session. Destroying an unknown identifier succeeds.
    async fn destroy(&self, id: &SessionId) -> Result<(), SessionStoreError>;
}
