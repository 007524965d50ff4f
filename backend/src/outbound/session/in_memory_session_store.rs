//! Process-local [`SessionStore`] for tests and database-less development.
//!
//! Expiry is evaluated against the injected clock on read, mirroring Redis'
//! passive expiry. Creating a session also sweeps expired entries so unread
//! sessions do not accumulate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::ports::{SessionStore, SessionStoreError};
use crate::domain::{SessionId, SessionPayload};

struct Entry {
    payload: SessionPayload,
    expires_at: DateTime<Utc>,
}

/// Mutex-guarded map of live sessions.
pub struct InMemorySessionStore {
    entries: Mutex<HashMap<SessionId, Entry>>,
    clock: Arc<dyn Clock>,
}

impl InMemorySessionStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Number of sessions not yet expired.
    pub fn live_sessions(&self) -> Result<usize, SessionStoreError> {
        let now = self.clock.utc();
        let entries = self.lock()?;
        Ok(entries.values().filter(|entry| entry.expires_at > now).count())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, Entry>>, SessionStoreError> {
        self.entries
            .lock()
            .map_err(|_| SessionStoreError::query("session map poisoned"))
    }
}

fn expiry(issued: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(ttl)
        .ok()
        .and_then(|delta| issued.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(
        &self,
        payload: &SessionPayload,
        ttl: Duration,
    ) -> Result<SessionId, SessionStoreError> {
        let now = self.clock.utc();
        let expires_at = expiry(now, ttl);
        let mut entries = self.lock()?;
        entries.retain(|_, entry| entry.expires_at > now);
        let mut id = SessionId::generate();
        while entries.contains_key(&id) {
            id = SessionId::generate();
        }
        entries.insert(
            id.clone(),
            Entry {
                payload: payload.clone(),
                expires_at,
            },
        );
        Ok(id)
    }

    async fn read(&self, id: &SessionId) -> Result<Option<SessionPayload>, SessionStoreError> {
        let now = self.clock.utc();
        let mut entries = self.lock()?;
        match entries.get(id) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.payload.clone())),
            Some(_) => {
                entries.remove(id);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn destroy(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        self.lock()?.remove(id);
        Ok(())
    }
}
