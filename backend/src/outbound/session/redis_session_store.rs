//! Redis-backed [`SessionStore`] using `bb8-redis` connection pooling.
//!
//! Each session is a single string key `{prefix}{id}` holding the JSON
//! payload, written with `SET .. EX ttl NX` so Redis expires it passively and
//! an existing key is never overwritten.

use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, PooledConnection};
use bb8_redis::redis::{self, RedisError};
use tracing::debug;

use crate::domain::ports::{SessionStore, SessionStoreError};
use crate::domain::{SessionId, SessionPayload};

/// Default key namespace for session records.
pub const DEFAULT_KEY_PREFIX: &str = "sess:";

/// Identifier draws before giving up on `NX` collisions.
const CREATE_ATTEMPTS: usize = 3;

/// Session store persisting payloads in Redis.
#[derive(Clone)]
pub struct RedisSessionStore {
    pool: Pool<RedisConnectionManager>,
    key_prefix: String,
}

impl RedisSessionStore {
    /// Connect to `redis_url` and build a pool of up to `max_size`
    /// multiplexed connections.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError::Connection`] when the URL is invalid or
    /// the server cannot be reached.
    pub async fn connect(redis_url: &str, max_size: u32) -> Result<Self, SessionStoreError> {
        let manager = RedisConnectionManager::new(redis_url).map_err(map_redis_error)?;
        let pool = Pool::builder()
            .max_size(max_size)
            .build(manager)
            .await
            .map_err(map_redis_error)?;
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: Pool<RedisConnectionManager>) -> Self {
        Self {
            pool,
            key_prefix: DEFAULT_KEY_PREFIX.to_owned(),
        }
    }

    #[must_use]
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    fn key(&self, id: &SessionId) -> String {
        session_key(&self.key_prefix, id)
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, RedisConnectionManager>, SessionStoreError> {
        self.pool
            .get()
            .await
            .map_err(|err| SessionStoreError::connection(err.to_string()))
    }
}

fn session_key(prefix: &str, id: &SessionId) -> String {
    format!("{prefix}{}", id.as_str())
}

/// Redis rejects `EX 0`; sub-second TTLs round up to one second.
fn expiry_seconds(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

fn map_redis_error(error: RedisError) -> SessionStoreError {
    if error.is_io_error()
        || error.is_connection_refusal()
        || error.is_connection_dropped()
        || error.is_timeout()
    {
        SessionStoreError::connection(error.to_string())
    } else {
        SessionStoreError::query(error.to_string())
    }
}

fn decode_payload(raw: &str) -> Result<SessionPayload, SessionStoreError> {
    serde_json::from_str(raw)
        .map_err(|err| SessionStoreError::query(format!("undecodable session payload: {err}")))
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn create(
        &self,
        payload: &SessionPayload,
        ttl: Duration,
    ) -> Result<SessionId, SessionStoreError> {
        let body = serde_json::to_string(payload)
            .map_err(|err| SessionStoreError::query(format!("unencodable session: {err}")))?;
        let mut conn = self.connection().await?;

        for _ in 0..CREATE_ATTEMPTS {
            let id = SessionId::generate();
            let reply: Option<String> = redis::cmd("SET")
                .arg(self.key(&id))
                .arg(&body)
                .arg("EX")
                .arg(expiry_seconds(ttl))
                .arg("NX")
                .query_async(&mut *conn)
                .await
                .map_err(map_redis_error)?;
            if reply.is_some() {
                return Ok(id);
            }
            debug!("session identifier collision, drawing again");
        }
        Err(SessionStoreError::query(
            "could not allocate a unique session identifier",
        ))
    }

    async fn read(&self, id: &SessionId) -> Result<Option<SessionPayload>, SessionStoreError> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = redis::cmd("GET")
            .arg(self.key(id))
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;
        raw.as_deref().map(decode_payload).transpose()
    }

    async fn destroy(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        let mut conn = self.connection().await?;
        let removed: i64 = redis::cmd("DEL")
            .arg(self.key(id))
            .query_async(&mut *conn)
            .await
            .map_err(map_redis_error)?;
        debug!(removed, "session destroyed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    use crate::domain::UserId;

    #[rstest]
    fn keys_are_namespaced() {
        let id = SessionId::generate();
        assert_eq!(
            session_key(DEFAULT_KEY_PREFIX, &id),
            format!("sess:{}", id.as_str())
        );
    }

    #[rstest]
    #[case(Duration::from_millis(10), 1)]
    #[case(Duration::from_secs(0), 1)]
    #[case(Duration::from_secs(90), 90)]
    fn expiry_is_at_least_one_second(#[case] ttl: Duration, #[case] expected: u64) {
        assert_eq!(expiry_seconds(ttl), expected);
    }

    #[rstest]
    fn payload_survives_json_encoding() {
        let payload = SessionPayload::new(UserId::random(), Utc::now());
        let raw = serde_json::to_string(&payload).expect("encode");
        assert!(raw.contains("\"userId\""));
        assert_eq!(decode_payload(&raw).expect("decode"), payload);
    }

    #[rstest]
    fn garbage_payload_is_a_query_error() {
        let err = decode_payload("{not json").expect_err("decode fails");
        assert!(matches!(err, SessionStoreError::Query { .. }));
    }
}
