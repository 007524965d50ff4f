//! Session store adapters.
//!
//! Redis is the production store; the in-memory store backs tests and local
//! runs without `INSTACLONE_REDIS_URL`.

mod in_memory_session_store;
mod redis_session_store;

pub use in_memory_session_store::InMemorySessionStore;
pub use redis_session_store::{DEFAULT_KEY_PREFIX, RedisSessionStore};
