//! In-memory wiring of the auth service.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use url::Url;

use crate::domain::{AuthServicePorts, SessionAuthService};
use crate::outbound::hashing::{Argon2Hasher, Argon2Settings};
use crate::outbound::persistence::InMemoryUserRepository;
use crate::outbound::session::InMemorySessionStore;
use crate::outbound::storage::InMemoryObjectStore;

use super::MutableClock;

/// Adapters behind a [`SessionAuthService`], kept reachable so tests can
/// inspect stores and move the clock.
pub struct InMemoryHarness {
    pub users: Arc<InMemoryUserRepository>,
    pub sessions: Arc<InMemorySessionStore>,
    pub objects: Arc<InMemoryObjectStore>,
    pub clock: Arc<MutableClock>,
    pub service: SessionAuthService,
}

fn harness_epoch() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single() {
        Some(now) => now,
        None => panic!("harness epoch is a valid timestamp"),
    }
}

/// Build a service over fresh in-memory adapters.
///
/// Argon2 runs with minimal cost so suites stay fast.
///
/// # Panics
///
/// Panics if the fixed Argon2 parameters or the public base URL are rejected.
pub fn in_memory_harness() -> InMemoryHarness {
    let clock = Arc::new(MutableClock::new(harness_epoch()));
    let users = Arc::new(InMemoryUserRepository::new(clock.clone()));
    let sessions = Arc::new(InMemorySessionStore::new(clock.clone()));
    let public_base = match Url::parse("https://cdn.example.test/uploads/") {
        Ok(url) => url,
        Err(error) => panic!("harness base url: {error}"),
    };
    let objects = Arc::new(InMemoryObjectStore::new(public_base));
    let hasher = match Argon2Hasher::new(Argon2Settings {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    }) {
        Ok(hasher) => hasher,
        Err(error) => panic!("harness argon2 settings: {error}"),
    };

    let service = SessionAuthService::new(
        AuthServicePorts {
            users: users.clone(),
            sessions: sessions.clone(),
            objects: objects.clone(),
            hasher: Arc::new(hasher),
        },
        clock.clone(),
    );

    InMemoryHarness {
        users,
        sessions,
        objects,
        clock,
        service,
    }
}
