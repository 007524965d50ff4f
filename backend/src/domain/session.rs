//! Server-side session primitives.
//!
//! A session binds an opaque, unguessable [`SessionId`] to an authenticated
//! user. The record lives in the session store; services only ever hold the
//! identifier, which the transport carries in a cookie.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::domain::UserId;

/// Random bytes per session identifier.
const SESSION_ID_BYTES: usize = 32;

/// Default session lifetime: ten years, i.e. until explicit logout.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 10);

/// Error raised when parsing a transported session identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("session identifier must be {expected} lowercase hex characters")]
pub struct SessionIdError {
    expected: usize,
}

/// Opaque session identifier: 256 bits from the OS CSPRNG, hex encoded.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Draw a fresh identifier from the operating system RNG.
    pub fn generate() -> Self {
        let mut bytes = [0_u8; SESSION_ID_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Parse an identifier received from a client.
    pub fn parse(raw: &str) -> Result<Self, SessionIdError> {
        let well_formed = raw.len() == SESSION_ID_BYTES * 2
            && raw
                .bytes()
                .all(|byte| byte.is_ascii_digit() || (b'a'..=b'f').contains(&byte));
        if !well_formed {
            return Err(SessionIdError {
                expected: SESSION_ID_BYTES * 2,
            });
        }
        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

// Session identifiers are bearer credentials; keep them out of logs.
impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.0.get(..8).unwrap_or_default();
        write!(f, "SessionId({prefix}…)")
    }
}

/// Data stored against a session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    pub user_id: UserId,
    /// Creation time; the TTL runs from here and is never extended.
    pub issued_at: DateTime<Utc>,
}

impl SessionPayload {
    pub fn new(user_id: UserId, issued_at: DateTime<Utc>) -> Self {
        Self { user_id, issued_at }
    }
}
