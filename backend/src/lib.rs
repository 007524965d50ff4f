//! Identity and session backend for Instaclone.
//!
//! The domain core ([`domain`]) owns registration, login and session rules
//! behind ports; [`outbound`] holds PostgreSQL, Redis, filesystem and
//! in-memory adapters; [`inbound`] exposes them over HTTP.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
