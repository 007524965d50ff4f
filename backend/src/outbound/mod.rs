//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: user store on PostgreSQL (Diesel) or in memory
//! - **session**: session store on Redis (`bb8-redis`) or in memory
//! - **storage**: profile image object store on the local filesystem or in
//!   memory
//! - **hashing**: Argon2id credential hasher
//!
//! Adapters translate between domain types and infrastructure representations
//! and contain no business logic.

pub mod hashing;
pub mod persistence;
pub mod session;
pub mod storage;
