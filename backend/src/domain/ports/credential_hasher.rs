//! Port for one-way password hashing.
//!
//! Implementations are CPU-bound and synchronous; async callers should run
//! them on the blocking pool.

use crate::domain::{Password, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Errors raised while producing a password hash.
    pub enum HashingError {
        /// The hashing primitive rejected its inputs or parameters.
        Failed { message: String } => "password hashing failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Hash `password` with a fresh random salt.
    fn hash(&self, password: &Password) -> Result<PasswordHash, HashingError>;

    /// Check `password` against a stored hash. Malformed hashes never match.
    fn verify(&self, hash: &PasswordHash, password: &Password) -> bool;
}
