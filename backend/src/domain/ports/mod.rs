//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (user store, session store, object store, credential hasher)
//! expose typed errors so adapters map their failures into predictable
//! variants. [`AuthService`] is the driving port used by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_service;
mod credential_hasher;
mod object_store;
mod session_store;
mod user_repository;

pub use auth_service::AuthService;
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, HashingError};
#[cfg(test)]
pub use object_store::MockObjectStore;
pub use object_store::{ObjectStore, ObjectStoreError};
#[cfg(test)]
pub use session_store::MockSessionStore;
pub use session_store::{SessionStore, SessionStoreError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{
    UniqueUserColumn, UserInsertError, UserPersistenceError, UserRepository,
};

#[cfg(test)]
mod tests;
