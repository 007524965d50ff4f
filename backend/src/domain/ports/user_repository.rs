//! Port abstraction for the durable user store.
//!
//! The store owns user rows and enforces uniqueness of username and email.
//! Inserts report conflicts structurally so the auth service classifies them
//! with a type match instead of inspecting driver messages.

use async_trait::async_trait;

use crate::domain::{EmailAddress, NewUser, ProfileImageUrl, StoredUser, User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user store adapters.
    pub enum UserPersistenceError {
        /// Store connection could not be established.
        Connection { message: String } => "user store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user store query failed: {message}",
    }
}

/// Column guarded by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniqueUserColumn {
    Username,
    Email,
}

/// Failure modes of [`UserRepository::insert`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserInsertError {
    /// Another user already holds a value in `columns`.
    ///
    /// `columns` is empty when the adapter could not tell which constraint
    /// fired.
    #[error("user store rejected duplicate values for {columns:?}")]
    UniqueViolation { columns: Vec<UniqueUserColumn> },
    #[error(transparent)]
    Persistence(#[from] UserPersistenceError),
}

impl UserInsertError {
    pub fn unique_violation(columns: impl IntoIterator<Item = UniqueUserColumn>) -> Self {
        Self::UniqueViolation {
            columns: columns.into_iter().collect(),
        }
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user atomically, relying on the store's unique constraints.
    async fn insert(&self, user: &NewUser) -> Result<User, UserInsertError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user and stored credential by username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredUser>, UserPersistenceError>;

    /// Fetch a user and stored credential by email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredUser>, UserPersistenceError>;

    /// Set the profile image reference and return the updated row, or `None`
    /// when the user no longer exists.
    async fn update_profile_image(
        &self,
        id: &UserId,
        url: &ProfileImageUrl,
    ) -> Result<Option<User>, UserPersistenceError>;
}
