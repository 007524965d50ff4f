//! Driving port for identity and session use cases.
//!
//! Inbound adapters (HTTP handlers) depend on this trait rather than on the
//! concrete service, so they stay ignorant of hashing and store wiring. The
//! session identifier is passed in and handed back explicitly; carrying it
//! between requests is the adapter's concern.

use async_trait::async_trait;

use crate::domain::{
    AuthResult, Error, Password, ProfileImageUpload, RegistrationInput, SessionId, User,
    UserLookup,
};

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Validate, hash, insert and start a session for a new user.
    async fn register(&self, input: RegistrationInput) -> Result<AuthResult, Error>;

    /// Verify credentials and start a session.
    ///
    /// `username_or_email` selects the lookup by the presence of `@`.
    async fn login(&self, username_or_email: &str, password: Password)
    -> Result<AuthResult, Error>;

    /// Destroy a session. Returns `false` when the store rejected the delete.
    async fn logout(&self, session_id: &SessionId) -> bool;

    /// Resolve the user bound to a live session.
    async fn current_user(&self, session_id: &SessionId) -> Result<Option<User>, Error>;

    /// Store a new profile image for the session's user.
    async fn update_profile_image(
        &self,
        session_id: Option<&SessionId>,
        upload: ProfileImageUpload,
    ) -> Result<User, Error>;

    /// Public lookup by identifier or username.
    async fn find_user(&self, lookup: UserLookup) -> Result<Option<User>, Error>;
}
