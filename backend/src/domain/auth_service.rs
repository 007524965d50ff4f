//! Session-backed authentication service.
//!
//! Implements the [`AuthService`] driving port on top of the user store,
//! session store, object store and credential hasher ports. The service keeps
//! no state between calls; everything durable lives behind the ports.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{
    AuthService, CredentialHasher, HashingError, ObjectStore, ObjectStoreError, SessionStore,
    SessionStoreError, UniqueUserColumn, UserInsertError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthField, AuthResult, DEFAULT_SESSION_TTL, Error, FieldError, LoginIdentifier, NewUser,
    ObjectKey, Password, PasswordHash, ProfileImageUpload, ProfileImageUrl, RegistrationInput,
    SessionId, SessionPayload, StoredUser, UploadFilename, User, UserId, UserLookup,
    ValidRegistration,
};

const USERNAME_TAKEN: &str = "User with that username already exists";
const EMAIL_TAKEN: &str = "User with that email already exists";
const ACCOUNT_TAKEN: &str = "User with those details already exists";
const UNKNOWN_USER: &str = "user does not exist";
const WRONG_PASSWORD: &str = "password is incorrect";
const NOT_AUTHENTICATED: &str = "not authenticated";

/// Driven ports the service orchestrates.
#[derive(Clone)]
pub struct AuthServicePorts {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionStore>,
    pub objects: Arc<dyn ObjectStore>,
    pub hasher: Arc<dyn CredentialHasher>,
}

/// [`AuthService`] implementation backed by an external session store.
#[derive(Clone)]
pub struct SessionAuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionStore>,
    objects: Arc<dyn ObjectStore>,
    hasher: Arc<dyn CredentialHasher>,
    clock: Arc<dyn Clock>,
    session_ttl: Duration,
}

impl SessionAuthService {
    /// Create a service issuing sessions with [`DEFAULT_SESSION_TTL`].
    pub fn new(ports: AuthServicePorts, clock: Arc<dyn Clock>) -> Self {
        let AuthServicePorts {
            users,
            sessions,
            objects,
            hasher,
        } = ports;
        Self {
            users,
            sessions,
            objects,
            hasher,
            clock,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    /// Override the lifetime of newly issued sessions.
    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    async fn hash_password(&self, password: Password) -> Result<PasswordHash, Error> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| {
                error!(error = %err, "password hashing task failed");
                Error::internal("internal server error")
            })?
            .map_err(map_hashing_error)
    }

    async fn verify_password(&self, hash: PasswordHash, password: Password) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&hash, &password))
            .await
            .map_err(|err| {
                error!(error = %err, "password verification task failed");
                Error::internal("internal server error")
            })
    }

    async fn start_session(&self, user_id: &UserId) -> Result<SessionId, Error> {
        let payload = SessionPayload::new(*user_id, self.clock.utc());
        self.sessions
            .create(&payload, self.session_ttl)
            .await
            .map_err(map_session_error)
    }

    /// Resolve the live session's user, treating missing records as anonymous.
    async fn session_user(&self, session_id: &SessionId) -> Result<Option<User>, Error> {
        let Some(payload) = self
            .sessions
            .read(session_id)
            .await
            .map_err(map_session_error)?
        else {
            return Ok(None);
        };
        let user = self
            .users
            .find_by_id(&payload.user_id)
            .await
            .map_err(map_user_store_error)?;
        if user.is_none() {
            debug!(user_id = %payload.user_id, "session refers to a deleted user");
        }
        Ok(user)
    }

    async fn find_login_candidate(
        &self,
        identifier: &LoginIdentifier,
    ) -> Result<Option<StoredUser>, Error> {
        let found = match identifier {
            LoginIdentifier::Email(_) => match identifier.as_email() {
                Some(email) => self.users.find_by_email(&email).await,
                None => Ok(None),
            },
            LoginIdentifier::Username(_) => match identifier.as_username() {
                Some(username) => self.users.find_by_username(&username).await,
                None => Ok(None),
            },
        };
        found.map_err(map_user_store_error)
    }
}

#[async_trait]
impl AuthService for SessionAuthService {
    async fn register(&self, input: RegistrationInput) -> Result<AuthResult, Error> {
        let valid = match ValidRegistration::parse(&input) {
            Ok(valid) => valid,
            Err(field_error) => {
                debug!(field = %field_error.field(), "registration rejected");
                return Ok(AuthResult::Rejected(field_error));
            }
        };
        drop(input);

        let ValidRegistration {
            username,
            email,
            display_name,
            password,
        } = valid;
        let password_hash = self.hash_password(password).await?;
        let new_user = NewUser {
            id: UserId::random(),
            username,
            email,
            display_name,
            password_hash,
        };

        let user = match self.users.insert(&new_user).await {
            Ok(user) => user,
            Err(UserInsertError::UniqueViolation { columns }) => {
                let field_error = classify_conflict(&columns);
                debug!(field = %field_error.field(), "registration conflicted with existing user");
                return Ok(AuthResult::Rejected(field_error));
            }
            Err(UserInsertError::Persistence(err)) => return Err(map_user_store_error(err)),
        };

        let session_id = self.start_session(user.id()).await?;
        info!(user_id = %user.id(), "user registered");
        Ok(AuthResult::Authenticated { user, session_id })
    }

    async fn login(
        &self,
        username_or_email: &str,
        password: Password,
    ) -> Result<AuthResult, Error> {
        let identifier = LoginIdentifier::parse(username_or_email);
        let Some(StoredUser {
            user,
            password_hash,
        }) = self.find_login_candidate(&identifier).await?
        else {
            return Ok(FieldError::new(AuthField::UsernameOrEmail, UNKNOWN_USER).into());
        };

        if !self.verify_password(password_hash, password).await? {
            debug!(user_id = %user.id(), "login rejected: password mismatch");
            return Ok(FieldError::new(AuthField::Password, WRONG_PASSWORD).into());
        }

        let session_id = self.start_session(user.id()).await?;
        info!(user_id = %user.id(), "user logged in");
        Ok(AuthResult::Authenticated { user, session_id })
    }

    async fn logout(&self, session_id: &SessionId) -> bool {
        match self.sessions.destroy(session_id).await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "failed to destroy session");
                false
            }
        }
    }

    async fn current_user(&self, session_id: &SessionId) -> Result<Option<User>, Error> {
        self.session_user(session_id).await
    }

    async fn update_profile_image(
        &self,
        session_id: Option<&SessionId>,
        upload: ProfileImageUpload,
    ) -> Result<User, Error> {
        let Some(session_id) = session_id else {
            return Err(Error::unauthorized(NOT_AUTHENTICATED));
        };
        let Some(user) = self.session_user(session_id).await? else {
            return Err(Error::unauthorized(NOT_AUTHENTICATED));
        };

        let ProfileImageUpload { filename, bytes } = upload;
        let filename = UploadFilename::new(filename)
            .map_err(|err| Error::invalid_request(format!("invalid filename: {err}")))?;
        let key = ObjectKey::profile_image(user.id(), &filename);
        let url = self
            .objects
            .upload(&key, bytes)
            .await
            .map_err(map_object_store_error)?;

        let updated = self
            .users
            .update_profile_image(user.id(), &ProfileImageUrl::new(url))
            .await
            .map_err(map_user_store_error)?;
        let Some(updated) = updated else {
            return Err(Error::unauthorized(NOT_AUTHENTICATED));
        };
        info!(user_id = %updated.id(), key = %key, "profile image updated");
        Ok(updated)
    }

    async fn find_user(&self, lookup: UserLookup) -> Result<Option<User>, Error> {
        match lookup {
            UserLookup::ById(id) => self
                .users
                .find_by_id(&id)
                .await
                .map_err(map_user_store_error),
            UserLookup::ByUsername(username) => self
                .users
                .find_by_username(&username)
                .await
                .map(|found| found.map(|stored| stored.user))
                .map_err(map_user_store_error),
        }
    }
}

/// Attribute a uniqueness conflict to the input field that caused it.
///
/// Username wins when both constraints fire.
fn classify_conflict(columns: &[UniqueUserColumn]) -> FieldError {
    if columns.contains(&UniqueUserColumn::Username) {
        FieldError::new(AuthField::Username, USERNAME_TAKEN)
    } else if columns.contains(&UniqueUserColumn::Email) {
        FieldError::new(AuthField::Email, EMAIL_TAKEN)
    } else {
        FieldError::new(AuthField::Account, ACCOUNT_TAKEN)
    }
}

fn map_user_store_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            warn!(error = %message, "user store unavailable");
            Error::service_unavailable("user store unavailable")
        }
        UserPersistenceError::Query { message } => {
            error!(error = %message, "user store query failed");
            Error::internal("internal server error")
        }
    }
}

fn map_session_error(error: SessionStoreError) -> Error {
    match error {
        SessionStoreError::Connection { message } => {
            warn!(error = %message, "session store unavailable");
            Error::service_unavailable("session store unavailable")
        }
        SessionStoreError::Query { message } => {
            error!(error = %message, "session store query failed");
            Error::internal("internal server error")
        }
    }
}

fn map_object_store_error(error: ObjectStoreError) -> Error {
    match error {
        ObjectStoreError::Unavailable { message } => {
            warn!(error = %message, "object store unavailable");
            Error::service_unavailable("object store unavailable")
        }
        ObjectStoreError::Addressing { message } => {
            error!(error = %message, "object store addressing failed");
            Error::internal("internal server error")
        }
    }
}

fn map_hashing_error(error: HashingError) -> Error {
    error!(error = %error, "password hashing failed");
    Error::internal("internal server error")
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
