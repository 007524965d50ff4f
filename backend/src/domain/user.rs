//! User data model.
//!
//! Identity fields are newtypes that enforce the registration policy at
//! construction, so any `User` in hand already satisfies it. The password hash
//! is deliberately absent from [`User`]; it only travels inside
//! [`StoredUser`] and [`NewUser`] across the user store boundary.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::domain::PasswordHash;

/// Minimum username length, counted in characters.
pub const USERNAME_MIN: usize = 3;

/// Validation errors returned by the identity newtypes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("username must be at least {min} characters")]
    UsernameTooShort { min: usize },
    #[error("username must not contain '@'")]
    UsernameContainsAt,
    #[error("email address must look like local@domain")]
    InvalidEmail,
    #[error("profile image reference must be an absolute URL")]
    InvalidProfileImageUrl,
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its canonical string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, typically read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unique login handle.
///
/// ## Invariants
/// - At least [`USERNAME_MIN`] characters.
/// - Never contains `@`; that character marks an email at login.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        let username = username.into();
        if username.chars().count() < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if username.contains('@') {
            return Err(UserValidationError::UsernameContainsAt);
        }
        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Unique email address in basic `local@domain` shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        if !email_regex().is_match(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Full name entered at registration. Free text, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_owned())
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Public URL of an uploaded profile image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileImageUrl(Url);

impl ProfileImageUrl {
    pub fn new(url: Url) -> Self {
        Self(url)
    }

    /// Parse a stored URL string.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        Url::parse(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidProfileImageUrl)
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl AsRef<str> for ProfileImageUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Application user as seen outside the user store.
///
/// Never cached by services beyond a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    display_name: DisplayName,
    profile_image: Option<ProfileImageUrl>,
    created_at: DateTime<Utc>,
}

/// Parameter object for [`User::new`].
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub display_name: DisplayName,
    pub profile_image: Option<ProfileImageUrl>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(draft: UserDraft) -> Self {
        let UserDraft {
            id,
            username,
            email,
            display_name,
            profile_image,
            created_at,
        } = draft;
        Self {
            id,
            username,
            email,
            display_name,
            profile_image,
            created_at,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Uploaded profile image, if the user has set one.
    pub fn profile_image(&self) -> Option<&ProfileImageUrl> {
        self.profile_image.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Return a copy pointing at a new profile image.
    #[must_use]
    pub fn with_profile_image(mut self, url: ProfileImageUrl) -> Self {
        self.profile_image = Some(url);
        self
    }
}

/// User row handed to the store for insertion.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub display_name: DisplayName,
    pub password_hash: PasswordHash,
}

/// User together with the stored credential, returned by lookups used for
/// login. Stays within the auth service; never leaves it.
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub user: User,
    pub password_hash: PasswordHash,
}

#[cfg(test)]
mod tests;
