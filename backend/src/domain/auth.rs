//! Authentication primitives: credentials, field errors and auth outcomes.
//!
//! Keep inbound payload parsing outside the domain: handlers build a
//! [`RegistrationInput`] or pass the raw login identifier, and the auth
//! service decides what is valid.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::{EmailAddress, SessionId, User, Username};

/// Plaintext password held only long enough to hash or verify it.
///
/// The buffer is wiped on drop and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    pub fn new(plaintext: impl Into<String>) -> Self {
        Self(Zeroizing::new(plaintext.into()))
    }

    /// Plaintext for hashing or verification.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Length in characters.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(**redacted**)")
    }
}

/// Self-describing password hash (PHC string format).
///
/// The string embeds the algorithm, version, cost parameters and salt, so
/// verification never needs out-of-band parameters.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a PHC string produced by a hasher or read from storage.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(**redacted**)")
    }
}

/// Raw registration form as submitted by a client.
///
/// Must pass [`crate::domain::validate_registration`] before any store
/// interaction.
#[derive(Debug, Clone)]
pub struct RegistrationInput {
    pub email: String,
    pub full_name: String,
    pub username: String,
    pub password: Password,
}

/// Login identifier after `@`-based discrimination.
///
/// Usernames can never contain `@`, so the split is unambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    Username(String),
    Email(String),
}

impl LoginIdentifier {
    /// Classify a raw `usernameOrEmail` value.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::LoginIdentifier;
    ///
    /// assert!(matches!(LoginIdentifier::parse("bob@x.io"), LoginIdentifier::Email(_)));
    /// assert!(matches!(LoginIdentifier::parse("bob"), LoginIdentifier::Username(_)));
    /// ```
    pub fn parse(raw: &str) -> Self {
        if raw.contains('@') {
            Self::Email(raw.to_owned())
        } else {
            Self::Username(raw.to_owned())
        }
    }

    /// Resolve to a typed username, or `None` if no stored user could match.
    pub fn as_username(&self) -> Option<Username> {
        match self {
            Self::Username(raw) => Username::new(raw.as_str()).ok(),
            Self::Email(_) => None,
        }
    }

    /// Resolve to a typed email, or `None` if no stored user could match.
    pub fn as_email(&self) -> Option<EmailAddress> {
        match self {
            Self::Email(raw) => EmailAddress::new(raw.as_str()).ok(),
            Self::Username(_) => None,
        }
    }
}

/// Input field a [`FieldError`] is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthField {
    Username,
    Email,
    Password,
    UsernameOrEmail,
    /// Whole-account conflict whose column could not be determined.
    Account,
}

impl AuthField {
    /// Wire name used by clients to place the message next to a form input.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::Password => "password",
            Self::UsernameOrEmail => "usernameOrEmail",
            Self::Account => "account",
        }
    }
}

impl fmt::Display for AuthField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation or business-rule failure attributed to one input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    field: AuthField,
    message: String,
}

impl FieldError {
    pub fn new(field: AuthField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn field(&self) -> AuthField {
        self.field
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of a registration or login attempt.
///
/// Exactly one arm is populated; match on it before use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    /// Credentials accepted and a fresh session bound to the user.
    Authenticated { user: User, session_id: SessionId },
    /// Attempt refused; no session was created.
    Rejected(FieldError),
}

impl AuthResult {
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated { user, .. } => Some(user),
            Self::Rejected(_) => None,
        }
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            Self::Authenticated { session_id, .. } => Some(session_id),
            Self::Rejected(_) => None,
        }
    }

    pub fn field_error(&self) -> Option<&FieldError> {
        match self {
            Self::Authenticated { .. } => None,
            Self::Rejected(error) => Some(error),
        }
    }
}

impl From<FieldError> for AuthResult {
    fn from(value: FieldError) -> Self {
        Self::Rejected(value)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("alice@example.com", LoginIdentifier::Email("alice@example.com".to_owned()))]
    #[case("alice", LoginIdentifier::Username("alice".to_owned()))]
    #[case("@", LoginIdentifier::Email("@".to_owned()))]
    fn login_identifier_discriminates_on_at_sign(
        #[case] raw: &str,
        #[case] expected: LoginIdentifier,
    ) {
        assert_eq!(LoginIdentifier::parse(raw), expected);
    }

    #[rstest]
    fn impossible_identifiers_resolve_to_none() {
        assert!(LoginIdentifier::parse("ab").as_username().is_none());
        assert!(LoginIdentifier::parse("a@b@c").as_email().is_none());
        assert!(LoginIdentifier::parse("alice").as_email().is_none());
    }

    #[rstest]
    fn secrets_are_redacted_in_debug_output() {
        let password = Password::new("hunter2");
        let hash = PasswordHash::from_phc("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA");
        assert!(!format!("{password:?}").contains("hunter2"));
        assert!(!format!("{hash:?}").contains("argon2id"));
    }

    #[rstest]
    #[case(AuthField::Username, "username")]
    #[case(AuthField::UsernameOrEmail, "usernameOrEmail")]
    #[case(AuthField::Account, "account")]
    fn auth_field_wire_names(#[case] field: AuthField, #[case] expected: &str) {
        assert_eq!(field.as_str(), expected);
    }

    #[rstest]
    fn rejected_result_exposes_only_the_error() {
        let result = AuthResult::from(FieldError::new(AuthField::Password, "password is incorrect"));
        assert!(result.user().is_none());
        assert!(result.session_id().is_none());
        assert_eq!(
            result.field_error().map(FieldError::field),
            Some(AuthField::Password)
        );
    }
}
