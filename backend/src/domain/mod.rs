//! Domain primitives, services and ports.
//!
//! Purpose: define the identity and session model (users, credentials,
//! sessions), the rules applied to registration and login, and the ports the
//! auth service drives. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User (alias to `user::User`): user identity without credentials.
//! - AuthResult (alias to `auth::AuthResult`): outcome of register/login.
//! - SessionAuthService: the [`ports::AuthService`] implementation.

pub mod auth;
pub mod auth_service;
pub mod error;
pub mod ports;
pub mod session;
pub mod trace_id;
pub mod upload;
pub mod user;
pub mod validation;

pub use self::auth::{
    AuthField, AuthResult, FieldError, LoginIdentifier, Password, PasswordHash, RegistrationInput,
};
pub use self::auth_service::{AuthServicePorts, SessionAuthService};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::session::{DEFAULT_SESSION_TTL, SessionId, SessionIdError, SessionPayload};
pub use self::trace_id::TraceId;
pub use self::upload::{
    ObjectKey, ProfileImageUpload, UploadFilename, UploadFilenameError, UserLookup,
};
pub use self::user::{
    DisplayName, EmailAddress, NewUser, ProfileImageUrl, StoredUser, USERNAME_MIN, User,
    UserDraft, UserId, UserValidationError, Username,
};
pub use self::validation::{PASSWORD_MIN, ValidRegistration, validate_registration};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::unauthorized("not authenticated"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
