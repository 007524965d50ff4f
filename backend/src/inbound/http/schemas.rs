//! Wire shapes for the identity endpoints.
//!
//! Field names follow the client's camelCase conventions; conversion to and
//! from domain types happens here so handlers stay short.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AuthResult, FieldError, Password, RegistrationInput, User};

/// Body of `POST /api/v1/register`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub full_name: String,
    pub username: String,
    pub password: String,
}

impl From<RegisterRequest> for RegistrationInput {
    fn from(value: RegisterRequest) -> Self {
        Self {
            email: value.email,
            full_name: value.full_name,
            username: value.username,
            password: Password::new(value.password),
        }
    }
}

/// Body of `POST /api/v1/login`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Treated as an email when it contains `@`.
    pub username_or_email: String,
    pub password: String,
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(format = Uuid)]
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().as_ref().to_owned(),
            email: user.email().as_ref().to_owned(),
            full_name: user.display_name().as_ref().to_owned(),
            profile_image_url: user.profile_image().map(|url| url.as_ref().to_owned()),
            created_at: user.created_at(),
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// Field-scoped failure shown next to a form input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct FieldErrorResponse {
    pub field: String,
    pub message: String,
}

impl From<&FieldError> for FieldErrorResponse {
    fn from(error: &FieldError) -> Self {
        Self {
            field: error.field().as_str().to_owned(),
            message: error.message().to_owned(),
        }
    }
}

/// Outcome of registration or login: exactly one of `user` or `error`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct AuthResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<FieldErrorResponse>,
}

impl From<&AuthResult> for AuthResponse {
    fn from(result: &AuthResult) -> Self {
        match result {
            AuthResult::Authenticated { user, .. } => Self {
                user: Some(user.into()),
                error: None,
            },
            AuthResult::Rejected(error) => Self {
                user: None,
                error: Some(error.into()),
            },
        }
    }
}

/// Query for `PUT /api/v1/me/profile-image`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProfileImageQuery {
    /// Stored name of the image; a single path segment.
    pub filename: String,
}

/// Query for `GET /api/v1/users`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserLookupQuery {
    pub id: Option<String>,
    pub username: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        AuthField, DisplayName, EmailAddress, ProfileImageUrl, SessionId, UserDraft, UserId,
        Username,
    };
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    #[fixture]
    fn user() -> User {
        User::new(UserDraft {
            id: UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("uuid"),
            username: Username::new("ada").expect("username"),
            email: EmailAddress::new("ada@example.com").expect("email"),
            display_name: DisplayName::new("Ada Lovelace"),
            profile_image: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
        })
    }

    #[rstest]
    fn user_response_uses_camel_case(user: User) {
        let user = user.with_profile_image(
            ProfileImageUrl::parse("https://cdn.example.com/profile/a.png").expect("url"),
        );
        let value = serde_json::to_value(UserResponse::from(&user)).expect("serialise");
        assert_eq!(value["fullName"], "Ada Lovelace");
        assert_eq!(value["profileImageUrl"], "https://cdn.example.com/profile/a.png");
        assert!(value.get("passwordHash").is_none());
    }

    #[rstest]
    fn rejected_result_serialises_only_error() {
        let result = AuthResult::Rejected(FieldError::new(AuthField::Username, "taken"));
        let value = serde_json::to_value(AuthResponse::from(&result)).expect("serialise");
        assert_eq!(value, json!({"error": {"field": "username", "message": "taken"}}));
    }

    #[rstest]
    fn authenticated_result_omits_session(user: User) {
        let result = AuthResult::Authenticated {
            user,
            session_id: SessionId::generate(),
        };
        let value = serde_json::to_value(AuthResponse::from(&result)).expect("serialise");
        assert!(value.get("error").is_none());
        assert_eq!(value["user"]["username"], Value::from("ada"));
    }

    #[rstest]
    fn register_request_reads_full_name() {
        let request: RegisterRequest = serde_json::from_value(json!({
            "email": "ada@example.com",
            "fullName": "Ada Lovelace",
            "username": "ada",
            "password": "secret"
        }))
        .expect("deserialise");
        let input = RegistrationInput::from(request);
        assert_eq!(input.full_name, "Ada Lovelace");
        assert_eq!(input.password.expose(), "secret");
    }
}
