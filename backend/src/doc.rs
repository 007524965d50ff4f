//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects the identity endpoints, their wire schemas and the
//! session cookie security scheme. Swagger UI serves it in debug builds and
//! `cargo run --bin openapi-dump` prints it for client generators.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::schemas::{
    AuthResponse, FieldErrorResponse, LoginRequest, RegisterRequest, UserResponse,
};
use crate::inbound::http::session::DEFAULT_COOKIE_NAME;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                DEFAULT_COOKIE_NAME,
                "Signed session cookie issued by POST /api/v1/register or /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Instaclone identity API",
        description = "Registration, login and session-scoped profile endpoints."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::auth::update_profile_image,
        crate::inbound::http::users::find_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        UserResponse,
        AuthResponse,
        FieldErrorResponse,
        Error,
        ErrorCode
    )),
    tags(
        (name = "auth", description = "Registration, login and the caller's session"),
        (name = "users", description = "Public user lookup"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn schema_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        match components.schemas.get(name).expect("schema registered") {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected object schema for {name}"),
        }
    }

    #[rstest]
    #[case("UserResponse", &["id", "username", "email", "fullName", "createdAt"])]
    #[case("Error", &["code", "message", "traceId"])]
    #[case("AuthResponse", &["user", "error"])]
    fn schemas_expose_wire_fields(#[case] name: &str, #[case] expected: &[&str]) {
        let fields = schema_fields(name);
        for field in expected {
            assert!(fields.iter().any(|f| f == field), "{name} lacks {field}");
        }
    }

    #[rstest]
    fn every_endpoint_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/register",
            "/api/v1/login",
            "/api/v1/logout",
            "/api/v1/me",
            "/api/v1/me/profile-image",
            "/api/v1/users",
            "/health/ready",
            "/health/live",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
