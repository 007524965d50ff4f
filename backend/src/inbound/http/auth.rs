//! Registration, login and session-scoped handlers.
//!
//! ```text
//! POST /api/v1/register {"email":"ada@example.com","fullName":"Ada","username":"ada","password":"pw1"}
//! POST /api/v1/login {"usernameOrEmail":"ada","password":"pw1"}
//! POST /api/v1/logout
//! GET /api/v1/me
//! PUT /api/v1/me/profile-image?filename=avatar.png
//! ```

use actix_web::{HttpResponse, get, post, put, web};

use crate::domain::{AuthResult, Error, Password, ProfileImageUpload};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    AuthResponse, LoginRequest, ProfileImageQuery, RegisterRequest, UserResponse,
};
use crate::inbound::http::session::{SessionCookie, SessionCookieConfig};
use crate::inbound::http::state::HttpState;

fn auth_response(cookies: &SessionCookieConfig, result: &AuthResult) -> ApiResult<HttpResponse> {
    let mut response = HttpResponse::Ok();
    if let Some(session_id) = result.session_id() {
        response.cookie(cookies.issue(session_id)?);
    }
    Ok(response.json(AuthResponse::from(result)))
}

/// Create an account and start a session.
///
/// Field-level problems (validation, taken username or email) come back as
/// `200` with an `error` entry; only infrastructure failures use the error
/// schema.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Registered, or a field error", body = AuthResponse,
            headers(("Set-Cookie" = String, description = "Session cookie on success"))),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    cookies: web::Data<SessionCookieConfig>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let result = state.auth.register(payload.into_inner().into()).await?;
    auth_response(&cookies, &result)
}

/// Verify credentials and start a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, or a field error", body = AuthResponse,
            headers(("Set-Cookie" = String, description = "Session cookie on success"))),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    cookies: web::Data<SessionCookieConfig>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest {
        username_or_email,
        password,
    } = payload.into_inner();
    let result = state
        .auth
        .login(&username_or_email, Password::new(password))
        .await?;
    auth_response(&cookies, &result)
}

/// End the caller's session. The cookie is cleared whatever the outcome.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 200, description = "Whether the session record was destroyed", body = bool)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    cookies: web::Data<SessionCookieConfig>,
    session: SessionCookie,
) -> HttpResponse {
    let destroyed = match session.0 {
        Some(session_id) => state.auth.logout(&session_id).await,
        None => true,
    };
    HttpResponse::Ok().cookie(cookies.removal()).json(destroyed)
}

/// The user bound to the caller's session, or `null`.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Current user or null", body = Option<UserResponse>),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "me"
)]
#[get("/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionCookie,
) -> ApiResult<web::Json<Option<UserResponse>>> {
    let Some(session_id) = session.0 else {
        return Ok(web::Json(None));
    };
    let user = state.auth.current_user(&session_id).await?;
    Ok(web::Json(user.map(UserResponse::from)))
}

/// Replace the caller's profile image with the request body.
#[utoipa::path(
    put,
    path = "/api/v1/me/profile-image",
    params(ProfileImageQuery),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Unsafe filename", body = Error),
        (status = 401, description = "Not authenticated", body = Error),
        (status = 503, description = "Storage unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "updateProfileImage"
)]
#[put("/me/profile-image")]
pub async fn update_profile_image(
    state: web::Data<HttpState>,
    session: SessionCookie,
    query: web::Query<ProfileImageQuery>,
    body: web::Bytes,
) -> ApiResult<web::Json<UserResponse>> {
    let upload = ProfileImageUpload::new(query.into_inner().filename, body.to_vec());
    let user = state
        .auth
        .update_profile_image(session.0.as_ref(), upload)
        .await?;
    Ok(web::Json(user.into()))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
