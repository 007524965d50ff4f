//! Public user lookup.
//!
//! ```text
//! GET /api/v1/users?id=3fa85f64-5717-4562-b3fc-2c963f66afa6
//! GET /api/v1/users?username=ada
//! ```

use actix_web::{get, web};
use serde_json::json;

use crate::domain::{Error, UserId, UserLookup, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{UserLookupQuery, UserResponse};
use crate::inbound::http::state::HttpState;

/// Translate query parameters into a lookup. `id` wins when both are given.
///
/// A username no account could hold yields `Ok(None)` rather than an error,
/// matching the behaviour for unknown names.
fn lookup_from_query(query: UserLookupQuery) -> Result<Option<UserLookup>, Error> {
    if let Some(raw) = query.id {
        let id = UserId::new(&raw).map_err(|_| {
            Error::invalid_request("id must be a UUID").with_details(json!({ "field": "id" }))
        })?;
        return Ok(Some(UserLookup::ById(id)));
    }
    Ok(query
        .username
        .and_then(|raw| Username::new(raw).ok())
        .map(UserLookup::ByUsername))
}

/// Find a user by id or username; `null` when absent or unspecified.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(UserLookupQuery),
    responses(
        (status = 200, description = "Matching user or null", body = Option<UserResponse>),
        (status = 400, description = "Malformed id", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "findUser",
    security([])
)]
#[get("/users")]
pub async fn find_user(
    state: web::Data<HttpState>,
    query: web::Query<UserLookupQuery>,
) -> ApiResult<web::Json<Option<UserResponse>>> {
    let Some(lookup) = lookup_from_query(query.into_inner())? else {
        return Ok(web::Json(None));
    };
    let user = state.auth.find_user(lookup).await?;
    Ok(web::Json(user.map(UserResponse::from)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn query(id: Option<&str>, username: Option<&str>) -> UserLookupQuery {
        UserLookupQuery {
            id: id.map(str::to_owned),
            username: username.map(str::to_owned),
        }
    }

    #[rstest]
    fn id_takes_precedence() {
        let lookup = lookup_from_query(query(
            Some("3fa85f64-5717-4562-b3fc-2c963f66afa6"),
            Some("ada"),
        ))
        .expect("valid query");
        assert!(matches!(lookup, Some(UserLookup::ById(_))));
    }

    #[rstest]
    #[case(None, None)]
    #[case(None, Some("ab"))]
    #[case(None, Some("ada@example.com"))]
    fn impossible_or_missing_criteria_yield_none(
        #[case] id: Option<&str>,
        #[case] username: Option<&str>,
    ) {
        assert!(lookup_from_query(query(id, username)).expect("query").is_none());
    }

    #[rstest]
    fn malformed_id_is_rejected() {
        let err = lookup_from_query(query(Some("not-a-uuid"), None)).expect_err("bad id");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
