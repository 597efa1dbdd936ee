//! User handlers: registration and the caller's profile.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::CreateUserRequest;
use crate::app_state::AppState;
use crate::domain::{SkillLevel, User};
use crate::error::{ErrorResponse, GatewayError};
use crate::identity::CurrentUser;

/// `POST /users`: Register a player profile.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] for a blank name, malformed
/// or taken email, or unknown skill level.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    summary = "Register a player",
    description = "Creates a player profile with the USER role. The returned id is what callers send in the `x-user-id` header.",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Player registered", body = User),
        (status = 400, description = "Invalid profile", body = ErrorResponse),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let skill = SkillLevel::resolve(&req.skill_level).ok_or_else(|| {
        GatewayError::InvalidRequest(format!("unknown skill level {}", req.skill_level))
    })?;
    let user = state
        .membership_service
        .register_user(&req.name, req.email, skill)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `GET /users/me`: The caller's profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "Users",
    summary = "Get the caller's profile",
    responses(
        (status = 200, description = "Caller profile", body = User),
        (status = 401, description = "Missing or unknown caller", body = ErrorResponse),
    ),
    security(("user_id" = []))
)]
pub async fn me(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    Json(user)
}

/// User routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/me", get(me))
}
