//! System endpoints: health check and the skill ladder.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::SkillLevel;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// One rung of the skill ladder.
#[derive(Debug, Serialize, ToSchema)]
pub struct SkillLevelInfo {
    level: SkillLevel,
    rating: &'static str,
    rank: usize,
}

/// `GET /config/skill-levels`: The ordered skill ladder.
#[utoipa::path(
    get,
    path = "/config/skill-levels",
    tag = "System",
    summary = "List skill levels",
    description = "Returns every skill tier from lowest to highest. Event bounds and eligibility checks compare tiers by `rank`.",
    responses(
        (status = 200, description = "Skill ladder", body = Vec<SkillLevelInfo>),
    )
)]
pub async fn skill_levels_handler() -> impl IntoResponse {
    let levels: Vec<SkillLevelInfo> = SkillLevel::ALL
        .iter()
        .map(|&level| SkillLevelInfo {
            level,
            rating: level.rating(),
            rank: level.index(),
        })
        .collect();
    (StatusCode::OK, Json(levels))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/skill-levels", get(skill_levels_handler))
}
