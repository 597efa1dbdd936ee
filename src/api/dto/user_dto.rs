//! User registration DTOs.

use serde::Deserialize;
use utoipa::ToSchema;

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    /// Display name.
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Skill tier, e.g. `"INTERMEDIATE_3_5"`. Legacy names such as
    /// `"INTERMEDIATE"` are accepted and stored as their current tier.
    pub skill_level: String,
}
