//! Caller identity.
//!
//! Authentication itself happens upstream of this service; the gateway
//! receives the authenticated user's id in the [`USER_ID_HEADER`] header
//! and resolves it to a stored profile with the [`CurrentUser`] extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::app_state::AppState;
use crate::domain::{User, UserId};
use crate::error::GatewayError;
use crate::persistence::MembershipStore;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller, loaded from the store.
///
/// Rejects with [`GatewayError::Unauthorized`] when the header is missing,
/// is not a UUID, or names no registered user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = GatewayError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .ok_or_else(|| GatewayError::Unauthorized(format!("missing {USER_ID_HEADER} header")))?
            .to_str()
            .map_err(|_| GatewayError::Unauthorized(format!("malformed {USER_ID_HEADER} header")))?;
        let id: uuid::Uuid = raw
            .trim()
            .parse()
            .map_err(|_| GatewayError::Unauthorized(format!("malformed {USER_ID_HEADER} header")))?;

        match state
            .membership_service
            .store()
            .get_user(UserId::from_uuid(id))
            .await
        {
            Ok(user) => Ok(Self(user)),
            Err(GatewayError::UserNotFound(_)) => {
                Err(GatewayError::Unauthorized("unknown user".to_string()))
            }
            Err(e) => Err(e),
        }
    }
}
