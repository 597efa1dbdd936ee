//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! belongs to an [`ErrorKind`], maps to a specific HTTP status code, and
//! renders as a structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{EventId, SkillLevel, UserId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2103,
///     "kind": "conflict",
///     "message": "event 7f1c… is full"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code, kind, and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Error category the client can branch on.
    pub kind: ErrorKind,
    /// Human-readable error message.
    pub message: String,
}

/// Coarse error taxonomy surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No authenticated caller.
    Unauthorized,
    /// Authenticated, but not allowed.
    Forbidden,
    /// Event, user, or membership row absent.
    NotFound,
    /// Duplicate membership or full event.
    Conflict,
    /// Malformed input or skill gating rejection.
    Validation,
    /// Store or server failure.
    Internal,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category                 | HTTP Status                   |
/// |-----------|--------------------------|-------------------------------|
/// | 1000–1199 | Validation               | 400 / 422                     |
/// | 1400–1499 | Authentication           | 401 / 403                     |
/// | 2000–2099 | Not Found                | 404                           |
/// | 2100–2199 | Membership conflicts     | 409                           |
/// | 3000–3999 | Server                   | 500                           |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The user's skill tier is outside the event's bounds.
    #[error("skill level {user_skill} is outside the required range {min}..={max}")]
    SkillOutOfRange {
        /// The caller's tier.
        user_skill: SkillLevel,
        /// Effective lower bound.
        min: SkillLevel,
        /// Effective upper bound.
        max: SkillLevel,
    },

    /// No authenticated caller.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The caller's role does not permit the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Event with the given ID was not found.
    #[error("event not found: {0}")]
    EventNotFound(EventId),

    /// User with the given ID was not found.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Caller holds no slot in the event.
    #[error("you are not a participant in event {0}")]
    NotParticipant(EventId),

    /// Caller is not on the event's waitlist.
    #[error("you are not on the waitlist for event {0}")]
    NotWaitlisted(EventId),

    /// Caller already holds a slot in the event.
    #[error("you are already a participant in event {0}")]
    AlreadyJoined(EventId),

    /// Caller is already on the event's waitlist.
    #[error("you are already on the waitlist for event {0}")]
    AlreadyWaitlisted(EventId),

    /// No slot is open; the caller may join the waitlist instead.
    #[error("event {0} is full; join the waitlist instead")]
    EventFull(EventId),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the error category for this variant.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) | Self::SkillOutOfRange { .. } => ErrorKind::Validation,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::EventNotFound(_)
            | Self::UserNotFound(_)
            | Self::NotParticipant(_)
            | Self::NotWaitlisted(_) => ErrorKind::NotFound,
            Self::AlreadyJoined(_) | Self::AlreadyWaitlisted(_) | Self::EventFull(_) => {
                ErrorKind::Conflict
            }
            Self::PersistenceError(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::SkillOutOfRange { .. } => 1101,
            Self::Unauthorized(_) => 1401,
            Self::Forbidden(_) => 1403,
            Self::EventNotFound(_) => 2001,
            Self::UserNotFound(_) => 2002,
            Self::NotParticipant(_) => 2003,
            Self::NotWaitlisted(_) => 2004,
            Self::AlreadyJoined(_) => 2101,
            Self::AlreadyWaitlisted(_) => 2102,
            Self::EventFull(_) => 2103,
            Self::PersistenceError(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::SkillOutOfRange { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::EventNotFound(_)
            | Self::UserNotFound(_)
            | Self::NotParticipant(_)
            | Self::NotWaitlisted(_) => StatusCode::NOT_FOUND,
            Self::AlreadyJoined(_) | Self::AlreadyWaitlisted(_) | Self::EventFull(_) => {
                StatusCode::CONFLICT
            }
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let kind = self.kind();
        let message = if kind == ErrorKind::Internal {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                kind,
                message,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
