//! Membership handlers: join, leave, and the waitlist.
//!
//! Every route here is a thin adapter over one
//! [`crate::service::MembershipService`] operation; the alias routes map
//! onto the same handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{JoinParams, LeaveResponse, LeaveWaitlistResponse};
use crate::app_state::AppState;
use crate::domain::{Admission, EventId, Participant, WaitlistEntry};
use crate::error::{ErrorResponse, GatewayError};
use crate::identity::CurrentUser;

/// `POST /events/{id}/join`: Take a confirmed slot.
///
/// # Errors
///
/// Returns [`GatewayError::EventFull`] when no slot is open (unless
/// `waitlist_if_full` is set), a conflict for existing members, or
/// [`GatewayError::SkillOutOfRange`].
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/join",
    tag = "Membership",
    summary = "Join an event",
    description = "Takes a confirmed slot if the caller's skill is within the event's bounds and a slot is open. With `waitlist_if_full=true`, a full event queues the caller instead and answers 202.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
        JoinParams,
    ),
    responses(
        (status = 201, description = "Joined", body = Participant),
        (status = 202, description = "Event full; queued on the waitlist", body = WaitlistEntry),
        (status = 401, description = "Missing or unknown caller", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 409, description = "Already a member, or event full", body = ErrorResponse),
        (status = 422, description = "Skill outside the event's bounds", body = ErrorResponse),
    ),
    security(("user_id" = []))
)]
pub async fn join_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<uuid::Uuid>,
    Query(params): Query<JoinParams>,
) -> Result<Response, GatewayError> {
    let event_id = EventId::from_uuid(id);
    let service = &state.membership_service;

    if !params.waitlist_if_full {
        let participant = service.join(&user, event_id).await?;
        return Ok((StatusCode::CREATED, Json(participant)).into_response());
    }

    let response = match service.join_or_waitlist(&user, event_id).await? {
        Admission::Joined(participant) => (StatusCode::CREATED, Json(participant)).into_response(),
        Admission::Waitlisted(entry) => (StatusCode::ACCEPTED, Json(entry)).into_response(),
    };
    Ok(response)
}

/// `POST /events/{id}/leave`: Give up a confirmed slot.
///
/// Also mounted as `DELETE /events/{id}/join`.
///
/// # Errors
///
/// Returns [`GatewayError::NotParticipant`] if the caller holds no slot.
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/leave",
    tag = "Membership",
    summary = "Leave an event",
    description = "Removes the caller's slot and promotes the oldest waitlist entry into it, if any. Also available as `DELETE /api/v1/events/{id}/join`.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Left the event", body = LeaveResponse),
        (status = 401, description = "Missing or unknown caller", body = ErrorResponse),
        (status = 404, description = "Event not found or caller not a participant", body = ErrorResponse),
    ),
    security(("user_id" = []))
)]
pub async fn leave_event(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let departure = state
        .membership_service
        .leave(user.id, EventId::from_uuid(id))
        .await?;
    Ok(Json(LeaveResponse::from(departure)))
}

/// `POST /events/{id}/waitlist/join`: Queue on the waitlist.
///
/// Also mounted as `POST /events/{id}/waitlist`.
///
/// # Errors
///
/// Returns a conflict for existing members, or
/// [`GatewayError::SkillOutOfRange`] when waitlist gating is enforced.
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/waitlist/join",
    tag = "Waitlist",
    summary = "Join an event's waitlist",
    description = "Queues the caller for promotion. Queueing is allowed whether or not the event is full. Also available as `POST /api/v1/events/{id}/waitlist`.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 201, description = "Queued", body = WaitlistEntry),
        (status = 401, description = "Missing or unknown caller", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 409, description = "Already a participant or already queued", body = ErrorResponse),
        (status = 422, description = "Skill outside the event's bounds", body = ErrorResponse),
    ),
    security(("user_id" = []))
)]
pub async fn join_waitlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let entry = state
        .membership_service
        .join_waitlist(&user, EventId::from_uuid(id))
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// `POST /events/{id}/waitlist/leave`: Leave the waitlist.
///
/// Also mounted as `DELETE /events/{id}/waitlist`.
///
/// # Errors
///
/// Returns [`GatewayError::NotWaitlisted`] if the caller is not queued.
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/waitlist/leave",
    tag = "Waitlist",
    summary = "Leave an event's waitlist",
    description = "Removes the caller's waitlist entry. Also available as `DELETE /api/v1/events/{id}/waitlist`.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Left the waitlist", body = LeaveWaitlistResponse),
        (status = 401, description = "Missing or unknown caller", body = ErrorResponse),
        (status = 404, description = "Event not found or caller not queued", body = ErrorResponse),
    ),
    security(("user_id" = []))
)]
pub async fn leave_waitlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let entry = state
        .membership_service
        .leave_waitlist(user.id, EventId::from_uuid(id))
        .await?;
    Ok(Json(LeaveWaitlistResponse {
        message: "You have left the waitlist".to_string(),
        event_id: entry.event_id,
        user_id: entry.user_id,
    }))
}

/// Membership routes, including the alias forms.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events/{id}/join", post(join_event).delete(leave_event))
        .route("/events/{id}/leave", post(leave_event))
        .route(
            "/events/{id}/waitlist",
            get(super::events::get_waitlist)
                .post(join_waitlist)
                .delete(leave_waitlist),
        )
        .route("/events/{id}/waitlist/join", post(join_waitlist))
        .route("/events/{id}/waitlist/leave", post(leave_waitlist))
}
