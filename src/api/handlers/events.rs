//! Event handlers: schedule, list, detail, waitlist.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    CreateEventRequest, EventDetailResponse, EventListResponse, PaginationParams, WaitlistResponse,
};
use crate::app_state::AppState;
use crate::domain::{Event, EventId, NewEvent};
use crate::error::{ErrorResponse, GatewayError};
use crate::identity::CurrentUser;

/// `POST /events`: Schedule a new event.
///
/// # Errors
///
/// Returns [`GatewayError::Forbidden`] for plain players and
/// [`GatewayError::InvalidRequest`] for invalid parameters.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    summary = "Schedule an event",
    description = "Creates an event with a fixed capacity and optional inclusive skill bounds. Only admins and court managers may schedule events.",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event scheduled", body = Event),
        (status = 400, description = "Invalid event parameters", body = ErrorResponse),
        (status = 401, description = "Missing or unknown caller", body = ErrorResponse),
        (status = 403, description = "Caller may not schedule events", body = ErrorResponse),
    ),
    security(("user_id" = []))
)]
pub async fn create_event(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let new = NewEvent::try_from(req)?;
    let event = state.membership_service.schedule_event(&caller, new).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// `GET /events`: List events with pagination.
///
/// # Errors
///
/// Returns [`GatewayError`] on store failures.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    summary = "List events",
    description = "Returns a paginated list of event summaries ordered by start time.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Paginated event list", body = EventListResponse),
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let summaries = state.membership_service.list_events().await?;
    let (data, pagination) = params.paginate(summaries);
    Ok(Json(EventListResponse { data, pagination }))
}

/// `GET /events/{id}`: Event detail with participants and waitlist.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] if the event does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Get event details",
    description = "Returns the event with its confirmed participants in join order and its waitlist in promotion order.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Event details", body = EventDetailResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let roster = state
        .membership_service
        .get_roster(EventId::from_uuid(id))
        .await?;
    Ok(Json(EventDetailResponse::from(roster)))
}

/// `GET /events/{id}/waitlist`: Waitlist in promotion order.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] if the event does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}/waitlist",
    tag = "Waitlist",
    summary = "Get an event's waitlist",
    description = "Returns waitlist entries ordered by join time, oldest first.",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Waitlist", body = WaitlistResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn get_waitlist(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let event_id = EventId::from_uuid(id);
    let entries = state.membership_service.waitlist(event_id).await?;
    Ok(Json(WaitlistResponse { event_id, entries }))
}

/// Event routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{id}", get(get_event))
}
