//! Event DTOs for create, list, and detail operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::{
    Event, EventId, EventRoster, EventSummary, EventType, NewEvent, Participant, SkillLevel,
    WaitlistEntry,
};
use crate::error::GatewayError;

/// Request body for `POST /events`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEventRequest {
    /// Display title.
    pub title: String,
    /// Session kind.
    pub event_type: EventType,
    /// Scheduled start (RFC 3339).
    pub start: DateTime<Utc>,
    /// Scheduled end (RFC 3339).
    pub end: DateTime<Utc>,
    /// Capacity.
    pub max_players: u32,
    /// Inclusive lower skill bound, e.g. `"INTERMEDIATE_3_5"`.
    #[serde(default)]
    pub min_skill: Option<String>,
    /// Inclusive upper skill bound.
    #[serde(default)]
    pub max_skill: Option<String>,
    /// Courts the event occupies.
    pub court_ids: Vec<uuid::Uuid>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

impl TryFrom<CreateEventRequest> for NewEvent {
    type Error = GatewayError;

    fn try_from(req: CreateEventRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: req.title.trim().to_string(),
            event_type: req.event_type,
            start: req.start,
            end: req.end,
            max_players: req.max_players,
            min_skill: parse_bound("min_skill", req.min_skill.as_deref())?,
            max_skill: parse_bound("max_skill", req.max_skill.as_deref())?,
            court_ids: req.court_ids,
            notes: req.notes,
        })
    }
}

fn parse_bound(field: &str, raw: Option<&str>) -> Result<Option<SkillLevel>, GatewayError> {
    raw.map(|value| {
        SkillLevel::resolve(value).ok_or_else(|| {
            GatewayError::InvalidRequest(format!("{field}: unknown skill level {value}"))
        })
    })
    .transpose()
}

/// Paginated list response for `GET /events`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventListResponse {
    /// Event summaries ordered by start time.
    pub data: Vec<EventSummary>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Single event detail for `GET /events/{id}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventDetailResponse {
    /// The event, including the current participant count.
    pub event: Event,
    /// Confirmed participants in join order.
    pub participants: Vec<Participant>,
    /// Waitlist in promotion order.
    pub waitlist: Vec<WaitlistEntry>,
}

impl From<EventRoster> for EventDetailResponse {
    fn from(roster: EventRoster) -> Self {
        Self {
            event: roster.event().clone(),
            participants: roster.participants().to_vec(),
            waitlist: roster.waitlist().to_vec(),
        }
    }
}

/// Response body for `GET /events/{id}/waitlist`.
#[derive(Debug, Serialize, ToSchema)]
pub struct WaitlistResponse {
    /// Event identifier.
    pub event_id: EventId,
    /// Entries in promotion order.
    pub entries: Vec<WaitlistEntry>,
}
