//! Scheduled events and their immutable booking parameters.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{EventId, SkillLevel, UserId};
use crate::error::GatewayError;

/// Kind of session being run on the court(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Drop-in open play.
    OpenPlay,
    /// Session led by a pro.
    ProSession,
    /// Group clinic.
    Clinic,
    /// One-on-one or small-group lesson.
    PrivateLesson,
    /// Competitive tournament.
    Tournament,
}

impl EventType {
    /// Stored name of the event type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenPlay => "OPEN_PLAY",
            Self::ProSession => "PRO_SESSION",
            Self::Clinic => "CLINIC",
            Self::PrivateLesson => "PRIVATE_LESSON",
            Self::Tournament => "TOURNAMENT",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN_PLAY" => Ok(Self::OpenPlay),
            "PRO_SESSION" => Ok(Self::ProSession),
            "CLINIC" => Ok(Self::Clinic),
            "PRIVATE_LESSON" => Ok(Self::PrivateLesson),
            "TOURNAMENT" => Ok(Self::Tournament),
            other => Err(format!("unknown event type: {other}")),
        }
    }
}

/// An event as stored.
///
/// `max_players`, `min_skill` and `max_skill` are fixed at creation.
/// `current_players` is a denormalized copy of the participant count and
/// is only ever written from the roster that owns the participant set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    /// Event identifier.
    pub id: EventId,
    /// Display title.
    pub title: String,
    /// Session kind.
    pub event_type: EventType,
    /// Scheduled start.
    pub start: DateTime<Utc>,
    /// Scheduled end.
    pub end: DateTime<Utc>,
    /// Capacity (at least 1).
    pub max_players: u32,
    /// Number of confirmed participants.
    pub current_players: u32,
    /// Inclusive lower skill bound as stored.
    pub min_skill: Option<String>,
    /// Inclusive upper skill bound as stored.
    pub max_skill: Option<String>,
    /// Courts the event occupies.
    pub court_ids: Vec<uuid::Uuid>,
    /// Creator of the event.
    pub owner: UserId,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Validated parameters for a new event.
#[derive(Debug, Clone)]
pub struct NewEvent {
    /// Display title.
    pub title: String,
    /// Session kind.
    pub event_type: EventType,
    /// Scheduled start.
    pub start: DateTime<Utc>,
    /// Scheduled end.
    pub end: DateTime<Utc>,
    /// Capacity.
    pub max_players: u32,
    /// Inclusive lower skill bound.
    pub min_skill: Option<SkillLevel>,
    /// Inclusive upper skill bound.
    pub max_skill: Option<SkillLevel>,
    /// Courts the event occupies.
    ///
    /// These refer to a court registry outside this service; only their
    /// presence is checked, not that the courts exist.
    pub court_ids: Vec<uuid::Uuid>,
    /// Free-form notes.
    pub notes: Option<String>,
}

impl NewEvent {
    /// Checks the booking parameters before an event is materialized.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the title is blank, no
    /// court is given, the time window is empty, capacity is zero, or the
    /// skill bounds are inverted. Court ids are not resolved.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.title.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("title must not be empty".to_string()));
        }
        if self.court_ids.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "at least one court is required".to_string(),
            ));
        }
        if self.start >= self.end {
            return Err(GatewayError::InvalidRequest(
                "start must be before end".to_string(),
            ));
        }
        if self.max_players == 0 {
            return Err(GatewayError::InvalidRequest(
                "max_players must be at least 1".to_string(),
            ));
        }
        if let (Some(min), Some(max)) = (self.min_skill, self.max_skill)
            && min > max
        {
            return Err(GatewayError::InvalidRequest(format!(
                "min_skill {min} is above max_skill {max}"
            )));
        }
        Ok(())
    }
}

impl Event {
    /// Materializes a new event owned by `owner`, with no participants.
    #[must_use]
    pub fn create(new: NewEvent, owner: UserId) -> Self {
        Self {
            id: EventId::new(),
            title: new.title,
            event_type: new.event_type,
            start: new.start,
            end: new.end,
            max_players: new.max_players,
            current_players: 0,
            min_skill: new.min_skill.map(|s| s.as_str().to_string()),
            max_skill: new.max_skill.map(|s| s.as_str().to_string()),
            court_ids: new.court_ids,
            owner,
            notes: new.notes,
            created_at: Utc::now(),
        }
    }

    /// Whether at least one slot is open.
    #[must_use]
    pub const fn has_open_slot(&self) -> bool {
        self.current_players < self.max_players
    }
}

/// Lightweight summary of an event for list endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventSummary {
    /// Event identifier.
    pub id: EventId,
    /// Display title.
    pub title: String,
    /// Session kind.
    pub event_type: EventType,
    /// Scheduled start.
    pub start: DateTime<Utc>,
    /// Scheduled end.
    pub end: DateTime<Utc>,
    /// Capacity.
    pub max_players: u32,
    /// Confirmed participants.
    pub current_players: u32,
    /// Inclusive lower skill bound.
    pub min_skill: Option<String>,
    /// Inclusive upper skill bound.
    pub max_skill: Option<String>,
}

impl From<&Event> for EventSummary {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            event_type: event.event_type,
            start: event.start,
            end: event.end,
            max_players: event.max_players,
            current_players: event.current_players,
            min_skill: event.min_skill.clone(),
            max_skill: event.max_skill.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_event() -> NewEvent {
        let start = Utc::now();
        NewEvent {
            title: "Tuesday open play".to_string(),
            event_type: EventType::OpenPlay,
            start,
            end: start + chrono::Duration::hours(2),
            max_players: 8,
            min_skill: Some(SkillLevel::LowIntermediate3_0),
            max_skill: None,
            court_ids: vec![uuid::Uuid::new_v4()],
            notes: None,
        }
    }

    #[test]
    fn create_starts_empty_with_stored_bounds() {
        let owner = UserId::new();
        let event = Event::create(new_event(), owner);
        assert_eq!(event.current_players, 0);
        assert_eq!(event.owner, owner);
        assert_eq!(event.min_skill.as_deref(), Some("LOW_INTERMEDIATE_3_0"));
        assert!(event.max_skill.is_none());
        assert!(event.has_open_slot());
    }

    #[test]
    fn validate_accepts_well_formed_event() {
        assert!(new_event().validate().is_ok());
    }

    #[test]
    fn validate_does_not_resolve_court_ids() {
        let mut event = new_event();
        event.court_ids = vec![uuid::Uuid::nil(), uuid::Uuid::new_v4()];
        assert!(event.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_parameters() {
        let mut blank = new_event();
        blank.title = "  ".to_string();
        let mut no_courts = new_event();
        no_courts.court_ids.clear();
        let mut backwards = new_event();
        backwards.end = backwards.start;
        let mut empty = new_event();
        empty.max_players = 0;
        let mut inverted = new_event();
        inverted.min_skill = Some(SkillLevel::Advanced4_25);
        inverted.max_skill = Some(SkillLevel::Intermediate3_25);

        for draft in [blank, no_courts, backwards, empty, inverted] {
            assert!(matches!(
                draft.validate(),
                Err(GatewayError::InvalidRequest(_))
            ));
        }
    }

    #[test]
    fn event_type_round_trips_through_str() {
        for t in [
            EventType::OpenPlay,
            EventType::ProSession,
            EventType::Clinic,
            EventType::PrivateLesson,
            EventType::Tournament,
        ] {
            assert_eq!(t.as_str().parse::<EventType>(), Ok(t));
        }
    }

    #[test]
    fn summary_copies_counts() {
        let mut event = Event::create(new_event(), UserId::new());
        event.current_players = 3;
        let summary = EventSummary::from(&event);
        assert_eq!(summary.current_players, 3);
        assert_eq!(summary.max_players, 8);
    }
}
