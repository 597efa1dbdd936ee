//! Domain events reflecting committed membership changes.
//!
//! Every committed mutation emits one or more [`MembershipEvent`]s through
//! the [`super::EventBus`]. Subscribers (the promotion notifier, and any
//! external push channel) consume them after the change is durable.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{EventId, UserId};

/// Domain event emitted after a membership change commits.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum MembershipEvent {
    /// A new event was scheduled.
    EventScheduled {
        /// Event identifier.
        event_id: EventId,
        /// Event title.
        title: String,
        /// Capacity.
        max_players: u32,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A user took a confirmed slot directly.
    ParticipantJoined {
        /// Event identifier.
        event_id: EventId,
        /// Joining user.
        user_id: UserId,
        /// Participant count after the join.
        current_players: u32,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A participant gave up their slot.
    ParticipantLeft {
        /// Event identifier.
        event_id: EventId,
        /// Departing user.
        user_id: UserId,
        /// Participant count after the leave (and any promotion).
        current_players: u32,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A user was queued on the waitlist.
    WaitlistJoined {
        /// Event identifier.
        event_id: EventId,
        /// Queued user.
        user_id: UserId,
        /// One-based position in the queue.
        position: usize,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A user left the waitlist voluntarily.
    WaitlistLeft {
        /// Event identifier.
        event_id: EventId,
        /// User removed from the queue.
        user_id: UserId,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The head of the waitlist was moved into a freed slot.
    WaitlistPromoted {
        /// Event identifier.
        event_id: EventId,
        /// Promoted user.
        user_id: UserId,
        /// Event title, for the notification text.
        event_title: String,
        /// Timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl MembershipEvent {
    /// Returns the event ID associated with this domain event.
    #[must_use]
    pub fn event_id(&self) -> EventId {
        match self {
            Self::EventScheduled { event_id, .. }
            | Self::ParticipantJoined { event_id, .. }
            | Self::ParticipantLeft { event_id, .. }
            | Self::WaitlistJoined { event_id, .. }
            | Self::WaitlistLeft { event_id, .. }
            | Self::WaitlistPromoted { event_id, .. } => *event_id,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::EventScheduled { .. } => "event_scheduled",
            Self::ParticipantJoined { .. } => "participant_joined",
            Self::ParticipantLeft { .. } => "participant_left",
            Self::WaitlistJoined { .. } => "waitlist_joined",
            Self::WaitlistLeft { .. } => "waitlist_left",
            Self::WaitlistPromoted { .. } => "waitlist_promoted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promoted_event_serializes_with_tag() {
        let event = MembershipEvent::WaitlistPromoted {
            event_id: EventId::new(),
            user_id: UserId::new(),
            event_title: "Friday clinic".to_string(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("\"event_type\":\"waitlist_promoted\""));
        assert!(json.contains("Friday clinic"));
        assert_eq!(event.event_type_str(), "waitlist_promoted");
    }

    #[test]
    fn event_id_accessor() {
        let id = EventId::new();
        let event = MembershipEvent::WaitlistLeft {
            event_id: id,
            user_id: UserId::new(),
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_id(), id);
    }
}
