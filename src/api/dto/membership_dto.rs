//! Join, leave, and waitlist DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Departure, EventId, Participant, UserId};

/// Query parameters for `POST /events/{id}/join`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct JoinParams {
    /// When the event is full, queue on the waitlist instead of failing
    /// with 409.
    #[serde(default)]
    pub waitlist_if_full: bool,
}

/// Response body for a successful leave.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveResponse {
    /// Confirmation text.
    pub message: String,
    /// Event identifier.
    pub event_id: EventId,
    /// The waitlisted user moved into the freed slot, if any.
    pub promoted: Option<Participant>,
}

impl From<Departure> for LeaveResponse {
    fn from(departure: Departure) -> Self {
        Self {
            message: "You have left the event".to_string(),
            event_id: departure.left.event_id,
            promoted: departure.promoted,
        }
    }
}

/// Response body for a successful waitlist leave.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaveWaitlistResponse {
    /// Confirmation text.
    pub message: String,
    /// Event identifier.
    pub event_id: EventId,
    /// User removed from the queue.
    pub user_id: UserId,
}
