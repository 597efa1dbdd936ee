//! Membership rows: confirmed participants and waitlist entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{EventId, UserId};

/// A user holding a confirmed slot in an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Participant {
    /// Event the slot belongs to.
    pub event_id: EventId,
    /// Slot holder.
    pub user_id: UserId,
    /// When the slot was taken.
    pub joined_at: DateTime<Utc>,
}

/// A user queued for promotion into a full event.
///
/// Entries are promoted in `(joined_at, seq)` order. A new entry's `seq`
/// is one above the highest live entry's, so it breaks ties between equal
/// timestamps; once the queue drains, numbering starts again at 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WaitlistEntry {
    /// Event being waited on.
    pub event_id: EventId,
    /// Waiting user.
    pub user_id: UserId,
    /// When the user joined the waitlist.
    pub joined_at: DateTime<Utc>,
    /// Insertion sequence, unique among the event's live entries.
    pub seq: i64,
}

impl WaitlistEntry {
    /// FIFO sort key.
    #[must_use]
    pub fn queue_key(&self) -> (DateTime<Utc>, i64) {
        (self.joined_at, self.seq)
    }
}
