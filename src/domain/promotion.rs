//! Waitlist promotion policy.
//!
//! When a slot frees up, the waitlist entry with the smallest
//! `(joined_at, seq)` key becomes a participant. Promotion runs on the
//! same locked roster as the leave that triggered it, so no concurrent
//! joiner can observe the freed slot in between.

use chrono::{DateTime, Utc};

use super::{EventRoster, Participant};

/// Moves the head of the waitlist into a free slot.
///
/// Returns `None` (and changes nothing) when the waitlist is empty or the
/// event has no open slot. Skill bounds are not re-checked: an entry that
/// made it onto the waitlist is eligible for promotion.
pub fn promote_next(roster: &mut EventRoster, now: DateTime<Utc>) -> Option<Participant> {
    if !roster.event().has_open_slot() {
        return None;
    }
    let head = roster.dequeue_head()?;
    let promoted = roster.admit(head.user_id, now);
    tracing::debug!(
        event_id = %promoted.event_id,
        user_id = %promoted.user_id,
        waited_since = %head.joined_at,
        "promoted from waitlist"
    );
    Some(promoted)
}
