//! Database row shapes and their conversion into domain types.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Event, EventId, Participant, User, UserId, WaitlistEntry};
use crate::error::GatewayError;

/// Column list shared by every `events` query, in [`EventRow`] order.
pub const EVENT_COLUMNS: &str = "id, title, event_type, start_at, end_at, max_players, \
     current_players, min_skill, max_skill, court_ids, owner_id, notes, created_at";

/// Column list shared by every `users` query, in [`UserRow`] order.
pub const USER_COLUMNS: &str = "id, name, email, skill_level, role, created_at";

/// A row from the `events` table.
pub type EventRow = (
    Uuid,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
    i32,
    i32,
    Option<String>,
    Option<String>,
    Vec<Uuid>,
    Uuid,
    Option<String>,
    DateTime<Utc>,
);

/// A row from the `users` table.
pub type UserRow = (Uuid, String, Option<String>, String, String, DateTime<Utc>);

/// A row from the `event_participants` table.
pub type ParticipantRow = (Uuid, Uuid, DateTime<Utc>);

/// A row from the `event_waitlist` table.
pub type WaitlistRow = (Uuid, Uuid, DateTime<Utc>, i64);

/// Converts an `events` row.
///
/// # Errors
///
/// Returns [`GatewayError::PersistenceError`] if the stored event type or
/// counters are out of range.
pub fn event_from_row(row: EventRow) -> Result<Event, GatewayError> {
    let (
        id,
        title,
        event_type,
        start,
        end,
        max_players,
        current_players,
        min_skill,
        max_skill,
        court_ids,
        owner_id,
        notes,
        created_at,
    ) = row;

    Ok(Event {
        id: EventId::from_uuid(id),
        title,
        event_type: event_type.parse().map_err(GatewayError::PersistenceError)?,
        start,
        end,
        max_players: to_u32("max_players", max_players)?,
        current_players: to_u32("current_players", current_players)?,
        min_skill,
        max_skill,
        court_ids,
        owner: UserId::from_uuid(owner_id),
        notes,
        created_at,
    })
}

/// Converts a `users` row.
///
/// # Errors
///
/// Returns [`GatewayError::PersistenceError`] if the stored role is unknown.
pub fn user_from_row(row: UserRow) -> Result<User, GatewayError> {
    let (id, name, email, skill_level, role, created_at) = row;
    Ok(User {
        id: UserId::from_uuid(id),
        name,
        email,
        skill_level,
        role: role.parse().map_err(GatewayError::PersistenceError)?,
        created_at,
    })
}

/// Converts an `event_participants` row.
#[must_use]
pub fn participant_from_row(row: ParticipantRow) -> Participant {
    let (event_id, user_id, joined_at) = row;
    Participant {
        event_id: EventId::from_uuid(event_id),
        user_id: UserId::from_uuid(user_id),
        joined_at,
    }
}

/// Converts an `event_waitlist` row.
#[must_use]
pub fn waitlist_from_row(row: WaitlistRow) -> WaitlistEntry {
    let (event_id, user_id, joined_at, seq) = row;
    WaitlistEntry {
        event_id: EventId::from_uuid(event_id),
        user_id: UserId::from_uuid(user_id),
        joined_at,
        seq,
    }
}

/// Narrows a domain counter to the `INTEGER` column type.
///
/// # Errors
///
/// Returns [`GatewayError::PersistenceError`] if the value does not fit.
pub fn to_i32(field: &str, value: u32) -> Result<i32, GatewayError> {
    i32::try_from(value)
        .map_err(|_| GatewayError::PersistenceError(format!("{field} out of range: {value}")))
}

fn to_u32(field: &str, value: i32) -> Result<u32, GatewayError> {
    u32::try_from(value)
        .map_err(|_| GatewayError::PersistenceError(format!("{field} out of range: {value}")))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn row(event_type: &str, current_players: i32) -> EventRow {
        let now = Utc::now();
        (
            Uuid::new_v4(),
            "Clinic".to_string(),
            event_type.to_string(),
            now,
            now,
            8,
            current_players,
            Some("BEGINNER_2_5".to_string()),
            None,
            vec![Uuid::new_v4()],
            Uuid::new_v4(),
            None,
            now,
        )
    }

    #[test]
    fn event_row_converts() {
        let Ok(event) = event_from_row(row("CLINIC", 3)) else {
            panic!("valid row");
        };
        assert_eq!(event.current_players, 3);
        assert_eq!(event.min_skill.as_deref(), Some("BEGINNER_2_5"));
    }

    #[test]
    fn unknown_event_type_is_persistence_error() {
        assert!(matches!(
            event_from_row(row("BRUNCH", 0)),
            Err(GatewayError::PersistenceError(_))
        ));
    }

    #[test]
    fn negative_counter_is_persistence_error() {
        assert!(event_from_row(row("CLINIC", -1)).is_err());
    }

    #[test]
    fn user_row_keeps_raw_skill() {
        let Ok(user) = user_from_row((
            Uuid::new_v4(),
            "Rae".to_string(),
            None,
            "INTERMEDIATE".to_string(),
            "COURT_MANAGER".to_string(),
            Utc::now(),
        )) else {
            panic!("valid row");
        };
        assert_eq!(user.skill_level, "INTERMEDIATE");
        assert_eq!(user.role, crate::domain::Role::CourtManager);
    }
}
