//! Builders shared by domain and service unit tests.

use chrono::{Duration, Utc};

use super::{Event, EventType, NewEvent, SkillLevel, User, UserId};

/// An open-play event with the given capacity and optional skill bounds,
/// expressed as ladder indices.
pub(crate) fn event_with_bounds(max_players: u32, min: Option<usize>, max: Option<usize>) -> Event {
    let start = Utc::now() + Duration::days(1);
    Event::create(
        NewEvent {
            title: "Saturday open play".to_string(),
            event_type: EventType::OpenPlay,
            start,
            end: start + Duration::hours(2),
            max_players,
            min_skill: min.and_then(SkillLevel::from_index),
            max_skill: max.and_then(SkillLevel::from_index),
            court_ids: vec![uuid::Uuid::new_v4()],
            notes: None,
        },
        UserId::new(),
    )
}

/// A player whose skill sits at the given ladder index.
pub(crate) fn user_at(index: usize) -> User {
    let skill = SkillLevel::from_index(index).unwrap_or(SkillLevel::LOWEST);
    User::new(format!("player-{index}"), skill.as_str())
}
