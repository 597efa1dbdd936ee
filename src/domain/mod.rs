//! Domain layer: core types, the membership ledger, and the event system.
//!
//! This module contains the server-side domain model: identifiers, the
//! skill ladder, events and users, the per-event roster with its
//! eligibility and promotion rules, and the event bus that broadcasts
//! committed membership changes.

pub mod eligibility;
pub mod event;
pub mod event_bus;
pub mod ids;
pub mod membership;
pub mod membership_event;
pub mod promotion;
pub mod roster;
pub mod skill_level;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use eligibility::{
    Eligibility, JoinPath, RejectReason, SkillGate, WaitlistSkillGating, check_eligibility,
};
pub use event::{Event, EventSummary, EventType, NewEvent};
pub use event_bus::EventBus;
pub use ids::{EventId, UserId};
pub use membership::{Participant, WaitlistEntry};
pub use membership_event::MembershipEvent;
pub use roster::{Admission, Departure, EventRoster, RosterChange};
pub use skill_level::SkillLevel;
pub use user::{Role, User};
