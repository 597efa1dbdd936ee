//! Data Transfer Objects for REST request/response serialization.
//!
//! Domain types that already carry a stable wire shape (events,
//! participants, waitlist entries, users) are returned as-is; the types
//! here cover request bodies, query strings, and composite responses.

pub mod common_dto;
pub mod event_dto;
pub mod membership_dto;
pub mod user_dto;

pub use common_dto::*;
pub use event_dto::*;
pub use membership_dto::*;
pub use user_dto::*;
