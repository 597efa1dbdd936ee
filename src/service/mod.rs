//! Service layer: business logic orchestration.
//!
//! [`MembershipService`] runs ledger operations against an injected
//! [`crate::persistence::MembershipStore`] and emits committed changes
//! through the [`super::domain::EventBus`].

pub mod membership_service;

pub use membership_service::MembershipService;
