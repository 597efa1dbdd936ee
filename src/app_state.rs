//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::persistence::StoreBackend;
use crate::service::MembershipService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Membership service for all business logic.
    pub membership_service: Arc<MembershipService<StoreBackend>>,
    /// Event bus carrying committed membership changes.
    pub event_bus: EventBus,
}

impl AppState {
    /// Wires a service over `store` and shares its bus.
    #[must_use]
    pub fn new(
        store: StoreBackend,
        event_bus: EventBus,
        gating: crate::domain::WaitlistSkillGating,
    ) -> Self {
        let membership_service = Arc::new(MembershipService::new(
            Arc::new(store),
            event_bus.clone(),
            gating,
        ));
        Self {
            membership_service,
            event_bus,
        }
    }
}
