//! Persistence layer: the membership store seam and its backends.
//!
//! [`MembershipStore`] is the only way the service touches stored state.
//! Its central operation, [`MembershipStore::with_roster`], runs a ledger
//! closure against an event's roster as one atomic unit that is
//! serialized per event: either every change the closure journals is
//! persisted together with the derived participant count, or none is.
//!
//! Two backends are provided: [`MemoryStore`] (per-event async mutexes,
//! used for development and tests) and [`PostgresStore`] (row-locked
//! transactions via `sqlx`). [`StoreBackend`] selects one at startup.

pub mod memory;
pub mod models;
pub mod postgres;

use std::future::Future;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use crate::domain::{Event, EventId, EventRoster, User, UserId};
use crate::error::GatewayError;

/// Storage for events, users, and event rosters.
pub trait MembershipStore: Send + Sync + 'static {
    /// Stores a newly scheduled event with an empty roster.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the event already exists or the
    /// backend fails.
    fn insert_event(&self, event: Event)
    -> impl Future<Output = Result<Event, GatewayError>> + Send;

    /// Loads one event.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] if it does not exist.
    fn get_event(&self, id: EventId) -> impl Future<Output = Result<Event, GatewayError>> + Send;

    /// Loads every event, ordered by start time.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on backend failure.
    fn list_events(&self) -> impl Future<Output = Result<Vec<Event>, GatewayError>> + Send;

    /// Loads a read-only snapshot of an event's roster.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] if the event does not exist.
    fn load_roster(
        &self,
        id: EventId,
    ) -> impl Future<Output = Result<EventRoster, GatewayError>> + Send;

    /// Runs `op` on the event's roster while holding the event exclusively.
    ///
    /// On `Ok`, the roster's journal and derived participant count are
    /// persisted before the lock is released. On `Err`, nothing is
    /// persisted and the error is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] if the event does not exist,
    /// any error returned by `op`, or a persistence error.
    fn with_roster<T, F>(
        &self,
        id: EventId,
        op: F,
    ) -> impl Future<Output = Result<T, GatewayError>> + Send
    where
        T: Send,
        F: FnOnce(&mut EventRoster) -> Result<T, GatewayError> + Send;

    /// Registers a user.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the email is taken.
    fn insert_user(&self, user: User) -> impl Future<Output = Result<User, GatewayError>> + Send;

    /// Loads one user.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UserNotFound`] if it does not exist.
    fn get_user(&self, id: UserId) -> impl Future<Output = Result<User, GatewayError>> + Send;
}

/// Store selected at startup from configuration.
#[derive(Debug)]
pub enum StoreBackend {
    /// Process-local store; state is lost on restart.
    Memory(MemoryStore),
    /// PostgreSQL store.
    Postgres(PostgresStore),
}

impl MembershipStore for StoreBackend {
    async fn insert_event(&self, event: Event) -> Result<Event, GatewayError> {
        match self {
            Self::Memory(store) => store.insert_event(event).await,
            Self::Postgres(store) => store.insert_event(event).await,
        }
    }

    async fn get_event(&self, id: EventId) -> Result<Event, GatewayError> {
        match self {
            Self::Memory(store) => store.get_event(id).await,
            Self::Postgres(store) => store.get_event(id).await,
        }
    }

    async fn list_events(&self) -> Result<Vec<Event>, GatewayError> {
        match self {
            Self::Memory(store) => store.list_events().await,
            Self::Postgres(store) => store.list_events().await,
        }
    }

    async fn load_roster(&self, id: EventId) -> Result<EventRoster, GatewayError> {
        match self {
            Self::Memory(store) => store.load_roster(id).await,
            Self::Postgres(store) => store.load_roster(id).await,
        }
    }

    async fn with_roster<T, F>(&self, id: EventId, op: F) -> Result<T, GatewayError>
    where
        T: Send,
        F: FnOnce(&mut EventRoster) -> Result<T, GatewayError> + Send,
    {
        match self {
            Self::Memory(store) => store.with_roster(id, op).await,
            Self::Postgres(store) => store.with_roster(id, op).await,
        }
    }

    async fn insert_user(&self, user: User) -> Result<User, GatewayError> {
        match self {
            Self::Memory(store) => store.insert_user(user).await,
            Self::Postgres(store) => store.insert_user(user).await,
        }
    }

    async fn get_user(&self, id: UserId) -> Result<User, GatewayError> {
        match self {
            Self::Memory(store) => store.get_user(id).await,
            Self::Postgres(store) => store.get_user(id).await,
        }
    }
}
