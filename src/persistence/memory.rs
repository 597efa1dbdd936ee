//! In-process store with per-event fine-grained locking.
//!
//! [`MemoryStore`] keeps every roster in a `HashMap` where each entry is
//! individually protected by a [`tokio::sync::Mutex`]. Operations on
//! different events run concurrently; operations on the same event are
//! serialized, which is what makes check-then-act on a roster safe.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use super::MembershipStore;
use crate::domain::{Event, EventId, EventRoster, User, UserId};
use crate::error::GatewayError;

/// Process-local [`MembershipStore`].
///
/// # Concurrency
///
/// - The outer `RwLock` only guards the map shape (insert / lookup).
/// - Each roster sits behind its own `Arc<Mutex<_>>`; `with_roster` holds
///   that mutex for the whole closure.
/// - The closure runs on a copy of the roster, and the copy replaces the
///   stored one only when the closure returns `Ok`, so a failed operation
///   leaves no partial mutation behind.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rosters: RwLock<HashMap<EventId, Arc<Mutex<EventRoster>>>>,
    users: RwLock<HashMap<UserId, User>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    async fn roster_lock(&self, id: EventId) -> Result<Arc<Mutex<EventRoster>>, GatewayError> {
        let map = self.rosters.read().await;
        map.get(&id).cloned().ok_or(GatewayError::EventNotFound(id))
    }
}

impl MembershipStore for MemoryStore {
    async fn insert_event(&self, event: Event) -> Result<Event, GatewayError> {
        let mut map = self.rosters.write().await;
        if map.contains_key(&event.id) {
            return Err(GatewayError::InvalidRequest(format!(
                "event {} already exists",
                event.id
            )));
        }
        map.insert(
            event.id,
            Arc::new(Mutex::new(EventRoster::new(event.clone()))),
        );
        Ok(event)
    }

    async fn get_event(&self, id: EventId) -> Result<Event, GatewayError> {
        let lock = self.roster_lock(id).await?;
        let roster = lock.lock().await;
        Ok(roster.event().clone())
    }

    async fn list_events(&self) -> Result<Vec<Event>, GatewayError> {
        let locks: Vec<_> = self.rosters.read().await.values().cloned().collect();
        let mut events = Vec::with_capacity(locks.len());
        for lock in locks {
            events.push(lock.lock().await.event().clone());
        }
        events.sort_by_key(|e| (e.start, *e.id.as_uuid()));
        Ok(events)
    }

    async fn load_roster(&self, id: EventId) -> Result<EventRoster, GatewayError> {
        let lock = self.roster_lock(id).await?;
        let roster = lock.lock().await;
        Ok(roster.clone())
    }

    async fn with_roster<T, F>(&self, id: EventId, op: F) -> Result<T, GatewayError>
    where
        T: Send,
        F: FnOnce(&mut EventRoster) -> Result<T, GatewayError> + Send,
    {
        let lock = self.roster_lock(id).await?;
        let mut stored = lock.lock().await;

        let mut working = stored.clone();
        let value = op(&mut working)?;
        // Nothing downstream of this store replays the journal.
        let _ = working.take_journal();
        *stored = working;
        Ok(value)
    }

    async fn insert_user(&self, user: User) -> Result<User, GatewayError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(GatewayError::InvalidRequest(format!(
                "user {} already exists",
                user.id
            )));
        }
        if let Some(email) = user.email.as_deref()
            && users.values().any(|u| u.email.as_deref() == Some(email))
        {
            return Err(GatewayError::InvalidRequest(format!(
                "email {email} is already registered"
            )));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> Result<User, GatewayError> {
        self.users
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(GatewayError::UserNotFound(id))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::WaitlistSkillGating;
    use crate::domain::test_support::{event_with_bounds, user_at};
    use chrono::{Duration, Utc};
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn insert_and_get_event() {
        let store = MemoryStore::new();
        let event = event_with_bounds(4, None, None);
        let id = event.id;

        assert_ok!(store.insert_event(event).await);
        let fetched = assert_ok!(store.get_event(id).await);
        assert_eq!(fetched.id, id);
        assert_eq!(fetched.current_players, 0);
    }

    #[tokio::test]
    async fn duplicate_event_is_rejected() {
        let store = MemoryStore::new();
        let event = event_with_bounds(4, None, None);
        assert_ok!(store.insert_event(event.clone()).await);
        assert_err!(store.insert_event(event).await);
    }

    #[tokio::test]
    async fn unknown_event_is_not_found() {
        let store = MemoryStore::new();
        let err = assert_err!(store.get_event(EventId::new()).await);
        assert!(matches!(err, GatewayError::EventNotFound(_)));
        let err = assert_err!(store.with_roster(EventId::new(), |_| Ok(())).await);
        assert!(matches!(err, GatewayError::EventNotFound(_)));
    }

    #[tokio::test]
    async fn failed_operation_rolls_back() {
        let store = MemoryStore::new();
        let event = event_with_bounds(4, None, None);
        let id = event.id;
        assert_ok!(store.insert_event(event).await);

        let user = user_at(2);
        let result: Result<(), GatewayError> = store
            .with_roster(id, |roster| {
                roster.join(&user, Utc::now(), WaitlistSkillGating::Enforce)?;
                Err(GatewayError::Internal("simulated failure".to_string()))
            })
            .await;
        assert!(result.is_err());

        let roster = assert_ok!(store.load_roster(id).await);
        assert!(!roster.is_participant(user.id));
        assert_eq!(roster.event().current_players, 0);
    }

    #[tokio::test]
    async fn successful_operation_persists_count() {
        let store = MemoryStore::new();
        let event = event_with_bounds(4, None, None);
        let id = event.id;
        assert_ok!(store.insert_event(event).await);

        let user = user_at(2);
        assert_ok!(
            store
                .with_roster(id, |roster| roster.join(
                    &user,
                    Utc::now(),
                    WaitlistSkillGating::Enforce
                ))
                .await
        );
        let fetched = assert_ok!(store.get_event(id).await);
        assert_eq!(fetched.current_players, 1);
        let roster = assert_ok!(store.load_roster(id).await);
        assert!(roster.journal().is_empty());
    }

    #[tokio::test]
    async fn list_events_orders_by_start() {
        let store = MemoryStore::new();
        let mut later = event_with_bounds(2, None, None);
        later.start += Duration::days(3);
        let sooner = event_with_bounds(2, None, None);
        assert_ok!(store.insert_event(later.clone()).await);
        assert_ok!(store.insert_event(sooner.clone()).await);

        let events = assert_ok!(store.list_events().await);
        let ids: Vec<_> = events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![sooner.id, later.id]);
    }

    #[tokio::test]
    async fn users_round_trip_and_emails_are_unique() {
        let store = MemoryStore::new();
        let mut first = user_at(3);
        first.email = Some("kai@example.com".to_string());
        let id = first.id;
        assert_ok!(store.insert_user(first).await);
        assert_eq!(assert_ok!(store.get_user(id).await).id, id);

        let mut clash = user_at(4);
        clash.email = Some("kai@example.com".to_string());
        let err = assert_err!(store.insert_user(clash).await);
        assert!(matches!(err, GatewayError::InvalidRequest(_)));

        let err = assert_err!(store.get_user(UserId::new()).await);
        assert!(matches!(err, GatewayError::UserNotFound(_)));
    }
}
