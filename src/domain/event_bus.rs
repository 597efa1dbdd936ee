//! Post-commit fan-out of membership changes.
//!
//! The service publishes to [`EventBus`] only after a roster change is
//! durable, so subscribers never see a change that was rolled back. A
//! leave that promotes someone produces two events, published with
//! [`EventBus::publish_all`]; every subscriber sees the departure before
//! the promotion.

use tokio::sync::broadcast;

use super::MembershipEvent;

/// Broadcast bus for [`MembershipEvent`]s.
///
/// Backed by a `tokio::broadcast` ring buffer (default capacity 10 000);
/// receivers that fall behind lose the oldest events and observe
/// `RecvError::Lagged`.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<MembershipEvent>,
}

impl EventBus {
    /// Creates a bus with room for `capacity` undelivered events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes one committed change.
    ///
    /// Returns how many receivers were handed the event; zero when nobody
    /// is listening, in which case the event is discarded.
    pub fn publish(&self, event: MembershipEvent) -> usize {
        let kind = event.event_type_str();
        let delivered = self.sender.send(event).unwrap_or(0);
        tracing::trace!(kind, delivered, "membership event published");
        delivered
    }

    /// Publishes the changes of one commit, in order.
    pub fn publish_all(&self, events: impl IntoIterator<Item = MembershipEvent>) {
        for event in events {
            self.publish(event);
        }
    }

    /// Opens a receiver for every event published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<MembershipEvent> {
        self.sender.subscribe()
    }

    /// Number of live receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{EventId, UserId};
    use chrono::Utc;

    fn left(event_id: EventId) -> MembershipEvent {
        MembershipEvent::ParticipantLeft {
            event_id,
            user_id: UserId::new(),
            current_players: 1,
            timestamp: Utc::now(),
        }
    }

    fn promoted(event_id: EventId) -> MembershipEvent {
        MembershipEvent::WaitlistPromoted {
            event_id,
            user_id: UserId::new(),
            event_title: "Morning drills".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn events_without_listeners_are_dropped() {
        let bus = EventBus::new(8);
        assert_eq!(bus.publish(left(EventId::new())), 0);
        assert_eq!(bus.receiver_count(), 0);
    }

    #[tokio::test]
    async fn commit_batch_arrives_in_order() {
        let bus = EventBus::new(8);
        let mut rx = bus.subscribe();
        let id = EventId::new();

        bus.publish_all([left(id), promoted(id)]);

        let Ok(first) = rx.recv().await else {
            panic!("missing first event");
        };
        let Ok(second) = rx.recv().await else {
            panic!("missing second event");
        };
        assert_eq!(first.event_type_str(), "participant_left");
        assert_eq!(second.event_type_str(), "waitlist_promoted");
        assert_eq!(second.event_id(), id);
    }

    #[tokio::test]
    async fn every_subscriber_sees_each_event() {
        let bus = EventBus::new(8);
        let mut notifier = bus.subscribe();
        let mut audit = bus.subscribe();

        assert_eq!(bus.publish(promoted(EventId::new())), 2);
        assert!(notifier.recv().await.is_ok());
        assert!(audit.recv().await.is_ok());

        drop(audit);
        assert_eq!(bus.receiver_count(), 1);
    }

    #[tokio::test]
    async fn slow_receiver_observes_lag() {
        let bus = EventBus::new(2);
        let mut rx = bus.subscribe();
        let id = EventId::new();
        bus.publish_all([left(id), left(id), promoted(id)]);

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
    }
}
