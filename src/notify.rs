//! Promotion notifications.
//!
//! Delivery to players (push, email) is owned by an external service. The
//! gateway's side of that contract is the [`MembershipEvent::WaitlistPromoted`]
//! event; [`spawn_promotion_notifier`] is the in-process consumer that
//! records each promotion so it can be picked up from the logs.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::domain::{EventBus, MembershipEvent};

/// Spawns a task that logs every promotion published on `bus`.
///
/// The task ends when the bus is dropped.
#[must_use]
pub fn spawn_promotion_notifier(bus: &EventBus) -> JoinHandle<usize> {
    let rx = bus.subscribe();
    tokio::spawn(run_notifier(rx))
}

/// Consumes `rx` until the channel closes, returning the number of
/// promotions handled.
async fn run_notifier(mut rx: broadcast::Receiver<MembershipEvent>) -> usize {
    let mut delivered = 0_usize;
    loop {
        match rx.recv().await {
            Ok(MembershipEvent::WaitlistPromoted {
                event_id,
                user_id,
                event_title,
                ..
            }) => {
                delivered = delivered.saturating_add(1);
                tracing::info!(
                    %event_id,
                    %user_id,
                    title = %event_title,
                    "waitlist promotion delivered"
                );
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!(lagged = n, "promotion notifier lagged behind event bus");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
    tracing::debug!(delivered, "promotion notifier stopped");
    delivered
}
