//! Membership service: orchestrates roster operations and emits events.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    Admission, Departure, Event, EventBus, EventId, EventRoster, EventSummary, MembershipEvent,
    NewEvent, Participant, SkillLevel, User, UserId, WaitlistEntry, WaitlistSkillGating,
};
use crate::error::GatewayError;
use crate::persistence::MembershipStore;

/// Orchestration layer for all membership operations.
///
/// Stateless coordinator: owns the injected store for state and the
/// [`EventBus`] for event emission. Every mutation follows the pattern:
/// run the ledger operation inside [`MembershipStore::with_roster`] →
/// commit → emit events → return result. Events are only published for
/// committed changes.
#[derive(Debug)]
pub struct MembershipService<S> {
    store: Arc<S>,
    event_bus: EventBus,
    gating: WaitlistSkillGating,
}

impl<S: MembershipStore> MembershipService<S> {
    /// Creates a new `MembershipService`.
    #[must_use]
    pub fn new(store: Arc<S>, event_bus: EventBus, gating: WaitlistSkillGating) -> Self {
        Self {
            store,
            event_bus,
            gating,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the injected store.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Skill gating applied on the waitlist path.
    #[must_use]
    pub fn gating(&self) -> WaitlistSkillGating {
        self.gating
    }

    // ── Users ───────────────────────────────────────────────────────────

    /// Registers a player profile with the [`crate::domain::Role::User`] role.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the name is blank, the
    /// email is malformed, or the email is already registered.
    pub async fn register_user(
        &self,
        name: &str,
        email: Option<String>,
        skill: SkillLevel,
    ) -> Result<User, GatewayError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GatewayError::InvalidRequest("name must not be empty".to_string()));
        }
        if let Some(email) = email.as_deref()
            && !email.contains('@')
        {
            return Err(GatewayError::InvalidRequest(format!(
                "invalid email address: {email}"
            )));
        }

        let mut user = User::new(name, skill.as_str());
        user.email = email;
        let user = self.store.insert_user(user).await?;

        tracing::info!(user_id = %user.id, skill = %skill, "user registered");
        Ok(user)
    }

    /// Loads a user profile.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UserNotFound`] if the user does not exist.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, GatewayError> {
        self.store.get_user(user_id).await
    }

    // ── Events ──────────────────────────────────────────────────────────

    /// Schedules a new event owned by `caller`.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Forbidden`] unless the caller is an admin or
    ///   court manager.
    /// - [`GatewayError::InvalidRequest`] if the parameters are invalid.
    pub async fn schedule_event(&self, caller: &User, new: NewEvent) -> Result<Event, GatewayError> {
        if !caller.role.can_schedule_events() {
            return Err(GatewayError::Forbidden(format!(
                "role {} cannot schedule events",
                caller.role
            )));
        }
        new.validate()?;

        let event = self.store.insert_event(Event::create(new, caller.id)).await?;

        let _ = self.event_bus.publish(MembershipEvent::EventScheduled {
            event_id: event.id,
            title: event.title.clone(),
            max_players: event.max_players,
            timestamp: Utc::now(),
        });

        tracing::info!(event_id = %event.id, owner = %caller.id, max_players = event.max_players, "event scheduled");
        Ok(event)
    }

    /// Lists all events ordered by start time.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] on store failure.
    pub async fn list_events(&self) -> Result<Vec<EventSummary>, GatewayError> {
        let events = self.store.list_events().await?;
        Ok(events.iter().map(EventSummary::from).collect())
    }

    /// Loads an event together with its participants and waitlist.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] if the event does not exist.
    pub async fn get_roster(&self, event_id: EventId) -> Result<EventRoster, GatewayError> {
        self.store.load_roster(event_id).await
    }

    /// Returns the event's waitlist in promotion order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventNotFound`] if the event does not exist.
    pub async fn waitlist(&self, event_id: EventId) -> Result<Vec<WaitlistEntry>, GatewayError> {
        let roster = self.store.load_roster(event_id).await?;
        Ok(roster.waitlist().to_vec())
    }

    // ── Membership ──────────────────────────────────────────────────────

    /// Takes a confirmed slot for `user`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EventFull`] when no slot is open, a
    /// conflict if the user is already a member, or
    /// [`GatewayError::SkillOutOfRange`] when the user's tier is out of bounds.
    pub async fn join(&self, user: &User, event_id: EventId) -> Result<Participant, GatewayError> {
        let gating = self.gating;
        let (participant, current_players) = self
            .store
            .with_roster(event_id, |roster| {
                let participant = roster.join(user, Utc::now(), gating)?;
                Ok((participant, roster.participant_count()))
            })
            .await?;

        self.emit_joined(&participant, current_players);
        Ok(participant)
    }

    /// Takes a slot if one is open, otherwise queues `user`.
    ///
    /// # Errors
    ///
    /// Same as [`MembershipService::join`], except that a full event is not
    /// an error.
    pub async fn join_or_waitlist(
        &self,
        user: &User,
        event_id: EventId,
    ) -> Result<Admission, GatewayError> {
        let gating = self.gating;
        let (admission, current_players, position) = self
            .store
            .with_roster(event_id, |roster| {
                let admission = roster.join_or_waitlist(user, Utc::now(), gating)?;
                let position = roster.waitlist_position(user.id);
                Ok((admission, roster.participant_count(), position))
            })
            .await?;

        match &admission {
            Admission::Joined(participant) => self.emit_joined(participant, current_players),
            Admission::Waitlisted(entry) => self.emit_waitlisted(entry, position.unwrap_or(0)),
        }
        Ok(admission)
    }

    /// Gives up `user_id`'s slot, promoting the head of the waitlist into it.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotParticipant`] if the user holds no slot.
    pub async fn leave(&self, user_id: UserId, event_id: EventId) -> Result<Departure, GatewayError> {
        let (departure, current_players, title) = self
            .store
            .with_roster(event_id, |roster| {
                let departure = roster.leave(user_id, Utc::now())?;
                Ok((
                    departure,
                    roster.participant_count(),
                    roster.event().title.clone(),
                ))
            })
            .await?;

        let mut events = vec![MembershipEvent::ParticipantLeft {
            event_id,
            user_id,
            current_players,
            timestamp: Utc::now(),
        }];
        tracing::info!(%event_id, %user_id, current_players, "participant left");

        if let Some(promoted) = &departure.promoted {
            events.push(MembershipEvent::WaitlistPromoted {
                event_id,
                user_id: promoted.user_id,
                event_title: title,
                timestamp: Utc::now(),
            });
            tracing::info!(%event_id, user_id = %promoted.user_id, "waitlist head promoted");
        }
        self.event_bus.publish_all(events);
        Ok(departure)
    }

    /// Queues `user` on the event's waitlist.
    ///
    /// # Errors
    ///
    /// Returns a conflict if the user is already a member, or
    /// [`GatewayError::SkillOutOfRange`] when waitlist gating is enforced
    /// and the user's tier is out of bounds.
    pub async fn join_waitlist(
        &self,
        user: &User,
        event_id: EventId,
    ) -> Result<WaitlistEntry, GatewayError> {
        let gating = self.gating;
        let (entry, position) = self
            .store
            .with_roster(event_id, |roster| {
                let entry = roster.join_waitlist(user, Utc::now(), gating)?;
                let position = roster.waitlist_position(user.id).unwrap_or(0);
                Ok((entry, position))
            })
            .await?;

        self.emit_waitlisted(&entry, position);
        Ok(entry)
    }

    /// Removes `user_id` from the event's waitlist.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotWaitlisted`] if the user is not queued.
    pub async fn leave_waitlist(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<WaitlistEntry, GatewayError> {
        let entry = self
            .store
            .with_roster(event_id, |roster| roster.leave_waitlist(user_id))
            .await?;

        let _ = self.event_bus.publish(MembershipEvent::WaitlistLeft {
            event_id,
            user_id,
            timestamp: Utc::now(),
        });
        tracing::info!(%event_id, %user_id, "left waitlist");
        Ok(entry)
    }

    fn emit_joined(&self, participant: &Participant, current_players: u32) {
        let _ = self.event_bus.publish(MembershipEvent::ParticipantJoined {
            event_id: participant.event_id,
            user_id: participant.user_id,
            current_players,
            timestamp: Utc::now(),
        });
        tracing::info!(
            event_id = %participant.event_id,
            user_id = %participant.user_id,
            current_players,
            "participant joined"
        );
    }

    fn emit_waitlisted(&self, entry: &WaitlistEntry, position: usize) {
        let _ = self.event_bus.publish(MembershipEvent::WaitlistJoined {
            event_id: entry.event_id,
            user_id: entry.user_id,
            position,
            timestamp: Utc::now(),
        });
        tracing::info!(event_id = %entry.event_id, user_id = %entry.user_id, position, "joined waitlist");
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::test_support::user_at;
    use crate::domain::{EventType, Role};
    use crate::persistence::MemoryStore;
    use chrono::Duration;
    use tokio_test::{assert_err, assert_ok};

    fn make_service(gating: WaitlistSkillGating) -> MembershipService<MemoryStore> {
        MembershipService::new(Arc::new(MemoryStore::new()), EventBus::new(1000), gating)
    }

    fn manager() -> User {
        User::new("Morgan", SkillLevel::Advanced4_25.as_str()).with_role(Role::CourtManager)
    }

    fn draft(max_players: u32, min: Option<usize>, max: Option<usize>) -> NewEvent {
        let start = Utc::now() + Duration::days(2);
        NewEvent {
            title: "Thursday ladder".to_string(),
            event_type: EventType::OpenPlay,
            start,
            end: start + Duration::hours(2),
            max_players,
            min_skill: min.and_then(SkillLevel::from_index),
            max_skill: max.and_then(SkillLevel::from_index),
            court_ids: vec![uuid::Uuid::new_v4()],
            notes: None,
        }
    }

    async fn schedule(
        service: &MembershipService<MemoryStore>,
        max_players: u32,
        min: Option<usize>,
        max: Option<usize>,
    ) -> EventId {
        let Ok(event) = service
            .schedule_event(&manager(), draft(max_players, min, max))
            .await
        else {
            panic!("event scheduling failed");
        };
        event.id
    }

    #[tokio::test]
    async fn players_cannot_schedule_events() {
        let service = make_service(WaitlistSkillGating::Enforce);
        let err = assert_err!(service.schedule_event(&user_at(3), draft(4, None, None)).await);
        assert!(matches!(err, GatewayError::Forbidden(_)));
    }

    #[tokio::test]
    async fn schedule_event_emits_event() {
        let service = make_service(WaitlistSkillGating::Enforce);
        let mut rx = service.event_bus().subscribe();
        let id = schedule(&service, 4, None, None).await;

        let Ok(event) = rx.recv().await else {
            panic!("expected event");
        };
        assert_eq!(event.event_type_str(), "event_scheduled");
        assert_eq!(event.event_id(), id);
    }

    #[tokio::test]
    async fn full_event_routes_third_player_to_waitlist() {
        let service = make_service(WaitlistSkillGating::Enforce);
        let id = schedule(&service, 2, None, None).await;
        let (a, b, c) = (user_at(3), user_at(4), user_at(5));

        assert_ok!(service.join(&a, id).await);
        assert_ok!(service.join(&b, id).await);
        let err = assert_err!(service.join(&c, id).await);
        assert!(matches!(err, GatewayError::EventFull(_)));

        let admission = assert_ok!(service.join_or_waitlist(&c, id).await);
        assert!(matches!(admission, Admission::Waitlisted(_)));

        let roster = assert_ok!(service.get_roster(id).await);
        assert_eq!(roster.participant_count(), 2);
        assert_eq!(roster.event().current_players, 2);
        assert_eq!(roster.waitlist_position(c.id), Some(1));
    }

    #[tokio::test]
    async fn leave_promotes_waitlist_head_and_notifies() {
        let service = make_service(WaitlistSkillGating::Enforce);
        let id = schedule(&service, 2, None, None).await;
        let (a, b, c) = (user_at(3), user_at(4), user_at(5));
        assert_ok!(service.join(&a, id).await);
        assert_ok!(service.join(&b, id).await);
        assert_ok!(service.join_waitlist(&c, id).await);

        let mut rx = service.event_bus().subscribe();
        let departure = assert_ok!(service.leave(a.id, id).await);
        let Some(promoted) = departure.promoted else {
            panic!("expected promotion");
        };
        assert_eq!(promoted.user_id, c.id);

        let roster = assert_ok!(service.get_roster(id).await);
        assert!(roster.is_participant(c.id));
        assert!(roster.waitlist().is_empty());
        assert_eq!(roster.event().current_players, 2);

        let Ok(left) = rx.recv().await else {
            panic!("expected participant_left");
        };
        assert_eq!(left.event_type_str(), "participant_left");
        let Ok(MembershipEvent::WaitlistPromoted {
            user_id,
            event_title,
            ..
        }) = rx.recv().await
        else {
            panic!("expected waitlist_promoted");
        };
        assert_eq!(user_id, c.id);
        assert_eq!(event_title, "Thursday ladder");
    }

    #[tokio::test]
    async fn promotion_follows_join_order() {
        let service = make_service(WaitlistSkillGating::Enforce);
        let id = schedule(&service, 1, None, None).await;
        let (holder, first, second) = (user_at(3), user_at(4), user_at(5));
        assert_ok!(service.join(&holder, id).await);
        assert_ok!(service.join_waitlist(&first, id).await);
        assert_ok!(service.join_waitlist(&second, id).await);

        let departure = assert_ok!(service.leave(holder.id, id).await);
        assert_eq!(departure.promoted.map(|p| p.user_id), Some(first.id));
        let waitlist = assert_ok!(service.waitlist(id).await);
        assert_eq!(waitlist.len(), 1);
        assert_eq!(waitlist.first().map(|w| w.user_id), Some(second.id));
    }

    #[tokio::test]
    async fn leaving_twice_is_not_found() {
        let service = make_service(WaitlistSkillGating::Enforce);
        let id = schedule(&service, 4, None, None).await;
        let player = user_at(6);
        assert_ok!(service.join(&player, id).await);

        assert_ok!(service.leave(player.id, id).await);
        let err = assert_err!(service.leave(player.id, id).await);
        assert!(matches!(err, GatewayError::NotParticipant(_)));
        let roster = assert_ok!(service.get_roster(id).await);
        assert_eq!(roster.event().current_players, 0);
    }

    #[tokio::test]
    async fn concurrent_joiners_never_exceed_capacity() {
        let service = Arc::new(make_service(WaitlistSkillGating::Enforce));
        let id = schedule(&service, 2, None, None).await;

        let mut handles = Vec::new();
        for i in 0..10 {
            let service = Arc::clone(&service);
            handles.push(tokio::spawn(async move {
                let player = user_at(i % SkillLevel::ALL.len());
                service.join_or_waitlist(&player, id).await
            }));
        }

        let mut joined = 0;
        let mut waitlisted = 0;
        for handle in handles {
            let Ok(Ok(admission)) = handle.await else {
                panic!("join task failed");
            };
            match admission {
                Admission::Joined(_) => joined += 1,
                Admission::Waitlisted(_) => waitlisted += 1,
            }
        }
        assert_eq!(joined, 2);
        assert_eq!(waitlisted, 8);

        let roster = assert_ok!(service.get_roster(id).await);
        assert_eq!(roster.event().current_players, 2);
        assert_eq!(roster.waitlist().len(), 8);
    }

    #[tokio::test]
    async fn skill_bounds_gate_direct_joins() {
        let service = make_service(WaitlistSkillGating::Enforce);
        let id = schedule(&service, 4, Some(8), Some(12)).await;

        let err = assert_err!(service.join(&user_at(5), id).await);
        assert!(matches!(err, GatewayError::SkillOutOfRange { .. }));
        assert_ok!(service.join(&user_at(10), id).await);

        let unknown = User::new("Unknown", "SOMETHING_OLD");
        assert_ok!(service.join(&unknown, id).await);

        // Un-migrated coarse names are not tiers, so the gate stays open.
        let legacy = User::new("Legacy", "BEGINNER");
        assert_ok!(service.join(&legacy, id).await);
    }

    #[tokio::test]
    async fn waitlist_gating_follows_policy() {
        let enforcing = make_service(WaitlistSkillGating::Enforce);
        let id = schedule(&enforcing, 1, Some(8), Some(12)).await;
        let err = assert_err!(enforcing.join_waitlist(&user_at(2), id).await);
        assert!(matches!(err, GatewayError::SkillOutOfRange { .. }));

        let skipping = make_service(WaitlistSkillGating::Skip);
        let id = schedule(&skipping, 1, Some(8), Some(12)).await;
        assert_ok!(skipping.join_waitlist(&user_at(2), id).await);
    }

    #[tokio::test]
    async fn leave_waitlist_twice_is_not_found() {
        let service = make_service(WaitlistSkillGating::Enforce);
        let id = schedule(&service, 1, None, None).await;
        let player = user_at(4);
        assert_ok!(service.join_waitlist(&player, id).await);
        assert_ok!(service.leave_waitlist(player.id, id).await);
        let err = assert_err!(service.leave_waitlist(player.id, id).await);
        assert!(matches!(err, GatewayError::NotWaitlisted(_)));
    }

    #[tokio::test]
    async fn register_user_validates_input() {
        let service = make_service(WaitlistSkillGating::Enforce);
        let err = assert_err!(
            service
                .register_user("  ", None, SkillLevel::Intermediate3_25)
                .await
        );
        assert!(matches!(err, GatewayError::InvalidRequest(_)));
        let err = assert_err!(
            service
                .register_user("Sam", Some("not-an-email".to_string()), SkillLevel::LOWEST)
                .await
        );
        assert!(matches!(err, GatewayError::InvalidRequest(_)));

        let user = assert_ok!(
            service
                .register_user("Sam", Some("sam@example.com".to_string()), SkillLevel::Pro5_5)
                .await
        );
        assert_eq!(user.role, Role::User);
        assert_eq!(user.skill_level, "PRO_5_5");
        assert_eq!(assert_ok!(service.get_user(user.id).await).id, user.id);
    }

    #[tokio::test]
    async fn operations_on_missing_event_are_not_found() {
        let service = make_service(WaitlistSkillGating::Enforce);
        let id = EventId::new();
        let err = assert_err!(service.join(&user_at(1), id).await);
        assert!(matches!(err, GatewayError::EventNotFound(_)));
        let err = assert_err!(service.waitlist(id).await);
        assert!(matches!(err, GatewayError::EventNotFound(_)));
    }
}
