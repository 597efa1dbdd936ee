//! The membership ledger of a single event.
//!
//! [`EventRoster`] owns an event's two disjoint membership sets
//! (participants and waitlist) and keeps `current_players` equal to the
//! participant count. It is plain data: a store hands out a roster only
//! while it holds that event exclusively, and every mutation is recorded
//! in a journal of [`RosterChange`]s so the store can persist exactly what
//! changed in the same atomic unit.

use chrono::{DateTime, Utc};

use super::eligibility::{Eligibility, JoinPath, WaitlistSkillGating, check_eligibility};
use super::{Event, Participant, User, UserId, WaitlistEntry, promotion};
use crate::error::GatewayError;

/// One persisted mutation of a roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterChange {
    /// A participant row was inserted.
    ParticipantAdded(Participant),
    /// The participant row for this user was deleted.
    ParticipantRemoved(UserId),
    /// A waitlist row was inserted.
    WaitlistAdded(WaitlistEntry),
    /// The waitlist row for this user was deleted.
    WaitlistRemoved(UserId),
}

/// Result of [`EventRoster::join_or_waitlist`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// A confirmed slot was taken.
    Joined(Participant),
    /// The event was full; the user was queued instead.
    Waitlisted(WaitlistEntry),
}

/// Result of [`EventRoster::leave`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    /// The slot that was given up.
    pub left: Participant,
    /// The waitlisted user moved into the freed slot, if any.
    pub promoted: Option<Participant>,
}

/// Membership state of one event.
///
/// Invariants upheld by every method:
/// - a user is in at most one of `participants` / `waitlist`;
/// - `event.current_players == participants.len()`;
/// - `waitlist` is sorted by [`WaitlistEntry::queue_key`].
#[derive(Debug, Clone)]
pub struct EventRoster {
    event: Event,
    participants: Vec<Participant>,
    waitlist: Vec<WaitlistEntry>,
    journal: Vec<RosterChange>,
}

impl EventRoster {
    /// Creates the roster of a freshly scheduled event.
    #[must_use]
    pub fn new(event: Event) -> Self {
        Self::from_parts(event, Vec::new(), Vec::new())
    }

    /// Rebuilds a roster from stored rows.
    ///
    /// The waitlist is re-sorted into FIFO order and `current_players` is
    /// reconciled with the participant rows, so a drifted stored counter is
    /// corrected on the next write.
    #[must_use]
    pub fn from_parts(
        event: Event,
        mut participants: Vec<Participant>,
        mut waitlist: Vec<WaitlistEntry>,
    ) -> Self {
        participants.sort_by_key(|p| p.joined_at);
        waitlist.sort_by_key(WaitlistEntry::queue_key);
        let mut roster = Self {
            event,
            participants,
            waitlist,
            journal: Vec::new(),
        };
        roster.sync_count();
        roster
    }

    /// The event this roster belongs to.
    #[must_use]
    pub const fn event(&self) -> &Event {
        &self.event
    }

    /// Confirmed participants in join order.
    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Waitlist in promotion order.
    #[must_use]
    pub fn waitlist(&self) -> &[WaitlistEntry] {
        &self.waitlist
    }

    /// Number of confirmed participants.
    #[must_use]
    pub fn participant_count(&self) -> u32 {
        u32::try_from(self.participants.len()).unwrap_or(u32::MAX)
    }

    /// Whether `user_id` holds a confirmed slot.
    #[must_use]
    pub fn is_participant(&self, user_id: UserId) -> bool {
        self.participants.iter().any(|p| p.user_id == user_id)
    }

    /// Whether `user_id` is queued.
    #[must_use]
    pub fn is_waitlisted(&self, user_id: UserId) -> bool {
        self.waitlist_position(user_id).is_some()
    }

    /// One-based queue position of `user_id`.
    #[must_use]
    pub fn waitlist_position(&self, user_id: UserId) -> Option<usize> {
        self.waitlist
            .iter()
            .position(|w| w.user_id == user_id)
            .map(|i| i + 1)
    }

    /// Changes recorded since the roster was loaded.
    #[must_use]
    pub fn journal(&self) -> &[RosterChange] {
        &self.journal
    }

    /// Drains the journal, leaving it empty.
    pub fn take_journal(&mut self) -> Vec<RosterChange> {
        std::mem::take(&mut self.journal)
    }

    /// Eligibility of `user` along `path` against the current state.
    #[must_use]
    pub fn check(&self, user: &User, path: JoinPath, gating: WaitlistSkillGating) -> Eligibility {
        check_eligibility(self, user, path, gating)
    }

    /// Takes a confirmed slot for `user`.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::AlreadyJoined`] / [`GatewayError::AlreadyWaitlisted`]
    ///   if the user is already in either set.
    /// - [`GatewayError::SkillOutOfRange`] if the user's tier is outside the
    ///   event's bounds.
    /// - [`GatewayError::EventFull`] if no slot is open.
    pub fn join(
        &mut self,
        user: &User,
        now: DateTime<Utc>,
        gating: WaitlistSkillGating,
    ) -> Result<Participant, GatewayError> {
        match self.check(user, JoinPath::Direct, gating) {
            Eligibility::AllowJoin => Ok(self.admit(user.id, now)),
            Eligibility::AllowWaitlist => Err(GatewayError::EventFull(self.event.id)),
            Eligibility::Reject(reason) => Err(reason.into_error(&self.event)),
        }
    }

    /// Takes a slot if one is open, otherwise queues `user`.
    ///
    /// # Errors
    ///
    /// Same rejections as [`EventRoster::join`], except that a full event
    /// is not an error.
    pub fn join_or_waitlist(
        &mut self,
        user: &User,
        now: DateTime<Utc>,
        gating: WaitlistSkillGating,
    ) -> Result<Admission, GatewayError> {
        match self.check(user, JoinPath::Direct, gating) {
            Eligibility::AllowJoin => Ok(Admission::Joined(self.admit(user.id, now))),
            Eligibility::AllowWaitlist => Ok(Admission::Waitlisted(self.enqueue(user.id, now))),
            Eligibility::Reject(reason) => Err(reason.into_error(&self.event)),
        }
    }

    /// Gives up `user_id`'s slot and promotes the head of the waitlist.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotParticipant`] if the user holds no slot.
    pub fn leave(&mut self, user_id: UserId, now: DateTime<Utc>) -> Result<Departure, GatewayError> {
        let idx = self
            .participants
            .iter()
            .position(|p| p.user_id == user_id)
            .ok_or(GatewayError::NotParticipant(self.event.id))?;
        let left = self.participants.remove(idx);
        self.journal.push(RosterChange::ParticipantRemoved(user_id));
        self.sync_count();

        let promoted = promotion::promote_next(self, now);
        Ok(Departure { left, promoted })
    }

    /// Queues `user` on the waitlist.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::AlreadyJoined`] / [`GatewayError::AlreadyWaitlisted`]
    ///   if the user is already in either set.
    /// - [`GatewayError::SkillOutOfRange`] under
    ///   [`WaitlistSkillGating::Enforce`] when the tier is out of bounds.
    pub fn join_waitlist(
        &mut self,
        user: &User,
        now: DateTime<Utc>,
        gating: WaitlistSkillGating,
    ) -> Result<WaitlistEntry, GatewayError> {
        match self.check(user, JoinPath::Waitlist, gating) {
            Eligibility::AllowJoin | Eligibility::AllowWaitlist => Ok(self.enqueue(user.id, now)),
            Eligibility::Reject(reason) => Err(reason.into_error(&self.event)),
        }
    }

    /// Removes `user_id` from the waitlist.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotWaitlisted`] if the user is not queued.
    pub fn leave_waitlist(&mut self, user_id: UserId) -> Result<WaitlistEntry, GatewayError> {
        let idx = self
            .waitlist
            .iter()
            .position(|w| w.user_id == user_id)
            .ok_or(GatewayError::NotWaitlisted(self.event.id))?;
        let entry = self.waitlist.remove(idx);
        self.journal.push(RosterChange::WaitlistRemoved(user_id));
        Ok(entry)
    }

    /// Inserts a participant, clearing any stale waitlist row for the same
    /// user first so the two sets stay disjoint.
    pub(super) fn admit(&mut self, user_id: UserId, now: DateTime<Utc>) -> Participant {
        if let Some(idx) = self.waitlist.iter().position(|w| w.user_id == user_id) {
            self.waitlist.remove(idx);
            self.journal.push(RosterChange::WaitlistRemoved(user_id));
        }
        let participant = Participant {
            event_id: self.event.id,
            user_id,
            joined_at: now,
        };
        self.participants.push(participant.clone());
        self.journal
            .push(RosterChange::ParticipantAdded(participant.clone()));
        self.sync_count();
        participant
    }

    /// Removes and returns the head of the waitlist.
    pub(super) fn dequeue_head(&mut self) -> Option<WaitlistEntry> {
        if self.waitlist.is_empty() {
            return None;
        }
        let head = self.waitlist.remove(0);
        self.journal
            .push(RosterChange::WaitlistRemoved(head.user_id));
        Some(head)
    }

    fn enqueue(&mut self, user_id: UserId, now: DateTime<Utc>) -> WaitlistEntry {
        let seq = self
            .waitlist
            .iter()
            .map(|w| w.seq)
            .max()
            .map_or(1, |max| max.saturating_add(1));
        let entry = WaitlistEntry {
            event_id: self.event.id,
            user_id,
            joined_at: now,
            seq,
        };
        let key = entry.queue_key();
        let at = self.waitlist.partition_point(|w| w.queue_key() <= key);
        self.waitlist.insert(at, entry.clone());
        self.journal.push(RosterChange::WaitlistAdded(entry.clone()));
        entry
    }

    fn sync_count(&mut self) {
        self.event.current_players = self.participant_count();
    }
}
