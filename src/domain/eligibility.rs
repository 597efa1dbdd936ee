//! Join/waitlist eligibility decisions.
//!
//! [`check_eligibility`] is a pure function over a roster snapshot and a
//! user: it never mutates state, so the ledger can call it on the locked
//! roster and tests can call it on hand-built ones.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{EventRoster, SkillLevel, User};
use crate::error::GatewayError;

/// Which membership set the caller is asking to enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinPath {
    /// Take a confirmed slot.
    Direct,
    /// Queue on the waitlist.
    Waitlist,
}

/// Whether skill bounds are enforced when queueing on the waitlist.
///
/// The direct join path is always gated. Promotion never re-checks skill,
/// so `Skip` allows out-of-range players to reach a confirmed slot through
/// the waitlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitlistSkillGating {
    /// Apply the same skill bounds as a direct join.
    #[default]
    Enforce,
    /// Let anyone queue regardless of skill.
    Skip,
}

impl FromStr for WaitlistSkillGating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "enforce" => Ok(Self::Enforce),
            "skip" => Ok(Self::Skip),
            other => Err(format!("unknown waitlist skill gating: {other}")),
        }
    }
}

/// Why a user may not enter either membership set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The user already holds a confirmed slot.
    AlreadyJoined,
    /// The user is already queued.
    AlreadyWaitlisted,
    /// The user's tier lies outside the event's inclusive bounds.
    SkillOutOfRange {
        /// The user's tier.
        user: SkillLevel,
        /// Effective lower bound.
        min: SkillLevel,
        /// Effective upper bound.
        max: SkillLevel,
    },
}

/// Outcome of an eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    /// A confirmed slot may be taken now.
    AllowJoin,
    /// The user may queue (the event is full, or the waitlist was asked for).
    AllowWaitlist,
    /// Neither set may be entered.
    Reject(RejectReason),
}

/// Which stored skill value failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnresolvedSkill {
    /// The user's own skill level.
    User(String),
    /// The event's lower bound.
    Min(String),
    /// The event's upper bound.
    Max(String),
}

/// Result of comparing a user's tier against an event's bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillGate {
    /// Inside the inclusive bounds.
    Within,
    /// Outside the inclusive bounds.
    Outside {
        /// The user's tier.
        user: SkillLevel,
        /// Effective lower bound.
        min: SkillLevel,
        /// Effective upper bound.
        max: SkillLevel,
    },
    /// Some value did not resolve; the gate is open.
    Unresolved(UnresolvedSkill),
}

/// Compares stored skill strings against the ladder.
///
/// Only exact canonical tier names count (see
/// [`SkillLevel::from_canonical`]); legacy coarse names such as
/// `"BEGINNER"` are unrecognized here. Missing bounds default to the ends
/// of the ladder. If any of the three values names no tier the result is
/// [`SkillGate::Unresolved`] and the caller must not block the user on skill.
#[must_use]
pub fn skill_gate(user_skill: &str, min_skill: Option<&str>, max_skill: Option<&str>) -> SkillGate {
    let Some(user) = SkillLevel::from_canonical(user_skill) else {
        return SkillGate::Unresolved(UnresolvedSkill::User(user_skill.to_string()));
    };
    let min = match min_skill {
        None => SkillLevel::LOWEST,
        Some(raw) => match SkillLevel::from_canonical(raw) {
            Some(level) => level,
            None => return SkillGate::Unresolved(UnresolvedSkill::Min(raw.to_string())),
        },
    };
    let max = match max_skill {
        None => SkillLevel::HIGHEST,
        Some(raw) => match SkillLevel::from_canonical(raw) {
            Some(level) => level,
            None => return SkillGate::Unresolved(UnresolvedSkill::Max(raw.to_string())),
        },
    };

    if user < min || user > max {
        SkillGate::Outside { user, min, max }
    } else {
        SkillGate::Within
    }
}

/// Decides whether `user` may join `roster`'s event along `path`.
///
/// Rules apply in order: existing participant, existing waitlist entry,
/// skill bounds (waitlist path only under [`WaitlistSkillGating::Enforce`]),
/// then capacity (direct path only; the waitlist is unbounded).
#[must_use]
pub fn check_eligibility(
    roster: &EventRoster,
    user: &User,
    path: JoinPath,
    gating: WaitlistSkillGating,
) -> Eligibility {
    if roster.is_participant(user.id) {
        return Eligibility::Reject(RejectReason::AlreadyJoined);
    }
    if roster.is_waitlisted(user.id) {
        return Eligibility::Reject(RejectReason::AlreadyWaitlisted);
    }

    let gated = match path {
        JoinPath::Direct => true,
        JoinPath::Waitlist => gating == WaitlistSkillGating::Enforce,
    };
    if gated {
        let event = roster.event();
        match skill_gate(
            &user.skill_level,
            event.min_skill.as_deref(),
            event.max_skill.as_deref(),
        ) {
            SkillGate::Within => {}
            SkillGate::Outside { user, min, max } => {
                return Eligibility::Reject(RejectReason::SkillOutOfRange { user, min, max });
            }
            SkillGate::Unresolved(which) => {
                tracing::warn!(
                    event_id = %event.id,
                    user_id = %user.id,
                    unresolved = ?which,
                    "skill level not on ladder; skipping skill gate"
                );
            }
        }
    }

    match path {
        JoinPath::Direct if roster.participant_count() >= roster.event().max_players => {
            Eligibility::AllowWaitlist
        }
        JoinPath::Direct => Eligibility::AllowJoin,
        JoinPath::Waitlist => Eligibility::AllowWaitlist,
    }
}

impl RejectReason {
    /// Converts the rejection into the caller-facing error for `event`.
    #[must_use]
    pub fn into_error(self, event: &super::Event) -> GatewayError {
        match self {
            Self::AlreadyJoined => GatewayError::AlreadyJoined(event.id),
            Self::AlreadyWaitlisted => GatewayError::AlreadyWaitlisted(event.id),
            Self::SkillOutOfRange { user, min, max } => GatewayError::SkillOutOfRange {
                user_skill: user,
                min,
                max,
            },
        }
    }
}
