//! Registered players and their authorization role.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{SkillLevel, UserId};

/// Authorization role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Regular player.
    #[default]
    User,
    /// Manages courts and may schedule events.
    CourtManager,
    /// Full administrative access.
    Admin,
}

impl Role {
    /// Stored name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::CourtManager => "COURT_MANAGER",
            Self::Admin => "ADMIN",
        }
    }

    /// Whether this role may schedule new events.
    #[must_use]
    pub const fn can_schedule_events(self) -> bool {
        matches!(self, Self::CourtManager | Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "COURT_MANAGER" => Ok(Self::CourtManager),
            "ADMIN" => Ok(Self::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A registered player.
///
/// `skill_level` is kept exactly as stored. Profiles written before the
/// current rating ladder may carry values that no longer resolve; see
/// [`User::skill`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// User identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Contact email, if any.
    pub email: Option<String>,
    /// Raw skill-level string.
    pub skill_level: String,
    /// Authorization role.
    pub role: Role,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a player with the [`Role::User`] role.
    #[must_use]
    pub fn new(name: impl Into<String>, skill_level: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: None,
            skill_level: skill_level.into(),
            role: Role::User,
            created_at: Utc::now(),
        }
    }

    /// Sets the role, returning the updated user.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Stored skill tier, or `None` unless the value is a canonical name.
    #[must_use]
    pub fn skill(&self) -> Option<SkillLevel> {
        SkillLevel::from_canonical(&self.skill_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in [Role::User, Role::CourtManager, Role::Admin] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("OWNER".parse::<Role>().is_err());
    }

    #[test]
    fn only_managers_and_admins_schedule() {
        assert!(!Role::User.can_schedule_events());
        assert!(Role::CourtManager.can_schedule_events());
        assert!(Role::Admin.can_schedule_events());
    }

    #[test]
    fn skill_is_canonical_only() {
        let user = User::new("Dana", "ADVANCED_4_25");
        assert_eq!(user.skill(), Some(SkillLevel::Advanced4_25));
        assert_eq!(User::new("Fran", "ADVANCED").skill(), None);
        assert_eq!(User::new("Eli", "wizard").skill(), None);
    }
}
