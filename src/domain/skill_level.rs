//! Ordered skill-level enumeration.
//!
//! Skill tiers follow the rating ladder from 2.0 (beginner) to 5.5 (pro)
//! with fractional sub-tiers. The declaration order of [`SkillLevel`]
//! *is* the ordering used for eligibility bounds, so comparisons are
//! plain `Ord` comparisons.
//!
//! Stored skill values are free-form strings (user profiles and legacy
//! event rows predate the current ladder). [`SkillLevel::resolve`] turns
//! such a string into a tier, also accepting the four coarse legacy names
//! that were migrated onto the ladder.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A skill tier on the rating ladder, ordered lowest to highest.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum SkillLevel {
    /// 2.0
    #[serde(rename = "BEGINNER_2_0")]
    Beginner2_0,
    /// 2.25
    #[serde(rename = "BEGINNER_2_25")]
    Beginner2_25,
    /// 2.5
    #[serde(rename = "BEGINNER_2_5")]
    Beginner2_5,
    /// 2.75
    #[serde(rename = "RISING_BEGINNER_2_75")]
    RisingBeginner2_75,
    /// 3.0
    #[serde(rename = "LOW_INTERMEDIATE_3_0")]
    LowIntermediate3_0,
    /// 3.25
    #[serde(rename = "INTERMEDIATE_3_25")]
    Intermediate3_25,
    /// 3.5
    #[serde(rename = "INTERMEDIATE_3_5")]
    Intermediate3_5,
    /// 3.75
    #[serde(rename = "RISING_INTERMEDIATE_3_75")]
    RisingIntermediate3_75,
    /// 4.0
    #[serde(rename = "LOW_ADVANCED_4_0")]
    LowAdvanced4_0,
    /// 4.25
    #[serde(rename = "ADVANCED_4_25")]
    Advanced4_25,
    /// 4.5
    #[serde(rename = "ADVANCED_4_5")]
    Advanced4_5,
    /// 4.75
    #[serde(rename = "RISING_ADVANCED_4_75")]
    RisingAdvanced4_75,
    /// 5.0
    #[serde(rename = "TOURNAMENT_5_0")]
    Tournament5_0,
    /// 5.5
    #[serde(rename = "PRO_5_5")]
    Pro5_5,
}

/// Error returned when a string names no known skill tier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized skill level: {0}")]
pub struct UnknownSkillLevel(pub String);

impl SkillLevel {
    /// Every tier, lowest first.
    pub const ALL: [Self; 14] = [
        Self::Beginner2_0,
        Self::Beginner2_25,
        Self::Beginner2_5,
        Self::RisingBeginner2_75,
        Self::LowIntermediate3_0,
        Self::Intermediate3_25,
        Self::Intermediate3_5,
        Self::RisingIntermediate3_75,
        Self::LowAdvanced4_0,
        Self::Advanced4_25,
        Self::Advanced4_5,
        Self::RisingAdvanced4_75,
        Self::Tournament5_0,
        Self::Pro5_5,
    ];

    /// Lowest tier; the implicit lower bound of an event without `min_skill`.
    pub const LOWEST: Self = Self::Beginner2_0;

    /// Highest tier; the implicit upper bound of an event without `max_skill`.
    pub const HIGHEST: Self = Self::Pro5_5;

    /// Canonical stored name (e.g. `"INTERMEDIATE_3_5"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beginner2_0 => "BEGINNER_2_0",
            Self::Beginner2_25 => "BEGINNER_2_25",
            Self::Beginner2_5 => "BEGINNER_2_5",
            Self::RisingBeginner2_75 => "RISING_BEGINNER_2_75",
            Self::LowIntermediate3_0 => "LOW_INTERMEDIATE_3_0",
            Self::Intermediate3_25 => "INTERMEDIATE_3_25",
            Self::Intermediate3_5 => "INTERMEDIATE_3_5",
            Self::RisingIntermediate3_75 => "RISING_INTERMEDIATE_3_75",
            Self::LowAdvanced4_0 => "LOW_ADVANCED_4_0",
            Self::Advanced4_25 => "ADVANCED_4_25",
            Self::Advanced4_5 => "ADVANCED_4_5",
            Self::RisingAdvanced4_75 => "RISING_ADVANCED_4_75",
            Self::Tournament5_0 => "TOURNAMENT_5_0",
            Self::Pro5_5 => "PRO_5_5",
        }
    }

    /// Numeric rating shown to players (e.g. `"3.75"`).
    #[must_use]
    pub const fn rating(self) -> &'static str {
        match self {
            Self::Beginner2_0 => "2.0",
            Self::Beginner2_25 => "2.25",
            Self::Beginner2_5 => "2.5",
            Self::RisingBeginner2_75 => "2.75",
            Self::LowIntermediate3_0 => "3.0",
            Self::Intermediate3_25 => "3.25",
            Self::Intermediate3_5 => "3.5",
            Self::RisingIntermediate3_75 => "3.75",
            Self::LowAdvanced4_0 => "4.0",
            Self::Advanced4_25 => "4.25",
            Self::Advanced4_5 => "4.5",
            Self::RisingAdvanced4_75 => "4.75",
            Self::Tournament5_0 => "5.0",
            Self::Pro5_5 => "5.5",
        }
    }

    /// Zero-based position on the ladder.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Tier at the given ladder position, if any.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Tier whose canonical name is exactly `raw`.
    ///
    /// No trimming and no legacy aliases: this is the lookup the skill gate
    /// uses, so anything else counts as unrecognized.
    #[must_use]
    pub fn from_canonical(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|l| l.as_str() == raw)
    }

    /// Resolves user input, accepting legacy coarse names.
    ///
    /// Used where a value is being written (registration, event bounds) so
    /// that only canonical names reach storage.
    #[must_use]
    pub fn resolve(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Some(level) = Self::from_canonical(raw) {
            return Some(level);
        }
        match raw {
            "BEGINNER" => Some(Self::Beginner2_0),
            "INTERMEDIATE" => Some(Self::Intermediate3_25),
            "ADVANCED" => Some(Self::Advanced4_25),
            "PRO" => Some(Self::Pro5_5),
            _ => None,
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillLevel {
    type Err = UnknownSkillLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s).ok_or_else(|| UnknownSkillLevel(s.to_string()))
    }
}
