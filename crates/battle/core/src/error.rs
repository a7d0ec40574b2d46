//! Common error infrastructure for battle-core.
//!
//! The simulation itself is total: ticking, targeting and damage never fail.
//! Errors only exist at the content boundary, where loosely typed data is
//! turned into validated registries and rosters before a battle starts.
//!
//! # Design Principles
//!
//! - **Reject early**: malformed entries fail at load time, never at use time
//! - **Rich Context**: errors name the offending entry
//! - **Severity Classification**: errors are categorized for reporting

use crate::combatant::CombatantId;
use crate::element::Element;
use crate::skills::SkillId;

/// Severity level of an error, used for categorization and reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Invalid input data, should be fixed in the content source.
    Validation,

    /// Unexpected state inconsistency; indicates a bug.
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }
}

/// Common trait for all battle-core errors.
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str;
}

/// Errors raised while building a validated registry (skills, elements).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate entry `{0}`")]
    Duplicate(String),

    #[error("entry `{entry}`: field `{field}` must be finite, got {value}")]
    NotFinite {
        entry: String,
        field: &'static str,
        value: f64,
    },

    #[error("entry `{entry}`: field `{field}` is out of range ({value}): {expected}")]
    OutOfRange {
        entry: String,
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("reaction `{0}` pairs an element with itself")]
    SelfReaction(Element),

    #[error("registry is full ({0} entries)")]
    Capacity(usize),
}

impl RegistryError {
    /// Checks that `value` is finite and satisfies `valid`.
    pub(crate) fn check(
        entry: &str,
        field: &'static str,
        value: f64,
        valid: impl Fn(f64) -> bool,
        expected: &'static str,
    ) -> Result<f64, Self> {
        if !value.is_finite() {
            return Err(Self::NotFinite {
                entry: entry.to_owned(),
                field,
                value,
            });
        }
        if !valid(value) {
            return Err(Self::OutOfRange {
                entry: entry.to_owned(),
                field,
                value,
                expected,
            });
        }
        Ok(value)
    }
}

impl BattleError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Capacity(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Duplicate(_) => "REGISTRY_DUPLICATE",
            Self::NotFinite { .. } => "REGISTRY_NOT_FINITE",
            Self::OutOfRange { .. } => "REGISTRY_OUT_OF_RANGE",
            Self::SelfReaction(_) => "REGISTRY_SELF_REACTION",
            Self::Capacity(_) => "REGISTRY_CAPACITY",
        }
    }
}

/// Errors raised while assembling the two rosters of an encounter.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RosterError {
    #[error("unknown unit template `{0}`")]
    UnknownTemplate(String),

    #[error("unit `{unit}` has invalid stats: {source}")]
    InvalidStats {
        unit: String,
        #[source]
        source: RegistryError,
    },

    #[error("roster for the {0} side is empty")]
    EmptySide(&'static str),
}

impl BattleError for RosterError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTemplate(_) => "ROSTER_UNKNOWN_TEMPLATE",
            Self::InvalidStats { .. } => "ROSTER_INVALID_STATS",
            Self::EmptySide(_) => "ROSTER_EMPTY_SIDE",
        }
    }
}

/// Rejections of caller commands issued against a running battle.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("battle has already ended")]
    BattleEnded,

    #[error("no combatant {0}")]
    UnknownCombatant(CombatantId),

    #[error("combatant {0} is not alive")]
    Dead(CombatantId),

    #[error("combatant {0} is stunned")]
    Stunned(CombatantId),

    #[error("combatant {0} is not player-controlled")]
    NotPlayerControlled(CombatantId),

    #[error("combatant {caster} does not know {skill}")]
    SkillNotLearned { caster: CombatantId, skill: SkillId },

    #[error("{skill} is on cooldown")]
    OnCooldown { skill: SkillId },

    #[error("{skill} has no valid target")]
    NoTarget { skill: SkillId },
}

impl BattleError for CommandError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::BattleEnded => "COMMAND_BATTLE_ENDED",
            Self::UnknownCombatant(_) => "COMMAND_UNKNOWN_COMBATANT",
            Self::Dead(_) => "COMMAND_DEAD",
            Self::Stunned(_) => "COMMAND_STUNNED",
            Self::NotPlayerControlled(_) => "COMMAND_NOT_PLAYER_CONTROLLED",
            Self::SkillNotLearned { .. } => "COMMAND_SKILL_NOT_LEARNED",
            Self::OnCooldown { .. } => "COMMAND_ON_COOLDOWN",
            Self::NoTarget { .. } => "COMMAND_NO_TARGET",
        }
    }
}
