//! Payloads carried by the battle event feed.

use crate::battle::BattleState;
use crate::combat::DamageResult;
use crate::combatant::{CombatantId, Side};
use crate::combo::BreakReason;
use crate::element::ReactionKey;
use crate::skills::SkillId;

/// Routing key of a [`BattleEvent`]; one payload shape per topic.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Topic {
    DamageApplied,
    HealApplied,
    Kill,
    Death,
    ComboHit,
    ComboBroken,
    ElementReaction,
    SkillReady,
    SkillUsed,
    SkillInterrupted,
    StatusApplied,
    StatusExpired,
    BattleEnded,
}

/// Structured record published by the simulation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    /// A hit landed. `source` is `None` for environmental damage.
    DamageApplied {
        source: Option<CombatantId>,
        target: CombatantId,
        result: DamageResult,
    },

    /// Non-zero healing landed; `amount` is what was actually restored.
    HealApplied {
        source: Option<CombatantId>,
        target: CombatantId,
        amount: f64,
    },

    Kill {
        killer: CombatantId,
        victim: CombatantId,
    },

    Death {
        victim: CombatantId,
        side: Side,
    },

    ComboHit {
        attacker: CombatantId,
        target: CombatantId,
        count: u32,
        multiplier: f64,
    },

    ComboBroken {
        attacker: CombatantId,
        target: CombatantId,
        count: u32,
        reason: BreakReason,
    },

    ElementReaction {
        source: Option<CombatantId>,
        target: CombatantId,
        name: String,
        key: ReactionKey,
        bonus: f64,
    },

    SkillReady {
        caster: CombatantId,
        skill: SkillId,
    },

    SkillUsed {
        caster: CombatantId,
        skill: SkillId,
        targets: Vec<CombatantId>,
    },

    SkillInterrupted {
        caster: CombatantId,
        skill: SkillId,
    },

    StatusApplied {
        target: CombatantId,
        effect: String,
        source: Option<CombatantId>,
    },

    StatusExpired {
        target: CombatantId,
        effect: String,
    },

    BattleEnded {
        state: BattleState,
        elapsed: f64,
    },
}

impl BattleEvent {
    pub fn topic(&self) -> Topic {
        match self {
            BattleEvent::DamageApplied { .. } => Topic::DamageApplied,
            BattleEvent::HealApplied { .. } => Topic::HealApplied,
            BattleEvent::Kill { .. } => Topic::Kill,
            BattleEvent::Death { .. } => Topic::Death,
            BattleEvent::ComboHit { .. } => Topic::ComboHit,
            BattleEvent::ComboBroken { .. } => Topic::ComboBroken,
            BattleEvent::ElementReaction { .. } => Topic::ElementReaction,
            BattleEvent::SkillReady { .. } => Topic::SkillReady,
            BattleEvent::SkillUsed { .. } => Topic::SkillUsed,
            BattleEvent::SkillInterrupted { .. } => Topic::SkillInterrupted,
            BattleEvent::StatusApplied { .. } => Topic::StatusApplied,
            BattleEvent::StatusExpired { .. } => Topic::StatusExpired,
            BattleEvent::BattleEnded { .. } => Topic::BattleEnded,
        }
    }
}
