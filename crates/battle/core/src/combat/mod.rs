//! Damage and healing resolution.
//!
//! # Architecture
//!
//! - **damage**: the pure numeric pipeline ([`roll_damage`])
//! - **apply**: applies a roll to a target, feeds combo/threat, publishes events
//! - **result**: [`Hit`] inputs and immutable [`DamageResult`] records
//!
//! The attacker is captured as a [`CombatantSnapshot`] before the target is
//! borrowed mutably, so both can live in the same roster.

mod apply;
mod damage;
mod result;

pub use apply::{apply_direct, heal, resolve};
pub use damage::{DamageRoll, mitigation_factor, roll_damage, sanitize_amount};
pub use result::{DamageResult, DamageType, Hit};

use crate::combatant::{Combatant, CombatantId, Side};
use crate::combo::ComboTracker;
use crate::config::BattleConfig;
use crate::element::{Element, ElementTable};
use crate::events::EventBus;
use crate::rng::BattleRng;
use crate::stats::StatBlock;
use crate::threat::ThreatTable;

/// Frozen view of a combatant for the duration of one resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombatantSnapshot {
    pub id: CombatantId,
    pub side: Side,
    pub element: Option<Element>,
    /// Effective stats at capture time.
    pub stats: StatBlock,
}

impl CombatantSnapshot {
    pub fn of(combatant: &Combatant) -> Self {
        Self {
            id: combatant.id,
            side: combatant.side,
            element: combatant.element,
            stats: combatant.stats(),
        }
    }
}

/// Everything one resolution call reads or feeds.
pub struct CombatContext<'a> {
    pub config: &'a BattleConfig,
    pub elements: &'a ElementTable,
    pub rng: &'a mut BattleRng,
    /// Streak tracking is optional; without it the combo multiplier is 1.
    pub combo: Option<&'a mut ComboTracker>,
    pub threat: &'a mut ThreatTable,
    pub bus: &'a EventBus,
}
