//! Damage formula.

use crate::config::BattleConfig;
use crate::element::{Element, ElementTable};
use crate::rng::RandomSource;

use super::CombatantSnapshot;
use super::result::{DamageType, Hit};

/// Outcome of the numeric pipeline, before anything is applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageRoll {
    pub raw: f64,
    pub amount: f64,
    pub crit: bool,
    pub element: Option<Element>,
}

/// Clamps malformed inputs (negative, NaN, infinite) to zero.
pub fn sanitize_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

/// Fraction of damage that survives mitigation.
///
/// # Formula
///
/// ```text
/// factor = K / (K + max(0, defense))
/// ```
///
/// Smooth diminishing returns; never negative, never divides by zero for a
/// positive `K`.
pub fn mitigation_factor(k: f64, defense: f64) -> f64 {
    let defense = defense.max(0.0);
    if defense.is_infinite() {
        return 0.0;
    }
    k / (k + defense)
}

/// Runs the damage pipeline.
///
/// # Formula
///
/// ```text
/// d = base
/// d *= mitigation_factor(K, defending stat)     (skipped for Pure)
/// d *= crit_damage                              if forced or rolled
/// d *= element multiplier
/// d *= combo multiplier
/// d *= 1 + uniform(−variance, +variance)
/// final = max(1, round(d))
/// ```
pub fn roll_damage(
    config: &BattleConfig,
    elements: &ElementTable,
    rng: &mut impl RandomSource,
    attacker: &CombatantSnapshot,
    defender: &CombatantSnapshot,
    hit: &Hit,
    combo_multiplier: f64,
) -> DamageRoll {
    let raw = sanitize_amount(hit.base);
    let mut damage = raw;

    match hit.damage_type {
        DamageType::Physical => {
            damage *= mitigation_factor(config.mitigation_constant, defender.stats.defense);
        }
        DamageType::Magical => {
            damage *= mitigation_factor(config.mitigation_constant, defender.stats.magic_resist);
        }
        DamageType::Pure => {}
    }

    let crit = hit.force_crit || rng.chance(attacker.stats.crit_chance);
    if crit {
        damage *= attacker.stats.crit_damage;
    }

    let element = hit.element.or(attacker.element);
    damage *= elements.multiplier(element, defender.element);
    damage *= combo_multiplier;
    damage *= 1.0 + rng.float_range(-config.variance, config.variance);

    DamageRoll {
        raw,
        amount: damage.round().max(1.0),
        crit,
        element,
    }
}
