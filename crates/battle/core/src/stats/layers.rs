//! Effective stat fold.
//!
//! Effective stats are never stored. They are recomputed on demand by
//! folding three layers in a fixed order; each layer sees the output of the
//! previous one:
//!
//! ```text
//! [ Base + Equipment (Layer 1) ]
//!      ↓
//! [ Status deltas    (Layer 2) ]  buffs add, debuffs subtract, by stat key
//!      ↓
//! [ Synergy percent  (Layer 3) ]  ×(1 + pct), then clamp
//! ```
//!
//! The fold is a pure function of its inputs: the same ledger state always
//! yields the same effective stats.

use super::block::{StatBlock, StatKey};

/// A signed adjustment to one stat contributed by an active status effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatDelta {
    pub stat: StatKey,
    pub value: f64,
}

/// Trait for stat layers that follow the Base -> Bonuses -> Final pattern.
pub trait StatLayer {
    type Bonuses: ?Sized;

    fn compute(base: &StatBlock, bonuses: &Self::Bonuses) -> StatBlock;
}

/// Layer 1: raw template stats plus equipment.
pub struct EquipmentLayer;

impl StatLayer for EquipmentLayer {
    type Bonuses = StatBlock;

    fn compute(base: &StatBlock, bonuses: &StatBlock) -> StatBlock {
        base.plus(bonuses)
    }
}

/// Layer 2: buff/debuff deltas from the status ledger.
pub struct EffectLayer;

impl StatLayer for EffectLayer {
    type Bonuses = [StatDelta];

    fn compute(base: &StatBlock, bonuses: &[StatDelta]) -> StatBlock {
        bonuses.iter().fold(*base, |mut acc, delta| {
            acc.add(delta.stat, delta.value);
            acc
        })
    }
}

/// Layer 3: synergy percentages, followed by final clamping.
pub struct SynergyLayer;

impl SynergyLayer {
    const MIN_MAX_HP: f64 = 1.0;
    const MIN_CRIT_DAMAGE: f64 = 1.0;
    const MIN_ATTACK_SPEED: f64 = 0.05;

    fn clamp(mut stats: StatBlock) -> StatBlock {
        for key in <StatKey as strum::IntoEnumIterator>::iter() {
            let value = stats.get_mut(key);
            if !value.is_finite() {
                *value = 0.0;
            }
            *value = value.max(0.0);
        }
        stats.max_hp = stats.max_hp.max(Self::MIN_MAX_HP);
        stats.crit_chance = stats.crit_chance.min(1.0);
        stats.crit_damage = stats.crit_damage.max(Self::MIN_CRIT_DAMAGE);
        stats.attack_speed = stats.attack_speed.max(Self::MIN_ATTACK_SPEED);
        stats
    }
}

impl StatLayer for SynergyLayer {
    type Bonuses = StatBlock;

    fn compute(base: &StatBlock, percents: &StatBlock) -> StatBlock {
        let mut out = *base;
        for key in <StatKey as strum::IntoEnumIterator>::iter() {
            let pct = percents.get(key);
            if pct != 0.0 {
                *out.get_mut(key) *= 1.0 + pct;
            }
        }
        Self::clamp(out)
    }
}

/// Runs the full three-layer fold.
pub fn effective_stats(
    base: &StatBlock,
    equipment: &StatBlock,
    deltas: &[StatDelta],
    synergy: &StatBlock,
) -> StatBlock {
    let equipped = EquipmentLayer::compute(base, equipment);
    let affected = EffectLayer::compute(&equipped, deltas);
    SynergyLayer::compute(&affected, synergy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> StatBlock {
        StatBlock {
            max_hp: 500.0,
            attack: 50.0,
            defense: 20.0,
            attack_speed: 1.0,
            attack_range: 1.5,
            crit_chance: 0.1,
            crit_damage: 1.5,
            ..StatBlock::ZERO
        }
    }

    #[test]
    fn layers_apply_in_order() {
        let equipment = StatBlock::ZERO.with(StatKey::Attack, 10.0);
        let deltas = [StatDelta {
            stat: StatKey::Attack,
            value: 20.0,
        }];
        let synergy = StatBlock::ZERO.with(StatKey::Attack, 0.5);

        let stats = effective_stats(&base(), &equipment, &deltas, &synergy);

        // (50 + 10 + 20) × 1.5: synergy sees the buffed value
        assert_eq!(stats.attack, 120.0);
    }

    #[test]
    fn fold_is_idempotent() {
        let deltas = [StatDelta {
            stat: StatKey::Defense,
            value: -5.0,
        }];
        let first = effective_stats(&base(), &StatBlock::ZERO, &deltas, &StatBlock::ZERO);
        let second = effective_stats(&base(), &StatBlock::ZERO, &deltas, &StatBlock::ZERO);
        assert_eq!(first, second);
    }

    #[test]
    fn debuffs_never_push_stats_negative() {
        let deltas = [
            StatDelta {
                stat: StatKey::Defense,
                value: -100.0,
            },
            StatDelta {
                stat: StatKey::MaxHp,
                value: -1000.0,
            },
            StatDelta {
                stat: StatKey::CritChance,
                value: 5.0,
            },
        ];
        let stats = effective_stats(&base(), &StatBlock::ZERO, &deltas, &StatBlock::ZERO);

        assert_eq!(stats.defense, 0.0);
        assert_eq!(stats.max_hp, 1.0);
        assert_eq!(stats.crit_chance, 1.0);
    }
}
