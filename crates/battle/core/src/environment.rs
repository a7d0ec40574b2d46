//! Encounter-wide periodic rules that run independently of combatant turns.

use bitflags::bitflags;

use crate::combat::{self, CombatContext};
use crate::combatant::{Combatant, Side};
use crate::error::RegistryError;
use crate::events::BattleEvent;
use crate::stats::StatKey;
use crate::status::{EffectKind, StatusEffect};

bitflags! {
    /// Which sides an environmental rule affects.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SideMask: u8 {
        const ALLIES  = 1 << 0;
        const ENEMIES = 1 << 1;
    }
}

impl SideMask {
    pub fn includes(self, side: Side) -> bool {
        match side {
            Side::Ally => self.contains(Self::ALLIES),
            Side::Enemy => self.contains(Self::ENEMIES),
        }
    }
}

impl Default for SideMask {
    fn default() -> Self {
        Self::all()
    }
}

/// One periodic rule.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EnvironmentRule {
    /// Heals every living unit in scope by `percent` of its max HP.
    HealingPulse {
        interval: f64,
        percent: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        scope: SideMask,
    },

    /// Pure, sourceless damage to units that moved no more than `threshold`
    /// since the previous check.
    GroundDamage {
        interval: f64,
        damage: f64,
        threshold: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        scope: SideMask,
    },

    /// Attack-range debuff, sized so effective range never drops below `floor`.
    RangeDebuff {
        interval: f64,
        amount: f64,
        floor: f64,
        duration: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        scope: SideMask,
    },
}

impl EnvironmentRule {
    pub const fn interval(&self) -> f64 {
        match self {
            Self::HealingPulse { interval, .. }
            | Self::GroundDamage { interval, .. }
            | Self::RangeDebuff { interval, .. } => *interval,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::HealingPulse { .. } => "healing_pulse",
            Self::GroundDamage { .. } => "ground_damage",
            Self::RangeDebuff { .. } => "range_debuff",
        }
    }

    pub fn validate(&self) -> Result<(), RegistryError> {
        let entry = self.name();
        RegistryError::check(entry, "interval", self.interval(), |v| v > 0.0, "> 0")?;
        match *self {
            Self::HealingPulse { percent, .. } => {
                RegistryError::check(entry, "percent", percent, |v| (0.0..=1.0).contains(&v), "in [0, 1]")?;
            }
            Self::GroundDamage {
                damage, threshold, ..
            } => {
                RegistryError::check(entry, "damage", damage, |v| v >= 0.0, ">= 0")?;
                RegistryError::check(entry, "threshold", threshold, |v| v >= 0.0, ">= 0")?;
            }
            Self::RangeDebuff {
                amount,
                floor,
                duration,
                ..
            } => {
                RegistryError::check(entry, "amount", amount, |v| v >= 0.0, ">= 0")?;
                RegistryError::check(entry, "floor", floor, |v| v >= 0.0, ">= 0")?;
                RegistryError::check(entry, "duration", duration, |v| v > 0.0, "> 0")?;
            }
        }
        Ok(())
    }
}

/// Built-in encounter flavours.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EnvironmentArchetype {
    #[default]
    Neutral,
    Sanctuary,
    Volcanic,
    Stormfront,
}

impl EnvironmentArchetype {
    pub fn rules(self) -> Vec<EnvironmentRule> {
        match self {
            Self::Neutral => Vec::new(),
            Self::Sanctuary => vec![EnvironmentRule::HealingPulse {
                interval: 5.0,
                percent: 0.05,
                scope: SideMask::all(),
            }],
            Self::Volcanic => vec![EnvironmentRule::GroundDamage {
                interval: 3.0,
                damage: 15.0,
                threshold: 0.5,
                scope: SideMask::all(),
            }],
            Self::Stormfront => vec![EnvironmentRule::RangeDebuff {
                interval: 6.0,
                amount: 1.0,
                floor: 1.0,
                duration: 4.0,
                scope: SideMask::all(),
            }],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct ActiveRule {
    rule: EnvironmentRule,
    elapsed: f64,
}

/// Runs a rule set against the full roster.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnvironmentEngine {
    rules: Vec<ActiveRule>,
}

impl EnvironmentEngine {
    pub fn new(rules: impl IntoIterator<Item = EnvironmentRule>) -> Self {
        Self {
            rules: rules
                .into_iter()
                .map(|rule| ActiveRule { rule, elapsed: 0.0 })
                .collect(),
        }
    }

    pub fn from_archetype(archetype: EnvironmentArchetype) -> Self {
        Self::new(archetype.rules())
    }

    pub fn rules(&self) -> impl Iterator<Item = &EnvironmentRule> {
        self.rules.iter().map(|active| &active.rule)
    }

    /// Accumulates `dt` per rule and fires each rule once per full interval.
    pub fn update(&mut self, ctx: &mut CombatContext<'_>, roster: &mut [Combatant], dt: f64) {
        for active in &mut self.rules {
            let interval = active.rule.interval();
            if !(interval > 0.0) {
                continue;
            }
            active.elapsed += dt;
            while active.elapsed >= interval {
                active.elapsed -= interval;
                tracing::trace!(rule = active.rule.name(), "environment rule fired");
                fire(&active.rule, ctx, roster);
            }
        }
    }
}

fn fire(rule: &EnvironmentRule, ctx: &mut CombatContext<'_>, roster: &mut [Combatant]) {
    match *rule {
        EnvironmentRule::HealingPulse { percent, scope, .. } => {
            for unit in roster.iter_mut().filter(|u| u.is_alive() && scope.includes(u.side)) {
                let amount = unit.max_hp() * percent;
                combat::heal(ctx.bus, None, unit, amount);
            }
        }
        EnvironmentRule::GroundDamage {
            damage,
            threshold,
            scope,
            ..
        } => {
            for unit in roster.iter_mut().filter(|u| u.is_alive() && scope.includes(u.side)) {
                let moved = unit.position.distance(&unit.anchor);
                unit.anchor = unit.position;
                if moved <= threshold {
                    combat::apply_direct(ctx, None, unit, damage, None);
                }
            }
        }
        EnvironmentRule::RangeDebuff {
            amount,
            floor,
            duration,
            scope,
            ..
        } => {
            for unit in roster.iter_mut().filter(|u| u.is_alive() && scope.includes(u.side)) {
                let headroom = unit.stats().attack_range - floor;
                let value = amount.min(headroom);
                if value <= 0.0 {
                    continue;
                }
                let effect = StatusEffect::new(
                    "range_debuff",
                    EffectKind::Debuff {
                        stat: StatKey::AttackRange,
                        value,
                    },
                    duration,
                );
                ctx.bus.publish(BattleEvent::StatusApplied {
                    target: unit.id,
                    effect: effect.name.clone(),
                    source: None,
                });
                unit.add_effect(effect);
            }
        }
    }
}
