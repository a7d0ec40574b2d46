//! The unit of simulation.
//!
//! A [`Combatant`] stores only persistent state: base stats, current HP, the
//! status ledger, cooldowns and targeting references. Effective stats are
//! folded on demand (see [`crate::stats::effective_stats`]).

mod common;

pub use common::{CombatantId, Position, Reward, Role, Side};

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

use crate::config::BattleConfig;
use crate::element::Element;
use crate::skills::SkillId;
use crate::stats::{StatBlock, effective_stats};
use crate::status::{EffectKind, StatusEffect, StatusLedger};
use crate::targeting::TargetStrategy;

/// Outcome of removing HP from a combatant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HpLoss {
    /// HP actually removed (overkill excluded).
    pub lost: f64,
    /// True only when this call took the combatant from alive to dead.
    pub killed: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub side: Side,
    pub role: Role,
    pub element: Option<Element>,

    pub base: StatBlock,
    pub equipment: StatBlock,
    /// Accumulated synergy percentages, by stat key.
    pub synergy: StatBlock,

    hp: f64,
    alive: bool,

    pub effects: StatusLedger,
    pub skills: ArrayVec<SkillId, { BattleConfig::MAX_SKILLS }>,
    /// Remaining cooldown per skill, floored at zero.
    pub cooldowns: BTreeMap<SkillId, f64>,

    pub target: Option<CombatantId>,
    pub taunted_by: Option<CombatantId>,
    /// Per-combatant targeting override.
    pub strategy: Option<TargetStrategy>,

    pub position: Position,
    /// Position at the last environmental movement check.
    pub anchor: Position,
    /// Seconds accumulated towards the next basic attack.
    pub attack_timer: f64,

    pub player_controlled: bool,
    pub reward: Reward,

    /// Set once a stun interruption has been reported for the current stun.
    pub(crate) interrupt_reported: bool,
}

impl Combatant {
    pub fn new(
        id: CombatantId,
        name: impl Into<String>,
        side: Side,
        role: Role,
        base: StatBlock,
    ) -> Self {
        let hp = base.max_hp.max(1.0);
        Self {
            id,
            name: name.into(),
            side,
            role,
            element: None,
            base,
            equipment: StatBlock::ZERO,
            synergy: StatBlock::ZERO,
            hp,
            alive: true,
            effects: StatusLedger::new(),
            skills: ArrayVec::new(),
            cooldowns: BTreeMap::new(),
            target: None,
            taunted_by: None,
            strategy: None,
            position: Position::ORIGIN,
            anchor: Position::ORIGIN,
            attack_timer: 0.0,
            player_controlled: false,
            reward: Reward::default(),
            interrupt_reported: false,
        }
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = Some(element);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self.anchor = position;
        self
    }

    pub fn with_equipment(mut self, equipment: StatBlock) -> Self {
        self.equipment = equipment;
        self.hp = self.max_hp();
        self
    }

    pub fn with_hp(mut self, hp: f64) -> Self {
        self.set_hp(hp);
        self
    }

    pub fn with_reward(mut self, reward: Reward) -> Self {
        self.reward = reward;
        self
    }

    pub fn player_controlled(mut self) -> Self {
        self.player_controlled = true;
        self
    }

    /// Adds a skill to the loadout; returns false when the loadout is full.
    pub fn learn(&mut self, skill: SkillId) -> bool {
        if self.skills.contains(&skill) {
            return true;
        }
        if self.skills.try_push(skill).is_err() {
            return false;
        }
        self.cooldowns.insert(skill, 0.0);
        true
    }

    /// Folds base, equipment, active effects and synergy.
    pub fn stats(&self) -> StatBlock {
        effective_stats(
            &self.base,
            &self.equipment,
            &self.effects.stat_deltas(),
            &self.synergy,
        )
    }

    pub fn max_hp(&self) -> f64 {
        self.stats().max_hp
    }

    pub fn hp(&self) -> f64 {
        self.hp
    }

    pub fn hp_ratio(&self) -> f64 {
        self.hp / self.max_hp()
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_stunned(&self) -> bool {
        self.effects.is_stunned()
    }

    pub fn distance_to(&self, other: &Combatant) -> f64 {
        self.position.distance(&other.position)
    }

    /// Sets HP directly, clamped to `[0, max]`. Setting zero kills.
    pub fn set_hp(&mut self, hp: f64) {
        let clamped = if hp.is_finite() { hp } else { 0.0 };
        self.hp = clamped.clamp(0.0, self.max_hp());
        if self.hp <= 0.0 {
            self.alive = false;
        }
    }

    /// Re-clamps HP after the effective max changed (e.g. a max HP buff ran out).
    pub fn clamp_hp(&mut self) {
        let max = self.max_hp();
        if self.hp > max {
            self.hp = max;
        }
    }

    /// Removes up to `amount` HP.
    pub fn lose_hp(&mut self, amount: f64) -> HpLoss {
        if !self.alive || !(amount > 0.0) {
            return HpLoss {
                lost: 0.0,
                killed: false,
            };
        }
        let lost = amount.min(self.hp);
        self.hp -= lost;
        let killed = self.hp <= 0.0;
        if killed {
            self.hp = 0.0;
            self.alive = false;
        }
        HpLoss { lost, killed }
    }

    /// Restores HP, clamped to `[0, max − current]`. Dead units heal for 0.
    pub fn heal(&mut self, amount: f64) -> f64 {
        if !self.alive || !(amount > 0.0) {
            return 0.0;
        }
        let healed = amount.min(self.max_hp() - self.hp).max(0.0);
        self.hp += healed;
        healed
    }

    /// Attaches an effect. A taunt records its source as the taunt-source.
    ///
    /// HP is re-clamped, since a max HP debuff lowers the ceiling at once.
    pub fn add_effect(&mut self, effect: StatusEffect) {
        if matches!(effect.kind, EffectKind::Taunt)
            && let Some(source) = effect.source
        {
            self.taunted_by = Some(source);
        }
        self.effects.push(effect);
        self.clamp_hp();
    }

    pub fn cooldown(&self, skill: SkillId) -> f64 {
        self.cooldowns.get(&skill).copied().unwrap_or(0.0)
    }

    /// Decrements every cooldown by `dt`, flooring at zero.
    pub fn tick_cooldowns(&mut self, dt: f64) {
        for remaining in self.cooldowns.values_mut() {
            *remaining = (*remaining - dt).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatKey;

    fn unit(hp: f64) -> Combatant {
        Combatant::new(
            CombatantId(1),
            "squire",
            Side::Ally,
            Role::Melee,
            StatBlock::ZERO.with(StatKey::MaxHp, hp),
        )
    }

    #[test]
    fn heal_clamps_to_missing_hp() {
        let mut c = unit(500.0).with_hp(400.0);
        assert_eq!(c.heal(250.0), 100.0);
        assert_eq!(c.hp(), 500.0);
        assert_eq!(c.heal(10.0), 0.0);
    }

    #[test]
    fn dead_units_heal_for_zero() {
        let mut c = unit(100.0);
        assert!(c.lose_hp(150.0).killed);
        assert_eq!(c.heal(50.0), 0.0);
        assert_eq!(c.hp(), 0.0);
    }

    #[test]
    fn kill_is_reported_only_on_transition() {
        let mut c = unit(10.0);
        assert!(c.lose_hp(10.0).killed);
        let again = c.lose_hp(10.0);
        assert!(!again.killed);
        assert_eq!(again.lost, 0.0);
    }

    #[test]
    fn negative_or_nan_damage_is_ignored() {
        let mut c = unit(10.0);
        assert_eq!(c.lose_hp(-5.0).lost, 0.0);
        assert_eq!(c.lose_hp(f64::NAN).lost, 0.0);
        assert_eq!(c.hp(), 10.0);
    }

    #[test]
    fn taunt_records_source() {
        let mut c = unit(10.0);
        c.add_effect(StatusEffect::new("provoke", EffectKind::Taunt, 2.0).with_source(CombatantId(9)));
        assert_eq!(c.taunted_by, Some(CombatantId(9)));
    }

    #[test]
    fn max_hp_debuff_clamps_current_hp() {
        let mut c = unit(100.0);
        c.add_effect(StatusEffect::new(
            "wither",
            EffectKind::Debuff {
                stat: StatKey::MaxHp,
                value: 50.0,
            },
            5.0,
        ));
        assert_eq!(c.max_hp(), 50.0);
        assert_eq!(c.hp(), 50.0);
        assert!(c.hp_ratio() <= 1.0);
    }

    #[test]
    fn cooldowns_floor_at_zero() {
        let mut c = unit(10.0);
        c.learn(SkillId(0));
        c.cooldowns.insert(SkillId(0), 0.3);
        c.tick_cooldowns(1.0);
        assert_eq!(c.cooldown(SkillId(0)), 0.0);
    }

    #[test]
    fn loadout_is_bounded() {
        let mut c = unit(10.0);
        for i in 0..BattleConfig::MAX_SKILLS as u16 {
            assert!(c.learn(SkillId(i)));
        }
        assert!(!c.learn(SkillId(99)));
    }
}
