//! Per-combatant ordered collection of active status effects.

use crate::combatant::CombatantId;
use crate::element::Element;
use crate::stats::StatDelta;

use super::effect::{EffectKind, StatusEffect};

/// One periodic application produced by [`StatusLedger::advance`].
#[derive(Clone, Debug, PartialEq)]
pub struct PeriodicTick {
    pub effect: String,
    pub kind: PeriodicKind,
    /// Already rounded and floored at 1.
    pub amount: u32,
    pub source: Option<CombatantId>,
    pub element: Option<Element>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeriodicKind {
    Damage,
    Heal,
}

/// Everything that happened to a ledger during one advance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LedgerTick {
    pub periodic: Vec<PeriodicTick>,
    pub expired: Vec<StatusEffect>,
}

impl LedgerTick {
    /// True when a taunt ran out this tick.
    pub fn taunt_expired(&self) -> bool {
        self.expired
            .iter()
            .any(|effect| matches!(effect.kind, EffectKind::Taunt))
    }
}

/// Active effects in application order.
///
/// Effects with the same name coexist independently; there is no merging
/// or stacking logic.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusLedger {
    effects: Vec<StatusEffect>,
}

impl StatusLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: StatusEffect) {
        self.effects.push(effect);
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn is_stunned(&self) -> bool {
        self.effects
            .iter()
            .any(|effect| matches!(effect.kind, EffectKind::Stun))
    }

    pub fn has_taunt(&self) -> bool {
        self.effects
            .iter()
            .any(|effect| matches!(effect.kind, EffectKind::Taunt))
    }

    /// Buff/debuff contributions for the effective stat fold.
    pub fn stat_deltas(&self) -> Vec<StatDelta> {
        self.effects
            .iter()
            .filter_map(|effect| match effect.kind {
                EffectKind::Buff { stat, value } => Some(StatDelta { stat, value }),
                EffectKind::Debuff { stat, value } => Some(StatDelta {
                    stat,
                    value: -value.abs(),
                }),
                _ => None,
            })
            .collect()
    }

    /// Elements of active effects tagged differently from `incoming`, in
    /// application order.
    pub fn foreign_elements(&self, incoming: Element) -> impl Iterator<Item = Element> + '_ {
        self.effects
            .iter()
            .filter_map(|effect| effect.element)
            .filter(move |element| *element != incoming)
    }

    /// Removes every effect with the given name, returning how many were removed.
    ///
    /// Raw removal: no `StatusExpired` is published and the owner's
    /// `taunted_by` is not re-derived. Callers that need either go through
    /// the status engine's expiry path instead.
    pub(crate) fn remove_named(&mut self, name: &str) -> usize {
        let before = self.effects.len();
        self.effects.retain(|effect| effect.name != name);
        before - self.effects.len()
    }

    /// Advances every effect by `dt` seconds.
    ///
    /// A periodic effect fires when its remaining-duration clock crosses a
    /// multiple of its interval: `floor(before / τ) > floor(after / τ)`. At
    /// most one application per effect per call, however large `dt` is.
    /// Effects at or below zero remaining are removed in the same call.
    pub fn advance(&mut self, dt: f64) -> LedgerTick {
        let mut tick = LedgerTick::default();

        for effect in &mut self.effects {
            let before = effect.remaining;
            let after = before - dt;
            effect.remaining = after;

            let (kind, value, interval) = match effect.kind {
                EffectKind::Dot { damage, interval } => (PeriodicKind::Damage, damage, interval),
                EffectKind::Hot { heal, interval } => (PeriodicKind::Heal, heal, interval),
                _ => continue,
            };
            if interval > 0.0 && (before / interval).floor() > (after / interval).floor() {
                tick.periodic.push(PeriodicTick {
                    effect: effect.name.clone(),
                    kind,
                    amount: value.round().max(1.0) as u32,
                    source: effect.source,
                    element: effect.element,
                });
            }
        }

        let (alive, expired): (Vec<_>, Vec<_>) = self
            .effects
            .drain(..)
            .partition(|effect| effect.remaining > 0.0);
        self.effects = alive;
        tick.expired = expired;
        tick
    }
}
