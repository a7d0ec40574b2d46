//! Per-tick evaluation of every combatant's effect ledger.

use crate::combat::{self, CombatContext};
use crate::combatant::Combatant;
use crate::events::BattleEvent;

use super::effect::EffectKind;
use super::ledger::{LedgerTick, PeriodicKind};

/// Advances one combatant's ledger by `dt` and applies what fired.
///
/// Periodic damage goes through [`combat::apply_direct`] credited to the
/// effect's source; periodic healing through [`combat::heal`]. Expired
/// effects are reported, a lapsed taunt clears the holder's taunt-source, and
/// HP is re-clamped to the (possibly lower) effective max.
pub fn tick_combatant(ctx: &mut CombatContext<'_>, combatant: &mut Combatant, dt: f64) -> LedgerTick {
    if !combatant.is_alive() {
        return LedgerTick::default();
    }

    let tick = combatant.effects.advance(dt);

    for periodic in &tick.periodic {
        if !combatant.is_alive() {
            break;
        }
        let amount = f64::from(periodic.amount);
        match periodic.kind {
            PeriodicKind::Damage => {
                tracing::trace!(target = %combatant.id, effect = %periodic.effect, amount, "dot");
                combat::apply_direct(ctx, periodic.source, combatant, amount, periodic.element);
            }
            PeriodicKind::Heal => {
                tracing::trace!(target = %combatant.id, effect = %periodic.effect, amount, "hot");
                combat::heal(ctx.bus, periodic.source, combatant, amount);
            }
        }
    }

    for effect in &tick.expired {
        ctx.bus.publish(BattleEvent::StatusExpired {
            target: combatant.id,
            effect: effect.name.clone(),
        });
    }

    if tick.taunt_expired() {
        combatant.taunted_by = combatant
            .effects
            .iter()
            .filter(|effect| matches!(effect.kind, EffectKind::Taunt))
            .find_map(|effect| effect.source);
    }
    if !tick.expired.is_empty() {
        combatant.clamp_hp();
    }
    tick
}

/// Advances every living combatant in roster order.
pub fn tick_all(ctx: &mut CombatContext<'_>, roster: &mut [Combatant], dt: f64) {
    for combatant in roster.iter_mut() {
        tick_combatant(ctx, combatant, dt);
    }
}
