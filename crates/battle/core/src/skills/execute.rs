//! Readiness checks, target resolution and skill execution.

use crate::combat::{self, CombatContext, CombatantSnapshot, Hit};
use crate::combatant::{Combatant, CombatantId};
use crate::events::BattleEvent;

use super::{SkillDef, SkillTarget};

/// Effective range of `def` for `caster`.
pub fn skill_range(caster: &Combatant, def: &SkillDef) -> f64 {
    def.range.unwrap_or_else(|| caster.stats().attack_range)
}

/// Units `def` would hit if `caster` used it now.
///
/// `preferred` redirects single-target skills when it names a valid unit
/// (right side, alive, in range); otherwise the default pick applies:
/// the current target for enemy skills, and for ally skills the current
/// target if it is an ally, else the most wounded ally in range.
pub fn resolve_skill_targets(
    caster: &Combatant,
    def: &SkillDef,
    roster: &[Combatant],
    preferred: Option<CombatantId>,
) -> Vec<CombatantId> {
    if !caster.is_alive() {
        return Vec::new();
    }
    let range = skill_range(caster, def);
    let valid = |unit: &Combatant, enemy: bool| {
        unit.is_alive()
            && (unit.side != caster.side) == enemy
            && caster.distance_to(unit) <= range
    };
    let explicit = |enemy: bool| {
        [preferred, caster.target]
            .into_iter()
            .flatten()
            .filter_map(|id| roster.iter().find(|unit| unit.id == id))
            .find(|&unit| valid(unit, enemy))
    };

    match def.target {
        SkillTarget::SelfOnly => vec![caster.id],
        SkillTarget::SingleEnemy => explicit(true).map(|unit| vec![unit.id]).unwrap_or_default(),
        SkillTarget::SingleAlly => {
            let pick = explicit(false).or_else(|| {
                roster
                    .iter()
                    .filter(|&unit| valid(unit, false))
                    .fold(None, |best: Option<&Combatant>, unit| match best {
                        Some(b) if b.hp_ratio() <= unit.hp_ratio() => Some(b),
                        _ => Some(unit),
                    })
            });
            pick.map(|unit| vec![unit.id]).unwrap_or_default()
        }
        SkillTarget::AllEnemies => roster
            .iter()
            .filter(|&unit| valid(unit, true))
            .map(|unit| unit.id)
            .collect(),
        SkillTarget::AllAllies => roster
            .iter()
            .filter(|&unit| valid(unit, false))
            .map(|unit| unit.id)
            .collect(),
    }
}

/// True when the cooldown is spent and the target type is satisfiable.
pub fn is_ready(caster: &Combatant, def: &SkillDef, roster: &[Combatant]) -> bool {
    caster.cooldown(def.id) <= 0.0 && !resolve_skill_targets(caster, def, roster, None).is_empty()
}

/// Executes `def` for the caster at `caster_index`.
///
/// Puts the skill on cooldown, routes the scaled amount through the damage
/// pipeline (positive) or healing (negative) for every resolved target, then
/// attaches the skill's effect to each target still alive. A zero amount
/// skips routing but still attaches effects. Returns the targets, or `None`
/// when nothing could be targeted (no cooldown is consumed then).
pub fn execute_skill(
    ctx: &mut CombatContext<'_>,
    roster: &mut [Combatant],
    caster_index: usize,
    def: &SkillDef,
    preferred: Option<CombatantId>,
) -> Option<Vec<CombatantId>> {
    let caster = roster.get(caster_index)?;
    if !caster.is_alive() || caster.is_stunned() {
        return None;
    }
    let targets = resolve_skill_targets(caster, def, roster, preferred);
    if targets.is_empty() {
        return None;
    }

    let snapshot = CombatantSnapshot::of(caster);
    let amount = def.amount(&snapshot.stats);
    let element = def.element.or(snapshot.element);
    roster[caster_index].cooldowns.insert(def.id, def.cooldown);

    tracing::debug!(
        caster = %snapshot.id,
        skill = %def.name,
        amount,
        targets = ?targets,
        "skill used"
    );

    for target_id in &targets {
        let Some(target) = roster.iter_mut().find(|unit| unit.id == *target_id) else {
            continue;
        };
        if amount > 0.0 {
            let hit = Hit::new(amount, def.damage_type).with_element(element);
            combat::resolve(ctx, &snapshot, target, hit);
        } else if amount < 0.0 {
            combat::heal(ctx.bus, Some(snapshot.id), target, -amount);
        }

        if let Some(template) = &def.effect
            && target.is_alive()
        {
            let effect = template.instantiate(Some(snapshot.id), element);
            ctx.bus.publish(BattleEvent::StatusApplied {
                target: target.id,
                effect: effect.name.clone(),
                source: Some(snapshot.id),
            });
            target.add_effect(effect);
        }
    }

    ctx.bus.publish(BattleEvent::SkillUsed {
        caster: snapshot.id,
        skill: def.id,
        targets: targets.clone(),
    });
    Some(targets)
}
