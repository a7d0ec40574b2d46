//! One combatant's share of a tick: stun handling, targeting, skills, then
//! the basic action (move, attack or heal).

use crate::combat::{self, CombatContext, CombatantSnapshot, Hit};
use crate::combatant::Combatant;
use crate::events::{BattleEvent, EventBus};
use crate::skills::{SkillQueue, SkillRegistry, execute_skill, is_ready};
use crate::targeting::{TargetingContext, resolve_target};

use super::field;

/// Living roster indices, fastest effective speed first, ties in roster order.
pub(super) fn action_order(roster: &[Combatant]) -> Vec<usize> {
    let mut order: Vec<(usize, f64)> = roster
        .iter()
        .enumerate()
        .filter(|(_, unit)| unit.is_alive())
        .map(|(index, unit)| (index, unit.stats().speed))
        .collect();
    order.sort_by(|a, b| b.1.total_cmp(&a.1));
    order.into_iter().map(|(index, _)| index).collect()
}

pub(super) fn act(
    ctx: &mut CombatContext<'_>,
    roster: &mut [Combatant],
    skills: &SkillRegistry,
    queue: &mut SkillQueue,
    index: usize,
    dt: f64,
) {
    if !roster[index].is_alive() {
        return;
    }
    if roster[index].is_stunned() {
        interrupt(ctx.bus, roster, skills, queue, index);
        return;
    }
    roster[index].interrupt_reported = false;

    let targeting = TargetingContext {
        config: ctx.config,
        elements: ctx.elements,
        threat: &*ctx.threat,
    };
    let target = resolve_target(&roster[index], roster, &targeting);
    roster[index].target = target;

    if roster[index].player_controlled {
        queued_skills(ctx, roster, skills, queue, index, dt);
    } else {
        auto_skill(ctx, roster, skills, index);
    }

    basic_action(ctx, roster, index, dt);
}

/// Reports skills a stun is holding back.
///
/// Player-controlled units lose their queued entries, each reported. Ready
/// skills that never reached the queue (auto mode offers and fires in the
/// same tick) are reported once per stun, for player and AI units alike.
/// Cooldowns are untouched, so the skills are offered again once the stun
/// ends.
fn interrupt(
    bus: &EventBus,
    roster: &mut [Combatant],
    skills: &SkillRegistry,
    queue: &mut SkillQueue,
    index: usize,
) {
    let view: &[Combatant] = roster;
    let caster = &view[index];
    let id = caster.id;

    let drained = if caster.player_controlled {
        queue.drain_caster(id)
    } else {
        Vec::new()
    };
    let held: Vec<_> = if caster.interrupt_reported {
        Vec::new()
    } else {
        caster
            .skills
            .iter()
            .copied()
            .filter(|skill| !drained.contains(skill))
            .filter(|&skill| skills.get(skill).is_some_and(|def| is_ready(caster, def, view)))
            .collect()
    };
    if drained.is_empty() && held.is_empty() {
        return;
    }

    for skill in drained.into_iter().chain(held) {
        tracing::debug!(caster = %id, %skill, "skill interrupted");
        bus.publish(BattleEvent::SkillInterrupted { caster: id, skill });
    }
    roster[index].interrupt_reported = true;
}

/// Offers ready skills to the queue and fires whatever the queue mode says is due.
fn queued_skills(
    ctx: &mut CombatContext<'_>,
    roster: &mut [Combatant],
    skills: &SkillRegistry,
    queue: &mut SkillQueue,
    index: usize,
    dt: f64,
) {
    let id = roster[index].id;
    for skill in roster[index].skills.clone() {
        if let Some(def) = skills.get(skill)
            && is_ready(&roster[index], def, roster)
        {
            queue.offer(id, skill, ctx.bus);
        }
    }

    for skill in queue.due(id, dt) {
        let Some(def) = skills.get(skill) else {
            queue.remove(id, skill);
            continue;
        };
        // A due entry with no target stays queued and is retried next tick.
        if execute_skill(ctx, roster, index, def, None).is_some() {
            queue.remove(id, skill);
        }
    }
}

/// AI units fire their first ready skill, at most one per tick.
fn auto_skill(ctx: &mut CombatContext<'_>, roster: &mut [Combatant], skills: &SkillRegistry, index: usize) {
    let view: &[Combatant] = roster;
    let caster = &view[index];
    let ready = caster
        .skills
        .iter()
        .filter_map(|&skill| skills.get(skill))
        .find(|def| is_ready(caster, def, view));
    if let Some(def) = ready {
        execute_skill(ctx, roster, index, def, None);
    }
}

fn basic_action(ctx: &mut CombatContext<'_>, roster: &mut [Combatant], index: usize, dt: f64) {
    let Some(target_id) = roster[index].target else {
        return;
    };
    let Some(target_index) = roster
        .iter()
        .position(|unit| unit.id == target_id && unit.is_alive())
    else {
        return;
    };

    let stats = roster[index].stats();
    let goal = roster[target_index].position;
    if roster[index].position.distance(&goal) > stats.attack_range {
        field::approach(&mut roster[index], goal, stats.attack_range, stats.speed, dt);
        return;
    }

    let interval = 1.0 / stats.attack_speed;
    let unit = &mut roster[index];
    unit.attack_timer += dt;
    if unit.attack_timer < interval {
        return;
    }
    unit.attack_timer = (unit.attack_timer - interval).min(interval);

    let snapshot = CombatantSnapshot::of(&roster[index]);
    let target = &mut roster[target_index];
    if target.side == snapshot.side {
        combat::heal(ctx.bus, Some(snapshot.id), target, snapshot.stats.magic_power);
    } else {
        let hit = Hit::physical(snapshot.stats.attack).with_element(snapshot.element);
        combat::resolve(ctx, &snapshot, target, hit);
    }
}
