use crate::combatant::{Combatant, CombatantId};
use crate::element::Element;
use crate::events::{BattleEvent, EventBus};

use super::damage::{roll_damage, sanitize_amount};
use super::result::{DamageResult, DamageType, Hit};
use super::{CombatContext, CombatantSnapshot};

/// Resolves one hit from `attacker` against `target` and applies it.
///
/// Registers a combo hit and threat, then checks for an elemental reaction
/// against the target's existing effects. A matched reaction deals
/// `round(final × (multiplier − 1))` as a second application and may attach
/// its effect. Publishes damage, reaction, status and death events.
///
/// A dead target takes nothing; the returned record still carries the roll.
pub fn resolve(
    ctx: &mut CombatContext<'_>,
    attacker: &CombatantSnapshot,
    target: &mut Combatant,
    hit: Hit,
) -> DamageResult {
    let defender = CombatantSnapshot::of(target);
    let combo_multiplier = ctx
        .combo
        .as_deref()
        .map_or(1.0, |combo| combo.multiplier_against(attacker.id, target.id));
    let roll = roll_damage(
        ctx.config,
        ctx.elements,
        &mut *ctx.rng,
        attacker,
        &defender,
        &hit,
        combo_multiplier,
    );

    let mut result = DamageResult {
        raw: roll.raw,
        amount: roll.amount,
        crit: roll.crit,
        heal: false,
        damage_type: hit.damage_type,
        element: roll.element,
        reaction_bonus: 0.0,
        killed: false,
    };

    if !target.is_alive() {
        tracing::trace!(attacker = %attacker.id, target = %target.id, "hit on dead target ignored");
        return result;
    }

    let primary = target.lose_hp(roll.amount);
    if let Some(combo) = ctx.combo.as_deref_mut() {
        combo.register_hit(attacker.id, target.id, ctx.bus);
    }
    ctx.threat.register(attacker.id, target.id, roll.amount);
    result.killed = primary.killed;

    let elements = ctx.elements;
    let matched = roll
        .element
        .filter(|_| target.is_alive())
        .and_then(|element| {
            target
                .effects
                .foreign_elements(element)
                .find_map(|existing| elements.reaction(element, existing))
        });

    let mut reaction_events = Vec::new();
    if let Some((key, reaction)) = matched {
        let bonus = (roll.amount * (reaction.multiplier - 1.0)).round().max(0.0);
        if bonus > 0.0 {
            let loss = target.lose_hp(bonus);
            ctx.threat.register(attacker.id, target.id, bonus);
            result.killed |= loss.killed;
        }
        result.reaction_bonus = bonus;
        tracing::debug!(
            attacker = %attacker.id,
            target = %target.id,
            reaction = %reaction.name,
            bonus,
            "elemental reaction"
        );
        reaction_events.push(BattleEvent::ElementReaction {
            source: Some(attacker.id),
            target: target.id,
            name: reaction.name.clone(),
            key,
            bonus,
        });

        if let Some(template) = &reaction.effect
            && target.is_alive()
        {
            let effect = template.instantiate(Some(attacker.id), None);
            reaction_events.push(BattleEvent::StatusApplied {
                target: target.id,
                effect: effect.name.clone(),
                source: Some(attacker.id),
            });
            target.add_effect(effect);
        }
    }

    ctx.bus.publish(BattleEvent::DamageApplied {
        source: Some(attacker.id),
        target: target.id,
        result: result.clone(),
    });
    for event in reaction_events {
        ctx.bus.publish(event);
    }
    if result.killed {
        publish_fall(ctx.bus, Some(attacker.id), target);
    }
    result
}

/// Heals `target` by `amount`, clamped to its missing HP.
///
/// Dead targets heal for 0. `HealApplied` is published only for non-zero
/// healing.
pub fn heal(
    bus: &EventBus,
    source: Option<CombatantId>,
    target: &mut Combatant,
    amount: f64,
) -> DamageResult {
    let raw = sanitize_amount(amount);
    let healed = target.heal(raw);
    if healed > 0.0 {
        bus.publish(BattleEvent::HealApplied {
            source,
            target: target.id,
            amount: healed,
        });
    }
    DamageResult::heal(raw, healed)
}

/// Applies damage outside the hit pipeline (periodic effects, environment).
///
/// No mitigation, crit, variance or combo. The amount is rounded and floored
/// at 1 when positive. Threat and kill credit go to `source` when known.
pub fn apply_direct(
    ctx: &mut CombatContext<'_>,
    source: Option<CombatantId>,
    target: &mut Combatant,
    amount: f64,
    element: Option<Element>,
) -> DamageResult {
    let raw = sanitize_amount(amount);
    let mut result = DamageResult {
        raw,
        amount: 0.0,
        crit: false,
        heal: false,
        damage_type: DamageType::Pure,
        element,
        reaction_bonus: 0.0,
        killed: false,
    };
    if raw <= 0.0 || !target.is_alive() {
        return result;
    }

    result.amount = raw.round().max(1.0);
    result.killed = target.lose_hp(result.amount).killed;
    if let Some(source) = source {
        ctx.threat.register(source, target.id, result.amount);
    }

    ctx.bus.publish(BattleEvent::DamageApplied {
        source,
        target: target.id,
        result: result.clone(),
    });
    if result.killed {
        publish_fall(ctx.bus, source, target);
    }
    result
}

/// Publishes `Kill` (when a killer is known) and `Death` for a fallen unit.
fn publish_fall(bus: &EventBus, killer: Option<CombatantId>, victim: &Combatant) {
    tracing::debug!(victim = %victim.id, killer = ?killer, "combatant fell");
    if let Some(killer) = killer {
        bus.publish(BattleEvent::Kill {
            killer,
            victim: victim.id,
        });
    }
    bus.publish(BattleEvent::Death {
        victim: victim.id,
        side: victim.side,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{Role, Side};
    use crate::combo::ComboTracker;
    use crate::config::BattleConfig;
    use crate::element::ElementTable;
    use crate::events::{EventRecorder, Topic};
    use crate::rng::BattleRng;
    use crate::stats::{StatBlock, StatKey};
    use crate::status::{EffectKind, StatusEffect};
    use crate::threat::ThreatTable;

    struct Fixture {
        config: BattleConfig,
        elements: ElementTable,
        rng: BattleRng,
        combo: ComboTracker,
        threat: ThreatTable,
        bus: EventBus,
    }

    impl Fixture {
        fn new() -> Self {
            let config = BattleConfig::default();
            Self {
                combo: ComboTracker::new(&config),
                config,
                elements: ElementTable::default(),
                rng: BattleRng::new(7),
                threat: ThreatTable::new(),
                bus: EventBus::new(),
            }
        }

        fn ctx(&mut self) -> CombatContext<'_> {
            CombatContext {
                config: &self.config,
                elements: &self.elements,
                rng: &mut self.rng,
                combo: Some(&mut self.combo),
                threat: &mut self.threat,
                bus: &self.bus,
            }
        }
    }

    fn unit(id: u32, side: Side, hp: f64) -> Combatant {
        Combatant::new(
            CombatantId(id),
            format!("u{id}"),
            side,
            Role::Melee,
            StatBlock::ZERO
                .with(StatKey::MaxHp, hp)
                .with(StatKey::Attack, 50.0)
                .with(StatKey::CritDamage, 1.5),
        )
    }

    #[test]
    fn kill_fires_exactly_once() {
        let mut fx = Fixture::new();
        let recorder = EventRecorder::attach(&fx.bus);
        let attacker = CombatantSnapshot::of(&unit(0, Side::Ally, 100.0));
        let mut target = unit(1, Side::Enemy, 50.0);

        let first = resolve(&mut fx.ctx(), &attacker, &mut target, Hit::physical(100.0));
        let second = resolve(&mut fx.ctx(), &attacker, &mut target, Hit::physical(100.0));

        assert!(first.killed);
        assert!(!second.killed);
        assert_eq!(recorder.count(Topic::Kill), 1);
        assert_eq!(recorder.count(Topic::Death), 1);
        assert_eq!(recorder.count(Topic::DamageApplied), 1);
    }

    #[test]
    fn hits_feed_combo_and_threat() {
        let mut fx = Fixture::new();
        let attacker = CombatantSnapshot::of(&unit(0, Side::Ally, 100.0));
        let mut target = unit(1, Side::Enemy, 10_000.0);

        let mut dealt = 0.0;
        for _ in 0..3 {
            dealt += resolve(&mut fx.ctx(), &attacker, &mut target, Hit::physical(10.0)).amount;
        }
        assert_eq!(fx.combo.count(CombatantId(0)), 3);
        assert_eq!(fx.threat.threat(CombatantId(1), CombatantId(0)), dealt);
    }

    #[test]
    fn reaction_adds_bonus_and_effect() {
        let mut fx = Fixture::new();
        let recorder = EventRecorder::attach(&fx.bus);
        let attacker = CombatantSnapshot::of(&unit(0, Side::Ally, 100.0));
        let mut target = unit(1, Side::Enemy, 10_000.0);
        target.add_effect(
            StatusEffect::new("chill", EffectKind::Stun, 5.0).with_element(Element::Ice),
        );

        let result = resolve(
            &mut fx.ctx(),
            &attacker,
            &mut target,
            Hit::physical(100.0).with_element(Some(Element::Lightning)),
        );

        // superconduct: ×1.2 → bonus = round(final × 0.2), plus a defense debuff
        assert_eq!(result.reaction_bonus, (result.amount * 0.2).round());
        assert_eq!(target.hp(), 10_000.0 - result.total());
        assert_eq!(recorder.count(Topic::ElementReaction), 1);
        assert!(target.effects.iter().any(|e| e.name == "superconduct"));
    }

    #[test]
    fn same_element_does_not_react() {
        let mut fx = Fixture::new();
        let attacker = CombatantSnapshot::of(&unit(0, Side::Ally, 100.0));
        let mut target = unit(1, Side::Enemy, 10_000.0);
        target.add_effect(
            StatusEffect::new("burn", EffectKind::Stun, 5.0).with_element(Element::Fire),
        );

        let result = resolve(
            &mut fx.ctx(),
            &attacker,
            &mut target,
            Hit::physical(100.0).with_element(Some(Element::Fire)),
        );
        assert_eq!(result.reaction_bonus, 0.0);
    }

    #[test]
    fn heal_publishes_only_when_nonzero() {
        let fx = Fixture::new();
        let recorder = EventRecorder::attach(&fx.bus);
        let mut target = unit(1, Side::Ally, 500.0).with_hp(400.0);

        assert_eq!(heal(&fx.bus, None, &mut target, 250.0).amount, 100.0);
        assert_eq!(heal(&fx.bus, None, &mut target, 250.0).amount, 0.0);
        assert_eq!(recorder.count(Topic::HealApplied), 1);
    }

    #[test]
    fn direct_damage_credits_source() {
        let mut fx = Fixture::new();
        let recorder = EventRecorder::attach(&fx.bus);
        let mut target = unit(1, Side::Enemy, 5.0);

        let result = apply_direct(&mut fx.ctx(), Some(CombatantId(0)), &mut target, 7.6, None);
        assert_eq!(result.amount, 8.0);
        assert!(result.killed);
        assert_eq!(recorder.count(Topic::Kill), 1);
    }

    #[test]
    fn sourceless_direct_damage_reports_death_only() {
        let mut fx = Fixture::new();
        let recorder = EventRecorder::attach(&fx.bus);
        let mut target = unit(1, Side::Enemy, 5.0);

        apply_direct(&mut fx.ctx(), None, &mut target, 10.0, None);
        assert_eq!(recorder.count(Topic::Kill), 0);
        assert_eq!(recorder.count(Topic::Death), 1);
    }
}
