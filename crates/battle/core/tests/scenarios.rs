//! Scenario tests for the combat rules, driven through the public API.

use battle_core::combat::{self, roll_damage};
use battle_core::status::tick_combatant;
use battle_core::{
    Battle, BattleConfig, BattleEvent, BattleRng, BattleSetup, CombatContext, Combatant, CombatantId,
    CombatantSnapshot, ComboTracker, EffectKind, EffectTemplate, Element, ElementTable,
    EnvironmentRule, EventBus, EventRecorder, Hit, Position, ReactionKey, Role, Side, SideMask,
    SkillRegistry, SkillSpec, SkillTarget, StatBlock, StatKey, StatusEffect, TargetingContext,
    ThreatTable, Topic, resolve_target,
};

fn unit(id: u32, side: Side, role: Role, stats: StatBlock) -> Combatant {
    Combatant::new(CombatantId(id), format!("unit-{id}"), side, role, stats)
}

fn attacker_stats() -> StatBlock {
    StatBlock::ZERO
        .with(StatKey::MaxHp, 500.0)
        .with(StatKey::Attack, 50.0)
        .with(StatKey::CritChance, 0.0)
        .with(StatKey::CritDamage, 1.5)
}

fn defender_stats() -> StatBlock {
    StatBlock::ZERO.with(StatKey::MaxHp, 10_000.0)
}

fn rolls(attacker: &Combatant, defender: &Combatant, hit: Hit, combo: f64, n: usize) -> Vec<f64> {
    let config = BattleConfig::default();
    let elements = ElementTable::default();
    let mut rng = BattleRng::new(2024);
    let a = CombatantSnapshot::of(attacker);
    let d = CombatantSnapshot::of(defender);
    (0..n)
        .map(|_| roll_damage(&config, &elements, &mut rng, &a, &d, &hit, combo).amount)
        .collect()
}

// ============================================================================
// Damage pipeline
// ============================================================================

#[test]
fn defense_neutral_hit_lands_in_variance_band() {
    let attacker = unit(0, Side::Ally, Role::Melee, attacker_stats());
    let defender = unit(1, Side::Enemy, Role::Tank, defender_stats());

    for amount in rolls(&attacker, &defender, Hit::physical(100.0), 1.0, 2_000) {
        assert!((85.0..=115.0).contains(&amount), "{amount}");
    }
}

#[test]
fn forced_crit_multiplies_by_crit_damage() {
    let defender = unit(1, Side::Enemy, Role::Tank, defender_stats());

    let doubler = unit(0, Side::Ally, Role::Melee, attacker_stats().with(StatKey::CritDamage, 2.0));
    for amount in rolls(&doubler, &defender, Hit::physical(100.0).crit(), 1.0, 2_000) {
        assert!((170.0..=230.0).contains(&amount), "{amount}");
    }

    let standard = unit(0, Side::Ally, Role::Melee, attacker_stats());
    for amount in rolls(&standard, &defender, Hit::physical(100.0).crit(), 1.0, 2_000) {
        assert!((135.0..=165.0).contains(&amount), "{amount}");
    }
}

#[test]
fn combo_and_advantage_multiply() {
    let attacker = unit(0, Side::Ally, Role::Melee, attacker_stats()).with_element(Element::Fire);
    let defender = unit(1, Side::Enemy, Role::Tank, defender_stats()).with_element(Element::Ice);

    let bus = EventBus::new();
    let mut combo = ComboTracker::default();
    for _ in 0..10 {
        combo.register_hit(attacker.id, defender.id, &bus);
    }
    let combo_multiplier = combo.multiplier_against(attacker.id, defender.id);
    assert!((combo_multiplier - 1.2).abs() < 1e-12);

    let hit = Hit::physical(100.0).with_element(Some(Element::Fire));
    let samples = rolls(&attacker, &defender, hit, combo_multiplier, 4_000);
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;

    // 100 × 1.2 × 1.5 = 180, not 100 × (1 + 0.2 + 0.5) = 170
    assert!((mean - 180.0).abs() < 2.0, "{mean}");
}

#[test]
fn minimum_damage_holds_against_huge_defense() {
    let attacker = unit(0, Side::Ally, Role::Melee, attacker_stats());
    let wall = unit(1, Side::Enemy, Role::Tank, defender_stats().with(StatKey::Defense, f64::MAX));

    for amount in rolls(&attacker, &wall, Hit::physical(100.0), 1.0, 100) {
        assert_eq!(amount, 1.0);
    }
    for amount in rolls(&attacker, &wall, Hit::physical(0.0), 1.0, 100) {
        assert_eq!(amount, 1.0);
    }
}

#[test]
fn reaction_deals_separate_bonus_damage() {
    let bus = EventBus::new();
    let recorder = EventRecorder::attach(&bus);
    let config = BattleConfig::default();
    let elements = ElementTable::default();
    let mut rng = BattleRng::new(5);
    let mut threat = ThreatTable::new();
    let mut ctx = CombatContext {
        config: &config,
        elements: &elements,
        rng: &mut rng,
        combo: None,
        threat: &mut threat,
        bus: &bus,
    };

    let attacker = unit(0, Side::Ally, Role::Ranged, attacker_stats());
    let mut target = unit(1, Side::Enemy, Role::Tank, defender_stats());
    // fire+light has no reaction; the later ice tag still melts
    target.add_effect(
        StatusEffect::new("glow", EffectKind::Debuff { stat: StatKey::Defense, value: 1.0 }, 5.0)
            .with_element(Element::Light),
    );
    target.add_effect(
        StatusEffect::new("chill", EffectKind::Debuff { stat: StatKey::Speed, value: 1.0 }, 5.0)
            .with_element(Element::Ice),
    );

    let hit = Hit::magical(100.0).with_element(Some(Element::Fire));
    let result = combat::resolve(&mut ctx, &CombatantSnapshot::of(&attacker), &mut target, hit);

    // melt: round(final × (1.5 − 1))
    assert!(result.reaction_bonus > 0.0);
    assert_eq!(result.reaction_bonus, (result.amount * 0.5).round());
    assert_eq!(target.hp(), 10_000.0 - result.amount - result.reaction_bonus);

    let reactions: Vec<_> = recorder
        .events()
        .into_iter()
        .filter_map(|event| match event {
            BattleEvent::ElementReaction { name, key, .. } => Some((name, key)),
            _ => None,
        })
        .collect();
    assert_eq!(reactions.len(), 1);
    assert_eq!(reactions[0].0, "melt");
    assert_eq!(Some(reactions[0].1), ReactionKey::new(Element::Ice, Element::Fire));
}

// ============================================================================
// Elements
// ============================================================================

#[test]
fn advantage_is_directional_and_reactions_are_not() {
    let table = ElementTable::default();
    let fire = Some(Element::Fire);
    let ice = Some(Element::Ice);

    assert_eq!(table.multiplier(fire, ice), table.advantage_multiplier());
    assert_eq!(table.multiplier(ice, fire), table.disadvantage_multiplier());
    assert_eq!(table.multiplier(fire, fire), 1.0);
    assert_eq!(table.multiplier(Some(Element::Light), fire), 1.0);
    assert_eq!(table.multiplier(None, ice), 1.0);

    assert_eq!(
        ReactionKey::new(Element::Fire, Element::Ice),
        ReactionKey::new(Element::Ice, Element::Fire)
    );
    assert_eq!(ReactionKey::new(Element::Fire, Element::Fire), None);
}

// ============================================================================
// Combo
// ============================================================================

#[test]
fn combo_multiplier_steps_every_five_hits() {
    let combo = ComboTracker::default();
    let expected = [(0, 1.0), (4, 1.0), (5, 1.1), (9, 1.1), (10, 1.2), (14, 1.2), (15, 1.3), (19, 1.3)];
    for (count, multiplier) in expected {
        assert!((combo.multiplier_for(count) - multiplier).abs() < 1e-12, "{count}");
    }
    for count in 0..100 {
        assert!(combo.multiplier_for(count + 1) >= combo.multiplier_for(count));
    }
}

#[test]
fn switching_target_breaks_only_live_streaks() {
    let bus = EventBus::new();
    let recorder = EventRecorder::attach(&bus);
    let mut combo = ComboTracker::default();
    let (a, b, c) = (CombatantId(0), CombatantId(1), CombatantId(2));

    combo.register_hit(a, b, &bus);
    assert_eq!(recorder.count(Topic::ComboBroken), 0);

    combo.register_hit(a, b, &bus);
    combo.register_hit(a, c, &bus);
    assert_eq!(recorder.count(Topic::ComboBroken), 1);
    assert_eq!(combo.count(a), 1);
}

// ============================================================================
// Targeting
// ============================================================================

#[test]
fn healer_picks_the_most_wounded_ally_or_nothing() {
    let hp = StatBlock::ZERO.with(StatKey::MaxHp, 500.0);
    let healer = unit(0, Side::Ally, Role::Healer, hp);
    let config = BattleConfig::default();
    let elements = ElementTable::default();
    let threat = ThreatTable::new();
    let ctx = TargetingContext {
        config: &config,
        elements: &elements,
        threat: &threat,
    };

    let roster = vec![
        healer.clone(),
        unit(1, Side::Ally, Role::Tank, hp).with_hp(400.0),
        unit(2, Side::Ally, Role::Melee, hp).with_hp(100.0),
        unit(3, Side::Enemy, Role::Melee, hp).with_hp(50.0),
    ];
    assert_eq!(resolve_target(&roster[0], &roster, &ctx), Some(CombatantId(2)));

    let healthy = vec![
        healer,
        unit(1, Side::Ally, Role::Tank, hp).with_hp(450.0),
        unit(2, Side::Ally, Role::Melee, hp).with_hp(480.0),
        unit(3, Side::Enemy, Role::Melee, hp).with_hp(50.0),
    ];
    assert_eq!(resolve_target(&healthy[0], &healthy, &ctx), None);
}

#[test]
fn taunt_overrides_role_scoring() {
    let stats = StatBlock::ZERO.with(StatKey::MaxHp, 500.0);
    let config = BattleConfig::default();
    let elements = ElementTable::default();
    let threat = ThreatTable::new();
    let ctx = TargetingContext {
        config: &config,
        elements: &elements,
        threat: &threat,
    };

    let mut striker = unit(0, Side::Enemy, Role::Melee, stats);
    striker.add_effect(StatusEffect::new("provoke", EffectKind::Taunt, 3.0).with_source(CombatantId(1)));
    let roster = vec![
        striker,
        unit(1, Side::Ally, Role::Tank, stats).with_position(Position::new(9.0, 0.0)),
        unit(2, Side::Ally, Role::Ranged, stats).with_hp(10.0),
    ];
    assert_eq!(resolve_target(&roster[0], &roster, &ctx), Some(CombatantId(1)));
}

// ============================================================================
// Status ticks
// ============================================================================

#[test]
fn taunt_expiry_clears_taunt_source_in_the_same_tick() {
    let bus = EventBus::new();
    let recorder = EventRecorder::attach(&bus);
    let config = BattleConfig::default();
    let elements = ElementTable::default();
    let mut rng = BattleRng::new(1);
    let mut threat = ThreatTable::new();
    let mut ctx = CombatContext {
        config: &config,
        elements: &elements,
        rng: &mut rng,
        combo: None,
        threat: &mut threat,
        bus: &bus,
    };

    let mut holder = unit(0, Side::Enemy, Role::Melee, defender_stats());
    holder.add_effect(StatusEffect::new("provoke", EffectKind::Taunt, 1.0).with_source(CombatantId(7)));
    assert_eq!(holder.taunted_by, Some(CombatantId(7)));

    tick_combatant(&mut ctx, &mut holder, 0.5);
    assert_eq!(holder.taunted_by, Some(CombatantId(7)));

    tick_combatant(&mut ctx, &mut holder, 0.5);
    assert!(holder.effects.is_empty());
    assert_eq!(holder.taunted_by, None);
    assert_eq!(recorder.count(Topic::StatusExpired), 1);
}

#[test]
fn dot_fires_once_per_crossed_boundary() {
    let bus = EventBus::new();
    let recorder = EventRecorder::attach(&bus);
    let config = BattleConfig::default();
    let elements = ElementTable::default();
    let mut rng = BattleRng::new(1);
    let mut threat = ThreatTable::new();
    let mut ctx = CombatContext {
        config: &config,
        elements: &elements,
        rng: &mut rng,
        combo: None,
        threat: &mut threat,
        bus: &bus,
    };

    let mut victim = unit(0, Side::Enemy, Role::Melee, defender_stats());
    victim.add_effect(StatusEffect::new(
        "burn",
        EffectKind::Dot {
            damage: 10.0,
            interval: 1.0,
        },
        4.0,
    ));

    // 4.0 → 3.0 in quarter steps: only 4.0 → 3.75 crosses a boundary
    for _ in 0..4 {
        tick_combatant(&mut ctx, &mut victim, 0.25);
    }
    assert_eq!(victim.hp(), 9_990.0);

    // 3.0 → 0.5 crosses three boundaries and still fires once
    tick_combatant(&mut ctx, &mut victim, 2.5);
    assert_eq!(victim.hp(), 9_980.0);
    assert_eq!(recorder.count(Topic::DamageApplied), 2);
}

// ============================================================================
// Full ticks
// ============================================================================

fn idle_stats(hp: f64) -> StatBlock {
    StatBlock::ZERO
        .with(StatKey::MaxHp, hp)
        .with(StatKey::AttackSpeed, 1.0)
        .with(StatKey::AttackRange, 1.5)
        .with(StatKey::CritDamage, 1.5)
}

/// Two units too far apart and too slow to ever engage.
fn standoff(ally: Combatant) -> Vec<Combatant> {
    vec![
        ally,
        unit(1, Side::Enemy, Role::Tank, idle_stats(1_000.0)).with_position(Position::new(50.0, 0.0)),
    ]
}

#[test]
fn heal_over_time_lands_through_battle_ticks() {
    let mut ally = unit(0, Side::Ally, Role::Melee, idle_stats(500.0)).with_hp(200.0);
    ally.add_effect(StatusEffect::new(
        "renewal",
        EffectKind::Hot {
            heal: 10.0,
            interval: 1.0,
        },
        3.0,
    ));
    let mut battle = Battle::new(BattleSetup::new(standoff(ally), SkillRegistry::new(), 1));
    let recorder = EventRecorder::attach(battle.bus());

    for _ in 0..6 {
        battle.tick(0.5);
    }

    assert_eq!(recorder.count(Topic::HealApplied), 3);
    assert_eq!(recorder.count(Topic::StatusExpired), 1);
    assert_eq!(battle.combatant(CombatantId(0)).unwrap().hp(), 230.0);
}

#[test]
fn environment_rules_fire_on_their_interval() {
    let ally = unit(0, Side::Ally, Role::Melee, idle_stats(500.0)).with_hp(100.0);
    let setup = BattleSetup::new(standoff(ally), SkillRegistry::new(), 1).with_environment([
        EnvironmentRule::HealingPulse {
            interval: 2.0,
            percent: 0.1,
            scope: SideMask::ALLIES,
        },
        EnvironmentRule::GroundDamage {
            interval: 1.0,
            damage: 5.0,
            threshold: 0.1,
            scope: SideMask::ENEMIES,
        },
    ]);
    let mut battle = Battle::new(setup);
    let recorder = EventRecorder::attach(battle.bus());

    for _ in 0..3 {
        battle.tick(0.5);
    }
    assert_eq!(battle.combatant(CombatantId(0)).unwrap().hp(), 100.0);
    assert_eq!(battle.combatant(CombatantId(1)).unwrap().hp(), 995.0);

    battle.tick(0.5);
    assert_eq!(battle.combatant(CombatantId(0)).unwrap().hp(), 150.0);
    assert_eq!(battle.combatant(CombatantId(1)).unwrap().hp(), 990.0);

    // ground damage is sourceless
    let sources: Vec<_> = recorder
        .events()
        .into_iter()
        .filter_map(|event| match event {
            BattleEvent::DamageApplied { source, .. } => Some(source),
            _ => None,
        })
        .collect();
    assert_eq!(sources, [None, None]);
}

#[test]
fn skill_applied_element_reacts_with_later_hits() {
    let frostbite = SkillSpec::new("frostbite", SkillTarget::SingleEnemy, 100.0)
        .with_element(Element::Ice)
        .with_effect(EffectTemplate::new(
            "frostbite",
            EffectKind::Debuff {
                stat: StatKey::Speed,
                value: 0.5,
            },
            10.0,
        ));
    let skills = SkillRegistry::from_specs([frostbite]).unwrap();
    let frostbite = skills.lookup("frostbite").unwrap();

    let caster_stats = attacker_stats()
        .with(StatKey::AttackSpeed, 1.0)
        .with(StatKey::AttackRange, 1.5);
    let mut caster = unit(0, Side::Ally, Role::Melee, caster_stats).with_element(Element::Fire);
    caster.learn(frostbite);
    let target =
        unit(1, Side::Enemy, Role::Tank, idle_stats(10_000.0)).with_position(Position::new(1.0, 0.0));

    let mut battle = Battle::new(BattleSetup::new(vec![caster, target], skills, 4));
    let recorder = EventRecorder::attach(battle.bus());

    battle.tick(0.1);
    assert_eq!(recorder.count(Topic::SkillUsed), 1);
    assert_eq!(recorder.count(Topic::ElementReaction), 0);
    let target = battle.combatant(CombatantId(1)).unwrap();
    assert!(target.effects.iter().any(|effect| effect.element == Some(Element::Ice)));

    // first fire-tagged basic attack lands once the one second swing timer fills
    for _ in 0..14 {
        battle.tick(0.1);
    }
    let melts: Vec<_> = recorder
        .events()
        .into_iter()
        .filter_map(|event| match event {
            BattleEvent::ElementReaction { source, name, .. } => Some((source, name)),
            _ => None,
        })
        .collect();
    assert!(!melts.is_empty());
    assert!(melts.iter().all(|(source, name)| *source == Some(CombatantId(0)) && name == "melt"));
}
