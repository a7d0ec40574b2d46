//! Target selection.
//!
//! Evaluated once per acting combatant per tick, in priority order:
//!
//! 1. **Taunt**: a living taunt-source is the target, full stop.
//! 2. **Healer**: the living ally with the lowest HP fraction below the heal
//!    threshold, or nothing.
//! 3. **Strategy override**: a pure pick by the requested [`TargetStrategy`].
//! 4. **Role scoring**: a normalized base score per candidate plus the
//!    elemental-advantage and threat-share bonuses; highest total wins.
//!
//! Ties always resolve to the first candidate in roster order.

use crate::combatant::{Combatant, CombatantId, Role};
use crate::config::BattleConfig;
use crate::element::ElementTable;
use crate::threat::ThreatTable;

/// Explicit targeting override supplied by a caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TargetStrategy {
    /// Advantaged targets first (lowest HP among them), else nearest.
    ElementPriority,
    LowestHp,
    Nearest,
    HighestThreat,
}

/// Base scoring function of the default role-based stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreBasis {
    Nearest,
    LowestHp,
    HighestThreat,
}

impl ScoreBasis {
    pub const fn for_role(role: Role) -> Self {
        match role {
            Role::Tank | Role::Support => Self::Nearest,
            Role::Melee => Self::LowestHp,
            Role::Ranged => Self::HighestThreat,
            Role::Healer => Self::Nearest,
        }
    }
}

/// Read-only inputs for one targeting decision.
#[derive(Clone, Copy, Debug)]
pub struct TargetingContext<'a> {
    pub config: &'a BattleConfig,
    pub elements: &'a ElementTable,
    pub threat: &'a ThreatTable,
}

/// Picks the target for `actor` from `roster`, or `None` when nothing is
/// eligible.
pub fn resolve_target(
    actor: &Combatant,
    roster: &[Combatant],
    ctx: &TargetingContext<'_>,
) -> Option<CombatantId> {
    if !actor.is_alive() {
        return None;
    }

    if let Some(source) = taunt_target(actor, roster) {
        tracing::debug!(actor = %actor.id, target = %source, "taunted");
        return Some(source);
    }

    if actor.role == Role::Healer {
        let pick = heal_target(actor, roster, ctx.config.heal_threshold);
        tracing::debug!(actor = %actor.id, target = ?pick, "heal target");
        return pick;
    }

    let candidates: Vec<&Combatant> = roster
        .iter()
        .filter(|c| c.is_alive() && c.side != actor.side)
        .collect();

    let pick = match actor.strategy {
        Some(strategy) => pick_by_strategy(actor, &candidates, strategy, ctx),
        None => pick_by_score(actor, &candidates, ScoreBasis::for_role(actor.role), ctx),
    };
    tracing::debug!(actor = %actor.id, strategy = ?actor.strategy, target = ?pick, "target selected");
    pick
}

/// The taunt-source, while the actor holds a taunt and the source lives.
pub fn taunt_target(actor: &Combatant, roster: &[Combatant]) -> Option<CombatantId> {
    if !actor.effects.has_taunt() {
        return None;
    }
    let source = actor.taunted_by?;
    roster
        .iter()
        .any(|c| c.id == source && c.is_alive())
        .then_some(source)
}

/// Living ally (self included) with the lowest HP fraction under `threshold`.
pub fn heal_target(actor: &Combatant, roster: &[Combatant], threshold: f64) -> Option<CombatantId> {
    let mut best: Option<(&Combatant, f64)> = None;
    for ally in roster.iter().filter(|c| c.is_alive() && c.side == actor.side) {
        let ratio = ally.hp_ratio();
        if ratio >= threshold {
            continue;
        }
        if best.is_none_or(|(_, best_ratio)| ratio < best_ratio) {
            best = Some((ally, ratio));
        }
    }
    best.map(|(ally, _)| ally.id)
}

/// Pure pick for an explicit strategy.
pub fn pick_by_strategy(
    actor: &Combatant,
    candidates: &[&Combatant],
    strategy: TargetStrategy,
    ctx: &TargetingContext<'_>,
) -> Option<CombatantId> {
    match strategy {
        TargetStrategy::ElementPriority => {
            let advantaged: Vec<&Combatant> = candidates
                .iter()
                .copied()
                .filter(|c| ctx.elements.has_advantage(actor.element, c.element))
                .collect();
            if advantaged.is_empty() {
                best_of(candidates, |c| -actor.distance_to(c))
            } else {
                best_of(&advantaged, |c| -c.hp())
            }
        }
        TargetStrategy::LowestHp => best_of(candidates, |c| -c.hp()),
        TargetStrategy::Nearest => best_of(candidates, |c| -actor.distance_to(c)),
        TargetStrategy::HighestThreat => best_of(candidates, |c| ctx.threat.generated_by(c.id)),
    }
}

/// Default role-based scoring.
///
/// # Formula
///
/// ```text
/// score = base                          ∈ [0, 1]
///       + element_target_bonus          if the actor has advantage
///       + threat_target_bonus × share   share = threat[actor][c] / Σ threat[actor]
/// ```
pub fn pick_by_score(
    actor: &Combatant,
    candidates: &[&Combatant],
    basis: ScoreBasis,
    ctx: &TargetingContext<'_>,
) -> Option<CombatantId> {
    let max_distance = candidates
        .iter()
        .map(|c| actor.distance_to(c))
        .fold(0.0_f64, f64::max);
    let max_threat = candidates
        .iter()
        .map(|c| ctx.threat.generated_by(c.id))
        .fold(0.0_f64, f64::max);

    best_of(candidates, |c| {
        let base = match basis {
            ScoreBasis::Nearest if max_distance > 0.0 => 1.0 - actor.distance_to(c) / max_distance,
            ScoreBasis::Nearest => 1.0,
            ScoreBasis::LowestHp => 1.0 - c.hp_ratio(),
            ScoreBasis::HighestThreat if max_threat > 0.0 => {
                ctx.threat.generated_by(c.id) / max_threat
            }
            ScoreBasis::HighestThreat => 0.0,
        };
        let element = if ctx.elements.has_advantage(actor.element, c.element) {
            ctx.config.element_target_bonus
        } else {
            0.0
        };
        let threat = ctx.config.threat_target_bonus * ctx.threat.share(actor.id, c.id);
        let score = base + element + threat;
        tracing::trace!(actor = %actor.id, candidate = %c.id, base, element, threat, score);
        score
    })
}

/// Highest score wins; the first candidate wins ties.
fn best_of(candidates: &[&Combatant], score: impl Fn(&Combatant) -> f64) -> Option<CombatantId> {
    let mut best: Option<(CombatantId, f64)> = None;
    for candidate in candidates {
        let value = score(candidate);
        if best.is_none_or(|(_, best_value)| value > best_value) {
            best = Some((candidate.id, value));
        }
    }
    best.map(|(id, _)| id)
}
