//! Turning unit templates into the two rosters of an encounter.

use std::collections::BTreeMap;

use crate::combatant::{Combatant, CombatantId, Position, Reward, Role, Side};
use crate::element::Element;
use crate::error::{RegistryError, RosterError};
use crate::skills::SkillRegistry;
use crate::stats::{StatBlock, StatKey};

/// Content form of a unit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitTemplate {
    pub name: String,
    pub role: Role,
    #[cfg_attr(feature = "serde", serde(default))]
    pub element: Option<Element>,
    pub stats: StatBlock,
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment: StatBlock,
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub reward: Reward,
}

/// Where a template enters the field.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub template: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub position: Position,
    #[cfg_attr(feature = "serde", serde(default))]
    pub player_controlled: bool,
}

impl Placement {
    pub fn new(template: impl Into<String>, position: Position) -> Self {
        Self {
            template: template.into(),
            position,
            player_controlled: false,
        }
    }

    pub fn player_controlled(mut self) -> Self {
        self.player_controlled = true;
        self
    }
}

/// Percentage bonus granted to a whole side when it fields enough of a role.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SynergyRule {
    pub role: Role,
    pub min_count: u32,
    pub stat: StatKey,
    /// 0.10 = +10%.
    pub percent: f64,
}

impl SynergyRule {
    pub fn validate(&self) -> Result<(), RegistryError> {
        let entry = format!("{} synergy", self.role);
        RegistryError::check(&entry, "percent", self.percent, |v| v > -1.0, "> -1")?;
        if self.min_count == 0 {
            return Err(RegistryError::OutOfRange {
                entry,
                field: "min_count",
                value: 0.0,
                expected: ">= 1",
            });
        }
        Ok(())
    }
}

/// Accumulates every satisfied synergy into each living unit of that side.
pub fn apply_synergies(roster: &mut [Combatant], rules: &[SynergyRule]) {
    for side in [Side::Ally, Side::Enemy] {
        let mut counts: BTreeMap<Role, u32> = BTreeMap::new();
        for unit in roster.iter().filter(|u| u.side == side && u.is_alive()) {
            *counts.entry(unit.role).or_default() += 1;
        }

        for rule in rules {
            let count = counts.get(&rule.role).copied().unwrap_or(0);
            if count < rule.min_count {
                continue;
            }
            tracing::debug!(%side, role = %rule.role, stat = %rule.stat, percent = rule.percent, "synergy active");
            for unit in roster.iter_mut().filter(|u| u.side == side && u.is_alive()) {
                unit.synergy.add(rule.stat, rule.percent);
            }
        }
    }
}

/// Builds both rosters with sequential ids (allies first).
#[derive(Debug)]
pub struct RosterBuilder<'a> {
    templates: &'a BTreeMap<String, UnitTemplate>,
    skills: &'a SkillRegistry,
    synergies: &'a [SynergyRule],
}

impl<'a> RosterBuilder<'a> {
    pub fn new(
        templates: &'a BTreeMap<String, UnitTemplate>,
        skills: &'a SkillRegistry,
        synergies: &'a [SynergyRule],
    ) -> Self {
        Self {
            templates,
            skills,
            synergies,
        }
    }

    pub fn build(&self, allies: &[Placement], enemies: &[Placement]) -> Result<Vec<Combatant>, RosterError> {
        if allies.is_empty() {
            return Err(RosterError::EmptySide("ally"));
        }
        if enemies.is_empty() {
            return Err(RosterError::EmptySide("enemy"));
        }

        let mut roster = Vec::with_capacity(allies.len() + enemies.len());
        let placements = allies
            .iter()
            .map(|p| (Side::Ally, p))
            .chain(enemies.iter().map(|p| (Side::Enemy, p)));
        for (index, (side, placement)) in placements.enumerate() {
            let id = CombatantId(index as u32);
            roster.push(self.instantiate(id, side, placement)?);
        }

        apply_synergies(&mut roster, self.synergies);
        for unit in &mut roster {
            let max = unit.max_hp();
            unit.set_hp(max);
        }
        tracing::info!(units = roster.len(), "roster built");
        Ok(roster)
    }

    fn instantiate(&self, id: CombatantId, side: Side, placement: &Placement) -> Result<Combatant, RosterError> {
        let template = self
            .templates
            .get(&placement.template)
            .ok_or_else(|| RosterError::UnknownTemplate(placement.template.clone()))?;

        for block in [&template.stats, &template.equipment] {
            if let Some((key, value)) = block.first_non_finite() {
                return Err(RosterError::InvalidStats {
                    unit: template.name.clone(),
                    source: RegistryError::NotFinite {
                        entry: template.name.clone(),
                        field: key.into(),
                        value,
                    },
                });
            }
        }

        let mut unit = Combatant::new(id, template.name.clone(), side, template.role, template.stats)
            .with_equipment(template.equipment)
            .with_position(placement.position)
            .with_reward(template.reward);
        unit.element = template.element;
        unit.player_controlled = placement.player_controlled;

        for name in &template.skills {
            let Some(skill) = self.skills.lookup(name) else {
                tracing::warn!(unit = %template.name, skill = %name, "unknown skill dropped");
                continue;
            };
            if !unit.learn(skill) {
                tracing::warn!(unit = %template.name, skill = %name, "loadout full, skill dropped");
            }
        }
        Ok(unit)
    }
}
