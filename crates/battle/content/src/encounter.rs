//! Encounter definitions.

use std::collections::BTreeMap;

use battle_core::{
    Combatant, EnvironmentArchetype, EnvironmentRule, Placement, RegistryError, RosterBuilder,
    RosterError, SkillRegistry, SynergyRule, UnitTemplate,
};

/// One fight: who stands where, and which environment rules run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterSpec {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub archetype: EnvironmentArchetype,
    /// Extra rules on top of the archetype's own.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rules: Vec<EnvironmentRule>,
    pub allies: Vec<Placement>,
    pub enemies: Vec<Placement>,
}

impl EncounterSpec {
    /// Archetype rules followed by the encounter's extra rules.
    pub fn environment(&self) -> Vec<EnvironmentRule> {
        let mut rules = self.archetype.rules();
        rules.extend(self.rules.iter().copied());
        rules
    }

    pub fn validate(&self) -> Result<(), RegistryError> {
        self.rules.iter().try_for_each(EnvironmentRule::validate)
    }

    pub fn build_roster(
        &self,
        units: &BTreeMap<String, UnitTemplate>,
        skills: &SkillRegistry,
        synergies: &[SynergyRule],
    ) -> Result<Vec<Combatant>, RosterError> {
        RosterBuilder::new(units, skills, synergies).build(&self.allies, &self.enemies)
    }
}
