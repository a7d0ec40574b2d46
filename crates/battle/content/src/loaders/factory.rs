//! Content factory for building battle setups from data files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use battle_core::{BattleConfig, BattleSetup, ElementTable, SkillRegistry, SynergyRule, UnitTemplate};

use crate::encounter::EncounterSpec;
use crate::loaders::{
    ConfigLoader, ElementLoader, EncounterLoader, LoadResult, SkillLoader, SynergyLoader,
    UnitLoader,
};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── elements.ron
/// ├── skills.ron
/// ├── units.ron
/// ├── synergies.ron
/// └── encounters.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data set bundled with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load battle configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load the element table from `elements.ron`.
    pub fn load_elements(&self) -> LoadResult<ElementTable> {
        ElementLoader::load(&self.data_dir.join("elements.ron"))
    }

    /// Load the skill registry from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<SkillRegistry> {
        SkillLoader::load(&self.data_dir.join("skills.ron"))
    }

    /// Load unit templates from `units.ron`.
    pub fn load_units(&self) -> LoadResult<BTreeMap<String, UnitTemplate>> {
        UnitLoader::load(&self.data_dir.join("units.ron"))
    }

    /// Load role synergies from `synergies.ron`.
    pub fn load_synergies(&self) -> LoadResult<Vec<SynergyRule>> {
        SynergyLoader::load(&self.data_dir.join("synergies.ron"))
    }

    /// Load encounters from `encounters.ron`.
    pub fn load_encounters(&self) -> LoadResult<BTreeMap<String, EncounterSpec>> {
        EncounterLoader::load(&self.data_dir.join("encounters.ron"))
    }

    /// Loads every file and cross-checks encounters against the unit catalog.
    pub fn load_all(&self) -> LoadResult<ContentSet> {
        let content = ContentSet {
            config: self.load_config()?,
            elements: self.load_elements()?,
            skills: self.load_skills()?,
            units: self.load_units()?,
            synergies: self.load_synergies()?,
            encounters: self.load_encounters()?,
        };
        content.check_references()?;

        tracing::info!(
            dir = %self.data_dir.display(),
            skills = content.skills.len(),
            units = content.units.len(),
            encounters = content.encounters.len(),
            "content loaded"
        );
        Ok(content)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Every validated table of one data directory.
#[derive(Clone, Debug)]
pub struct ContentSet {
    pub config: BattleConfig,
    pub elements: ElementTable,
    pub skills: SkillRegistry,
    pub units: BTreeMap<String, UnitTemplate>,
    pub synergies: Vec<SynergyRule>,
    pub encounters: BTreeMap<String, EncounterSpec>,
}

impl ContentSet {
    pub fn encounter(&self, id: &str) -> Option<&EncounterSpec> {
        self.encounters.get(id)
    }

    /// Builds the roster of encounter `id` and packages it for [`battle_core::Battle::new`].
    pub fn setup(&self, id: &str, seed: i32) -> LoadResult<BattleSetup> {
        let encounter = self
            .encounter(id)
            .ok_or_else(|| anyhow::anyhow!("Unknown encounter '{}'", id))?;
        let roster = encounter
            .build_roster(&self.units, &self.skills, &self.synergies)
            .map_err(|e| anyhow::anyhow!("Encounter '{}': {}", id, e))?;

        Ok(BattleSetup::new(roster, self.skills.clone(), seed)
            .with_config(self.config.clone())
            .with_elements(self.elements.clone())
            .with_environment(encounter.environment()))
    }

    /// Rejects encounters that name unknown templates and templates that
    /// name unknown skills.
    pub fn check_references(&self) -> LoadResult<()> {
        for template in self.units.values() {
            if let Some(skill) = template
                .skills
                .iter()
                .find(|skill| self.skills.lookup(skill).is_none())
            {
                anyhow::bail!("Unit '{}' references unknown skill '{}'", template.name, skill);
            }
        }
        for encounter in self.encounters.values() {
            let placements = encounter.allies.iter().chain(&encounter.enemies);
            for placement in placements {
                if !self.units.contains_key(&placement.template) {
                    anyhow::bail!(
                        "Encounter '{}' references unknown unit '{}'",
                        encounter.id,
                        placement.template
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
        assert_eq!(
            factory.data_dir().join("skills.ron"),
            PathBuf::from("/tmp/data/skills.ron")
        );
    }
}
