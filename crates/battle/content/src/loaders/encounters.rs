//! Encounter catalog loader.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::encounter::EncounterSpec;
use crate::loaders::{LoadResult, read_file};

/// Encounter catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterCatalog {
    pub encounters: Vec<EncounterSpec>,
}

/// Loader for encounters from RON files.
pub struct EncounterLoader;

impl EncounterLoader {
    /// Load encounters keyed by id.
    ///
    /// Template names are checked against the unit catalog when a roster is
    /// built, not here.
    pub fn load(path: &Path) -> LoadResult<BTreeMap<String, EncounterSpec>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BTreeMap<String, EncounterSpec>> {
        let catalog: EncounterCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounter catalog RON: {}", e))?;

        let mut encounters = BTreeMap::new();
        for encounter in catalog.encounters {
            encounter
                .validate()
                .map_err(|e| anyhow::anyhow!("Encounter '{}': {}", encounter.id, e))?;
            if encounter.allies.is_empty() || encounter.enemies.is_empty() {
                anyhow::bail!("Encounter '{}' needs at least one unit per side", encounter.id);
            }
            if encounters.contains_key(&encounter.id) {
                anyhow::bail!("Duplicate encounter '{}'", encounter.id);
            }
            encounters.insert(encounter.id.clone(), encounter);
        }
        Ok(encounters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::EnvironmentArchetype;

    #[test]
    fn parses_encounter_with_archetype() {
        let encounters = EncounterLoader::parse(
            r#"(encounters: [(
                id: "skirmish",
                archetype: volcanic,
                allies: [(template: "knight", position: (x: 0.0, y: 0.0), player_controlled: true)],
                enemies: [(template: "imp", position: (x: 6.0, y: 0.0))],
            )])"#,
        )
        .unwrap();
        let skirmish = &encounters["skirmish"];
        assert_eq!(skirmish.archetype, EnvironmentArchetype::Volcanic);
        assert!(skirmish.allies[0].player_controlled);
        assert!(!skirmish.enemies[0].player_controlled);
    }

    #[test]
    fn invalid_rule_is_rejected() {
        let err = EncounterLoader::parse(
            r#"(encounters: [(
                id: "bad",
                rules: [HealingPulse(interval: 0.0, percent: 0.1)],
                allies: [(template: "knight")],
                enemies: [(template: "imp")],
            )])"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("bad"));
    }
}
