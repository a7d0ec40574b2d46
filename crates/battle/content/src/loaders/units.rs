//! Unit template loader.

use std::collections::BTreeMap;
use std::path::Path;

use battle_core::UnitTemplate;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Unit catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitCatalog {
    pub units: Vec<UnitTemplate>,
}

/// Loader for unit templates from RON files.
pub struct UnitLoader;

impl UnitLoader {
    /// Load unit templates keyed by name.
    ///
    /// Duplicate names and non-finite stats are rejected here; skill names
    /// are resolved later, when a roster is built.
    pub fn load(path: &Path) -> LoadResult<BTreeMap<String, UnitTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BTreeMap<String, UnitTemplate>> {
        let catalog: UnitCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse unit catalog RON: {}", e))?;

        let mut units = BTreeMap::new();
        for template in catalog.units {
            for block in [&template.stats, &template.equipment] {
                if let Some((key, value)) = block.first_non_finite() {
                    anyhow::bail!("Unit '{}': stat {} is not finite ({})", template.name, key, value);
                }
            }
            if units.contains_key(&template.name) {
                anyhow::bail!("Duplicate unit template '{}'", template.name);
            }
            units.insert(template.name.clone(), template);
        }
        Ok(units)
    }
}
