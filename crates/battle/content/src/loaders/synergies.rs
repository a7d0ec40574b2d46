//! Role synergy loader.

use std::path::Path;

use battle_core::SynergyRule;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Synergy table structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynergyCatalog {
    pub synergies: Vec<SynergyRule>,
}

/// Loader for role synergies from RON files.
pub struct SynergyLoader;

impl SynergyLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<SynergyRule>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<SynergyRule>> {
        let catalog: SynergyCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse synergy table RON: {}", e))?;

        for rule in &catalog.synergies {
            rule.validate()
                .map_err(|e| anyhow::anyhow!("Invalid synergy: {}", e))?;
        }
        Ok(catalog.synergies)
    }
}
