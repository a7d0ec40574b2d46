//! Element table loader.

use std::path::Path;

use battle_core::{ElementTable, ElementTableSpec};

use crate::loaders::{LoadResult, read_file};

/// Loader for element advantages and reactions from RON files.
pub struct ElementLoader;

impl ElementLoader {
    /// Load and validate an [`ElementTableSpec`] from a RON file.
    pub fn load(path: &Path) -> LoadResult<ElementTable> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ElementTable> {
        let spec: ElementTableSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse element table RON: {}", e))?;

        let table = ElementTable::from_spec(spec)
            .map_err(|e| anyhow::anyhow!("Invalid element table: {}", e))?;
        tracing::debug!(reactions = table.reaction_count(), "element table loaded");
        Ok(table)
    }
}
