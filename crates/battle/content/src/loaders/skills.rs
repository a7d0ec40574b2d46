//! Skill catalog loader.

use std::path::Path;

use battle_core::{SkillRegistry, SkillSpec};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Skill catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCatalog {
    pub skills: Vec<SkillSpec>,
}

/// Loader for the skill catalog from RON files.
pub struct SkillLoader;

impl SkillLoader {
    /// Load a skill catalog and build a validated [`SkillRegistry`].
    ///
    /// Skill ids are assigned in file order.
    pub fn load(path: &Path) -> LoadResult<SkillRegistry> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SkillRegistry> {
        let catalog: SkillCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill catalog RON: {}", e))?;

        let registry = SkillRegistry::from_specs(catalog.skills)
            .map_err(|e| anyhow::anyhow!("Invalid skill catalog: {}", e))?;
        tracing::debug!(skills = registry.len(), "skill catalog loaded");
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::SkillTarget;

    #[test]
    fn parses_minimal_skill() {
        let registry = SkillLoader::parse(
            r#"(skills: [(name: "jab", target: single_enemy, cooldown: 1.0, base_damage: 5.0)])"#,
        )
        .unwrap();
        let jab = registry.get(registry.lookup("jab").unwrap()).unwrap();
        assert_eq!(jab.target, SkillTarget::SingleEnemy);
        assert_eq!(jab.range, None);
    }

    #[test]
    fn negative_cooldown_is_rejected() {
        let err = SkillLoader::parse(r#"(skills: [(name: "jab", target: self_only, cooldown: -1.0)])"#)
            .unwrap_err();
        assert!(err.to_string().contains("cooldown"));
    }
}
