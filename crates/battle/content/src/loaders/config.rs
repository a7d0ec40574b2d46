//! Battle configuration loader.

use std::path::Path;

use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys keep their [`BattleConfig::default`] values.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if !(config.speed_multiplier.is_finite() && config.speed_multiplier >= 0.0) {
            anyhow::bail!("speed_multiplier must be finite and >= 0, got {}", config.speed_multiplier);
        }
        if !(config.time_limit > 0.0) {
            anyhow::bail!("time_limit must be > 0, got {}", config.time_limit);
        }
        if config.combo_hits_per_step == 0 {
            anyhow::bail!("combo_hits_per_step must be >= 1");
        }
        Ok(config)
    }
}
