//! Content loaders for reading battle data from files.
//!
//! Each loader parses one file and validates it into the strongly typed form
//! `battle-core` consumes. [`ContentFactory`] ties them to a data directory.

pub mod config;
pub mod elements;
pub mod encounters;
pub mod factory;
pub mod skills;
pub mod synergies;
pub mod units;

pub use config::ConfigLoader;
pub use elements::ElementLoader;
pub use encounters::EncounterLoader;
pub use factory::{ContentFactory, ContentSet};
pub use skills::SkillLoader;
pub use synergies::SynergyLoader;
pub use units::UnitLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
