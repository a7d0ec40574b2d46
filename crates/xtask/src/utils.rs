//! Utility functions for xtask commands

use anyhow::{Result, anyhow};
use std::path::PathBuf;

use battle_content::{ContentFactory, ContentSet};

/// Content factory for `--data`, or the bundled data set when omitted.
pub fn factory(data_dir: Option<PathBuf>) -> Result<ContentFactory> {
    let factory = match data_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::bundled(),
    };

    if !factory.data_dir().is_dir() {
        return Err(anyhow!(
            "Data directory does not exist: {}",
            factory.data_dir().display()
        ));
    }
    Ok(factory)
}

/// Loads and validates everything under the resolved data directory.
pub fn load_content(data_dir: Option<PathBuf>) -> Result<(ContentFactory, ContentSet)> {
    let factory = factory(data_dir)?;
    let content = factory.load_all()?;
    Ok((factory, content))
}
