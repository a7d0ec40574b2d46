//! Load and cross-check a content directory.

use anyhow::Result;
use clap::Parser;
use console::style;
use std::path::PathBuf;

use crate::utils;

/// Load and cross-check every content file
#[derive(Parser)]
pub struct Validate {
    /// Custom content directory (defaults to the bundled data set)
    #[arg(short, long, value_name = "DIR")]
    data: Option<PathBuf>,

    /// Also build every encounter's roster with this seed
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    seed: i32,
}

impl Validate {
    pub fn execute(self) -> Result<()> {
        let (factory, content) = utils::load_content(self.data)?;

        println!(
            "{} {}",
            style("Data Directory:").bold().cyan(),
            factory.data_dir().display()
        );
        println!("  Skills:     {}", content.skills.len());
        println!("  Units:      {}", content.units.len());
        println!("  Synergies:  {}", content.synergies.len());
        println!("  Encounters: {}", content.encounters.len());
        println!();

        let mut failures = 0usize;
        for id in content.encounters.keys() {
            match content.setup(id, self.seed) {
                Ok(setup) => println!(
                    "  {} {:<16} {} units",
                    style("ok").green(),
                    id,
                    setup.roster.len()
                ),
                Err(e) => {
                    failures += 1;
                    println!("  {} {:<16} {}", style("error").red(), id, e);
                }
            }
        }

        if failures > 0 {
            anyhow::bail!("{} encounter(s) failed to build", failures);
        }

        println!();
        println!("{}", style("Content is valid").bold().green());
        Ok(())
    }
}
