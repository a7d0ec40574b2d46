//! Run one encounter headlessly.
//!
//! Drives the battle with a fixed step until it ends (or the tick budget runs
//! out) and prints the outcome, the surviving roster and the state fingerprint.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::collections::BTreeMap;
use std::path::PathBuf;
use strum::IntoEnumIterator;

use battle_core::{Battle, BattleOutcome, BattleState, EventRecorder, Topic};

use crate::utils;

/// Run one encounter headlessly
#[derive(Parser)]
pub struct Simulate {
    /// Encounter id from encounters.ron
    #[arg(short, long, value_name = "ID")]
    encounter: String,

    /// Battle seed
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    seed: i32,

    /// Custom content directory (defaults to the bundled data set)
    #[arg(short, long, value_name = "DIR")]
    data: Option<PathBuf>,

    /// Virtual time rate; overrides config.toml
    #[arg(long)]
    speed: Option<f64>,

    /// Step size in seconds handed to each tick
    #[arg(long, default_value_t = 0.05)]
    dt: f64,

    /// Tick budget before giving up
    #[arg(long, default_value_t = 100_000)]
    max_ticks: usize,

    /// Print a machine-readable JSON report instead of the summary
    #[arg(long)]
    json: bool,
}

impl Simulate {
    pub fn execute(self) -> Result<()> {
        if !(self.dt > 0.0) {
            anyhow::bail!("--dt must be positive, got {}", self.dt);
        }

        let (_, content) = utils::load_content(self.data)?;
        let setup = content
            .setup(&self.encounter, self.seed)
            .with_context(|| format!("Failed to set up encounter '{}'", self.encounter))?;

        let mut battle = Battle::new(setup);
        if let Some(speed) = self.speed {
            battle.set_speed_multiplier(speed);
        }

        let recorder = EventRecorder::attach(battle.bus());
        let outcome = battle.run_to_completion(self.dt, self.max_ticks);
        let counts: BTreeMap<&'static str, usize> = Topic::iter()
            .map(|topic| (topic.into(), recorder.count(topic)))
            .filter(|(_, count)| *count > 0)
            .collect();

        tracing::info!(
            encounter = %self.encounter,
            seed = self.seed,
            state = %outcome.state,
            elapsed = battle.elapsed(),
            "simulation finished"
        );

        if self.json {
            print_json(&self.encounter, self.seed, &battle, &outcome, &counts)
        } else {
            print_summary(&self.encounter, self.seed, &battle, &outcome, &counts);
            Ok(())
        }
    }
}

fn print_summary(
    encounter: &str,
    seed: i32,
    battle: &Battle,
    outcome: &BattleOutcome,
    counts: &BTreeMap<&'static str, usize>,
) {
    println!("{} {}", style("Encounter:").bold().cyan(), encounter);
    println!("{} {}", style("Seed:").bold().cyan(), seed);
    println!("{} {:.2}s", style("Elapsed:").bold().cyan(), battle.elapsed());
    println!();

    let state = match outcome.state {
        BattleState::Victory => style(outcome.state.to_string()).bold().green(),
        BattleState::Defeat => style(outcome.state.to_string()).bold().red(),
        BattleState::Ongoing => style(outcome.state.to_string()).bold().yellow(),
    };
    println!("{} {}", style("Outcome:").bold().yellow(), state);
    println!(
        "  Rewards: {} gold, {} experience",
        outcome.rewards.gold, outcome.rewards.experience
    );
    let survivors: Vec<_> = outcome.survivors.iter().map(ToString::to_string).collect();
    println!("  Survivors: {}", survivors.join(", "));
    println!();

    println!("{}", style("Roster:").bold().yellow());
    for unit in battle.roster() {
        let hp = format!("{:>6.0}/{:<6.0}", unit.hp(), unit.max_hp());
        let hp = if unit.is_alive() {
            style(hp).green()
        } else {
            style(hp).dim()
        };
        println!(
            "  {:<4} {:<6} {:<14} {:<7} {}",
            unit.id.to_string(),
            unit.side.to_string(),
            unit.name,
            unit.role.to_string(),
            hp
        );
    }
    println!();

    println!("{}", style("Events:").bold().yellow());
    for (topic, count) in counts {
        println!("  {topic:<18} {count}");
    }
    println!();

    println!(
        "{} {}",
        style("Fingerprint:").bold().cyan(),
        hex::encode(battle.fingerprint())
    );
}

fn print_json(
    encounter: &str,
    seed: i32,
    battle: &Battle,
    outcome: &BattleOutcome,
    counts: &BTreeMap<&'static str, usize>,
) -> Result<()> {
    let report = serde_json::json!({
        "encounter": encounter,
        "seed": seed,
        "elapsed": battle.elapsed(),
        "outcome": outcome,
        "events": counts,
        "rng_state": battle.rng_state(),
        "fingerprint": hex::encode(battle.fingerprint()),
    });
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{json}");
    Ok(())
}
