//! The per-tick driver.
//!
//! A [`Battle`] owns every piece of encounter state (roster, RNG, combo and
//! threat tables, skill queue, environment and event bus) and sequences them
//! into one frame per [`Battle::tick`]:
//!
//! ```text
//! scale dt → combo decay → cooldowns → status ticks
//!          → actions (fastest first) → environment → separation → end check
//! ```
//!
//! The bus is created with the battle and torn down with it; callers attach
//! to it through [`Battle::bus`].

mod actions;
mod field;
mod outcome;

pub use outcome::{BattleOutcome, BattleState};

use sha2::{Digest, Sha256};

use crate::combat::CombatContext;
use crate::combatant::{Combatant, CombatantId, Side};
use crate::combo::ComboTracker;
use crate::config::BattleConfig;
use crate::element::ElementTable;
use crate::environment::{EnvironmentArchetype, EnvironmentEngine, EnvironmentRule};
use crate::error::CommandError;
use crate::events::{BattleEvent, EventBus};
use crate::rng::BattleRng;
use crate::skills::{SkillId, SkillQueue, SkillRegistry, execute_skill};
use crate::status;
use crate::targeting::TargetStrategy;
use crate::threat::ThreatTable;

/// Everything needed to start an encounter.
#[derive(Clone, Debug)]
pub struct BattleSetup {
    pub config: BattleConfig,
    pub elements: ElementTable,
    pub skills: SkillRegistry,
    pub roster: Vec<Combatant>,
    pub environment: Vec<EnvironmentRule>,
    pub seed: i32,
}

impl BattleSetup {
    pub fn new(roster: Vec<Combatant>, skills: SkillRegistry, seed: i32) -> Self {
        Self {
            config: BattleConfig::default(),
            elements: ElementTable::default(),
            skills,
            roster,
            environment: Vec::new(),
            seed,
        }
    }

    pub fn with_config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_elements(mut self, elements: ElementTable) -> Self {
        self.elements = elements;
        self
    }

    pub fn with_environment(mut self, rules: impl IntoIterator<Item = EnvironmentRule>) -> Self {
        self.environment = rules.into_iter().collect();
        self
    }

    pub fn with_archetype(self, archetype: EnvironmentArchetype) -> Self {
        self.with_environment(archetype.rules())
    }
}

pub struct Battle {
    config: BattleConfig,
    elements: ElementTable,
    skills: SkillRegistry,
    roster: Vec<Combatant>,
    rng: BattleRng,
    combo: ComboTracker,
    threat: ThreatTable,
    queue: SkillQueue,
    environment: EnvironmentEngine,
    bus: EventBus,
    elapsed: f64,
    state: BattleState,
}

impl Battle {
    pub fn new(setup: BattleSetup) -> Self {
        let BattleSetup {
            config,
            elements,
            skills,
            roster,
            environment,
            seed,
        } = setup;

        tracing::info!(
            seed,
            units = roster.len(),
            rules = environment.len(),
            queue_mode = %config.queue_mode,
            "battle started"
        );

        Self {
            combo: ComboTracker::new(&config),
            queue: SkillQueue::new(config.queue_mode, config.semi_auto_delay),
            environment: EnvironmentEngine::new(environment),
            rng: BattleRng::new(seed),
            threat: ThreatTable::new(),
            bus: EventBus::new(),
            elapsed: 0.0,
            state: BattleState::Ongoing,
            config,
            elements,
            skills,
            roster,
        }
    }

    /// Replaces the RNG with one resumed from a persisted state.
    pub fn with_rng_state(mut self, state: i32) -> Self {
        self.rng = BattleRng::from_state(state);
        self
    }

    // ===== accessors =====

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn skills(&self) -> &SkillRegistry {
        &self.skills
    }

    pub fn roster(&self) -> &[Combatant] {
        &self.roster
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        self.roster.iter().find(|unit| unit.id == id)
    }

    pub fn combo(&self) -> &ComboTracker {
        &self.combo
    }

    pub fn threat(&self) -> &ThreatTable {
        &self.threat
    }

    pub fn queue(&self) -> &SkillQueue {
        &self.queue
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    /// Persistable RNG state; see [`Battle::with_rng_state`].
    pub fn rng_state(&self) -> i32 {
        self.rng.state()
    }

    // ===== caller commands =====

    /// Changes the virtual time rate. Negative or non-finite values pause.
    pub fn set_speed_multiplier(&mut self, multiplier: f64) {
        self.config.speed_multiplier = if multiplier.is_finite() { multiplier.max(0.0) } else { 0.0 };
        tracing::debug!(multiplier = self.config.speed_multiplier, "speed multiplier changed");
    }

    /// Sets or clears a per-combatant targeting override.
    pub fn set_strategy(
        &mut self,
        id: CombatantId,
        strategy: Option<TargetStrategy>,
    ) -> Result<(), CommandError> {
        let unit = self
            .roster
            .iter_mut()
            .find(|unit| unit.id == id)
            .ok_or(CommandError::UnknownCombatant(id))?;
        unit.strategy = strategy;
        Ok(())
    }

    /// Fires a player-controlled skill now, optionally redirected to `preferred`.
    ///
    /// Removes the skill from the queue on success. An invalid `preferred`
    /// falls back to the default pick for the skill's target type.
    pub fn fire_skill(
        &mut self,
        caster: CombatantId,
        skill: SkillId,
        preferred: Option<CombatantId>,
    ) -> Result<Vec<CombatantId>, CommandError> {
        if self.state.is_over() {
            return Err(CommandError::BattleEnded);
        }
        let index = self
            .roster
            .iter()
            .position(|unit| unit.id == caster)
            .ok_or(CommandError::UnknownCombatant(caster))?;
        let unit = &self.roster[index];
        if !unit.is_alive() {
            return Err(CommandError::Dead(caster));
        }
        if !unit.player_controlled {
            return Err(CommandError::NotPlayerControlled(caster));
        }
        if unit.is_stunned() {
            return Err(CommandError::Stunned(caster));
        }
        let def = match self.skills.get(skill) {
            Some(def) if unit.skills.contains(&skill) => def,
            _ => return Err(CommandError::SkillNotLearned { caster, skill }),
        };
        if unit.cooldown(skill) > 0.0 {
            return Err(CommandError::OnCooldown { skill });
        }

        let Self {
            config,
            elements,
            roster,
            rng,
            combo,
            threat,
            queue,
            bus,
            ..
        } = self;
        let mut ctx = CombatContext {
            config,
            elements,
            rng,
            combo: Some(combo),
            threat,
            bus,
        };
        let targets =
            execute_skill(&mut ctx, roster, index, def, preferred).ok_or(CommandError::NoTarget { skill })?;
        queue.remove(caster, skill);
        tracing::debug!(%caster, %skill, "skill fired by caller");

        self.settle_deaths();
        self.check_end();
        Ok(targets)
    }

    // ===== simulation =====

    /// Advances the encounter by `dt` wall-clock seconds.
    pub fn tick(&mut self, dt: f64) -> BattleState {
        if self.state.is_over() {
            return self.state;
        }
        let dt = self.config.scaled_dt(dt);
        if dt <= 0.0 {
            return self.state;
        }
        self.elapsed += dt;

        let Self {
            config,
            elements,
            skills,
            roster,
            rng,
            combo,
            threat,
            queue,
            environment,
            bus,
            ..
        } = self;

        combo.update(dt, bus);
        for unit in roster.iter_mut().filter(|unit| unit.is_alive()) {
            unit.tick_cooldowns(dt);
        }

        let mut ctx = CombatContext {
            config,
            elements,
            rng,
            combo: Some(combo),
            threat,
            bus,
        };
        status::tick_all(&mut ctx, roster, dt);

        for index in actions::action_order(roster) {
            actions::act(&mut ctx, roster, skills, queue, index, dt);
        }

        environment.update(&mut ctx, roster, dt);
        field::separate(roster, config.separation_distance);

        self.settle_deaths();
        self.check_end()
    }

    /// Ticks with a fixed `dt` until the battle ends or `max_ticks` elapse.
    pub fn run_to_completion(&mut self, dt: f64, max_ticks: usize) -> BattleOutcome {
        for _ in 0..max_ticks {
            if self.tick(dt).is_over() {
                break;
            }
        }
        self.outcome()
    }

    pub fn outcome(&self) -> BattleOutcome {
        BattleOutcome {
            state: self.state,
            rewards: self
                .roster
                .iter()
                .filter(|unit| unit.side == Side::Enemy && !unit.is_alive())
                .map(|unit| unit.reward)
                .sum(),
            survivors: self
                .roster
                .iter()
                .filter(|unit| unit.side == Side::Ally && unit.is_alive())
                .map(|unit| unit.id)
                .collect(),
        }
    }

    /// SHA-256 over the observable simulation state.
    ///
    /// Two battles built from the same setup and driven with the same `dt`
    /// schedule produce the same fingerprint after every tick.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.elapsed.to_bits().to_le_bytes());
        hasher.update(self.rng.state().to_le_bytes());
        hasher.update([self.state.tag()]);
        for unit in &self.roster {
            hasher.update(unit.id.0.to_le_bytes());
            hasher.update(unit.hp().to_bits().to_le_bytes());
            hasher.update([u8::from(unit.is_alive())]);
            hasher.update(unit.position.x.to_bits().to_le_bytes());
            hasher.update(unit.position.y.to_bits().to_le_bytes());
            hasher.update((unit.effects.len() as u32).to_le_bytes());
        }
        hasher.finalize().into()
    }

    /// Drops queued skills of fallen units.
    ///
    /// Combo streaks involving them are left alone: they end by target switch
    /// or decay like any other streak.
    fn settle_deaths(&mut self) {
        for unit in self.roster.iter().filter(|unit| !unit.is_alive()) {
            self.queue.drain_caster(unit.id);
        }
    }

    fn check_end(&mut self) -> BattleState {
        if self.state.is_over() {
            return self.state;
        }
        let standing = |side: Side| self.roster.iter().any(|unit| unit.side == side && unit.is_alive());

        let state = if !standing(Side::Ally) {
            BattleState::Defeat
        } else if !standing(Side::Enemy) {
            BattleState::Victory
        } else if self.elapsed >= self.config.time_limit {
            BattleState::Defeat
        } else {
            BattleState::Ongoing
        };

        if state.is_over() {
            self.state = state;
            self.queue.clear();
            tracing::info!(%state, elapsed = self.elapsed, "battle ended");
            self.bus.publish(BattleEvent::BattleEnded {
                state,
                elapsed: self.elapsed,
            });
        }
        self.state
    }
}

impl std::fmt::Debug for Battle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Battle")
            .field("state", &self.state)
            .field("elapsed", &self.elapsed)
            .field("units", &self.roster.len())
            .field("rng_state", &self.rng.state())
            .finish_non_exhaustive()
    }
}
