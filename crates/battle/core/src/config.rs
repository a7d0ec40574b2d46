use crate::skills::QueueMode;

/// Battle configuration constants and tunable parameters.
///
/// Every timer and formula in the simulation reads its constants from here, so
/// a content pack can rebalance an encounter without touching code.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// `K` in `damage *= K / (K + defense)`.
    pub mitigation_constant: f64,
    /// Half-width of the uniform damage variance band (0.10 = ±10%).
    pub variance: f64,

    /// Seconds a combo streak survives without a follow-up hit.
    pub combo_window: f64,
    /// Consecutive hits needed per combo multiplier step.
    pub combo_hits_per_step: u32,
    /// Multiplier added per completed combo step.
    pub combo_step_bonus: f64,

    /// Healers ignore allies at or above this HP fraction.
    pub heal_threshold: f64,
    /// Flat score bonus for candidates the attacker has elemental advantage over.
    pub element_target_bonus: f64,
    /// Maximum score bonus for candidates that generated the attacker's threat.
    pub threat_target_bonus: f64,

    /// How player-controlled skills leave the queue.
    pub queue_mode: QueueMode,
    /// Seconds a semi-auto skill waits for the player before firing itself.
    pub semi_auto_delay: f64,

    /// Virtual time rate applied to every `dt` handed to the simulation.
    pub speed_multiplier: f64,
    /// Minimum distance kept between living combatants after each tick.
    pub separation_distance: f64,
    /// Encounter length after which the battle is lost.
    pub time_limit: f64,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of skills a single combatant can carry.
    pub const MAX_SKILLS: usize = 6;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MITIGATION_CONSTANT: f64 = 100.0;
    pub const DEFAULT_VARIANCE: f64 = 0.10;
    pub const DEFAULT_COMBO_WINDOW: f64 = 3.0;
    pub const DEFAULT_COMBO_HITS_PER_STEP: u32 = 5;
    pub const DEFAULT_COMBO_STEP_BONUS: f64 = 0.10;
    pub const DEFAULT_HEAL_THRESHOLD: f64 = 0.90;
    pub const DEFAULT_ELEMENT_TARGET_BONUS: f64 = 0.3;
    pub const DEFAULT_THREAT_TARGET_BONUS: f64 = 0.15;
    pub const DEFAULT_SEMI_AUTO_DELAY: f64 = 2.0;
    pub const DEFAULT_SEPARATION_DISTANCE: f64 = 0.75;
    pub const DEFAULT_TIME_LIMIT: f64 = 180.0;

    pub fn new() -> Self {
        Self {
            mitigation_constant: Self::DEFAULT_MITIGATION_CONSTANT,
            variance: Self::DEFAULT_VARIANCE,
            combo_window: Self::DEFAULT_COMBO_WINDOW,
            combo_hits_per_step: Self::DEFAULT_COMBO_HITS_PER_STEP,
            combo_step_bonus: Self::DEFAULT_COMBO_STEP_BONUS,
            heal_threshold: Self::DEFAULT_HEAL_THRESHOLD,
            element_target_bonus: Self::DEFAULT_ELEMENT_TARGET_BONUS,
            threat_target_bonus: Self::DEFAULT_THREAT_TARGET_BONUS,
            queue_mode: QueueMode::SemiAuto,
            semi_auto_delay: Self::DEFAULT_SEMI_AUTO_DELAY,
            speed_multiplier: 1.0,
            separation_distance: Self::DEFAULT_SEPARATION_DISTANCE,
            time_limit: Self::DEFAULT_TIME_LIMIT,
        }
    }

    pub fn with_queue_mode(mut self, queue_mode: QueueMode) -> Self {
        self.queue_mode = queue_mode;
        self
    }

    pub fn with_speed_multiplier(mut self, speed_multiplier: f64) -> Self {
        self.speed_multiplier = speed_multiplier;
        self
    }

    /// Scales a wall-clock delta into simulated seconds.
    ///
    /// Negative or non-finite inputs collapse to zero so timers never run
    /// backwards.
    pub fn scaled_dt(&self, dt: f64) -> f64 {
        let scaled = dt * self.speed_multiplier;
        if scaled.is_finite() && scaled > 0.0 {
            scaled
        } else {
            0.0
        }
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
