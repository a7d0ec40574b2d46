//! Per-attacker hit streaks.
//!
//! A streak counts consecutive hits by one attacker on one unchanged target.
//! It ends when the attacker switches targets or when no follow-up hit lands
//! within the decay window.

use std::collections::BTreeMap;

use crate::combatant::CombatantId;
use crate::config::BattleConfig;
use crate::events::{BattleEvent, EventBus};

/// Why a streak ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BreakReason {
    TargetSwitched,
    Decayed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Streak {
    pub target: CombatantId,
    pub count: u32,
    /// Seconds until the streak decays.
    pub timer: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ComboTracker {
    window: f64,
    hits_per_step: u32,
    step_bonus: f64,
    streaks: BTreeMap<CombatantId, Streak>,
}

impl ComboTracker {
    pub fn new(config: &BattleConfig) -> Self {
        Self {
            window: config.combo_window,
            hits_per_step: config.combo_hits_per_step.max(1),
            step_bonus: config.combo_step_bonus,
            streaks: BTreeMap::new(),
        }
    }

    pub fn streak(&self, attacker: CombatantId) -> Option<&Streak> {
        self.streaks.get(&attacker)
    }

    pub fn count(&self, attacker: CombatantId) -> u32 {
        self.streaks.get(&attacker).map_or(0, |streak| streak.count)
    }

    /// Multiplier for a streak of `count` hits.
    ///
    /// # Formula
    ///
    /// ```text
    /// 1 + floor(count / hits_per_step) × step_bonus
    /// ```
    pub fn multiplier_for(&self, count: u32) -> f64 {
        1.0 + f64::from(count / self.hits_per_step) * self.step_bonus
    }

    pub fn multiplier(&self, attacker: CombatantId) -> f64 {
        self.multiplier_for(self.count(attacker))
    }

    /// Multiplier the attacker's current streak grants against `target`.
    ///
    /// A streak on any other unit contributes nothing: the next hit on
    /// `target` would break it.
    pub fn multiplier_against(&self, attacker: CombatantId, target: CombatantId) -> f64 {
        match self.streaks.get(&attacker) {
            Some(streak) if streak.target == target => self.multiplier_for(streak.count),
            _ => 1.0,
        }
    }

    /// Records a landed hit and returns the new streak length.
    pub fn register_hit(
        &mut self,
        attacker: CombatantId,
        target: CombatantId,
        bus: &EventBus,
    ) -> u32 {
        let window = self.window;
        let continued = match self.streaks.get_mut(&attacker) {
            Some(streak) if streak.target == target => {
                streak.count += 1;
                streak.timer = window;
                Some(streak.count)
            }
            _ => None,
        };

        let count = match continued {
            Some(count) => count,
            None => {
                let fresh = Streak {
                    target,
                    count: 1,
                    timer: window,
                };
                if let Some(old) = self.streaks.insert(attacker, fresh)
                    && old.count > 0
                {
                    bus.publish(BattleEvent::ComboBroken {
                        attacker,
                        target: old.target,
                        count: old.count,
                        reason: BreakReason::TargetSwitched,
                    });
                }
                1
            }
        };

        bus.publish(BattleEvent::ComboHit {
            attacker,
            target,
            count,
            multiplier: self.multiplier_for(count),
        });
        count
    }

    /// Decays every streak timer; drops the ones that reach zero.
    pub fn update(&mut self, dt: f64, bus: &EventBus) {
        let mut decayed = Vec::new();
        for (attacker, streak) in &mut self.streaks {
            streak.timer -= dt;
            if streak.timer <= 0.0 {
                decayed.push((*attacker, *streak));
            }
        }

        for (attacker, streak) in decayed {
            self.streaks.remove(&attacker);
            tracing::trace!(%attacker, count = streak.count, "combo decayed");
            if streak.count > 0 {
                bus.publish(BattleEvent::ComboBroken {
                    attacker,
                    target: streak.target,
                    count: streak.count,
                    reason: BreakReason::Decayed,
                });
            }
        }
    }

    pub fn reset(&mut self) {
        self.streaks.clear();
    }
}

impl Default for ComboTracker {
    fn default() -> Self {
        Self::new(&BattleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventRecorder, Topic};

    const A: CombatantId = CombatantId(1);
    const X: CombatantId = CombatantId(10);
    const Y: CombatantId = CombatantId(11);

    #[test]
    fn multiplier_steps_every_five_hits() {
        let combo = ComboTracker::default();
        for (count, expected) in [(0, 1.0), (4, 1.0), (5, 1.1), (9, 1.1), (10, 1.2), (15, 1.3)] {
            assert!((combo.multiplier_for(count) - expected).abs() < 1e-12, "count {count}");
        }
    }

    #[test]
    fn same_target_hits_accumulate() {
        let bus = EventBus::new();
        let mut combo = ComboTracker::default();
        for _ in 0..5 {
            combo.register_hit(A, X, &bus);
        }
        assert_eq!(combo.count(A), 5);
        assert!((combo.multiplier_against(A, X) - 1.1).abs() < 1e-12);
        assert_eq!(combo.multiplier_against(A, Y), 1.0);
    }

    #[test]
    fn switching_target_breaks_once() {
        let bus = EventBus::new();
        let recorder = EventRecorder::attach(&bus);
        let mut combo = ComboTracker::default();

        combo.register_hit(A, X, &bus);
        combo.register_hit(A, X, &bus);
        combo.register_hit(A, Y, &bus);

        assert_eq!(recorder.count(Topic::ComboBroken), 1);
        assert_eq!(combo.count(A), 1);
        assert!(recorder.events().iter().any(|event| matches!(
            event,
            BattleEvent::ComboBroken {
                count: 2,
                reason: BreakReason::TargetSwitched,
                ..
            }
        )));
    }

    #[test]
    fn first_hit_breaks_nothing() {
        let bus = EventBus::new();
        let recorder = EventRecorder::attach(&bus);
        let mut combo = ComboTracker::default();

        combo.register_hit(A, X, &bus);
        assert_eq!(recorder.count(Topic::ComboBroken), 0);
        assert_eq!(recorder.count(Topic::ComboHit), 1);
    }

    #[test]
    fn streak_decays_after_window() {
        let bus = EventBus::new();
        let recorder = EventRecorder::attach(&bus);
        let mut combo = ComboTracker::default();

        combo.register_hit(A, X, &bus);
        combo.update(2.0, &bus);
        assert_eq!(combo.count(A), 1);
        combo.update(1.0, &bus);
        assert_eq!(combo.count(A), 0);
        assert!(matches!(
            recorder.events().last(),
            Some(BattleEvent::ComboBroken {
                reason: BreakReason::Decayed,
                ..
            })
        ));
    }

    #[test]
    fn hit_refreshes_decay_timer() {
        let bus = EventBus::new();
        let mut combo = ComboTracker::default();

        combo.register_hit(A, X, &bus);
        combo.update(2.5, &bus);
        combo.register_hit(A, X, &bus);
        combo.update(2.5, &bus);
        assert_eq!(combo.count(A), 2);
    }
}
