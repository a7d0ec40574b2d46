//! Player skill queue.

use crate::combatant::CombatantId;
use crate::events::{BattleEvent, EventBus};

use super::SkillId;

/// How queued skills leave the queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QueueMode {
    /// Ready skills fire immediately.
    Auto,
    /// Ready skills wait for an explicit fire.
    Manual,
    /// Ready skills fire on their own after a delay unless fired first.
    #[default]
    SemiAuto,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QueuedSkill {
    pub caster: CombatantId,
    pub skill: SkillId,
    /// Seconds spent in the queue.
    pub waited: f64,
}

/// Ready skills of player-controlled combatants, in the order they became ready.
#[derive(Clone, Debug, PartialEq)]
pub struct SkillQueue {
    mode: QueueMode,
    delay: f64,
    entries: Vec<QueuedSkill>,
}

impl SkillQueue {
    pub fn new(mode: QueueMode, delay: f64) -> Self {
        Self {
            mode,
            delay,
            entries: Vec::new(),
        }
    }

    pub fn mode(&self) -> QueueMode {
        self.mode
    }

    pub fn contains(&self, caster: CombatantId, skill: SkillId) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.caster == caster && entry.skill == skill)
    }

    pub fn pending(&self, caster: CombatantId) -> impl Iterator<Item = &QueuedSkill> {
        self.entries.iter().filter(move |entry| entry.caster == caster)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queues a ready skill; publishes `SkillReady` the first time only.
    pub fn offer(&mut self, caster: CombatantId, skill: SkillId, bus: &EventBus) -> bool {
        if self.contains(caster, skill) {
            return false;
        }
        self.entries.push(QueuedSkill {
            caster,
            skill,
            waited: 0.0,
        });
        bus.publish(BattleEvent::SkillReady { caster, skill });
        true
    }

    /// Ages `caster`'s entries by `dt` and returns the ones due to auto-fire.
    ///
    /// Entries stay queued until [`SkillQueue::remove`] is called, so a skill
    /// whose target is temporarily unavailable is retried next tick.
    pub fn due(&mut self, caster: CombatantId, dt: f64) -> Vec<SkillId> {
        let (mode, delay) = (self.mode, self.delay);
        self.entries
            .iter_mut()
            .filter(|entry| entry.caster == caster)
            .filter_map(|entry| {
                entry.waited += dt;
                let fire = match mode {
                    QueueMode::Auto => true,
                    QueueMode::Manual => false,
                    QueueMode::SemiAuto => entry.waited >= delay,
                };
                fire.then_some(entry.skill)
            })
            .collect()
    }

    pub fn remove(&mut self, caster: CombatantId, skill: SkillId) -> Option<QueuedSkill> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.caster == caster && entry.skill == skill)?;
        Some(self.entries.remove(index))
    }

    /// Removes every entry of `caster`, returning the skills that were pending.
    pub fn drain_caster(&mut self, caster: CombatantId) -> Vec<SkillId> {
        let mut drained = Vec::new();
        self.entries.retain(|entry| {
            if entry.caster == caster {
                drained.push(entry.skill);
                false
            } else {
                true
            }
        });
        drained
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventRecorder, Topic};

    const P: CombatantId = CombatantId(0);
    const S: SkillId = SkillId(3);

    #[test]
    fn offer_is_idempotent_and_announces_once() {
        let bus = EventBus::new();
        let recorder = EventRecorder::attach(&bus);
        let mut queue = SkillQueue::new(QueueMode::SemiAuto, 2.0);

        assert!(queue.offer(P, S, &bus));
        assert!(!queue.offer(P, S, &bus));
        assert_eq!(queue.len(), 1);
        assert_eq!(recorder.count(Topic::SkillReady), 1);
    }

    #[test]
    fn semi_auto_fires_after_delay() {
        let bus = EventBus::new();
        let mut queue = SkillQueue::new(QueueMode::SemiAuto, 2.0);
        queue.offer(P, S, &bus);

        assert!(queue.due(P, 1.0).is_empty());
        assert_eq!(queue.due(P, 1.0), vec![S]);
    }

    #[test]
    fn auto_fires_immediately_and_manual_never() {
        let bus = EventBus::new();
        let mut auto = SkillQueue::new(QueueMode::Auto, 2.0);
        let mut manual = SkillQueue::new(QueueMode::Manual, 2.0);
        auto.offer(P, S, &bus);
        manual.offer(P, S, &bus);

        assert_eq!(auto.due(P, 0.0), vec![S]);
        assert!(manual.due(P, 1000.0).is_empty());
    }

    #[test]
    fn drain_caster_only_touches_that_caster() {
        let bus = EventBus::new();
        let mut queue = SkillQueue::new(QueueMode::Manual, 2.0);
        queue.offer(P, S, &bus);
        queue.offer(CombatantId(1), S, &bus);

        assert_eq!(queue.drain_caster(P), vec![S]);
        assert!(queue.contains(CombatantId(1), S));
    }
}
