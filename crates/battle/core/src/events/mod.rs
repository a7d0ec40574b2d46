//! Battle event feed.
//!
//! Simulation code publishes [`BattleEvent`]s to an explicitly owned
//! [`EventBus`]; presentation layers subscribe per [`Topic`] without touching
//! simulation internals.

mod bus;
mod types;

pub use bus::{EventBus, SubscriptionId};
pub use types::{BattleEvent, Topic};

use std::cell::RefCell;
use std::rc::Rc;

use strum::IntoEnumIterator;

/// Collects every published event in order.
#[derive(Debug)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<BattleEvent>>>,
    subscriptions: Vec<SubscriptionId>,
}

impl EventRecorder {
    /// Subscribes to every topic at the lowest priority.
    pub fn attach(bus: &EventBus) -> Self {
        let events = Rc::new(RefCell::new(Vec::new()));
        let subscriptions = Topic::iter()
            .map(|topic| {
                let sink = Rc::clone(&events);
                bus.subscribe(topic, i32::MIN, move |event| {
                    sink.borrow_mut().push(event.clone())
                })
            })
            .collect();
        Self {
            events,
            subscriptions,
        }
    }

    /// Snapshot of everything recorded so far, oldest first.
    pub fn events(&self) -> Vec<BattleEvent> {
        self.events.borrow().clone()
    }

    /// Drains the recorded events, leaving the recorder attached and empty.
    pub fn take(&self) -> Vec<BattleEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Number of recorded events published under `topic`.
    pub fn count(&self, topic: Topic) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| event.topic() == topic)
            .count()
    }

    /// Number of recorded events across all topics.
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// True when nothing has been recorded since attach or the last `take`.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Unsubscribes from `bus` and returns whatever was recorded.
    pub fn detach(self, bus: &EventBus) -> Vec<BattleEvent> {
        for id in &self.subscriptions {
            bus.unsubscribe(*id);
        }
        self.take()
    }
}
