//! Synchronous, priority-ordered publish/subscribe bus.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::types::{BattleEvent, Topic};

/// Identity of one registration, returned by `subscribe` and used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Handler = Rc<RefCell<dyn FnMut(&BattleEvent)>>;

#[derive(Clone)]
struct Subscription {
    id: SubscriptionId,
    priority: i32,
    once: bool,
    handler: Handler,
}

#[derive(Default)]
struct BusState {
    next_id: u64,
    topics: BTreeMap<Topic, Vec<Subscription>>,
}

impl BusState {
    fn contains(&self, topic: Topic, id: SubscriptionId) -> bool {
        self.topics
            .get(&topic)
            .is_some_and(|subs| subs.iter().any(|sub| sub.id == id))
    }

    fn remove(&mut self, id: SubscriptionId) -> bool {
        for subs in self.topics.values_mut() {
            if let Some(index) = subs.iter().position(|sub| sub.id == id) {
                subs.remove(index);
                return true;
            }
        }
        false
    }
}

/// Event bus handle.
///
/// Cloning is cheap and every clone shares the same subscriptions. The
/// orchestrator creates one per encounter and hands clones to whoever needs
/// to publish or observe.
///
/// Handlers run synchronously inside [`EventBus::publish`], in descending
/// priority, ties in registration order. Dispatch iterates a snapshot of the
/// handler list, so handlers may subscribe, unsubscribe or publish while an
/// event is in flight.
#[derive(Clone, Default)]
pub struct EventBus {
    state: Rc<RefCell<BusState>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &self,
        topic: Topic,
        priority: i32,
        handler: impl FnMut(&BattleEvent) + 'static,
    ) -> SubscriptionId {
        self.register(topic, priority, false, handler)
    }

    /// Registers a handler that is removed right before its first invocation.
    pub fn subscribe_once(
        &self,
        topic: Topic,
        priority: i32,
        handler: impl FnMut(&BattleEvent) + 'static,
    ) -> SubscriptionId {
        self.register(topic, priority, true, handler)
    }

    /// Returns false when the id was not (or no longer) registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state.borrow_mut().remove(id)
    }

    pub fn publish(&self, event: BattleEvent) {
        let topic = event.topic();
        let snapshot: Vec<Subscription> = match self.state.borrow().topics.get(&topic) {
            Some(subs) if !subs.is_empty() => subs.clone(),
            _ => {
                tracing::trace!(%topic, "no subscribers");
                return;
            }
        };

        for sub in snapshot {
            {
                let mut state = self.state.borrow_mut();
                if !state.contains(topic, sub.id) {
                    continue;
                }
                if sub.once {
                    state.remove(sub.id);
                }
            }

            match sub.handler.try_borrow_mut() {
                Ok(mut handler) => (&mut *handler)(&event),
                Err(_) => {
                    tracing::warn!(%topic, id = sub.id.0, "handler re-entered itself; skipped");
                }
            }
        }
    }

    /// Drops every subscription.
    pub fn reset(&self) {
        self.state.borrow_mut().topics.clear();
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.state
            .borrow()
            .topics
            .get(&topic)
            .map_or(0, |subs| subs.len())
    }

    fn register(
        &self,
        topic: Topic,
        priority: i32,
        once: bool,
        handler: impl FnMut(&BattleEvent) + 'static,
    ) -> SubscriptionId {
        let mut state = self.state.borrow_mut();
        let id = SubscriptionId(state.next_id);
        state.next_id += 1;

        let subs = state.topics.entry(topic).or_default();
        let index = subs
            .iter()
            .position(|sub| sub.priority < priority)
            .unwrap_or(subs.len());
        subs.insert(
            index,
            Subscription {
                id,
                priority,
                once,
                handler: Rc::new(RefCell::new(handler)),
            },
        );
        id
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        let counts: BTreeMap<Topic, usize> = state
            .topics
            .iter()
            .map(|(topic, subs)| (*topic, subs.len()))
            .collect();
        f.debug_struct("EventBus").field("subscribers", &counts).finish()
    }
}
