//! Type-indexed publish/subscribe for cross-element notifications.
//!
//! ```text
//!  Button ──publish(Saved)──► EventBus ──► handler 1
//!                                 │
//!                                 └──────► handler 2   (subscription order)
//! ```
//!
//! Publishing is synchronous on the UI thread. Handlers may subscribe,
//! unsubscribe or publish while being called; changes apply to the next
//! publish.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Rc<dyn Fn(&dyn Any)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: HashMap<TypeId, Vec<(SubscriptionId, Handler)>>,
}

/// Event bus. Cloning yields another handle to the same bus.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<Registry>>,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls `handler` for every published `E`, after earlier subscribers.
    pub fn subscribe<E: Any>(&self, handler: impl Fn(&E) + 'static) -> SubscriptionId {
        let mut registry = self.inner.borrow_mut();
        registry.next_id += 1;
        let id = SubscriptionId(registry.next_id);
        let erased: Handler = Rc::new(move |event: &dyn Any| {
            if let Some(event) = event.downcast_ref::<E>() {
                handler(event);
            }
        });
        registry.handlers.entry(TypeId::of::<E>()).or_default().push((id, erased));
        id
    }

    /// Removes a subscription for `E`. Returns false if it was not found.
    pub fn unsubscribe<E: Any>(&self, id: SubscriptionId) -> bool {
        let mut registry = self.inner.borrow_mut();
        let Some(list) = registry.handlers.get_mut(&TypeId::of::<E>()) else {
            return false;
        };
        let before = list.len();
        list.retain(|(sub, _)| *sub != id);
        before != list.len()
    }

    /// Delivers `event` to every subscriber of `E` in subscription order.
    /// Returns the number of handlers called.
    pub fn publish<E: Any>(&self, event: &E) -> usize {
        let handlers: Vec<Handler> = self
            .inner
            .borrow()
            .handlers
            .get(&TypeId::of::<E>())
            .map(|list| list.iter().map(|(_, h)| Rc::clone(h)).collect())
            .unwrap_or_default();
        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    /// Number of subscribers for `E`.
    #[must_use]
    pub fn subscriber_count<E: Any>(&self) -> usize {
        self.inner
            .borrow()
            .handlers
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }

    /// Drops every subscription.
    pub fn clear(&self) {
        self.inner.borrow_mut().handlers.clear();
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.inner.borrow();
        f.debug_struct("EventBus")
            .field("event_types", &registry.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug)]
    struct Saved(u32);

    struct Closed;

    #[test]
    fn test_handlers_run_in_subscription_order() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for tag in ["a", "b", "c"] {
            let log = Rc::clone(&log);
            bus.subscribe(move |e: &Saved| log.borrow_mut().push(format!("{tag}{}", e.0)));
        }

        assert_eq!(bus.publish(&Saved(1)), 3);
        assert_eq!(*log.borrow(), vec!["a1", "b1", "c1"]);
    }

    #[test]
    fn test_events_are_routed_by_type() {
        let bus = EventBus::new();
        let saved = Rc::new(Cell::new(0));
        let counter = Rc::clone(&saved);
        bus.subscribe(move |_: &Saved| counter.set(counter.get() + 1));

        assert_eq!(bus.publish(&Closed), 0);
        assert_eq!(saved.get(), 0);
        bus.publish(&Saved(7));
        assert_eq!(saved.get(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let bus = EventBus::new();
        let id = bus.subscribe(|_: &Saved| {});
        assert_eq!(bus.subscriber_count::<Saved>(), 1);
        assert!(!bus.unsubscribe::<Closed>(id));
        assert!(bus.unsubscribe::<Saved>(id));
        assert!(!bus.unsubscribe::<Saved>(id));
        assert_eq!(bus.publish(&Saved(0)), 0);
    }

    #[test]
    fn test_handler_may_subscribe_during_publish() {
        let bus = EventBus::new();
        let inner = bus.clone();
        bus.subscribe(move |_: &Saved| {
            inner.subscribe(|_: &Saved| {});
        });

        assert_eq!(bus.publish(&Saved(0)), 1);
        assert_eq!(bus.subscriber_count::<Saved>(), 2);
    }
}
