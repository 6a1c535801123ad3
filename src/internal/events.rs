use std::collections::HashMap;

use strum_macros::Display;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Window title used while nothing is selected.
pub const DEFAULT_TITLE: &str = "News Tracker";

/// State changes the session reports to presentation collaborators.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum SessionEvent {
    /// The window/document title should now read this.
    DocumentTitle(String),
    /// The search input should take focus.
    FocusSearch,
    /// Loading, error or results changed.
    SearchStatusChanged,
    FavoritesChanged { count: usize },
}

pub type SubscriptionId = u64;

/// Handle returned by [`EventBus::subscribe`].
pub struct Subscription {
    pub id: SubscriptionId,
    pub receiver: UnboundedReceiver<SessionEvent>,
}

/// Fan-out of session events to any number of subscribers.
#[derive(Default)]
pub struct EventBus {
    subscribers: HashMap<SubscriptionId, UnboundedSender<SessionEvent>>,
    next_id: SubscriptionId,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.insert(id, tx);
        Subscription { id, receiver: rx }
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(&id).is_some()
    }

    pub fn emit(&mut self, event: SessionEvent) {
        tracing::trace!(%event, "session event");
        // Drop subscribers whose receiver is gone.
        self.subscribers
            .retain(|_, tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_reaches_all_subscribers() {
        let mut bus = EventBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();
        assert_ne!(a.id, b.id);

        bus.emit(SessionEvent::FocusSearch);

        assert_eq!(a.receiver.try_recv().unwrap(), SessionEvent::FocusSearch);
        assert_eq!(b.receiver.try_recv().unwrap(), SessionEvent::FocusSearch);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let mut sub = bus.subscribe();

        assert!(bus.unsubscribe(sub.id));
        assert!(!bus.unsubscribe(sub.id));

        bus.emit(SessionEvent::SearchStatusChanged);
        assert!(sub.receiver.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receivers_are_pruned() {
        let mut bus = EventBus::new();
        let sub = bus.subscribe();
        let _kept = bus.subscribe();
        drop(sub);

        bus.emit(SessionEvent::FavoritesChanged { count: 1 });
        assert_eq!(bus.subscriber_count(), 1);
    }
}
