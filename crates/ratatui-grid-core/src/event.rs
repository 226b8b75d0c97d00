//! Change notification for selection registries.
//!
//! Listeners subscribe with a closure and get back a [`SubscriptionId`] for unsubscribing.
//! Change events are handed out as `&mut` so a listener can veto the change by setting
//! `cancel`; the registry commits only after every listener has run.

use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Handler<E> = Box<dyn FnMut(&mut E)>;

pub struct EventHub<E> {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler<E>)>,
}

impl<E> Default for EventHub<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
        }
    }
}

impl<E> fmt::Debug for EventHub<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHub")
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}

impl<E> EventHub<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, handler: impl FnMut(&mut E) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(h, _)| *h != id);
        self.handlers.len() != before
    }

    pub fn has_subscribers(&self) -> bool {
        !self.handlers.is_empty()
    }

    /// Runs every handler in subscription order.
    pub fn emit(&mut self, event: &mut E) {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
    }
}

/// Cancelable payload emitted before a row or column selection change is committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionChangeEvent<K> {
    pub old_selection: Vec<K>,
    pub new_selection: Vec<K>,
    pub added: Vec<K>,
    pub removed: Vec<K>,
    /// Set by a listener to keep the old selection.
    pub cancel: bool,
    /// `false` when the change came from an API call rather than user interaction.
    pub user_triggered: bool,
}

pub type RowSelectionEvent<K> = SelectionChangeEvent<K>;

pub type ColumnSelectionEvent = SelectionChangeEvent<String>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn unsubscribed_handlers_stop_receiving() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut hub: EventHub<u32> = EventHub::new();
        let a = {
            let seen = seen.clone();
            hub.subscribe(move |v| seen.borrow_mut().push(("a", *v)))
        };
        {
            let seen = seen.clone();
            hub.subscribe(move |v| seen.borrow_mut().push(("b", *v)));
        }
        hub.emit(&mut 1);
        assert!(hub.unsubscribe(a));
        assert!(!hub.unsubscribe(a));
        hub.emit(&mut 2);
        assert_eq!(*seen.borrow(), vec![("a", 1), ("b", 1), ("b", 2)]);
    }

    #[test]
    fn handlers_can_mutate_the_event() {
        let mut hub: EventHub<SelectionChangeEvent<u8>> = EventHub::new();
        hub.subscribe(|e| e.cancel = true);
        let mut e = SelectionChangeEvent {
            old_selection: vec![],
            new_selection: vec![1],
            added: vec![1],
            removed: vec![],
            cancel: false,
            user_triggered: true,
        };
        hub.emit(&mut e);
        assert!(e.cancel);
    }
}
