use std::cell::Cell;
use std::collections::HashSet;
use std::hash::Hash;

use tracing::debug;

use crate::event::EventHub;
use crate::event::SelectionChangeEvent;
use crate::event::SubscriptionId;

/// Ordered id set with cancelable change notification, shared by the row and column registries.
#[derive(Debug)]
pub(crate) struct Registry<K> {
    kind: &'static str,
    selected: HashSet<K>,
    order: Vec<K>,
    all_selected: Cell<Option<bool>>,
    events: EventHub<SelectionChangeEvent<K>>,
}

impl<K> Registry<K>
where
    K: Eq + Hash + Clone,
{
    pub(crate) fn new(kind: &'static str) -> Self {
        Self {
            kind,
            selected: HashSet::new(),
            order: Vec::new(),
            all_selected: Cell::new(None),
            events: EventHub::new(),
        }
    }

    pub(crate) fn subscribe(
        &mut self,
        handler: impl FnMut(&mut SelectionChangeEvent<K>) + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(handler)
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    pub(crate) fn contains(&self, id: &K) -> bool {
        self.selected.contains(id)
    }

    pub(crate) fn order(&self) -> &[K] {
        &self.order
    }

    pub(crate) fn last(&self) -> Option<&K> {
        self.order.last()
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    /// Current selection followed by the ids of `extra` not yet selected.
    pub(crate) fn with_added<'a>(&self, extra: impl IntoIterator<Item = &'a K>) -> Vec<K>
    where
        K: 'a,
    {
        let mut out = self.order.clone();
        let mut seen: HashSet<&K> = self.selected.iter().collect();
        for id in extra {
            if seen.insert(id) {
                out.push(id.clone());
            }
        }
        out
    }

    /// Current selection minus `ids`.
    pub(crate) fn without(&self, ids: &HashSet<&K>) -> Vec<K> {
        self.order
            .iter()
            .filter(|id| !ids.contains(id))
            .cloned()
            .collect()
    }

    /// Emits a change event for `new_selection` and commits it unless a listener cancels.
    ///
    /// Returns whether the selection changed.
    pub(crate) fn propose(&mut self, new_selection: Vec<K>, user_triggered: bool) -> bool {
        if same_selection(&self.order, &new_selection) {
            return false;
        }
        let new_set: HashSet<&K> = new_selection.iter().collect();
        let added = new_selection
            .iter()
            .filter(|id| !self.selected.contains(*id))
            .cloned()
            .collect();
        let removed = self
            .order
            .iter()
            .filter(|id| !new_set.contains(id))
            .cloned()
            .collect();
        let mut event = SelectionChangeEvent {
            old_selection: self.order.clone(),
            new_selection,
            added,
            removed,
            cancel: false,
            user_triggered,
        };
        self.events.emit(&mut event);
        if event.cancel {
            debug!(kind = self.kind, "selection change canceled by listener");
            return false;
        }
        self.commit(event.new_selection);
        true
    }

    /// Replaces the selection without notifying listeners.
    pub(crate) fn commit(&mut self, ids: Vec<K>) {
        self.selected.clear();
        self.order.clear();
        for id in ids {
            if self.selected.insert(id.clone()) {
                self.order.push(id);
            }
        }
        self.invalidate();
    }

    pub(crate) fn invalidate(&self) {
        self.all_selected.set(None);
    }

    /// Memoized "every id in `visible` is selected". False when `visible` is empty.
    pub(crate) fn all_selected(&self, visible: &[&K]) -> bool {
        if let Some(cached) = self.all_selected.get() {
            return cached;
        }
        let all = !visible.is_empty() && visible.iter().all(|id| self.selected.contains(*id));
        self.all_selected.set(Some(all));
        all
    }
}

/// Order-independent equality by size and union size.
pub(crate) fn same_selection<K: Eq + Hash>(old: &[K], new: &[K]) -> bool {
    let old: HashSet<&K> = old.iter().collect();
    let new: HashSet<&K> = new.iter().collect();
    old.len() == new.len() && old.union(&new).count() == old.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_selection_ignores_order() {
        assert!(same_selection(&[1, 2, 3], &[3, 1, 2]));
        assert!(!same_selection(&[1, 2], &[1, 3]));
        assert!(!same_selection(&[1, 2], &[1, 2, 3]));
        assert!(same_selection::<u8>(&[], &[]));
    }

    #[test]
    fn no_op_changes_are_not_emitted() {
        use std::rc::Rc;

        let count = Rc::new(Cell::new(0));
        let mut r: Registry<u32> = Registry::new("test");
        {
            let count = count.clone();
            r.subscribe(move |_| count.set(count.get() + 1));
        }
        assert!(r.propose(vec![1, 2], true));
        assert!(!r.propose(vec![2, 1], true));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn listeners_can_rewrite_new_selection() {
        let mut r: Registry<u32> = Registry::new("test");
        r.subscribe(|e| e.new_selection.retain(|id| *id != 2));
        assert!(r.propose(vec![1, 2, 3], true));
        assert_eq!(r.order(), &[1, 3]);
    }
}
