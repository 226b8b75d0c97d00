use std::collections::HashSet;
use std::hash::Hash;

use tracing::debug;

use super::registry::Registry;
use crate::config::RowSelectionMode;
use crate::event::RowSelectionEvent;
use crate::event::SubscriptionId;

/// Host-side view of the grid data that row selection works against.
///
/// Implementations are queried on every operation, so filtering and pending deletes are always
/// read fresh.
pub trait RowSource<K> {
    /// Every row id in data-source order.
    fn row_ids(&self) -> &[K];

    /// Row ids in display order while a filter is applied.
    fn filtered_row_ids(&self) -> Option<&[K]> {
        None
    }

    /// Whether the row has a pending delete.
    fn is_deleted(&self, _id: &K) -> bool {
        false
    }

    fn is_filtered(&self) -> bool {
        self.filtered_row_ids().is_some()
    }

    fn visible_row_ids(&self) -> &[K] {
        self.filtered_row_ids().unwrap_or_else(|| self.row_ids())
    }
}

/// A [`RowSource`] backed by owned vectors.
#[derive(Clone, Debug)]
pub struct InMemoryRows<K> {
    pub ids: Vec<K>,
    pub filtered: Option<Vec<K>>,
    pub deleted: HashSet<K>,
}

impl<K> InMemoryRows<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new(ids: Vec<K>) -> Self {
        Self {
            ids,
            filtered: None,
            deleted: HashSet::new(),
        }
    }

    /// Keeps the rows matching `keep`, in data order.
    pub fn filter_by(&mut self, mut keep: impl FnMut(&K) -> bool) {
        self.filtered = Some(self.ids.iter().filter(|id| keep(id)).cloned().collect());
    }

    pub fn clear_filter(&mut self) {
        self.filtered = None;
    }

    pub fn mark_deleted(&mut self, id: K) {
        self.deleted.insert(id);
    }
}

impl<K> RowSource<K> for InMemoryRows<K>
where
    K: Eq + Hash,
{
    fn row_ids(&self) -> &[K] {
        &self.ids
    }

    fn filtered_row_ids(&self) -> Option<&[K]> {
        self.filtered.as_deref()
    }

    fn is_deleted(&self, id: &K) -> bool {
        self.deleted.contains(id)
    }
}

/// Tri-state of a "select all" header checkbox.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderCheckState {
    Unchecked,
    Indeterminate,
    Checked,
}

/// Selected row ids, independent of cell selection.
///
/// `K` is the primary-key value of a row, or whatever the host uses to identify a row when no
/// primary key is configured.
#[derive(Debug)]
pub struct RowSelection<K> {
    mode: RowSelectionMode,
    registry: Registry<K>,
}

impl<K> RowSelection<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new(mode: RowSelectionMode) -> Self {
        Self {
            mode,
            registry: Registry::new("row"),
        }
    }

    pub fn mode(&self) -> RowSelectionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RowSelectionMode) {
        self.mode = mode;
        if !mode.is_multiple() && self.registry.len() > 1 {
            let keep = self.registry.last().cloned().into_iter().collect();
            self.registry.commit(keep);
        }
        if !mode.is_enabled() {
            self.registry.commit(Vec::new());
        }
    }

    pub fn subscribe(
        &mut self,
        handler: impl FnMut(&mut RowSelectionEvent<K>) + 'static,
    ) -> SubscriptionId {
        self.registry.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.registry.unsubscribe(id)
    }

    pub fn is_row_selected(&self, id: &K) -> bool {
        self.registry.contains(id)
    }

    /// Selected ids in selection order.
    pub fn selected_rows(&self) -> &[K] {
        self.registry.order()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    fn is_selectable<S: RowSource<K> + ?Sized>(&self, id: &K, source: &S) -> bool {
        !source.is_deleted(id) && source.visible_row_ids().contains(id)
    }

    /// Selects one row, optionally dropping the previous selection.
    ///
    /// Filtered-out and deleted rows are rejected. Returns whether the selection changed.
    pub fn select_row_by_id<S>(&mut self, id: K, clear_previous: bool, source: &S) -> bool
    where
        S: RowSource<K> + ?Sized,
    {
        if !self.mode.is_enabled() {
            return false;
        }
        if !self.is_selectable(&id, source) {
            debug!("row is filtered out or pending delete, selection ignored");
            return false;
        }
        let clear = clear_previous || !self.mode.is_multiple();
        let new = if clear {
            vec![id]
        } else {
            self.registry.with_added([&id])
        };
        self.registry.propose(new, true)
    }

    pub fn deselect_row(&mut self, id: &K) -> bool {
        if !self.mode.is_enabled() || !self.registry.contains(id) {
            return false;
        }
        let new = self.registry.without(&HashSet::from([id]));
        self.registry.propose(new, true)
    }

    /// Extends the selection from the last selected row through `id`, in display order.
    ///
    /// Falls back to a single select when nothing is selected yet.
    pub fn select_multiple_rows<S>(&mut self, id: K, source: &S) -> bool
    where
        S: RowSource<K> + ?Sized,
    {
        if !self.mode.is_multiple() || self.registry.len() == 0 {
            return self.select_row_by_id(id, true, source);
        }
        if !self.is_selectable(&id, source) {
            debug!("range target is filtered out or pending delete");
            return false;
        }
        let visible = source.visible_row_ids();
        let target = visible.iter().position(|r| *r == id);
        let last = self
            .registry
            .last()
            .and_then(|last| visible.iter().position(|r| r == last));
        let (Some(target), Some(last)) = (target, last) else {
            return self.select_row_by_id(id, false, source);
        };
        let (from, to) = (last.min(target), last.max(target));
        let rows = visible[from..=to].iter().filter(|r| !source.is_deleted(r));
        let new = self.registry.with_added(rows);
        self.registry.propose(new, true)
    }

    /// Selects every visible, non-deleted row. Rows hidden by a filter keep their state.
    pub fn select_all_rows<S>(&mut self, source: &S) -> bool
    where
        S: RowSource<K> + ?Sized,
    {
        if !self.mode.is_multiple() {
            return false;
        }
        let rows = source
            .visible_row_ids()
            .iter()
            .filter(|r| !source.is_deleted(r));
        let new = self.registry.with_added(rows);
        self.registry.propose(new, true)
    }

    /// Deselects the visible rows, or everything when no filter is applied.
    pub fn clear_row_selection<S>(&mut self, source: &S) -> bool
    where
        S: RowSource<K> + ?Sized,
    {
        let new = match source.filtered_row_ids() {
            Some(visible) => self.registry.without(&visible.iter().collect()),
            None => Vec::new(),
        };
        let changed = self.registry.propose(new, true);
        self.registry.invalidate();
        changed
    }

    /// Selects `ids` as an API call. Unselectable ids are skipped.
    pub fn select_rows<S>(&mut self, ids: &[K], clear_previous: bool, source: &S) -> bool
    where
        S: RowSource<K> + ?Sized,
    {
        if !self.mode.is_enabled() {
            return false;
        }
        let visible: HashSet<&K> = source.visible_row_ids().iter().collect();
        let ids: Vec<&K> = ids
            .iter()
            .filter(|id| !source.is_deleted(id) && visible.contains(id))
            .collect();
        let new = if clear_previous {
            ids.into_iter().cloned().collect()
        } else {
            self.registry.with_added(ids)
        };
        self.registry.propose(new, false)
    }

    pub fn deselect_rows(&mut self, ids: &[K]) -> bool {
        let new = self.registry.without(&ids.iter().collect());
        self.registry.propose(new, false)
    }

    /// Replaces the selection without notifying listeners.
    pub fn select_rows_with_no_event(&mut self, ids: &[K], clear_previous: bool) {
        let new = if clear_previous {
            ids.to_vec()
        } else {
            self.registry.with_added(ids)
        };
        self.registry.commit(new);
    }

    pub fn deselect_rows_with_no_event(&mut self, ids: &[K]) {
        let new = self.registry.without(&ids.iter().collect());
        self.registry.commit(new);
    }

    /// Memoized check that every visible, non-deleted row is selected.
    ///
    /// The memo is dropped on every commit and by [`Self::clear_header_cache`]; hosts call the
    /// latter when the data or filter changes.
    pub fn are_all_rows_selected<S>(&self, source: &S) -> bool
    where
        S: RowSource<K> + ?Sized,
    {
        let visible: Vec<&K> = source
            .visible_row_ids()
            .iter()
            .filter(|r| !source.is_deleted(r))
            .collect();
        self.registry.all_selected(&visible)
    }

    pub fn clear_header_cache(&self) {
        self.registry.invalidate();
    }

    pub fn header_state<S>(&self, source: &S) -> HeaderCheckState
    where
        S: RowSource<K> + ?Sized,
    {
        if self.are_all_rows_selected(source) {
            return HeaderCheckState::Checked;
        }
        if self.filtered_selected_ids(source).is_empty() {
            HeaderCheckState::Unchecked
        } else {
            HeaderCheckState::Indeterminate
        }
    }

    /// Selected ids among the visible rows, in display order.
    pub fn filtered_selected_ids<S>(&self, source: &S) -> Vec<K>
    where
        S: RowSource<K> + ?Sized,
    {
        source
            .visible_row_ids()
            .iter()
            .filter(|r| self.registry.contains(r))
            .cloned()
            .collect()
    }
}
