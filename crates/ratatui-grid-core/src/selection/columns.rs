use std::collections::HashSet;

use tracing::debug;

use super::registry::Registry;
use crate::config::ColumnSelectionMode;
use crate::event::ColumnSelectionEvent;
use crate::event::SubscriptionId;

/// Host-side list of columns that may be selected.
pub trait ColumnSource {
    /// Field names of the visible, selectable columns in visible order.
    fn selectable_fields(&self) -> Vec<&str>;
}

impl ColumnSource for [String] {
    fn selectable_fields(&self) -> Vec<&str> {
        self.iter().map(String::as_str).collect()
    }
}

impl ColumnSource for Vec<String> {
    fn selectable_fields(&self) -> Vec<&str> {
        self.as_slice().selectable_fields()
    }
}

impl ColumnSource for [&str] {
    fn selectable_fields(&self) -> Vec<&str> {
        self.to_vec()
    }
}

/// Selected column field names.
#[derive(Debug)]
pub struct ColumnSelection {
    mode: ColumnSelectionMode,
    registry: Registry<String>,
}

impl Default for ColumnSelection {
    fn default() -> Self {
        Self::new(ColumnSelectionMode::default())
    }
}

impl ColumnSelection {
    pub fn new(mode: ColumnSelectionMode) -> Self {
        Self {
            mode,
            registry: Registry::new("column"),
        }
    }

    pub fn mode(&self) -> ColumnSelectionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ColumnSelectionMode) {
        self.mode = mode;
        if !mode.is_multiple() {
            let keep = if mode.is_enabled() {
                self.registry.last().cloned().into_iter().collect()
            } else {
                Vec::new()
            };
            self.registry.commit(keep);
        }
    }

    pub fn subscribe(
        &mut self,
        handler: impl FnMut(&mut ColumnSelectionEvent) + 'static,
    ) -> SubscriptionId {
        self.registry.subscribe(handler)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.registry.unsubscribe(id)
    }

    pub fn is_column_selected(&self, field: &str) -> bool {
        self.registry.order().iter().any(|f| f == field)
    }

    pub fn selected_columns(&self) -> &[String] {
        self.registry.order()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.len() == 0
    }

    fn accepts<S: ColumnSource + ?Sized>(&self, field: &str, source: &S) -> bool {
        if !self.mode.is_enabled() {
            return false;
        }
        let ok = source.selectable_fields().contains(&field);
        if !ok {
            debug!(field, "column is hidden, unknown or not selectable");
        }
        ok
    }

    pub fn select_column<S>(&mut self, field: &str, clear_previous: bool, source: &S) -> bool
    where
        S: ColumnSource + ?Sized,
    {
        if !self.accepts(field, source) {
            return false;
        }
        let field = field.to_string();
        let new = if clear_previous || !self.mode.is_multiple() {
            vec![field]
        } else {
            self.registry.with_added([&field])
        };
        self.registry.propose(new, true)
    }

    /// Selects `fields` as an API call. Unselectable fields are skipped.
    pub fn select_columns<S>(&mut self, fields: &[&str], clear_previous: bool, source: &S) -> bool
    where
        S: ColumnSource + ?Sized,
    {
        let fields: Vec<String> = fields
            .iter()
            .filter(|f| self.accepts(f, source))
            .map(|f| f.to_string())
            .collect();
        if fields.is_empty() && !clear_previous {
            return false;
        }
        let fields = if self.mode.is_multiple() {
            fields
        } else {
            fields.into_iter().take(1).collect()
        };
        let new = if clear_previous || !self.mode.is_multiple() {
            fields
        } else {
            self.registry.with_added(&fields)
        };
        self.registry.propose(new, false)
    }

    pub fn deselect_column(&mut self, field: &str) -> bool {
        if !self.is_column_selected(field) {
            return false;
        }
        let field = field.to_string();
        let new = self.registry.without(&HashSet::from([&field]));
        self.registry.propose(new, true)
    }

    pub fn deselect_columns(&mut self, fields: &[&str]) -> bool {
        let owned: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
        let new = self.registry.without(&owned.iter().collect());
        self.registry.propose(new, false)
    }

    /// Extends the selection from the last selected column through `field`, in visible order.
    pub fn select_multiple_columns<S>(&mut self, field: &str, source: &S) -> bool
    where
        S: ColumnSource + ?Sized,
    {
        if !self.mode.is_multiple() || self.is_empty() {
            return self.select_column(field, true, source);
        }
        if !self.accepts(field, source) {
            return false;
        }
        let fields = source.selectable_fields();
        let target = fields.iter().position(|f| *f == field);
        let last = self
            .registry
            .last()
            .and_then(|last| fields.iter().position(|f| f == last));
        let (Some(target), Some(last)) = (target, last) else {
            return self.select_column(field, false, source);
        };
        let (from, to) = (last.min(target), last.max(target));
        let range: Vec<String> = fields[from..=to].iter().map(|f| f.to_string()).collect();
        let new = self.registry.with_added(&range);
        self.registry.propose(new, true)
    }

    pub fn select_all_columns<S>(&mut self, source: &S) -> bool
    where
        S: ColumnSource + ?Sized,
    {
        if !self.mode.is_multiple() {
            return false;
        }
        let all: Vec<String> = source
            .selectable_fields()
            .into_iter()
            .map(str::to_string)
            .collect();
        let new = self.registry.with_added(&all);
        self.registry.propose(new, true)
    }

    pub fn clear_column_selection(&mut self) -> bool {
        let changed = self.registry.propose(Vec::new(), true);
        self.registry.invalidate();
        changed
    }

    /// Memoized check that every selectable column is selected.
    pub fn are_all_columns_selected<S>(&self, source: &S) -> bool
    where
        S: ColumnSource + ?Sized,
    {
        let fields: Vec<String> = source
            .selectable_fields()
            .into_iter()
            .map(str::to_string)
            .collect();
        let refs: Vec<&String> = fields.iter().collect();
        self.registry.all_selected(&refs)
    }

    pub fn clear_header_cache(&self) {
        self.registry.invalidate();
    }
}
