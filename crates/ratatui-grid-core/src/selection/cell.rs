use tracing::trace;

use crate::config::CellSelectionMode;
use crate::event::EventHub;
use crate::event::SubscriptionId;
use crate::input::PointerButtons;
use crate::model::SelectionMap;
use crate::model::SelectionNode;
use crate::model::SelectionRange;
use crate::model::generate_range;

#[derive(Clone, Debug, Default)]
struct PointerState {
    /// Anchor of the current click/drag/shift-click gesture.
    node: Option<SelectionNode>,
    last_entered: Option<SelectionNode>,
    ctrl: bool,
    shift: bool,
    in_grid_body: bool,
    toggled_off: bool,
}

#[derive(Clone, Debug, Default)]
struct KeyboardState {
    node: Option<SelectionNode>,
    range: Option<SelectionRange>,
    shift: bool,
    active: bool,
}

/// Cell selection state machine for one grid.
///
/// Pointer and keyboard gestures are fed in as they happen; the machine keeps the committed
/// [`SelectionMap`], the committed ranges, a temporary map for ctrl-drags in progress and the
/// active (focused) node.
#[derive(Debug, Default)]
pub struct CellSelection {
    mode: CellSelectionMode,
    selection: SelectionMap,
    temp: SelectionMap,
    ranges: Vec<SelectionRange>,
    active: Option<SelectionNode>,
    pointer: PointerState,
    keyboard: KeyboardState,
    drag_mode: bool,
    range_changed: EventHub<SelectionRange>,
}

impl CellSelection {
    pub fn new(mode: CellSelectionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> CellSelectionMode {
        self.mode
    }

    /// Switching modes drops the current selection but keeps the active node.
    pub fn set_mode(&mut self, mode: CellSelectionMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.reset_gestures();
        self.clear(false);
    }

    pub fn subscribe_range_changed(
        &mut self,
        handler: impl FnMut(&mut SelectionRange) + 'static,
    ) -> SubscriptionId {
        self.range_changed.subscribe(handler)
    }

    pub fn unsubscribe_range_changed(&mut self, id: SubscriptionId) -> bool {
        self.range_changed.unsubscribe(id)
    }

    pub fn active(&self) -> Option<SelectionNode> {
        self.active
    }

    pub fn set_active(&mut self, node: SelectionNode) {
        self.active = Some(node);
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    pub fn is_active_node(&self, node: &SelectionNode) -> bool {
        self.active.is_some_and(|a| a.same_cell(node))
    }

    pub fn drag_mode(&self) -> bool {
        self.drag_mode
    }

    fn cells_selectable(&self) -> bool {
        self.mode != CellSelectionMode::None
    }

    /// Whether `node` is in the committed map or in a drag still in progress.
    pub fn is_in_map(&self, node: &SelectionNode) -> bool {
        self.selection.contains(node.row, node.column) || self.temp.contains(node.row, node.column)
    }

    /// Whether `node` should render as selected.
    pub fn selected(&self, node: &SelectionNode) -> bool {
        (self.is_active_node(node) && self.cells_selectable()) || self.is_in_map(node)
    }

    pub fn is_empty(&self) -> bool {
        self.selection.is_empty() && self.temp.is_empty()
    }

    pub fn selection_map(&self) -> &SelectionMap {
        &self.selection
    }

    /// Committed cells in `(row, column)` order.
    pub fn selected_cells(&self) -> Vec<(usize, usize)> {
        self.selection.cells().collect()
    }

    pub fn add(&mut self, node: &SelectionNode) {
        if !self.cells_selectable() {
            return;
        }
        self.selection.insert(node.row, node.column);
        self.push_range(generate_range(node, None));
    }

    /// Drops `node` from the map. Committed ranges covering it are split around it.
    pub fn remove(&mut self, node: &SelectionNode) {
        self.selection.remove(node.row, node.column);
        if self.is_active_node(node) {
            self.active = None;
        }
        let mut kept = Vec::with_capacity(self.ranges.len());
        for range in self.ranges.drain(..) {
            if range.contains(node.row, node.column) {
                for part in split_around(&range, node.row, node.column) {
                    if !kept.contains(&part) {
                        kept.push(part);
                    }
                }
            } else if !kept.contains(&range) {
                kept.push(range);
            }
        }
        self.ranges = kept;
    }

    /// Clears selected cells and ranges. Gesture anchors are kept.
    pub fn clear(&mut self, clear_active: bool) {
        if clear_active {
            self.active = None;
        }
        self.selection.clear();
        self.temp.clear();
        self.ranges.clear();
    }

    /// Clears everything including gesture state and the active node.
    pub fn reset(&mut self) {
        self.reset_gestures();
        self.clear(true);
    }

    fn reset_gestures(&mut self) {
        self.pointer = PointerState::default();
        self.keyboard = KeyboardState::default();
        self.drag_mode = false;
    }

    /// Fills the rectangle between `node` and `anchor` into the committed map, or into the
    /// temporary map (cleared first) when `temporary` is set.
    pub fn select_range(
        &mut self,
        node: &SelectionNode,
        anchor: Option<&SelectionNode>,
        temporary: bool,
    ) {
        let range = generate_range(node, anchor);
        if temporary {
            self.temp.clear();
            self.temp.fill(&range);
        } else {
            self.selection.fill(&range);
        }
    }

    /// Committed ranges plus a pending keyboard range.
    ///
    /// When nothing is selected, the active node is reported as a 1x1 range so callers always
    /// see the focus position.
    pub fn ranges(&self) -> Vec<SelectionRange> {
        let mut out = self.ranges.clone();
        if let Some(range) = self.keyboard.range
            && !out.contains(&range)
        {
            out.push(range);
        }
        if out.is_empty()
            && self.cells_selectable()
            && let Some(active) = self.active
        {
            out.push(generate_range(&active, None));
        }
        out
    }

    pub fn pointer_down(&mut self, node: SelectionNode, shift: bool, ctrl: bool) {
        if !self.cells_selectable() {
            return;
        }
        let multiple = self.mode == CellSelectionMode::Multiple;
        let (shift, ctrl) = (shift && multiple, ctrl && multiple);
        trace!(row = node.row, column = node.column, shift, ctrl, "pointer down");

        self.add_keyboard_range();
        self.keyboard = KeyboardState::default();
        self.drag_mode = false;
        self.pointer.ctrl = ctrl;
        self.pointer.shift = shift;
        self.pointer.in_grid_body = true;
        self.pointer.toggled_off = false;
        self.pointer.last_entered = None;

        if !ctrl {
            self.clear(false);
        }

        if shift {
            let anchor = *self
                .pointer
                .node
                .get_or_insert(self.active.unwrap_or(node));
            self.clear(false);
            self.select_range(&node, Some(&anchor), false);
            return;
        }

        if ctrl && self.selection.contains(node.row, node.column) {
            self.remove(&node);
            self.pointer.toggled_off = true;
        }
        self.pointer.node = Some(node);
    }

    /// Extends a primary-button drag. Returns whether drag mode is active.
    pub fn pointer_enter(&mut self, node: SelectionNode, buttons: PointerButtons) -> bool {
        self.drag_mode = buttons.is_primary_only()
            && self.pointer.in_grid_body
            && self.mode == CellSelectionMode::Multiple;
        if !self.drag_mode {
            return false;
        }
        let anchor = *self.pointer.node.get_or_insert(node);
        self.pointer.last_entered = Some(node);
        trace!(row = node.row, column = node.column, "pointer drag");
        if self.pointer.ctrl {
            self.select_range(&node, Some(&anchor), true);
        } else {
            self.selection.clear();
            self.select_range(&node, Some(&anchor), false);
        }
        true
    }

    /// Finishes a pointer gesture. Returns the range committed by a drag or shift-click.
    ///
    /// A release without a preceding press in the grid body only ends a drag.
    pub fn pointer_up(&mut self, node: SelectionNode) -> Option<SelectionRange> {
        let in_body = self.pointer.in_grid_body;
        let committed = if self.drag_mode {
            Some(self.commit_drag(&node))
        } else if in_body && self.pointer.shift {
            let range = generate_range(&node, self.pointer.node.as_ref());
            self.push_range(range);
            Some(range)
        } else {
            if in_body && self.is_active_node(&node) && !self.pointer.toggled_off {
                self.add(&node);
            }
            None
        };
        self.end_pointer_gesture();
        if let Some(mut range) = committed {
            self.range_changed.emit(&mut range);
        }
        committed
    }

    /// The pointer was released outside the grid body.
    pub fn pointer_up_outside(&mut self) -> Option<SelectionRange> {
        self.end_pointer_gesture();
        if !self.drag_mode {
            return None;
        }
        let node = self.pointer.last_entered.or(self.pointer.node)?;
        let mut range = self.commit_drag(&node);
        self.range_changed.emit(&mut range);
        Some(range)
    }

    /// Keeps the anchor for later shift-clicks; modifiers belong to one gesture.
    fn end_pointer_gesture(&mut self) {
        self.pointer.in_grid_body = false;
        self.pointer.shift = false;
        self.pointer.ctrl = false;
        self.pointer.toggled_off = false;
    }

    /// Replaces the selection with the rectangle between `first` and `last` and commits it as
    /// one range. Only available in [`CellSelectionMode::Multiple`].
    pub fn select_all(
        &mut self,
        first: SelectionNode,
        last: SelectionNode,
    ) -> Option<SelectionRange> {
        if self.mode != CellSelectionMode::Multiple {
            return None;
        }
        self.reset_gestures();
        self.clear(false);
        self.select_range(&last, Some(&first), false);
        let mut range = generate_range(&last, Some(&first));
        self.push_range(range);
        trace!(?range, "select all");
        self.range_changed.emit(&mut range);
        Some(range)
    }

    fn commit_drag(&mut self, node: &SelectionNode) -> SelectionRange {
        let range = generate_range(node, self.pointer.node.as_ref());
        self.push_range(range);
        self.selection.merge(&self.temp);
        self.temp.clear();
        self.drag_mode = false;
        trace!(?range, "drag committed");
        range
    }

    /// Records whether the focus change about to happen extends the selection.
    pub fn keyboard_state_on_keydown(&mut self, node: SelectionNode, shift: bool, shift_tab: bool) {
        self.keyboard.active = true;
        self.pointer = PointerState::default();
        self.drag_mode = false;
        self.keyboard.shift = shift && !shift_tab && self.mode == CellSelectionMode::Multiple;
        if self.keyboard.shift && self.keyboard.node.is_none() {
            self.clear(false);
            self.keyboard.node = Some(node);
        }
    }

    /// Applies a keyboard-driven focus change to `node`.
    ///
    /// Returns the anchor-to-node range while shift-extending.
    pub fn keyboard_state_on_focus(&mut self, node: SelectionNode) -> Option<SelectionRange> {
        if !self.keyboard.active {
            return None;
        }
        if self.keyboard.shift {
            let anchor = self.keyboard.node;
            self.selection.clear();
            self.select_range(&node, anchor.as_ref(), false);
            let mut range = generate_range(&node, anchor.as_ref());
            self.keyboard.range = Some(range);
            trace!(?range, "keyboard range");
            self.range_changed.emit(&mut range);
            return Some(range);
        }
        self.keyboard = KeyboardState::default();
        self.clear(false);
        self.add(&node);
        None
    }

    fn add_keyboard_range(&mut self) {
        if let Some(range) = self.keyboard.range.take() {
            self.push_range(range);
        }
    }

    fn push_range(&mut self, range: SelectionRange) {
        if !self.ranges.contains(&range) {
            self.ranges.push(range);
        }
    }

    /// Tab-separated text for the bounding box of the committed selection.
    ///
    /// Unselected cells inside the box become empty fields. Falls back to the active cell when
    /// nothing is selected.
    pub fn copy_text<F>(&self, mut value_of: F) -> Option<String>
    where
        F: FnMut(usize, usize) -> String,
    {
        let Some(bounds) = self.selection.bounds() else {
            let active = self.active.filter(|_| self.cells_selectable())?;
            return Some(value_of(active.row, active.column));
        };
        let mut out = String::new();
        for row in bounds.rows() {
            if row > bounds.row_start {
                out.push('\n');
            }
            for col in bounds.columns() {
                if col > bounds.column_start {
                    out.push('\t');
                }
                if self.selection.contains(row, col) {
                    out.push_str(&value_of(row, col));
                }
            }
        }
        Some(out)
    }
}

/// Up to four rectangles covering `range` minus the single cell `(row, col)`.
fn split_around(range: &SelectionRange, row: usize, col: usize) -> Vec<SelectionRange> {
    let mut parts = Vec::with_capacity(4);
    if row > range.row_start {
        parts.push(SelectionRange {
            row_end: row - 1,
            ..*range
        });
    }
    if row < range.row_end {
        parts.push(SelectionRange {
            row_start: row + 1,
            ..*range
        });
    }
    if col > range.column_start {
        parts.push(SelectionRange {
            row_start: row,
            row_end: row,
            column_start: range.column_start,
            column_end: col - 1,
        });
    }
    if col < range.column_end {
        parts.push(SelectionRange {
            row_start: row,
            row_end: row,
            column_start: col + 1,
            column_end: range.column_end,
        });
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(row: usize, column: usize) -> SelectionNode {
        SelectionNode::new(row, column)
    }

    fn rect(
        row_start: usize,
        row_end: usize,
        column_start: usize,
        column_end: usize,
    ) -> SelectionRange {
        SelectionRange {
            row_start,
            row_end,
            column_start,
            column_end,
        }
    }

    /// Mouse down, focus, mouse up on one cell.
    fn click(
        s: &mut CellSelection,
        node: SelectionNode,
        shift: bool,
        ctrl: bool,
    ) -> Option<SelectionRange> {
        s.pointer_down(node, shift, ctrl);
        s.set_active(node);
        s.pointer_up(node)
    }

    #[test]
    fn shift_click_commits_rectangle_from_anchor() {
        let mut s = CellSelection::new(CellSelectionMode::Multiple);
        s.pointer_down(n(1, 1), false, false);
        s.pointer_down(n(3, 3), true, false);
        let range = s.pointer_up(n(3, 3));
        assert_eq!(range, Some(rect(1, 3, 1, 3)));
        assert_eq!(s.ranges(), vec![rect(1, 3, 1, 3)]);
        assert_eq!(s.selected_cells().len(), 9);
    }

    #[test]
    fn shift_click_without_anchor_uses_active_node() {
        let mut s = CellSelection::new(CellSelectionMode::Multiple);
        s.set_active(n(2, 0));
        s.pointer_down(n(0, 2), true, false);
        assert_eq!(s.pointer_up(n(0, 2)), Some(rect(0, 2, 0, 2)));
    }

    #[test]
    fn second_shift_click_extends_from_original_anchor() {
        let mut s = CellSelection::new(CellSelectionMode::Multiple);
        click(&mut s, n(2, 2), false, false);
        click(&mut s, n(4, 4), true, false);
        click(&mut s, n(0, 0), true, false);
        assert_eq!(s.ranges(), vec![rect(0, 2, 0, 2)]);
        assert!(!s.is_in_map(&n(4, 4)));
    }

    #[test]
    fn ctrl_click_toggles_membership() {
        let mut s = CellSelection::new(CellSelectionMode::Multiple);
        click(&mut s, n(0, 0), false, false);
        click(&mut s, n(1, 1), false, true);
        assert_eq!(s.selected_cells(), vec![(0, 0), (1, 1)]);

        click(&mut s, n(0, 0), false, true);
        assert_eq!(s.selected_cells(), vec![(1, 1)]);
        assert_eq!(s.ranges(), vec![rect(1, 1, 1, 1)]);
    }

    #[test]
    fn ctrl_click_inside_range_splits_it() {
        let mut s = CellSelection::new(CellSelectionMode::Multiple);
        click(&mut s, n(0, 0), false, false);
        click(&mut s, n(2, 2), true, false);
        click(&mut s, n(1, 1), false, true);
        assert_eq!(s.selected_cells().len(), 8);
        let covered: usize = s.ranges().iter().map(|r| r.cell_count()).sum();
        assert_eq!(covered, 8);
        assert!(s.ranges().iter().all(|r| !r.contains(1, 1)));
    }

    #[test]
    fn drag_without_ctrl_replaces_selection() {
        let mut s = CellSelection::new(CellSelectionMode::Multiple);
        click(&mut s, n(5, 5), false, false);

        s.pointer_down(n(0, 0), false, false);
        assert!(s.pointer_enter(n(1, 0), PointerButtons::PRIMARY));
        assert!(s.pointer_enter(n(1, 1), PointerButtons::PRIMARY));
        let range = s.pointer_up(n(1, 1));
        assert_eq!(range, Some(rect(0, 1, 0, 1)));
        assert_eq!(s.selected_cells(), vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn drag_with_ctrl_merges_into_selection() {
        let mut s = CellSelection::new(CellSelectionMode::Multiple);
        click(&mut s, n(5, 5), false, false);

        s.pointer_down(n(0, 0), false, true);
        assert!(s.pointer_enter(n(1, 1), PointerButtons::PRIMARY));
        assert!(s.is_in_map(&n(1, 1)));
        assert!(!s.selection_map().contains(1, 1));
        s.pointer_up(n(1, 1));
        assert_eq!(
            s.selected_cells(),
            vec![(0, 0), (0, 1), (1, 0), (1, 1), (5, 5)]
        );
        assert!(s.ranges().contains(&rect(5, 5, 5, 5)));
        assert!(s.ranges().contains(&rect(0, 1, 0, 1)));
    }

    #[test]
    fn drag_requires_primary_button_only() {
        let mut s = CellSelection::new(CellSelectionMode::Multiple);
        s.pointer_down(n(0, 0), false, false);
        let chord = PointerButtons::PRIMARY.union(PointerButtons::SECONDARY);
        assert!(!s.pointer_enter(n(2, 2), chord));
        assert!(!s.pointer_enter(n(2, 2), PointerButtons::NONE));
        assert!(!s.drag_mode());
    }

    #[test]
    fn drag_released_outside_commits_last_entered() {
        let mut s = CellSelection::new(CellSelectionMode::Multiple);
        s.pointer_down(n(0, 0), false, false);
        s.pointer_enter(n(2, 3), PointerButtons::PRIMARY);
        assert_eq!(s.pointer_up_outside(), Some(rect(0, 2, 0, 3)));
        assert!(!s.drag_mode());
    }

    #[test]
    fn keyboard_shift_extends_from_first_node() {
        let mut s = CellSelection::new(CellSelectionMode::Multiple);
        s.set_active(n(1, 1));

        s.keyboard_state_on_keydown(n(1, 1), true, false);
        s.set_active(n(2, 1));
        assert_eq!(s.keyboard_state_on_focus(n(2, 1)), Some(rect(1, 2, 1, 1)));

        s.keyboard_state_on_keydown(n(2, 1), true, false);
        s.set_active(n(2, 2));
        assert_eq!(s.keyboard_state_on_focus(n(2, 2)), Some(rect(1, 2, 1, 2)));
        assert_eq!(s.ranges(), vec![rect(1, 2, 1, 2)]);
        assert_eq!(s.selected_cells().len(), 4);
    }

    #[test]
    fn plain_keyboard_navigation_selects_only_target() {
        let mut s = CellSelection::new(CellSelectionMode::Multiple);
        click(&mut s, n(0, 0), false, false);
        click(&mut s, n(3, 3), true, false);

        s.keyboard_state_on_keydown(n(3, 3), false, false);
        assert_eq!(s.keyboard_state_on_focus(n(4, 3)), None);
        assert_eq!(s.selected_cells(), vec![(4, 3)]);
    }

    #[test]
    fn shift_tab_does_not_extend() {
        let mut s = CellSelection::new(CellSelectionMode::Multiple);
        s.keyboard_state_on_keydown(n(0, 1), true, true);
        assert_eq!(s.keyboard_state_on_focus(n(0, 0)), None);
        assert_eq!(s.selected_cells(), vec![(0, 0)]);
    }

    #[test]
    fn pointer_down_commits_pending_keyboard_range() {
        let mut s = CellSelection::new(CellSelectionMode::Multiple);
        s.keyboard_state_on_keydown(n(0, 0), true, false);
        s.keyboard_state_on_focus(n(1, 1));
        click(&mut s, n(3, 3), false, true);
        assert!(s.ranges().contains(&rect(0, 1, 0, 1)));
        assert!(s.ranges().contains(&rect(3, 3, 3, 3)));
    }

    #[test]
    fn ranges_fall_back_to_active_node() {
        let mut s = CellSelection::new(CellSelectionMode::Multiple);
        assert!(s.ranges().is_empty());
        s.set_active(n(4, 2));
        assert_eq!(s.ranges(), vec![rect(4, 4, 2, 2)]);

        s.set_mode(CellSelectionMode::None);
        assert!(s.ranges().is_empty());
        assert!(!s.selected(&n(4, 2)));
    }

    #[test]
    fn single_mode_ignores_modifiers_and_drag() {
        let mut s = CellSelection::new(CellSelectionMode::Single);
        click(&mut s, n(0, 0), false, false);
        assert_eq!(click(&mut s, n(2, 2), true, true), None);
        assert_eq!(s.selected_cells(), vec![(2, 2)]);
        s.pointer_down(n(0, 0), false, false);
        assert!(!s.pointer_enter(n(1, 1), PointerButtons::PRIMARY));
    }

    #[test]
    fn remove_clears_matching_active_node() {
        let mut s = CellSelection::new(CellSelectionMode::Multiple);
        click(&mut s, n(1, 1), false, false);
        s.remove(&n(1, 1));
        assert_eq!(s.active(), None);
        assert!(s.is_empty());
    }

    #[test]
    fn range_changed_listeners_receive_committed_ranges() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut s = CellSelection::new(CellSelectionMode::Multiple);
        let id = {
            let seen = seen.clone();
            s.subscribe_range_changed(move |r| seen.borrow_mut().push(*r))
        };
        click(&mut s, n(0, 0), false, false);
        click(&mut s, n(1, 2), true, false);
        assert!(s.unsubscribe_range_changed(id));
        click(&mut s, n(2, 2), true, false);
        assert_eq!(*seen.borrow(), vec![rect(0, 1, 0, 2)]);
    }

    #[test]
    fn copy_text_fills_gaps_with_empty_fields() {
        let mut s = CellSelection::new(CellSelectionMode::Multiple);
        click(&mut s, n(0, 0), false, false);
        click(&mut s, n(1, 2), false, true);
        let text = s.copy_text(|r, c| format!("r{r}c{c}"));
        assert_eq!(text.as_deref(), Some("r0c0\t\t\n\t\tr1c2"));
    }

    #[test]
    fn release_without_body_press_does_not_replay_shift_click() {
        let mut s = CellSelection::new(CellSelectionMode::Multiple);
        click(&mut s, n(1, 1), false, false);
        click(&mut s, n(3, 2), true, false);

        // Pressed on the header or outside the grid, released over a body cell.
        assert_eq!(s.pointer_up(n(0, 0)), None);
        assert_eq!(s.ranges(), vec![rect(1, 3, 1, 2)]);
        assert!(!s.is_in_map(&n(0, 0)));
        assert_eq!(s.selected_cells().len(), 6);
    }

    #[test]
    fn plain_click_after_shift_click_is_not_a_shift_click() {
        let mut s = CellSelection::new(CellSelectionMode::Multiple);
        click(&mut s, n(0, 0), false, false);
        click(&mut s, n(2, 2), true, false);
        assert_eq!(click(&mut s, n(4, 4), false, false), None);
        assert_eq!(s.selected_cells(), vec![(4, 4)]);
        assert_eq!(s.ranges(), vec![rect(4, 4, 4, 4)]);
    }

    #[test]
    fn ctrl_shift_click_replaces_with_anchor_rectangle() {
        let mut s = CellSelection::new(CellSelectionMode::Multiple);
        click(&mut s, n(0, 0), false, false);
        click(&mut s, n(5, 5), false, true);
        assert_eq!(s.selected_cells(), vec![(0, 0), (5, 5)]);

        let range = click(&mut s, n(1, 1), true, true);
        assert_eq!(range, Some(rect(1, 5, 1, 5)));
        assert_eq!(s.ranges(), vec![rect(1, 5, 1, 5)]);
        assert_eq!(s.selected_cells().len(), 25);
        assert!(!s.is_in_map(&n(0, 0)));
    }

    #[test]
    fn select_all_commits_one_range_and_notifies() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut s = CellSelection::new(CellSelectionMode::Multiple);
        {
            let seen = seen.clone();
            s.subscribe_range_changed(move |r| seen.borrow_mut().push(*r));
        }
        click(&mut s, n(1, 1), false, false);

        assert_eq!(s.select_all(n(0, 0), n(9, 2)), Some(rect(0, 9, 0, 2)));
        assert_eq!(s.selected_cells().len(), 30);
        assert_eq!(s.ranges(), vec![rect(0, 9, 0, 2)]);
        assert_eq!(*seen.borrow(), vec![rect(0, 9, 0, 2)]);

        let mut single = CellSelection::new(CellSelectionMode::Single);
        assert_eq!(single.select_all(n(0, 0), n(9, 2)), None);
        assert!(single.is_empty());
    }
}
