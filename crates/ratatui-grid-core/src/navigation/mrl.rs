use tracing::trace;

use super::MultiRowLayout;
use super::NavCommand;
use super::NavInput;
use super::NavOutcome;
use super::PlacedColumn;
use crate::model::SelectionNode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dir {
    Prev,
    Next,
}

/// Navigation over a grid whose columns are arranged by a [`MultiRowLayout`].
///
/// Positions are `(data row, visible column index)`; every produced node carries the span of
/// its column.
#[derive(Clone, Copy, Debug)]
pub struct MrlNavigator<'a> {
    layout: &'a MultiRowLayout,
    rows: usize,
    page_rows: usize,
}

impl<'a> MrlNavigator<'a> {
    pub fn new(layout: &'a MultiRowLayout, rows: usize) -> Self {
        Self {
            layout,
            rows,
            page_rows: 1,
        }
    }

    pub fn with_page_rows(mut self, page_rows: usize) -> Self {
        self.page_rows = page_rows;
        self
    }

    pub fn navigate(&self, from: SelectionNode, input: NavInput) -> NavOutcome {
        if let Some(outcome) = NavOutcome::non_moving(&from, input.command) {
            return outcome;
        }
        let count = self.layout.column_count();
        if self.rows == 0 || count == 0 {
            return NavOutcome::Unchanged;
        }
        let row = from.row.min(self.rows - 1);
        let Some(current) = self.layout.column(from.column.min(count - 1)) else {
            return NavOutcome::Unchanged;
        };
        let last_row = self.rows - 1;
        let page = self.page_rows.max(1);
        let index = current.span.column_visible_index;

        let target = match (input.command, input.ctrl) {
            (NavCommand::Left, false) => self.horizontal(current, Dir::Prev).map(|c| (row, c)),
            (NavCommand::Right, false) => self.horizontal(current, Dir::Next).map(|c| (row, c)),
            (NavCommand::Left, true) | (NavCommand::Home, false) => {
                self.line_edge(current, Dir::Prev).map(|c| (row, c))
            }
            (NavCommand::Right, true) | (NavCommand::End, false) => {
                self.line_edge(current, Dir::Next).map(|c| (row, c))
            }
            (NavCommand::Up, false) => self.vertical(row, current, Dir::Prev),
            (NavCommand::Down, false) => self.vertical(row, current, Dir::Next),
            (NavCommand::Up, true) => Some((0, index)),
            (NavCommand::Down, true) => Some((last_row, index)),
            (NavCommand::PageUp, _) => Some((row.saturating_sub(page), index)),
            (NavCommand::PageDown, _) => Some(((row + page).min(last_row), index)),
            (NavCommand::Home, true) => self.first_column().map(|c| (0, c)),
            (NavCommand::End, true) => self.last_column().map(|c| (last_row, c)),
            (NavCommand::Tab, _) => self.tab(row, index, Dir::Next),
            (NavCommand::ShiftTab, _) => self.tab(row, index, Dir::Prev),
            (NavCommand::Space | NavCommand::Enter | NavCommand::Escape, _) => None,
        };

        let Some((row, column)) = target else {
            trace!(command = ?input.command, row, column = index, "no candidate, position kept");
            return NavOutcome::Unchanged;
        };
        match self.layout.node(row, column) {
            Some(node) => NavOutcome::moved_from(&from, node),
            None => NavOutcome::Unchanged,
        }
    }

    /// Sibling on the current row line, then the adjacent block.
    fn horizontal(&self, current: &PlacedColumn, dir: Dir) -> Option<usize> {
        let line = current.span.row_start;
        let siblings = self.layout.on_row_line(current.block, line);
        let sibling = match dir {
            Dir::Next => siblings
                .iter()
                .find(|c| c.span.col_start > current.span.col_start),
            Dir::Prev => siblings
                .iter()
                .rev()
                .find(|c| c.span.col_start < current.span.col_start),
        };
        if let Some(col) = sibling {
            return Some(col.span.column_visible_index);
        }

        let block = match dir {
            Dir::Next => current.block + 1,
            Dir::Prev => current.block.checked_sub(1)?,
        };
        let line = line.min(self.layout.block_rows(block));
        let crossed = match dir {
            Dir::Next => self.layout.covering(block, line, 1),
            Dir::Prev => self.layout.on_row_line(block, line).last().copied(),
        };
        crossed.map(|c| c.span.column_visible_index)
    }

    fn line_edge(&self, current: &PlacedColumn, dir: Dir) -> Option<usize> {
        let block = match dir {
            Dir::Prev => 0,
            Dir::Next => self.layout.block_count().checked_sub(1)?,
        };
        let line = current.span.row_start.min(self.layout.block_rows(block));
        let columns = self.layout.on_row_line(block, line);
        let col = match dir {
            Dir::Prev => columns.first(),
            Dir::Next => columns.last(),
        };
        col.map(|c| c.span.column_visible_index)
    }

    fn vertical(&self, row: usize, current: &PlacedColumn, dir: Dir) -> Option<(usize, usize)> {
        let block = current.block;
        let block_rows = self.layout.block_rows(block);
        let (row, line) = match dir {
            Dir::Next if current.span.row_end <= block_rows => (row, current.span.row_end),
            Dir::Next if row + 1 < self.rows => (row + 1, 1),
            Dir::Prev if current.span.row_start > 1 => (row, current.span.row_start - 1),
            Dir::Prev if row > 0 => (row - 1, block_rows),
            _ => return None,
        };
        let col_line = current.span.col_start;
        let col = self
            .layout
            .covering(block, line, col_line)
            .or_else(|| {
                self.layout
                    .block_columns(block)
                    .iter()
                    .filter(|c| c.span.row_start == line)
                    .min_by_key(|c| c.span.col_start)
            })?;
        Some((row, col.span.column_visible_index))
    }

    fn first_column(&self) -> Option<usize> {
        self.layout
            .covering(0, 1, 1)
            .map(|c| c.span.column_visible_index)
    }

    fn last_column(&self) -> Option<usize> {
        let block = self.layout.block_count().checked_sub(1)?;
        self.layout
            .covering(
                block,
                self.layout.block_rows(block),
                self.layout.block_cols(block),
            )
            .map(|c| c.span.column_visible_index)
    }

    /// Visible indices in Tab order: row line by row line, blocks left to right.
    fn tab_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.layout.column_count());
        for line in 1..=self.layout.record_rows() {
            for block in 0..self.layout.block_count() {
                let mut starting: Vec<&PlacedColumn> = self
                    .layout
                    .block_columns(block)
                    .iter()
                    .filter(|c| c.span.row_start == line)
                    .collect();
                starting.sort_by_key(|c| c.span.col_start);
                order.extend(starting.iter().map(|c| c.span.column_visible_index));
            }
        }
        order
    }

    fn tab(&self, row: usize, index: usize, dir: Dir) -> Option<(usize, usize)> {
        let order = self.tab_order();
        let pos = order.iter().position(|i| *i == index)?;
        match dir {
            Dir::Next => match order.get(pos + 1) {
                Some(next) => Some((row, *next)),
                None if row + 1 < self.rows => order.first().map(|first| (row + 1, *first)),
                None => None,
            },
            Dir::Prev => match pos.checked_sub(1) {
                Some(prev) => Some((row, order[prev])),
                None if row > 0 => order.last().map(|last| (row - 1, *last)),
                None => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::LayoutBlock;
    use crate::navigation::LayoutColumn;

    // block 0 (3 lines x 2 cols)      block 1
    // +---+---+                       +---+
    // | a | b |                       |   |
    // |   +---+                       | e |
    // |   | c |                       |   |
    // +---+---+                       +---+
    // |   d   |
    // +-------+
    fn layout() -> MultiRowLayout {
        MultiRowLayout::new(vec![
            LayoutBlock::new(vec![
                LayoutColumn::new("a", 1, 1).span(2, 1),
                LayoutColumn::new("b", 1, 2),
                LayoutColumn::new("c", 2, 2),
                LayoutColumn::new("d", 3, 1).span(1, 2),
            ]),
            LayoutBlock::new(vec![LayoutColumn::new("e", 1, 1).span(3, 1)]),
        ])
        .expect("valid layout")
    }

    const A: usize = 0;
    const B: usize = 1;
    const C: usize = 2;
    const D: usize = 3;
    const E: usize = 4;

    fn moved(outcome: NavOutcome) -> Option<(usize, usize)> {
        match outcome {
            NavOutcome::Moved(node) => Some((node.row, node.column)),
            _ => None,
        }
    }

    fn go(
        nav: &MrlNavigator<'_>,
        row: usize,
        column: usize,
        input: NavInput,
    ) -> Option<(usize, usize)> {
        moved(nav.navigate(SelectionNode::new(row, column), input))
    }

    #[test]
    fn down_stays_in_record_when_block_has_room() {
        let layout = layout();
        let nav = MrlNavigator::new(&layout, 5);
        let down = NavInput::new(NavCommand::Down);
        assert_eq!(go(&nav, 0, A, down), Some((0, D)));
        assert_eq!(go(&nav, 0, B, down), Some((0, C)));
        assert_eq!(go(&nav, 0, C, down), Some((0, D)));
        assert_eq!(go(&nav, 0, D, down), Some((1, A)));
        assert_eq!(go(&nav, 4, D, down), None);
    }

    #[test]
    fn up_moves_to_previous_record_bottom_line() {
        let layout = layout();
        let nav = MrlNavigator::new(&layout, 5);
        let up = NavInput::new(NavCommand::Up);
        assert_eq!(go(&nav, 1, A, up), Some((0, D)));
        assert_eq!(go(&nav, 1, C, up), Some((1, B)));
        assert_eq!(go(&nav, 1, D, up), Some((1, A)));
        assert_eq!(go(&nav, 0, B, up), None);
    }

    #[test]
    fn horizontal_prefers_siblings_then_crosses_blocks() {
        let layout = layout();
        let nav = MrlNavigator::new(&layout, 5);
        let right = NavInput::new(NavCommand::Right);
        let left = NavInput::new(NavCommand::Left);
        assert_eq!(go(&nav, 2, A, right), Some((2, B)));
        assert_eq!(go(&nav, 2, B, right), Some((2, E)));
        assert_eq!(go(&nav, 2, C, right), Some((2, E)));
        assert_eq!(go(&nav, 2, E, right), None);
        assert_eq!(go(&nav, 2, E, left), Some((2, B)));
        assert_eq!(go(&nav, 2, C, left), Some((2, A)));
        assert_eq!(go(&nav, 2, A, left), None);
        assert_eq!(go(&nav, 2, D, right), Some((2, E)));
    }

    #[test]
    fn ctrl_and_home_end_jump_to_edges() {
        let layout = layout();
        let nav = MrlNavigator::new(&layout, 5);
        assert_eq!(go(&nav, 2, C, NavInput::new(NavCommand::Home)), Some((2, A)));
        assert_eq!(go(&nav, 2, C, NavInput::new(NavCommand::End)), Some((2, E)));
        assert_eq!(
            go(&nav, 2, C, NavInput::new(NavCommand::Up).with_ctrl()),
            Some((0, C))
        );
        assert_eq!(
            go(&nav, 2, C, NavInput::new(NavCommand::Down).with_ctrl()),
            Some((4, C))
        );
        assert_eq!(
            go(&nav, 2, C, NavInput::new(NavCommand::Home).with_ctrl()),
            Some((0, A))
        );
        assert_eq!(
            go(&nav, 2, C, NavInput::new(NavCommand::End).with_ctrl()),
            Some((4, E))
        );
    }

    #[test]
    fn tab_walks_row_lines_then_records() {
        let layout = layout();
        let nav = MrlNavigator::new(&layout, 2);
        let tab = NavInput::new(NavCommand::Tab);
        let back = NavInput::new(NavCommand::ShiftTab);
        assert_eq!(go(&nav, 0, B, tab), Some((0, E)));
        assert_eq!(go(&nav, 0, E, tab), Some((0, C)));
        assert_eq!(go(&nav, 0, D, tab), Some((1, A)));
        assert_eq!(go(&nav, 1, D, tab), None);
        assert_eq!(go(&nav, 1, A, back), Some((0, D)));
        assert_eq!(go(&nav, 0, A, back), None);
    }

    #[test]
    fn produced_nodes_carry_their_span() {
        let layout = layout();
        let nav = MrlNavigator::new(&layout, 3);
        let NavOutcome::Moved(node) =
            nav.navigate(SelectionNode::new(0, A), NavInput::new(NavCommand::Down))
        else {
            panic!("expected a move");
        };
        let span = node.layout.expect("span");
        assert_eq!((span.row_start, span.row_end), (3, 4));
        assert_eq!((span.col_start, span.col_end), (1, 3));
        assert_eq!(span.column_visible_index, D);
    }

    #[test]
    fn paging_keeps_the_column() {
        let layout = layout();
        let nav = MrlNavigator::new(&layout, 50).with_page_rows(20);
        assert_eq!(
            go(&nav, 40, B, NavInput::new(NavCommand::PageDown)),
            Some((49, B))
        );
        assert_eq!(
            go(&nav, 10, B, NavInput::new(NavCommand::PageUp)),
            Some((0, B))
        );
    }
}
