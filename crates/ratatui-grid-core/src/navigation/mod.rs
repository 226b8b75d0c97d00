//! Keyboard navigation: the next active node for a command.
//!
//! [`GridNavigator`] handles plain grids, [`MrlNavigator`] handles multi-row layouts whose
//! columns span rows and columns inside repeating blocks. Neither wraps at the grid edges except
//! for Tab, which continues on the next row.

mod layout;
mod mrl;
pub mod scroll;

pub use layout::LayoutBlock;
pub use layout::LayoutColumn;
pub use layout::MultiRowLayout;
pub use layout::PlacedColumn;
pub use mrl::MrlNavigator;

use crate::model::SelectionNode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavCommand {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    ShiftTab,
    Space,
    Enter,
    Escape,
}

/// A command plus the modifiers navigation cares about.
///
/// `shift` is not used for movement; hosts forward it to
/// [`CellSelection::keyboard_state_on_keydown`](crate::selection::CellSelection::keyboard_state_on_keydown).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavInput {
    pub command: NavCommand,
    pub ctrl: bool,
    pub shift: bool,
}

impl NavInput {
    pub fn new(command: NavCommand) -> Self {
        Self {
            command,
            ctrl: false,
            shift: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavOutcome {
    Moved(SelectionNode),
    Unchanged,
    Activate(SelectionNode),
    ToggleRowSelection(usize),
    Exit,
}

impl NavOutcome {
    fn moved_from(from: &SelectionNode, to: SelectionNode) -> Self {
        if from.same_cell(&to) {
            NavOutcome::Unchanged
        } else {
            NavOutcome::Moved(to)
        }
    }

    /// Outcomes of commands that never move.
    fn non_moving(from: &SelectionNode, command: NavCommand) -> Option<Self> {
        match command {
            NavCommand::Space => Some(NavOutcome::ToggleRowSelection(from.row)),
            NavCommand::Enter => Some(NavOutcome::Activate(*from)),
            NavCommand::Escape => Some(NavOutcome::Exit),
            _ => None,
        }
    }
}

/// Navigation over a plain `rows x columns` grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridNavigator {
    pub rows: usize,
    pub columns: usize,
    /// Rows moved by PageUp/PageDown.
    pub page_rows: usize,
}

impl GridNavigator {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
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
        if self.rows == 0 || self.columns == 0 {
            return NavOutcome::Unchanged;
        }
        let last_row = self.rows - 1;
        let last_col = self.columns - 1;
        let row = from.row.min(last_row);
        let col = from.column.min(last_col);
        let page = self.page_rows.max(1);

        let (row, col) = match (input.command, input.ctrl) {
            (NavCommand::Up, true) => (0, col),
            (NavCommand::Up, false) => (row.saturating_sub(1), col),
            (NavCommand::Down, true) => (last_row, col),
            (NavCommand::Down, false) => ((row + 1).min(last_row), col),
            (NavCommand::Left, true) => (row, 0),
            (NavCommand::Left, false) => (row, col.saturating_sub(1)),
            (NavCommand::Right, true) => (row, last_col),
            (NavCommand::Right, false) => (row, (col + 1).min(last_col)),
            (NavCommand::Home, true) => (0, 0),
            (NavCommand::Home, false) => (row, 0),
            (NavCommand::End, true) => (last_row, last_col),
            (NavCommand::End, false) => (row, last_col),
            (NavCommand::PageUp, _) => (row.saturating_sub(page), col),
            (NavCommand::PageDown, _) => ((row + page).min(last_row), col),
            (NavCommand::Tab, _) => {
                if col < last_col {
                    (row, col + 1)
                } else if row < last_row {
                    (row + 1, 0)
                } else {
                    (row, col)
                }
            }
            (NavCommand::ShiftTab, _) => {
                if col > 0 {
                    (row, col - 1)
                } else if row > 0 {
                    (row - 1, last_col)
                } else {
                    (row, col)
                }
            }
            (NavCommand::Space | NavCommand::Enter | NavCommand::Escape, _) => (row, col),
        };
        NavOutcome::moved_from(&from, SelectionNode::new(row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(row: usize, column: usize) -> SelectionNode {
        SelectionNode::new(row, column)
    }

    fn cmd(command: NavCommand) -> NavInput {
        NavInput::new(command)
    }

    #[test]
    fn arrows_clamp_without_wrapping() {
        let nav = GridNavigator::new(3, 3);
        assert_eq!(nav.navigate(at(0, 0), cmd(NavCommand::Up)), NavOutcome::Unchanged);
        assert_eq!(nav.navigate(at(0, 0), cmd(NavCommand::Left)), NavOutcome::Unchanged);
        assert_eq!(nav.navigate(at(2, 2), cmd(NavCommand::Right)), NavOutcome::Unchanged);
        assert_eq!(
            nav.navigate(at(1, 1), cmd(NavCommand::Down)),
            NavOutcome::Moved(at(2, 1))
        );
    }

    #[test]
    fn ctrl_jumps_to_edges() {
        let nav = GridNavigator::new(10, 5);
        let cases = [
            (NavCommand::Up, at(0, 2)),
            (NavCommand::Down, at(9, 2)),
            (NavCommand::Left, at(4, 0)),
            (NavCommand::Right, at(4, 4)),
            (NavCommand::Home, at(0, 0)),
            (NavCommand::End, at(9, 4)),
        ];
        for (command, expected) in cases {
            assert_eq!(
                nav.navigate(at(4, 2), cmd(command).with_ctrl()),
                NavOutcome::Moved(expected),
                "{command:?}"
            );
        }
    }

    #[test]
    fn tab_wraps_rows_and_stops_at_corners() {
        let nav = GridNavigator::new(2, 2);
        assert_eq!(
            nav.navigate(at(0, 1), cmd(NavCommand::Tab)),
            NavOutcome::Moved(at(1, 0))
        );
        assert_eq!(nav.navigate(at(1, 1), cmd(NavCommand::Tab)), NavOutcome::Unchanged);
        assert_eq!(
            nav.navigate(at(1, 0), cmd(NavCommand::ShiftTab)),
            NavOutcome::Moved(at(0, 1))
        );
        assert_eq!(
            nav.navigate(at(0, 0), cmd(NavCommand::ShiftTab)),
            NavOutcome::Unchanged
        );
    }

    #[test]
    fn paging_clamps() {
        let nav = GridNavigator::new(100, 1).with_page_rows(30);
        assert_eq!(
            nav.navigate(at(80, 0), cmd(NavCommand::PageDown)),
            NavOutcome::Moved(at(99, 0))
        );
        assert_eq!(
            nav.navigate(at(10, 0), cmd(NavCommand::PageUp)),
            NavOutcome::Moved(at(0, 0))
        );
    }

    #[test]
    fn action_keys_do_not_move() {
        let nav = GridNavigator::new(4, 4);
        assert_eq!(
            nav.navigate(at(2, 1), cmd(NavCommand::Space)),
            NavOutcome::ToggleRowSelection(2)
        );
        assert_eq!(
            nav.navigate(at(2, 1), cmd(NavCommand::Enter)),
            NavOutcome::Activate(at(2, 1))
        );
        assert_eq!(nav.navigate(at(2, 1), cmd(NavCommand::Escape)), NavOutcome::Exit);
    }

    #[test]
    fn empty_grid_never_moves() {
        let nav = GridNavigator::new(0, 3);
        assert_eq!(nav.navigate(at(0, 0), cmd(NavCommand::Down)), NavOutcome::Unchanged);
    }
}
