//! Selection state owned by one grid instance.
//!
//! [`GridSelection`] bundles the cell state machine with the row and column registries so a
//! host passes around a single context object per grid.

mod cell;
mod columns;
mod registry;
mod rows;

pub use cell::CellSelection;
pub use columns::ColumnSelection;
pub use columns::ColumnSource;
pub use rows::HeaderCheckState;
pub use rows::InMemoryRows;
pub use rows::RowSelection;
pub use rows::RowSource;

use std::hash::Hash;

use crate::config::GridSelectionConfig;

#[derive(Debug)]
pub struct GridSelection<K> {
    pub cells: CellSelection,
    pub rows: RowSelection<K>,
    pub columns: ColumnSelection,
}

impl<K> GridSelection<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new(config: &GridSelectionConfig) -> Self {
        Self {
            cells: CellSelection::new(config.cell_selection),
            rows: RowSelection::new(config.row_selection),
            columns: ColumnSelection::new(config.column_selection),
        }
    }

    pub fn apply_config(&mut self, config: &GridSelectionConfig) {
        self.cells.set_mode(config.cell_selection);
        self.rows.set_mode(config.row_selection);
        self.columns.set_mode(config.column_selection);
    }
}

impl<K> Default for GridSelection<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new(&GridSelectionConfig::default())
    }
}
