//! `ratatui-grid` is the batteries-included facade over `ratatui-grid-core`.
//!
//! It re-exports the selection engine and the [`datagrid::view::DataGridView`] widget, and adds
//! a [`help::HelpBar`] that renders the grid's key bindings.
//!
//! ```no_run
//! use ratatui_grid::datagrid::view::DataGridColumn;
//! use ratatui_grid::datagrid::view::DataGridView;
//!
//! let mut grid = DataGridView::new();
//! grid.set_columns(vec![DataGridColumn::new("id", 6), DataGridColumn::new("name", 16)]);
//! grid.set_row_count(1_000);
//! ```
pub use ratatui_grid_core::GridError;
pub use ratatui_grid_core::Result;
pub use ratatui_grid_core::config;
#[cfg(feature = "crossterm")]
pub use ratatui_grid_core::crossterm_input;
pub use ratatui_grid_core::datagrid;
pub use ratatui_grid_core::error;
pub use ratatui_grid_core::event;
pub use ratatui_grid_core::input;
pub use ratatui_grid_core::keymap;
pub use ratatui_grid_core::model;
pub use ratatui_grid_core::navigation;
pub use ratatui_grid_core::render;
pub use ratatui_grid_core::selection;
pub use ratatui_grid_core::theme;
pub use ratatui_grid_core::viewport;

pub mod help;
