//! `ratatui-grid-core` provides the selection engine of a data grid and a virtualized ratatui
//! widget built on top of it.
//!
//! The engine is headless: hosts feed pointer and keyboard gestures in, and read selected cells,
//! committed ranges and the active cell back out. The widget is one such host.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: you drive input + rendering from your app.
//! - No async runtime: all state lives on the main thread.
//! - Copy is app-controlled: the grid emits [`datagrid::view::DataGridAction::CopyRequested`]
//!   and the caller decides how to integrate with a clipboard.
//!
//! ## Getting started
//!
//! Most users should depend on the facade crate `ratatui-grid`. Use this crate directly if you
//! only need the engine.
//!
//! Useful entry points:
//! - [`selection::CellSelection`]: cell and range selection driven by pointer and keyboard.
//! - [`selection::RowSelection`] and [`selection::ColumnSelection`]: id registries with
//!   single/multiple modes and change events.
//! - [`navigation::GridNavigator`] and [`navigation::MrlNavigator`]: keyboard focus movement
//!   over flat grids and multi-row layouts.
//! - [`navigation::scroll::plan_scroll`]: scroll offsets that bring a focused cell into view.
//! - [`datagrid::view::DataGridView`]: virtualized 2D grid.
pub mod config;
pub mod error;
pub mod event;
pub mod input;
pub mod keymap;
pub mod model;
pub mod navigation;
pub mod selection;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

pub mod datagrid;
pub mod render;
pub mod theme;
pub mod viewport;

pub use error::GridError;
pub use error::Result;
