//! Virtualized grid widget hosting one selection engine.

mod geometry;
pub mod view;
