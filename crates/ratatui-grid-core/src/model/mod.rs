//! Coordinates, ranges and the cell selection map.

mod map;
mod range;

pub use map::SelectionMap;
pub use range::LayoutSpan;
pub use range::SelectionNode;
pub use range::SelectionRange;
pub use range::generate_range;
