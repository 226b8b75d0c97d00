//! Errors returned when a grid is configured with invalid structure.
//!
//! Interaction never fails: rejected selections and blocked navigation are silent no-ops.

/// Configuration errors for layouts and column registries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// A layout column whose span is empty or starts before line 1.
    #[error(
        "invalid span for column `{field}`: rows {row_start}..{row_end}, cols {col_start}..{col_end}"
    )]
    InvalidSpan {
        field: String,
        row_start: usize,
        row_end: usize,
        col_start: usize,
        col_end: usize,
    },

    /// Two columns of one block claim the same cell.
    #[error("columns `{first}` and `{second}` overlap at row line {row}, col line {col}")]
    OverlappingSpans {
        first: String,
        second: String,
        row: usize,
        col: usize,
    },

    /// A layout block without columns.
    #[error("layout block {0} has no columns")]
    EmptyBlock(usize),

    /// The same field name was declared twice.
    #[error("duplicate column field `{0}`")]
    DuplicateField(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;
