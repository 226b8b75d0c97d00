/// The rectangle a multi-row-layout column occupies inside its block.
///
/// Spans use 1-based grid lines with exclusive ends, so a column covering a single cell in the
/// top-left corner of its block is `row_start: 1, row_end: 2, col_start: 1, col_end: 2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutSpan {
    pub row_start: usize,
    pub col_start: usize,
    pub row_end: usize,
    pub col_end: usize,
    /// Visible index of the layout column owning this span.
    pub column_visible_index: usize,
}

impl LayoutSpan {
    pub fn covers_row_line(&self, line: usize) -> bool {
        self.row_start <= line && line < self.row_end
    }

    pub fn covers_col_line(&self, line: usize) -> bool {
        self.col_start <= line && line < self.col_end
    }

    pub fn row_span(&self) -> usize {
        self.row_end.saturating_sub(self.row_start)
    }
}

/// One logical grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionNode {
    pub row: usize,
    pub column: usize,
    pub layout: Option<LayoutSpan>,
}

impl SelectionNode {
    pub fn new(row: usize, column: usize) -> Self {
        Self {
            row,
            column,
            layout: None,
        }
    }

    pub fn with_layout(mut self, layout: LayoutSpan) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Two nodes address the same cell. Layout metadata is ignored.
    pub fn same_cell(&self, other: &SelectionNode) -> bool {
        self.row == other.row && self.column == other.column
    }
}

/// An inclusive, normalized rectangle of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionRange {
    pub row_start: usize,
    pub row_end: usize,
    pub column_start: usize,
    pub column_end: usize,
}

impl SelectionRange {
    /// Bounding box between two nodes, in either order.
    pub fn between(a: &SelectionNode, b: &SelectionNode) -> Self {
        Self {
            row_start: a.row.min(b.row),
            row_end: a.row.max(b.row),
            column_start: a.column.min(b.column),
            column_end: a.column.max(b.column),
        }
    }

    pub fn single(node: &SelectionNode) -> Self {
        Self::between(node, node)
    }

    pub fn contains(&self, row: usize, column: usize) -> bool {
        row >= self.row_start
            && row <= self.row_end
            && column >= self.column_start
            && column <= self.column_end
    }

    pub fn rows(&self) -> std::ops::RangeInclusive<usize> {
        self.row_start..=self.row_end
    }

    pub fn columns(&self) -> std::ops::RangeInclusive<usize> {
        self.column_start..=self.column_end
    }

    pub fn cell_count(&self) -> usize {
        (self.row_end - self.row_start + 1) * (self.column_end - self.column_start + 1)
    }
}

/// Computes the range between `node` and the optional anchor.
///
/// Without an anchor the result is the 1x1 range of `node`.
pub fn generate_range(node: &SelectionNode, anchor: Option<&SelectionNode>) -> SelectionRange {
    match anchor {
        Some(anchor) => SelectionRange::between(node, anchor),
        None => SelectionRange::single(node),
    }
}
