use std::collections::HashMap;
use std::collections::HashSet;

use crate::error::GridError;
use crate::error::Result;
use crate::model::LayoutSpan;
use crate::model::SelectionNode;

/// A column declared inside a layout block, with 1-based grid lines and exclusive ends.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutColumn {
    pub field: String,
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
}

impl LayoutColumn {
    /// A column covering the single cell at `(row_start, col_start)`.
    pub fn new(field: impl Into<String>, row_start: usize, col_start: usize) -> Self {
        Self {
            field: field.into(),
            row_start,
            row_end: row_start + 1,
            col_start,
            col_end: col_start + 1,
        }
    }

    pub fn span(mut self, rows: usize, cols: usize) -> Self {
        self.row_end = self.row_start + rows;
        self.col_end = self.col_start + cols;
        self
    }
}

/// A column group whose children tile a rectangle per data record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutBlock {
    pub columns: Vec<LayoutColumn>,
}

impl LayoutBlock {
    pub fn new(columns: Vec<LayoutColumn>) -> Self {
        Self { columns }
    }
}

/// A layout column after visible indices have been assigned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedColumn {
    pub field: String,
    pub block: usize,
    pub span: LayoutSpan,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct BlockInfo {
    first: usize,
    len: usize,
    row_lines: usize,
    col_lines: usize,
}

/// Validated multi-row layout.
///
/// Visible indices run consecutively across blocks in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiRowLayout {
    columns: Vec<PlacedColumn>,
    blocks: Vec<BlockInfo>,
}

impl MultiRowLayout {
    pub fn new(blocks: Vec<LayoutBlock>) -> Result<Self> {
        let mut columns = Vec::new();
        let mut infos = Vec::with_capacity(blocks.len());
        let mut fields = HashSet::new();

        for (block_index, block) in blocks.into_iter().enumerate() {
            if block.columns.is_empty() {
                return Err(GridError::EmptyBlock(block_index));
            }
            let first = columns.len();
            let mut occupied: HashMap<(usize, usize), String> = HashMap::new();
            let mut row_lines = 0;
            let mut col_lines = 0;

            for col in block.columns {
                if col.row_start == 0
                    || col.col_start == 0
                    || col.row_end <= col.row_start
                    || col.col_end <= col.col_start
                {
                    return Err(GridError::InvalidSpan {
                        field: col.field,
                        row_start: col.row_start,
                        row_end: col.row_end,
                        col_start: col.col_start,
                        col_end: col.col_end,
                    });
                }
                if !fields.insert(col.field.clone()) {
                    return Err(GridError::DuplicateField(col.field));
                }
                for row in col.row_start..col.row_end {
                    for c in col.col_start..col.col_end {
                        if let Some(other) = occupied.insert((row, c), col.field.clone()) {
                            return Err(GridError::OverlappingSpans {
                                first: other,
                                second: col.field,
                                row,
                                col: c,
                            });
                        }
                    }
                }
                row_lines = row_lines.max(col.row_end - 1);
                col_lines = col_lines.max(col.col_end - 1);
                let visible_index = columns.len();
                columns.push(PlacedColumn {
                    span: LayoutSpan {
                        row_start: col.row_start,
                        col_start: col.col_start,
                        row_end: col.row_end,
                        col_end: col.col_end,
                        column_visible_index: visible_index,
                    },
                    field: col.field,
                    block: block_index,
                });
            }
            infos.push(BlockInfo {
                first,
                len: columns.len() - first,
                row_lines,
                col_lines,
            });
        }

        Ok(Self {
            columns,
            blocks: infos,
        })
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn column(&self, visible_index: usize) -> Option<&PlacedColumn> {
        self.columns.get(visible_index)
    }

    pub fn columns(&self) -> &[PlacedColumn] {
        &self.columns
    }

    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.field == field)
    }

    pub fn block_columns(&self, block: usize) -> &[PlacedColumn] {
        match self.blocks.get(block) {
            Some(info) => &self.columns[info.first..info.first + info.len],
            None => &[],
        }
    }

    /// Number of row lines a record occupies in `block`.
    pub fn block_rows(&self, block: usize) -> usize {
        self.blocks.get(block).map_or(0, |b| b.row_lines)
    }

    /// Number of column lines `block` is wide.
    pub fn block_cols(&self, block: usize) -> usize {
        self.blocks.get(block).map_or(0, |b| b.col_lines)
    }

    /// Tallest block; every record is this many lines high.
    pub fn record_rows(&self) -> usize {
        self.blocks.iter().map(|b| b.row_lines).max().unwrap_or(0)
    }

    /// Node for `visible_index` on data row `row`, carrying its span.
    pub fn node(&self, row: usize, visible_index: usize) -> Option<SelectionNode> {
        let col = self.column(visible_index)?;
        Some(SelectionNode::new(row, visible_index).with_layout(col.span))
    }

    /// The column of `block` covering the cell at `(row_line, col_line)`.
    pub fn covering(&self, block: usize, row_line: usize, col_line: usize) -> Option<&PlacedColumn> {
        self.block_columns(block)
            .iter()
            .find(|c| c.span.covers_row_line(row_line) && c.span.covers_col_line(col_line))
    }

    /// Columns of `block` whose rows cover `row_line`, ordered left to right.
    pub fn on_row_line(&self, block: usize, row_line: usize) -> Vec<&PlacedColumn> {
        let mut out: Vec<&PlacedColumn> = self
            .block_columns(block)
            .iter()
            .filter(|c| c.span.covers_row_line(row_line))
            .collect();
        out.sort_by_key(|c| c.span.col_start);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_visible_indices_across_blocks() {
        let layout = MultiRowLayout::new(vec![
            LayoutBlock::new(vec![
                LayoutColumn::new("id", 1, 1).span(2, 1),
                LayoutColumn::new("name", 1, 2),
                LayoutColumn::new("email", 2, 2),
            ]),
            LayoutBlock::new(vec![LayoutColumn::new("city", 1, 1).span(2, 1)]),
        ])
        .expect("valid layout");
        assert_eq!(layout.column_count(), 4);
        assert_eq!(layout.index_of("city"), Some(3));
        assert_eq!(layout.column(3).map(|c| c.block), Some(1));
        assert_eq!(layout.block_rows(0), 2);
        assert_eq!(layout.block_cols(0), 2);
        assert_eq!(layout.covering(0, 2, 1).map(|c| c.field.as_str()), Some("id"));
        let line2: Vec<&str> = layout
            .on_row_line(0, 2)
            .iter()
            .map(|c| c.field.as_str())
            .collect();
        assert_eq!(line2, vec!["id", "email"]);
    }

    #[test]
    fn rejects_invalid_layouts() {
        let empty_span = MultiRowLayout::new(vec![LayoutBlock::new(vec![
            LayoutColumn::new("a", 1, 1).span(0, 1),
        ])]);
        assert!(matches!(empty_span, Err(GridError::InvalidSpan { .. })));

        let zero_line = MultiRowLayout::new(vec![LayoutBlock::new(vec![LayoutColumn::new(
            "a", 0, 1,
        )])]);
        assert!(matches!(zero_line, Err(GridError::InvalidSpan { .. })));

        let overlap = MultiRowLayout::new(vec![LayoutBlock::new(vec![
            LayoutColumn::new("a", 1, 1).span(1, 2),
            LayoutColumn::new("b", 1, 2),
        ])]);
        assert_eq!(
            overlap,
            Err(GridError::OverlappingSpans {
                first: "a".into(),
                second: "b".into(),
                row: 1,
                col: 2,
            })
        );

        let dup = MultiRowLayout::new(vec![
            LayoutBlock::new(vec![LayoutColumn::new("a", 1, 1)]),
            LayoutBlock::new(vec![LayoutColumn::new("a", 1, 1)]),
        ]);
        assert_eq!(dup, Err(GridError::DuplicateField("a".into())));

        let empty = MultiRowLayout::new(vec![LayoutBlock::default()]);
        assert_eq!(empty, Err(GridError::EmptyBlock(0)));
    }
}
