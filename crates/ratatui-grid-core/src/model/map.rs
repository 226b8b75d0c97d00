use std::collections::BTreeMap;
use std::collections::BTreeSet;

use super::range::SelectionRange;

/// Row index -> selected column indices.
///
/// A row holding an empty set counts as absent for every query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionMap {
    rows: BTreeMap<usize, BTreeSet<usize>>,
}

impl SelectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, row: usize, column: usize) -> bool {
        self.rows.entry(row).or_default().insert(column)
    }

    pub fn remove(&mut self, row: usize, column: usize) -> bool {
        self.rows
            .get_mut(&row)
            .map(|cols| cols.remove(&column))
            .unwrap_or(false)
    }

    pub fn contains(&self, row: usize, column: usize) -> bool {
        self.rows
            .get(&row)
            .is_some_and(|cols| cols.contains(&column))
    }

    /// Whether any column of `row` is selected.
    pub fn has_row(&self, row: usize) -> bool {
        self.rows.get(&row).is_some_and(|cols| !cols.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.values().all(|cols| cols.is_empty())
    }

    pub fn len(&self) -> usize {
        self.rows.values().map(|cols| cols.len()).sum()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn fill(&mut self, range: &SelectionRange) {
        for row in range.rows() {
            let cols = self.rows.entry(row).or_default();
            cols.extend(range.columns());
        }
    }

    /// Unions `other` into `self`.
    pub fn merge(&mut self, other: &SelectionMap) {
        for (row, cols) in &other.rows {
            if cols.is_empty() {
                continue;
            }
            self.rows.entry(*row).or_default().extend(cols.iter().copied());
        }
    }

    /// Selected cells in `(row, column)` order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows
            .iter()
            .flat_map(|(row, cols)| cols.iter().map(move |col| (*row, *col)))
    }

    /// Smallest range containing every selected cell.
    pub fn bounds(&self) -> Option<SelectionRange> {
        let mut out: Option<SelectionRange> = None;
        for (row, col) in self.cells() {
            out = Some(match out {
                None => SelectionRange {
                    row_start: row,
                    row_end: row,
                    column_start: col,
                    column_end: col,
                },
                Some(r) => SelectionRange {
                    row_start: r.row_start.min(row),
                    row_end: r.row_end.max(row),
                    column_start: r.column_start.min(col),
                    column_end: r.column_end.max(col),
                },
            });
        }
        out
    }
}
