use tracing::warn;

use crate::navigation::MultiRowLayout;
use crate::navigation::scroll::GridMetrics;
use crate::navigation::scroll::ViewportWindow;

/// A horizontal band of the grid: one column in a flat grid, one layout block otherwise.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Track {
    left: u32,
    width: u32,
    /// Left offset of each column line, relative to the track.
    line_lefts: Vec<u32>,
    line_widths: Vec<u32>,
    /// Visible column indices drawn inside this track.
    columns: Vec<usize>,
}

/// Position of a column inside one record, relative to the record's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ColumnBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Cell-level geometry of a grid body, shared by rendering, hit-testing and scroll planning.
#[derive(Clone, Debug, Default)]
pub(crate) struct GridGeometry {
    line_height: u32,
    record_lines: u32,
    col_gap: u32,
    tracks: Vec<Track>,
    /// Visible column index to `(track, first line, line count, row line start, row span)`.
    placement: Vec<(usize, usize, usize, u32, u32)>,
    window: ViewportWindow,
}

impl GridGeometry {
    /// `widths[i]` is the requested width of visible column `i`.
    pub(crate) fn new(
        widths: &[u32],
        layout: Option<&MultiRowLayout>,
        line_height: u32,
        col_gap: u32,
    ) -> Self {
        let line_height = line_height.max(1);
        match layout {
            None => Self::flat(widths, line_height, col_gap),
            Some(layout) => Self::multi_row(widths, layout, line_height, col_gap),
        }
    }

    fn flat(widths: &[u32], line_height: u32, col_gap: u32) -> Self {
        let tracks = widths
            .iter()
            .enumerate()
            .map(|(i, w)| Track {
                left: 0,
                width: (*w).max(1),
                line_lefts: vec![0],
                line_widths: vec![(*w).max(1)],
                columns: vec![i],
            })
            .collect();
        let placement = (0..widths.len()).map(|i| (i, 0, 1, 1, 1)).collect();
        let mut geometry = Self {
            line_height,
            record_lines: 1,
            col_gap,
            tracks,
            placement,
            window: ViewportWindow::default(),
        };
        geometry.position_tracks();
        geometry
    }

    fn multi_row(
        widths: &[u32],
        layout: &MultiRowLayout,
        line_height: u32,
        col_gap: u32,
    ) -> Self {
        if widths.len() != layout.column_count() {
            warn!(
                widths = widths.len(),
                columns = layout.column_count(),
                "column widths do not match the layout"
            );
        }
        let width_of = |i: usize| widths.get(i).copied().unwrap_or(1).max(1);
        let mut tracks = Vec::with_capacity(layout.block_count());
        for block in 0..layout.block_count() {
            let lines = layout.block_cols(block);
            let mut line_widths = vec![1u32; lines];
            let columns = layout.block_columns(block);
            for col in columns.iter().filter(|c| c.span.col_end - c.span.col_start == 1) {
                let line = col.span.col_start - 1;
                line_widths[line] = line_widths[line].max(width_of(col.span.column_visible_index));
            }
            // Spanning columns widen their last line when the lines they cover are too narrow.
            for col in columns.iter().filter(|c| c.span.col_end - c.span.col_start > 1) {
                let (first, last) = (col.span.col_start - 1, col.span.col_end - 2);
                let have: u32 = line_widths[first..=last].iter().sum::<u32>()
                    + col_gap * (last - first) as u32;
                let need = width_of(col.span.column_visible_index);
                if need > have {
                    line_widths[last] += need - have;
                }
            }
            let mut line_lefts = Vec::with_capacity(lines);
            let mut x = 0u32;
            for w in &line_widths {
                line_lefts.push(x);
                x += w + col_gap;
            }
            tracks.push(Track {
                left: 0,
                width: x.saturating_sub(col_gap),
                line_lefts,
                line_widths,
                columns: columns.iter().map(|c| c.span.column_visible_index).collect(),
            });
        }
        let placement = layout
            .columns()
            .iter()
            .map(|c| {
                (
                    c.block,
                    c.span.col_start - 1,
                    c.span.col_end - c.span.col_start,
                    c.span.row_start as u32,
                    c.span.row_span() as u32,
                )
            })
            .collect();
        let mut geometry = Self {
            line_height,
            record_lines: layout.record_rows().max(1) as u32,
            col_gap,
            tracks,
            placement,
            window: ViewportWindow::default(),
        };
        geometry.position_tracks();
        geometry
    }

    fn position_tracks(&mut self) {
        let mut x = 0u32;
        for track in &mut self.tracks {
            track.left = x;
            x = x.saturating_add(track.width).saturating_add(self.col_gap);
        }
    }

    pub(crate) fn record_lines(&self) -> u32 {
        self.record_lines
    }

    pub(crate) fn record_height(&self) -> u32 {
        self.line_height * self.record_lines
    }

    pub(crate) fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub(crate) fn track_widths(&self) -> Vec<u32> {
        self.tracks.iter().map(|t| t.width).collect()
    }

    pub(crate) fn track_columns(&self, track: usize) -> &[usize] {
        self.tracks.get(track).map_or(&[], |t| t.columns.as_slice())
    }

    /// Where `column` sits inside its track and record, with rows `line_height` cells tall.
    pub(crate) fn column_box(&self, column: usize, line_height: u32) -> Option<ColumnBox> {
        let (track, first, lines, row_start, row_span) = *self.placement.get(column)?;
        let track = self.tracks.get(track)?;
        let x = *track.line_lefts.get(first)?;
        let last = first + lines - 1;
        let right = track.line_lefts.get(last)? + track.line_widths.get(last)?;
        Some(ColumnBox {
            x,
            y: (row_start - 1) * line_height,
            width: right - x,
            height: row_span * line_height,
        })
    }

    /// Visible column at content offset `x` and vertical offset `y` inside a record.
    pub(crate) fn column_at(&self, x: u32, y: u32, line_height: u32) -> Option<usize> {
        let track_index = self
            .tracks
            .iter()
            .position(|t| x >= t.left && x < t.left + t.width)?;
        let track = &self.tracks[track_index];
        let rel = x - track.left;
        let line = track
            .line_lefts
            .iter()
            .zip(&track.line_widths)
            .position(|(l, w)| rel >= *l && rel < l + w)?;
        let row_line = y / line_height.max(1) + 1;
        track.columns.iter().copied().find(|c| {
            self.placement.get(*c).is_some_and(|(_, first, lines, row_start, span)| {
                line >= *first
                    && line < first + lines
                    && row_line >= *row_start
                    && row_line < row_start + span
            })
        })
    }

    pub(crate) fn set_window(&mut self, window: ViewportWindow) {
        self.window = window;
    }
}

impl GridMetrics for GridGeometry {
    fn row_top(&self, row: usize) -> u32 {
        (row as u32).saturating_mul(self.record_height())
    }

    fn row_height(&self, _row: usize) -> u32 {
        self.record_height()
    }

    fn column_left(&self, column: usize) -> u32 {
        self.tracks.get(column).map_or(0, |t| t.left)
    }

    fn column_width(&self, column: usize) -> u32 {
        self.tracks.get(column).map_or(0, |t| t.width)
    }

    fn viewport(&self) -> ViewportWindow {
        self.window
    }
}
