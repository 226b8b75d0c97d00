//! Scroll decisions for a newly active node.
//!
//! Everything is measured in terminal cells. A host computes a [`ScrollPlan`] after navigation
//! and applies it before reacting to the move, so the active cell is on screen when it renders.

use crate::model::SelectionNode;
use crate::navigation::MultiRowLayout;

/// The visible part of the grid body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewportWindow {
    pub scroll_x: u32,
    pub scroll_y: u32,
    pub width: u32,
    pub height: u32,
}

/// Geometry of a grid body.
///
/// With a [`MultiRowLayout`], rows are data records and column positions are indexed by layout
/// block rather than by visible column.
pub trait GridMetrics {
    fn row_top(&self, row: usize) -> u32;
    fn row_height(&self, row: usize) -> u32;
    fn column_left(&self, column: usize) -> u32;
    fn column_width(&self, column: usize) -> u32;
    fn viewport(&self) -> ViewportWindow;
}

/// Uniform row height and per-column widths separated by `gap`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedMetrics {
    row_height: u32,
    widths: Vec<u32>,
    lefts: Vec<u32>,
    window: ViewportWindow,
}

impl FixedMetrics {
    pub fn new(row_height: u32, widths: Vec<u32>, gap: u32) -> Self {
        let mut lefts = Vec::with_capacity(widths.len());
        let mut x = 0u32;
        for w in &widths {
            lefts.push(x);
            x = x.saturating_add(*w).saturating_add(gap);
        }
        Self {
            row_height,
            widths,
            lefts,
            window: ViewportWindow::default(),
        }
    }

    pub fn with_window(mut self, window: ViewportWindow) -> Self {
        self.window = window;
        self
    }

    pub fn set_window(&mut self, window: ViewportWindow) {
        self.window = window;
    }
}

impl GridMetrics for FixedMetrics {
    fn row_top(&self, row: usize) -> u32 {
        u32::try_from(row)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.row_height)
    }

    fn row_height(&self, _row: usize) -> u32 {
        self.row_height
    }

    fn column_left(&self, column: usize) -> u32 {
        match self.lefts.get(column) {
            Some(left) => *left,
            None => self
                .lefts
                .last()
                .zip(self.widths.last())
                .map_or(0, |(l, w)| l.saturating_add(*w)),
        }
    }

    fn column_width(&self, column: usize) -> u32 {
        self.widths.get(column).copied().unwrap_or(0)
    }

    fn viewport(&self) -> ViewportWindow {
        self.window
    }
}

/// Offsets to scroll to; `None` leaves an axis alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollPlan {
    pub x: Option<u32>,
    pub y: Option<u32>,
}

impl ScrollPlan {
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none()
    }
}

fn scroll_target(start: u32, end: u32, offset: u32, extent: u32) -> Option<u32> {
    if start < offset {
        return Some(start);
    }
    if end > offset.saturating_add(extent) {
        // An item larger than the viewport aligns its start.
        return Some(if end - start > extent { start } else { end - extent });
    }
    None
}

pub fn horizontal_scroll_target(left: u32, right: u32, window: &ViewportWindow) -> Option<u32> {
    scroll_target(left, right, window.scroll_x, window.width)
}

pub fn vertical_scroll_target(top: u32, bottom: u32, window: &ViewportWindow) -> Option<u32> {
    scroll_target(top, bottom, window.scroll_y, window.height)
}

pub fn is_column_fully_visible(left: u32, right: u32, window: &ViewportWindow) -> bool {
    horizontal_scroll_target(left, right, window).is_none()
}

pub fn is_row_fully_visible(top: u32, bottom: u32, window: &ViewportWindow) -> bool {
    vertical_scroll_target(top, bottom, window).is_none()
}

/// Horizontal and vertical extents of `node`, adjusted for its layout span.
fn node_bounds<M>(node: &SelectionNode, metrics: &M, layout: Option<&MultiRowLayout>) -> [u32; 4]
where
    M: GridMetrics + ?Sized,
{
    let row_top = metrics.row_top(node.row);
    let row_height = metrics.row_height(node.row);
    let placed = layout.and_then(|l| l.column(node.column).map(|c| (l, c)));
    match placed {
        Some((layout, column)) => {
            let span = node.layout.unwrap_or(column.span);
            let lines = layout.record_rows().max(1) as u32;
            let line_height = row_height / lines;
            let line_top = |line: usize| {
                let line = u32::try_from(line).unwrap_or(u32::MAX).saturating_sub(1);
                row_top.saturating_add(line.saturating_mul(line_height))
            };
            let left = metrics.column_left(column.block);
            let right = left.saturating_add(metrics.column_width(column.block));
            [left, right, line_top(span.row_start), line_top(span.row_end)]
        }
        None => {
            let left = metrics.column_left(node.column);
            let right = left.saturating_add(metrics.column_width(node.column));
            [left, right, row_top, row_top.saturating_add(row_height)]
        }
    }
}

/// Computes the scroll needed to bring `node` fully into view.
pub fn plan_scroll<M>(
    node: &SelectionNode,
    metrics: &M,
    layout: Option<&MultiRowLayout>,
) -> ScrollPlan
where
    M: GridMetrics + ?Sized,
{
    let window = metrics.viewport();
    let [left, right, top, bottom] = node_bounds(node, metrics, layout);
    ScrollPlan {
        x: horizontal_scroll_target(left, right, &window),
        y: vertical_scroll_target(top, bottom, &window),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::LayoutBlock;
    use crate::navigation::LayoutColumn;

    fn window(scroll_x: u32, scroll_y: u32, width: u32, height: u32) -> ViewportWindow {
        ViewportWindow {
            scroll_x,
            scroll_y,
            width,
            height,
        }
    }

    #[test]
    fn scroll_target_cases() {
        let w = window(10, 0, 20, 5);
        let cases = [
            ((12, 18), None),
            ((10, 30), None),
            ((4, 8), Some(4)),
            ((25, 35), Some(15)),
            ((40, 70), Some(40)),
        ];
        for ((left, right), expected) in cases {
            assert_eq!(
                horizontal_scroll_target(left, right, &w),
                expected,
                "{left}..{right}"
            );
        }
        assert!(is_column_fully_visible(12, 18, &w));
        assert!(!is_row_fully_visible(4, 6, &w));
    }

    #[test]
    fn fixed_metrics_prefix_sums() {
        let m = FixedMetrics::new(1, vec![4, 6, 3], 1);
        assert_eq!(m.column_left(0), 0);
        assert_eq!(m.column_left(1), 5);
        assert_eq!(m.column_left(2), 12);
        assert_eq!(m.column_width(2), 3);
        assert_eq!(m.row_top(7), 7);
    }

    #[test]
    fn plan_for_plain_grid() {
        let m = FixedMetrics::new(1, vec![10; 10], 0).with_window(window(0, 0, 30, 10));
        assert!(plan_scroll(&SelectionNode::new(3, 1), &m, None).is_empty());
        let plan = plan_scroll(&SelectionNode::new(15, 5), &m, None);
        assert_eq!(plan, ScrollPlan { x: Some(30), y: Some(6) });
    }

    #[test]
    fn rows_past_u32_range_saturate() {
        let m = FixedMetrics::new(1, vec![5], 0).with_window(window(0, 0, 5, 10));
        assert_eq!(m.row_top(usize::MAX), u32::MAX);
        let plan = plan_scroll(&SelectionNode::new(usize::MAX, 0), &m, None);
        assert_eq!(
            plan,
            ScrollPlan {
                x: None,
                y: Some(u32::MAX - 10)
            }
        );
    }

    #[test]
    fn plan_for_multi_row_layout_uses_block_and_span() {
        let layout = MultiRowLayout::new(vec![
            LayoutBlock::new(vec![
                LayoutColumn::new("a", 1, 1),
                LayoutColumn::new("b", 2, 1),
                LayoutColumn::new("c", 3, 1),
            ]),
            LayoutBlock::new(vec![LayoutColumn::new("d", 1, 1).span(3, 1)]),
        ])
        .expect("valid layout");
        // Records are three lines tall; blocks are 20 cells wide.
        let m = FixedMetrics::new(3, vec![20, 20], 0).with_window(window(0, 0, 25, 6));

        let c = layout.node(1, 2).expect("node");
        assert!(plan_scroll(&c, &m, Some(&layout)).is_empty());

        let c = layout.node(2, 2).expect("node");
        assert_eq!(plan_scroll(&c, &m, Some(&layout)).y, Some(3));

        let d = layout.node(0, 3).expect("node");
        assert_eq!(
            plan_scroll(&d, &m, Some(&layout)),
            ScrollPlan { x: Some(15), y: None }
        );
    }
}
