use ratatui_grid_core::GridError;
use ratatui_grid_core::config::CellSelectionMode;
use ratatui_grid_core::model::SelectionNode;
use ratatui_grid_core::model::SelectionRange;
use ratatui_grid_core::navigation::GridNavigator;
use ratatui_grid_core::navigation::LayoutBlock;
use ratatui_grid_core::navigation::LayoutColumn;
use ratatui_grid_core::navigation::MrlNavigator;
use ratatui_grid_core::navigation::MultiRowLayout;
use ratatui_grid_core::navigation::NavCommand;
use ratatui_grid_core::navigation::NavInput;
use ratatui_grid_core::navigation::NavOutcome;
use ratatui_grid_core::navigation::scroll::FixedMetrics;
use ratatui_grid_core::navigation::scroll::ScrollPlan;
use ratatui_grid_core::navigation::scroll::ViewportWindow;
use ratatui_grid_core::navigation::scroll::plan_scroll;
use ratatui_grid_core::selection::CellSelection;

fn contact_layout() -> MultiRowLayout {
    MultiRowLayout::new(vec![
        LayoutBlock::new(vec![
            LayoutColumn::new("id", 1, 1).span(2, 1),
            LayoutColumn::new("name", 1, 2),
            LayoutColumn::new("email", 2, 2),
            LayoutColumn::new("address", 3, 1).span(1, 2),
        ]),
        LayoutBlock::new(vec![LayoutColumn::new("note", 1, 1).span(3, 1)]),
    ])
    .expect("valid layout")
}

fn moved(outcome: NavOutcome) -> SelectionNode {
    match outcome {
        NavOutcome::Moved(node) => node,
        other => panic!("expected a move, got {other:?}"),
    }
}

#[test]
fn down_from_a_tall_column_reaches_the_bottom_line_of_the_same_record() {
    let layout = contact_layout();
    let nav = MrlNavigator::new(&layout, 10);
    let id = layout.index_of("id").expect("id");
    let address = layout.index_of("address").expect("address");

    let node = moved(nav.navigate(SelectionNode::new(4, id), NavInput::new(NavCommand::Down)));
    assert_eq!((node.row, node.column), (4, address));
    assert_eq!(node.layout.map(|s| s.row_start), Some(3));
}

#[test]
fn boundaries_leave_the_position_unchanged() {
    let nav = GridNavigator::new(3, 3);
    for (from, command) in [
        ((0, 0), NavCommand::Up),
        ((0, 0), NavCommand::Left),
        ((2, 2), NavCommand::Down),
        ((2, 2), NavCommand::Right),
        ((2, 2), NavCommand::Tab),
        ((0, 0), NavCommand::ShiftTab),
    ] {
        let outcome = nav.navigate(SelectionNode::new(from.0, from.1), NavInput::new(command));
        assert_eq!(outcome, NavOutcome::Unchanged, "{command:?} from {from:?}");
    }
}

#[test]
fn keyboard_walk_selects_and_scrolls() {
    let nav = GridNavigator::new(100, 10);
    let mut metrics = FixedMetrics::new(1, vec![10; 10], 0).with_window(ViewportWindow {
        scroll_x: 0,
        scroll_y: 0,
        width: 30,
        height: 5,
    });
    let mut cells = CellSelection::new(CellSelectionMode::Multiple);
    let mut at = SelectionNode::new(0, 0);
    cells.set_active(at);

    let mut last = None;
    for _ in 0..3 {
        let input = NavInput::new(NavCommand::Right).with_shift();
        let to = moved(nav.navigate(at, input));
        cells.keyboard_state_on_keydown(at, input.shift, false);
        cells.set_active(to);
        last = cells.keyboard_state_on_focus(to);
        at = to;
    }
    assert_eq!(
        last,
        Some(SelectionRange {
            row_start: 0,
            row_end: 0,
            column_start: 0,
            column_end: 3,
        })
    );

    assert_eq!(
        plan_scroll(&at, &metrics, None),
        ScrollPlan {
            x: Some(10),
            y: None
        }
    );
    metrics.set_window(ViewportWindow {
        scroll_x: 10,
        scroll_y: 0,
        width: 30,
        height: 5,
    });
    assert!(plan_scroll(&at, &metrics, None).is_empty());
}

#[test]
fn crossing_blocks_scrolls_by_block() {
    let layout = contact_layout();
    let nav = MrlNavigator::new(&layout, 10);
    // One record is three lines tall; block widths are 9 and 6 with a gap of 1.
    let metrics = FixedMetrics::new(3, vec![9, 6], 1).with_window(ViewportWindow {
        scroll_x: 0,
        scroll_y: 0,
        width: 9,
        height: 6,
    });

    let address = moved(nav.navigate(
        SelectionNode::new(1, layout.index_of("id").expect("id")),
        NavInput::new(NavCommand::Down),
    ));
    assert!(plan_scroll(&address, &metrics, Some(&layout)).is_empty());

    let note = moved(nav.navigate(address, NavInput::new(NavCommand::Right)));
    assert_eq!(note.column, layout.index_of("note").expect("note"));
    assert_eq!(
        plan_scroll(&note, &metrics, Some(&layout)),
        ScrollPlan {
            x: Some(7),
            y: None
        }
    );
}

#[test]
fn overlapping_layout_is_rejected() {
    let err = MultiRowLayout::new(vec![LayoutBlock::new(vec![
        LayoutColumn::new("a", 1, 1).span(2, 2),
        LayoutColumn::new("b", 2, 2),
    ])])
    .expect_err("overlap");
    assert!(matches!(err, GridError::OverlappingSpans { .. }));
}
