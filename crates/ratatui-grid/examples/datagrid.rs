use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui_grid::config::ColumnSelectionMode;
use ratatui_grid::config::GridSelectionConfig;
use ratatui_grid::config::RowSelectionMode;
use ratatui_grid::crossterm_input::input_event_from_crossterm;
use ratatui_grid::datagrid::view::DataGridAction;
use ratatui_grid::datagrid::view::DataGridColumn;
use ratatui_grid::datagrid::view::DataGridView;
use ratatui_grid::datagrid::view::DataGridViewOptions;
use ratatui_grid::help::HelpBar;
use ratatui_grid::keymap::SelectionBindings;
use ratatui_grid::navigation::LayoutBlock;
use ratatui_grid::navigation::LayoutColumn;
use ratatui_grid::navigation::MultiRowLayout;
use ratatui_grid::render;
use ratatui_grid::theme::Theme;
use std::io;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi_row = std::env::args().any(|a| a == "--multi-row");

    let mut grid = DataGridView::with_options(DataGridViewOptions {
        selection: GridSelectionConfig {
            row_selection: RowSelectionMode::Multiple,
            column_selection: ColumnSelectionMode::Multiple,
            ..Default::default()
        },
        ..Default::default()
    });
    if multi_row {
        grid.set_columns(vec![
            DataGridColumn::new("id", 6),
            DataGridColumn::new("name", 14),
            DataGridColumn::new("email", 14),
            DataGridColumn::new("address", 29),
            DataGridColumn::new("note", 20),
        ]);
        grid.set_layout(Some(MultiRowLayout::new(vec![
            LayoutBlock::new(vec![
                LayoutColumn::new("id", 1, 1).span(2, 1),
                LayoutColumn::new("name", 1, 2),
                LayoutColumn::new("email", 2, 2),
                LayoutColumn::new("address", 3, 1).span(1, 2),
            ]),
            LayoutBlock::new(vec![LayoutColumn::new("note", 1, 1).span(3, 1)]),
        ])?));
    } else {
        grid.set_columns(
            (0..200)
                .map(|i| DataGridColumn::new(format!("col_{i:03}"), 12))
                .collect(),
        );
    }
    grid.set_row_count(200_000);
    grid.set_copy_source(|row, col| format!("r{row} c{col}"));

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let theme = Theme::default();

    let res = run(&mut terminal, &theme, &mut grid);

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    res
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    theme: &Theme,
    grid: &mut DataGridView,
) -> Result<(), Box<dyn std::error::Error>> {
    let help = HelpBar::for_grid(&SelectionBindings::default());
    let mut status = String::from("-");
    loop {
        terminal.draw(|f| {
            let area = f.area();
            let block = Block::default()
                .title("DataGridView (q to quit)")
                .borders(Borders::ALL);
            let inner = block.inner(area);
            f.render_widget(block, area);

            let buf = f.buffer_mut();
            let grid_area = Rect::new(
                inner.x,
                inner.y,
                inner.width,
                inner.height.saturating_sub(2),
            );
            let status_area = Rect::new(inner.x, inner.y + grid_area.height, inner.width, 1);
            let help_area = Rect::new(inner.x, status_area.y + 1, inner.width, 1);

            grid.render(grid_area, buf, theme, |cell_area, ctx, buf, theme| {
                let text = format!("r{} c{}", ctx.cell.row, ctx.cell.col);
                let clipped = render::slice_by_cols(&text, ctx.clip_left, cell_area.width);
                buf.set_stringn(
                    cell_area.x,
                    cell_area.y,
                    clipped,
                    cell_area.width as usize,
                    theme.text_primary,
                );
            });

            let line = format!(
                "cursor={}  rows={}  {status}",
                grid.cursor()
                    .map(|c| format!("r{} c{}", c.row, c.col))
                    .unwrap_or("-".to_string()),
                grid.selection().rows.len(),
            );
            buf.set_span(
                status_area.x,
                status_area.y,
                &Span::styled(line, theme.text_muted),
                status_area.width,
            );
            help.render_ref(help_area, buf);
        })?;

        if !crossterm::event::poll(Duration::from_millis(50))? {
            continue;
        }
        let ev = crossterm::event::read()?;
        if let Event::Key(key) = &ev
            && key.code == KeyCode::Char('q')
        {
            return Ok(());
        }
        let Some(ev) = input_event_from_crossterm(ev) else {
            continue;
        };
        match grid.handle_event(ev) {
            DataGridAction::Activated(cell) => {
                status = format!("activated r{} c{}", cell.row, cell.col);
            }
            DataGridAction::SelectionChanged(Some(range)) => {
                status = format!(
                    "range r{}c{}..r{}c{}",
                    range.row_start, range.column_start, range.row_end, range.column_end
                );
            }
            DataGridAction::RowToggled(row) => status = format!("toggled row {row}"),
            DataGridAction::CopyRequested(text) => {
                status = format!("copied {} chars", text.chars().count());
            }
            DataGridAction::SelectionChanged(None)
            | DataGridAction::Redraw
            | DataGridAction::None => {}
        }
    }
}
