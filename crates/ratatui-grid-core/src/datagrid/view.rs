use std::sync::Arc;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::text::Span;
use tracing::debug;
use virtualizer::Virtualizer;
use virtualizer::VirtualizerOptions;

use super::geometry::GridGeometry;
use crate::config::GridSelectionConfig;
use crate::input::InputEvent;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;
use crate::input::MouseButton;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;
use crate::input::PointerButtons;
use crate::keymap::NavBindings;
use crate::keymap::SelectionBindings;
use crate::keymap::SelectionCommand;
use crate::model::LayoutSpan;
use crate::model::SelectionNode;
use crate::model::SelectionRange;
use crate::navigation::GridNavigator;
use crate::navigation::MrlNavigator;
use crate::navigation::MultiRowLayout;
use crate::navigation::NavCommand;
use crate::navigation::NavInput;
use crate::navigation::NavOutcome;
use crate::navigation::scroll::plan_scroll;
use crate::render;
use crate::selection::GridSelection;
use crate::selection::InMemoryRows;
use crate::theme::Theme;
use crate::viewport::ViewportState;

const DEFAULT_COLUMN_WIDTH: u16 = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataGridAction {
    None,
    Redraw,
    Activated(Cell),
    /// Cell, row or column selection changed. Carries the range a gesture committed, if any.
    SelectionChanged(Option<SelectionRange>),
    RowToggled(usize),
    CopyRequested(String),
}

/// A grid cell address. `col` is the visible column index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

/// Column configuration for [`DataGridView`].
#[derive(Clone, Debug)]
pub struct DataGridColumn {
    /// Identifier used by column selection and multi-row layouts.
    pub field: String,
    pub title: String,
    pub width: u16,
    pub selectable: bool,
}

impl DataGridColumn {
    pub fn new(title: impl Into<String>, width: u16) -> Self {
        let title = title.into();
        Self {
            field: title.clone(),
            title,
            width,
            selectable: true,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = selectable;
        self
    }
}

/// Options for [`DataGridView`].
///
/// This widget virtualizes both rows and columns via the `virtualizer` crate and delegates cell
/// rendering to a user callback. With a [`MultiRowLayout`] the horizontal axis is virtualized by
/// layout block and every record is as tall as the tallest block.
#[derive(Clone, Debug)]
pub struct DataGridViewOptions {
    pub show_header: bool,
    pub show_scrollbar_y: bool,
    pub overscan_rows: usize,
    pub overscan_cols: usize,
    /// Height of one row line.
    pub row_height: u32,
    pub col_gap: u32,
    /// Lines scrolled per mouse wheel notch.
    pub wheel_step: u16,
    pub style: Style,
    pub header_style: Style,
    pub grid_line_style: Style,
    pub scrollbar_style: Style,
    pub cursor_style: Style,
    pub selected_style: Style,
    pub selection: GridSelectionConfig,
}

impl Default for DataGridViewOptions {
    fn default() -> Self {
        Self {
            show_header: true,
            show_scrollbar_y: true,
            overscan_rows: 2,
            overscan_cols: 2,
            row_height: 1,
            col_gap: 1,
            wheel_step: 3,
            style: Style::default(),
            header_style: Style::default().add_modifier(Modifier::BOLD),
            grid_line_style: Style::default(),
            scrollbar_style: Style::default(),
            cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            selected_style: Style::default().add_modifier(Modifier::BOLD),
            selection: GridSelectionConfig::default(),
        }
    }
}

/// Context passed to the `render_cell` callback in [`DataGridView::render`].
#[derive(Clone, Debug)]
pub struct DataGridCellContext {
    pub cell: Cell,
    pub col_width: u16,
    pub row_start: u64,
    pub row_size: u32,
    pub col_start: u64,
    pub col_size: u32,
    pub clip_left: u32,
    pub clip_top: u32,
    pub is_cursor: bool,
    pub is_selected: bool,
    pub is_row_selected: bool,
    pub layout: Option<LayoutSpan>,
}

/// A virtualized 2D grid view that hosts one selection engine.
///
/// The grid is UI-agnostic: you drive it from your app loop by calling `handle_event` and
/// `render`. Mouse hit-testing uses the areas of the last `render` call.
pub struct DataGridView {
    pub state: ViewportState,
    options: DataGridViewOptions,
    columns: Vec<DataGridColumn>,
    layout: Option<MultiRowLayout>,
    row_source: InMemoryRows<usize>,
    selection: GridSelection<usize>,
    nav_bindings: NavBindings,
    selection_bindings: SelectionBindings,
    copy_source: Option<Box<dyn Fn(usize, usize) -> String>>,
    geometry: GridGeometry,
    pressed: PointerButtons,
    header_area: Rect,
    body_area: Rect,
    row_v: Virtualizer,
    col_v: Virtualizer,
    row_items: Vec<virtualizer::VirtualItem>,
    col_items: Vec<virtualizer::VirtualItem>,
}

impl Default for DataGridView {
    fn default() -> Self {
        let options = DataGridViewOptions::default();

        let mut row_opts = VirtualizerOptions::new(0, |_| 1);
        row_opts.overscan = options.overscan_rows;
        let row_v = Virtualizer::new(row_opts);

        let mut col_opts = VirtualizerOptions::new(0, |_| 1);
        col_opts.gap = options.col_gap;
        col_opts.overscan = options.overscan_cols;
        let col_v = Virtualizer::new(col_opts);

        Self {
            state: ViewportState::default(),
            selection: GridSelection::new(&options.selection),
            options,
            columns: Vec::new(),
            layout: None,
            row_source: InMemoryRows::new(Vec::new()),
            nav_bindings: NavBindings::default(),
            selection_bindings: SelectionBindings::default(),
            copy_source: None,
            geometry: GridGeometry::default(),
            pressed: PointerButtons::NONE,
            header_area: Rect::default(),
            body_area: Rect::default(),
            row_v,
            col_v,
            row_items: Vec::new(),
            col_items: Vec::new(),
        }
    }
}

#[derive(Clone, Copy)]
struct DataGridBodyStyles {
    base: Style,
    cursor: Style,
    selected: Style,
    row_selected: Style,
}

struct RenderBodyContext<'a> {
    area: Rect,
    buf: &'a mut Buffer,
    row_items: &'a [virtualizer::VirtualItem],
    col_items: &'a [virtualizer::VirtualItem],
    theme: &'a Theme,
}

impl DataGridView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DataGridViewOptions) -> Self {
        let mut v = Self::default();
        v.set_options(options);
        v
    }

    pub fn options(&self) -> &DataGridViewOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: DataGridViewOptions) {
        self.options = options;
        self.selection.apply_config(&self.options.selection);
        self.options
            .selection
            .validate(self.selectable_fields().len());
        self.rebuild_geometry();
        self.state.clamp();
    }

    pub fn set_row_count(&mut self, rows: usize) {
        self.row_source = InMemoryRows::new((0..rows).collect());
        self.selection.rows.clear_header_cache();
        self.rebuild_row_virtualizer();
        self.clamp_active();
        self.state.clamp();
    }

    pub fn set_columns(&mut self, columns: Vec<DataGridColumn>) {
        self.columns = columns;
        self.selection.columns.clear_header_cache();
        self.rebuild_geometry();
        self.clamp_active();
        self.state.clamp();
    }

    /// Arranges the columns in a multi-row layout, matched to [`DataGridColumn`]s by field.
    ///
    /// Visible column indices change meaning, so the cell selection is reset.
    pub fn set_layout(&mut self, layout: Option<MultiRowLayout>) {
        if let Some(layout) = &layout {
            for placed in layout.columns() {
                if !self.columns.iter().any(|c| c.field == placed.field) {
                    debug!(field = %placed.field, "layout column has no column config");
                }
            }
        }
        self.layout = layout;
        self.selection.cells.reset();
        self.rebuild_geometry();
        self.state.clamp();
    }

    pub fn layout(&self) -> Option<&MultiRowLayout> {
        self.layout.as_ref()
    }

    pub fn set_nav_bindings(&mut self, bindings: NavBindings) {
        self.nav_bindings = bindings;
    }

    pub fn set_selection_bindings(&mut self, bindings: SelectionBindings) {
        self.selection_bindings = bindings;
    }

    /// Supplies cell text for copy requests, by `(row, visible column)`.
    pub fn set_copy_source(&mut self, source: impl Fn(usize, usize) -> String + 'static) {
        self.copy_source = Some(Box::new(source));
    }

    pub fn row_count(&self) -> usize {
        self.row_source.ids.len()
    }

    /// Visible columns: layout columns when a layout is set, else the configured columns.
    pub fn column_count(&self) -> usize {
        match &self.layout {
            Some(layout) => layout.column_count(),
            None => self.columns.len(),
        }
    }

    pub fn columns(&self) -> &[DataGridColumn] {
        &self.columns
    }

    pub fn selection(&self) -> &GridSelection<usize> {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut GridSelection<usize> {
        &mut self.selection
    }

    pub fn row_source(&self) -> &InMemoryRows<usize> {
        &self.row_source
    }

    /// Filters and pending deletes are applied here. Call
    /// [`RowSelection::clear_header_cache`](crate::selection::RowSelection::clear_header_cache)
    /// after changing them.
    pub fn row_source_mut(&mut self) -> &mut InMemoryRows<usize> {
        &mut self.row_source
    }

    pub fn cursor(&self) -> Option<Cell> {
        self.selection.cells.active().map(|n| Cell {
            row: n.row,
            col: n.column,
        })
    }

    pub fn set_cursor(&mut self, cursor: Option<Cell>) {
        match clamp_cursor(cursor, self.row_count(), self.column_count()) {
            Some(c) => {
                let node = self.node(c.row, c.col);
                self.selection.cells.set_active(node);
                self.ensure_visible(node);
            }
            None => self.selection.cells.clear_active(),
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.cells.clear(false);
    }

    pub fn handle_event(&mut self, event: InputEvent) -> DataGridAction {
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Mouse(mouse) => self.handle_mouse(mouse),
        }
    }

    pub fn scroll_y_by(&mut self, delta: i32) {
        self.sync_virtualizers_from_state();
        self.state.scroll_y_by(delta);
        self.row_v.set_scroll_offset(self.state.y as u64);
        self.state.y = self.row_v.scroll_offset().min(u32::MAX as u64) as u32;
    }

    pub fn scroll_x_by(&mut self, delta: i32) {
        self.sync_virtualizers_from_state();
        self.state.scroll_x_by(delta);
        self.col_v.set_scroll_offset(self.state.x as u64);
        self.state.x = self.col_v.scroll_offset().min(u32::MAX as u64) as u32;
    }

    /// Scrolls so `node` is fully visible, once the viewport size is known.
    pub fn ensure_visible(&mut self, node: SelectionNode) {
        self.sync_virtualizers_from_state();
        if self.state.viewport_w == 0 || self.state.viewport_h == 0 {
            return;
        }
        self.geometry.set_window(self.state.window());
        let plan = plan_scroll(&node, &self.geometry, self.layout.as_ref());
        if self.state.apply(&plan) {
            self.row_v.set_scroll_offset(self.state.y as u64);
            self.col_v.set_scroll_offset(self.state.x as u64);
        }
    }

    pub fn render<F>(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme, mut render_cell: F)
    where
        F: FnMut(Rect, DataGridCellContext, &mut Buffer, &Theme),
    {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let header_h = if self.options.show_header {
            self.geometry.record_lines().min(u16::MAX as u32) as u16
        } else {
            0
        };
        let header_h = header_h.min(area.height);

        let (content_area, scrollbar_x) = if self.options.show_scrollbar_y && area.width >= 2 {
            (
                Rect::new(area.x, area.y, area.width - 1, area.height),
                Some(area.x + area.width - 1),
            )
        } else {
            (area, None)
        };

        let header_area = Rect::new(content_area.x, content_area.y, content_area.width, header_h);
        let body_area = Rect::new(
            content_area.x,
            content_area.y + header_h,
            content_area.width,
            content_area.height.saturating_sub(header_h),
        );
        self.header_area = header_area;
        self.body_area = body_area;

        let base_style = if self.options.style == Style::default() {
            theme.text_primary
        } else {
            self.options.style
        };
        let header_style = self.options.header_style.patch(theme.accent);
        let grid_line_style = if self.options.grid_line_style == Style::default() {
            theme.text_muted
        } else {
            self.options.grid_line_style
        };
        let styles = DataGridBodyStyles {
            base: base_style,
            cursor: self.options.cursor_style.patch(theme.accent),
            selected: self.options.selected_style.patch(theme.selection),
            row_selected: base_style.patch(theme.row_marker),
        };

        buf.set_style(content_area, base_style);
        buf.set_style(header_area, header_style);

        self.sync_virtualizers(body_area);
        self.collect_virtual_items();

        if header_area.height > 0 {
            self.render_header(header_area, buf, header_style, styles.selected);
        }

        let mut render_ctx = RenderBodyContext {
            area: body_area,
            buf,
            row_items: &self.row_items,
            col_items: &self.col_items,
            theme,
        };
        self.render_body(&mut render_ctx, styles, &mut render_cell);

        if self.options.col_gap > 0 {
            let sep_area = Rect::new(
                content_area.x,
                content_area.y,
                content_area.width,
                header_h + body_area.height,
            );
            self.render_separators(sep_area, buf, grid_line_style);
        }

        if let Some(sb_x) = scrollbar_x {
            render::render_scrollbar(
                Rect::new(sb_x, body_area.y, 1, body_area.height),
                buf,
                &ViewportState {
                    x: 0,
                    y: self.state.y,
                    viewport_w: 1,
                    viewport_h: body_area.height,
                    content_w: 1,
                    content_h: self.state.content_h,
                },
                self.options.scrollbar_style,
            );
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> DataGridAction {
        if self.row_count() == 0 || self.column_count() == 0 {
            self.selection.cells.clear_active();
            self.state.to_top();
            self.state.to_left();
            return DataGridAction::None;
        }

        if let Some(command) = self.selection_bindings.command_for(&key) {
            return self.run_selection_command(command);
        }
        let Some(input) = self.nav_bindings.input_for(&key) else {
            return DataGridAction::None;
        };

        let Some(from) = self.selection.cells.active() else {
            let first = self.node(0, 0);
            self.focus_by_keyboard(first, first, NavInput::new(input.command));
            return DataGridAction::Redraw;
        };

        match self.navigate(from, input) {
            NavOutcome::Moved(to) => self.focus_by_keyboard(from, to, input),
            NavOutcome::Unchanged => DataGridAction::None,
            NavOutcome::Activate(node) => DataGridAction::Activated(Cell {
                row: node.row,
                col: node.column,
            }),
            NavOutcome::ToggleRowSelection(row) => self.toggle_row(row, input.shift),
            NavOutcome::Exit => {
                if self.selection.cells.is_empty() {
                    DataGridAction::None
                } else {
                    self.selection.cells.clear(false);
                    DataGridAction::SelectionChanged(None)
                }
            }
        }
    }

    fn navigate(&self, from: SelectionNode, input: NavInput) -> NavOutcome {
        let page = (self.state.viewport_h as u32 / self.geometry.record_height().max(1)).max(1);
        match &self.layout {
            Some(layout) => MrlNavigator::new(layout, self.row_count())
                .with_page_rows(page as usize)
                .navigate(from, input),
            None => GridNavigator::new(self.row_count(), self.column_count())
                .with_page_rows(page as usize)
                .navigate(from, input),
        }
    }

    fn focus_by_keyboard(
        &mut self,
        from: SelectionNode,
        to: SelectionNode,
        input: NavInput,
    ) -> DataGridAction {
        let cells = &mut self.selection.cells;
        cells.keyboard_state_on_keydown(from, input.shift, input.command == NavCommand::ShiftTab);
        cells.set_active(to);
        let range = cells.keyboard_state_on_focus(to);
        self.ensure_visible(to);
        match range {
            Some(range) => DataGridAction::SelectionChanged(Some(range)),
            None => DataGridAction::Redraw,
        }
    }

    fn toggle_row(&mut self, row: usize, shift: bool) -> DataGridAction {
        let rows = &mut self.selection.rows;
        if !rows.mode().is_enabled() {
            return DataGridAction::None;
        }
        let changed = if shift && rows.mode().is_multiple() {
            rows.select_multiple_rows(row, &self.row_source)
        } else if rows.is_row_selected(&row) {
            rows.deselect_row(&row)
        } else {
            rows.select_row_by_id(row, false, &self.row_source)
        };
        if changed {
            DataGridAction::RowToggled(row)
        } else {
            DataGridAction::None
        }
    }

    fn run_selection_command(&mut self, command: SelectionCommand) -> DataGridAction {
        match command {
            SelectionCommand::Copy => {
                let Some(source) = &self.copy_source else {
                    debug!("copy requested without a copy source");
                    return DataGridAction::None;
                };
                match self.selection.cells.copy_text(|row, col| source(row, col)) {
                    Some(text) => DataGridAction::CopyRequested(text),
                    None => DataGridAction::None,
                }
            }
            SelectionCommand::SelectAll => {
                let mut changed = false;
                if self.selection.rows.mode().is_multiple() {
                    changed |= self.selection.rows.select_all_rows(&self.row_source);
                }
                let first = self.node(0, 0);
                let last = self.node(self.row_count() - 1, self.column_count() - 1);
                match self.selection.cells.select_all(first, last) {
                    Some(range) => DataGridAction::SelectionChanged(Some(range)),
                    None if changed => DataGridAction::SelectionChanged(None),
                    None => DataGridAction::None,
                }
            }
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> DataGridAction {
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                self.scroll_y_by(-(self.options.wheel_step as i32));
                DataGridAction::Redraw
            }
            MouseEventKind::ScrollDown => {
                self.scroll_y_by(self.options.wheel_step as i32);
                DataGridAction::Redraw
            }
            MouseEventKind::Down(button) => {
                self.pressed = self.pressed.union(PointerButtons::from_button(button));
                if button != MouseButton::Left {
                    return DataGridAction::None;
                }
                if let Some(col) = self.header_hit(mouse.x, mouse.y) {
                    return self.click_header(col, mouse.modifiers);
                }
                let Some(node) = self.body_hit(mouse.x, mouse.y) else {
                    return DataGridAction::None;
                };
                let cells = &mut self.selection.cells;
                cells.pointer_down(node, mouse.modifiers.shift, mouse.modifiers.ctrl);
                cells.set_active(node);
                self.ensure_visible(node);
                DataGridAction::SelectionChanged(None)
            }
            MouseEventKind::Drag(_) => {
                let Some(node) = self.body_hit(mouse.x, mouse.y) else {
                    return DataGridAction::None;
                };
                if self.selection.cells.pointer_enter(node, self.pressed) {
                    DataGridAction::Redraw
                } else {
                    DataGridAction::None
                }
            }
            MouseEventKind::Up(button) => {
                self.pressed = self.pressed.difference(PointerButtons::from_button(button));
                if button != MouseButton::Left {
                    return DataGridAction::None;
                }
                let range = match self.body_hit(mouse.x, mouse.y) {
                    Some(node) => self.selection.cells.pointer_up(node),
                    None => self.selection.cells.pointer_up_outside(),
                };
                DataGridAction::SelectionChanged(range)
            }
        }
    }

    fn click_header(&mut self, col: usize, modifiers: KeyModifiers) -> DataGridAction {
        let Some(field) = self.field_of(col).map(str::to_string) else {
            return DataGridAction::None;
        };
        let source = self.selectable_fields();
        let columns = &mut self.selection.columns;
        let changed = if modifiers.shift {
            columns.select_multiple_columns(&field, &source)
        } else if modifiers.ctrl && columns.is_column_selected(&field) {
            columns.deselect_column(&field)
        } else {
            columns.select_column(&field, !modifiers.ctrl, &source)
        };
        if changed {
            DataGridAction::SelectionChanged(None)
        } else {
            DataGridAction::None
        }
    }

    fn header_hit(&self, x: u16, y: u16) -> Option<usize> {
        if !contains(self.header_area, x, y) {
            return None;
        }
        let abs_x = self.state.x + (x - self.header_area.x) as u32;
        self.geometry
            .column_at(abs_x, (y - self.header_area.y) as u32, 1)
    }

    fn body_hit(&self, x: u16, y: u16) -> Option<SelectionNode> {
        if !contains(self.body_area, x, y) {
            return None;
        }
        let abs_x = self.state.x + (x - self.body_area.x) as u32;
        let abs_y = self.state.y + (y - self.body_area.y) as u32;
        let record_h = self.geometry.record_height().max(1);
        let row = (abs_y / record_h) as usize;
        if row >= self.row_count() {
            return None;
        }
        let col = self
            .geometry
            .column_at(abs_x, abs_y % record_h, self.options.row_height)?;
        Some(self.node(row, col))
    }

    fn node(&self, row: usize, col: usize) -> SelectionNode {
        self.layout
            .as_ref()
            .and_then(|l| l.node(row, col))
            .unwrap_or_else(|| SelectionNode::new(row, col))
    }

    fn column_meta(&self, col: usize) -> Option<&DataGridColumn> {
        match &self.layout {
            Some(layout) => {
                let field = &layout.column(col)?.field;
                self.columns.iter().find(|c| &c.field == field)
            }
            None => self.columns.get(col),
        }
    }

    fn field_of(&self, col: usize) -> Option<&str> {
        match &self.layout {
            Some(layout) => layout.column(col).map(|c| c.field.as_str()),
            None => self.columns.get(col).map(|c| c.field.as_str()),
        }
    }

    fn selectable_fields(&self) -> Vec<String> {
        (0..self.column_count())
            .filter(|i| self.column_meta(*i).is_none_or(|c| c.selectable))
            .filter_map(|i| self.field_of(i).map(str::to_string))
            .collect()
    }

    fn clamp_active(&mut self) {
        let Some(active) = self.selection.cells.active() else {
            return;
        };
        let cursor = Cell {
            row: active.row,
            col: active.column,
        };
        match clamp_cursor(Some(cursor), self.row_count(), self.column_count()) {
            Some(c) if c == cursor => {}
            Some(c) => {
                let node = self.node(c.row, c.col);
                self.selection.cells.set_active(node);
            }
            None => self.selection.cells.clear_active(),
        }
    }

    fn sync_virtualizers(&mut self, body_area: Rect) {
        self.state.set_viewport(body_area.width, body_area.height);
        self.sync_virtualizers_from_state();
    }

    fn sync_virtualizers_from_state(&mut self) {
        self.row_v.set_count(self.row_count());
        self.col_v.set_count(self.geometry.track_count());

        self.row_v.set_viewport_size(self.state.viewport_h as u32);
        self.col_v.set_viewport_size(self.state.viewport_w as u32);

        self.row_v.set_scroll_offset(self.state.y as u64);
        self.col_v.set_scroll_offset(self.state.x as u64);

        self.state.y = self.row_v.scroll_offset().min(u32::MAX as u64) as u32;
        self.state.x = self.col_v.scroll_offset().min(u32::MAX as u64) as u32;

        self.state
            .set_content(self.total_w_u32(), self.total_h_u32());
        self.state.clamp();

        self.row_v.set_overscan(self.options.overscan_rows);
        self.col_v.set_overscan(self.options.overscan_cols);
    }

    fn total_h_u32(&self) -> u32 {
        self.row_v.total_size().min(u32::MAX as u64) as u32
    }

    fn total_w_u32(&self) -> u32 {
        self.col_v.total_size().min(u32::MAX as u64) as u32
    }

    fn rebuild_geometry(&mut self) {
        let widths: Vec<u32> = (0..self.column_count())
            .map(|i| {
                self.column_meta(i)
                    .map_or(DEFAULT_COLUMN_WIDTH, |c| c.width) as u32
            })
            .collect();
        self.geometry = GridGeometry::new(
            &widths,
            self.layout.as_ref(),
            self.options.row_height,
            self.options.col_gap,
        );
        self.rebuild_row_virtualizer();
        self.rebuild_col_virtualizer();
    }

    fn rebuild_row_virtualizer(&mut self) {
        let record_height = self.geometry.record_height().max(1);
        let mut opts = VirtualizerOptions::new(self.row_count(), move |_| record_height);
        opts.overscan = self.options.overscan_rows;
        self.row_v = Virtualizer::new(opts);
        self.row_v.set_viewport_size(self.state.viewport_h as u32);
        self.row_v.set_scroll_offset(self.state.y as u64);
        self.state.y = self.row_v.scroll_offset().min(u32::MAX as u64) as u32;
    }

    fn rebuild_col_virtualizer(&mut self) {
        let widths = Arc::new(self.geometry.track_widths());
        let widths2 = widths.clone();
        let mut opts = VirtualizerOptions::new(widths.len(), move |i| {
            widths2.get(i).copied().unwrap_or(1).max(1)
        });
        opts.gap = self.options.col_gap;
        opts.overscan = self.options.overscan_cols;
        self.col_v = Virtualizer::new(opts);
        self.col_v.set_viewport_size(self.state.viewport_w as u32);
        self.col_v.set_scroll_offset(self.state.x as u64);
        self.state.x = self.col_v.scroll_offset().min(u32::MAX as u64) as u32;
    }

    fn collect_virtual_items(&mut self) {
        self.row_v.collect_virtual_items(&mut self.row_items);
        self.col_v.collect_virtual_items(&mut self.col_items);
    }

    fn render_header(&self, area: Rect, buf: &mut Buffer, style: Style, selected: Style) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let scroll_x = self.col_v.scroll_offset();
        for col_item in self.col_items.iter().copied() {
            for &col in self.geometry.track_columns(col_item.index) {
                let Some(b) = self.geometry.column_box(col, 1) else {
                    continue;
                };
                let Some((rect, clip_left, clip_top)) = clip_box(
                    area,
                    (scroll_x, 0),
                    col_item.start + b.x as u64,
                    b.y as u64,
                    b.width,
                    b.height,
                ) else {
                    continue;
                };
                if clip_top > 0 {
                    continue;
                }
                let title = self
                    .column_meta(col)
                    .map(|c| c.title.as_str())
                    .or_else(|| self.field_of(col))
                    .unwrap_or_default();
                let is_selected = self
                    .field_of(col)
                    .is_some_and(|f| self.selection.columns.is_column_selected(f));
                let style = if is_selected {
                    style.patch(selected)
                } else {
                    style
                };
                render::render_str_clipped(
                    rect.x, rect.y, clip_left, rect.width, buf, title, style,
                );
            }
        }
    }

    fn render_body<F>(
        &self,
        render_ctx: &mut RenderBodyContext<'_>,
        styles: DataGridBodyStyles,
        render_cell: &mut F,
    ) where
        F: FnMut(Rect, DataGridCellContext, &mut Buffer, &Theme),
    {
        if render_ctx.area.width == 0 || render_ctx.area.height == 0 {
            return;
        }
        if self.row_count() == 0 || self.column_count() == 0 {
            return;
        }

        let scroll = (self.col_v.scroll_offset(), self.row_v.scroll_offset());
        let line_height = self.options.row_height.max(1);
        let cells = &self.selection.cells;

        for row_item in render_ctx.row_items.iter().copied() {
            let row = row_item.index;
            let is_row_selected = self.selection.rows.is_row_selected(&row);
            for col_item in render_ctx.col_items.iter().copied() {
                for &col in self.geometry.track_columns(col_item.index) {
                    let Some(b) = self.geometry.column_box(col, line_height) else {
                        continue;
                    };
                    let Some((cell_rect, clip_left, clip_top)) = clip_box(
                        render_ctx.area,
                        scroll,
                        col_item.start + b.x as u64,
                        row_item.start + b.y as u64,
                        b.width,
                        b.height,
                    ) else {
                        continue;
                    };

                    let node = self.node(row, col);
                    let is_cursor = cells.is_active_node(&node);
                    let column_selected = self
                        .field_of(col)
                        .is_some_and(|f| self.selection.columns.is_column_selected(f));
                    let is_selected = cells.is_in_map(&node) || column_selected;
                    let style = if is_cursor {
                        styles.cursor
                    } else if is_selected {
                        styles.selected
                    } else if is_row_selected {
                        styles.row_selected
                    } else {
                        styles.base
                    };
                    render_ctx.buf.set_style(cell_rect, style);

                    let cell_ctx = DataGridCellContext {
                        cell: Cell { row, col },
                        col_width: b.width.min(u16::MAX as u32) as u16,
                        row_start: row_item.start + b.y as u64,
                        row_size: b.height,
                        col_start: col_item.start + b.x as u64,
                        col_size: b.width,
                        clip_left,
                        clip_top,
                        is_cursor,
                        is_selected,
                        is_row_selected,
                        layout: node.layout,
                    };
                    render_cell(cell_rect, cell_ctx, render_ctx.buf, render_ctx.theme);
                }
            }
        }
    }

    fn render_separators(&self, area: Rect, buf: &mut Buffer, style: Style) {
        let scroll_x = self.col_v.scroll_offset();
        let count = self.geometry.track_count();
        for col_item in self.col_items.iter().copied() {
            if col_item.index + 1 >= count {
                continue;
            }
            let sep_x_rel = (col_item.start + col_item.size as u64) as i64 - scroll_x as i64;
            if sep_x_rel < 0 || sep_x_rel >= area.width as i64 {
                continue;
            }
            let sep_x = area.x + sep_x_rel as u16;
            for dy in 0..area.height {
                buf.set_span(sep_x, area.y + dy, &Span::styled("│", style), 1);
            }
        }
    }
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

fn clamp_cursor(cursor: Option<Cell>, rows: usize, cols: usize) -> Option<Cell> {
    if rows == 0 || cols == 0 {
        return None;
    }
    cursor.map(|c| Cell {
        row: c.row.min(rows - 1),
        col: c.col.min(cols - 1),
    })
}

/// Visible part of a content-space box, with how much was cut off on the left and top.
fn clip_box(
    area: Rect,
    (scroll_x, scroll_y): (u64, u64),
    x: u64,
    y: u64,
    width: u32,
    height: u32,
) -> Option<(Rect, u32, u32)> {
    let (row_rect, clip_top) = clipped_rect_y(area, scroll_y, y, height);
    let (rect, clip_left) = clipped_rect_x(row_rect, scroll_x, x, width);
    (rect.width > 0 && rect.height > 0).then_some((rect, clip_left, clip_top))
}

fn clipped_rect_x(area: Rect, scroll_x: u64, start: u64, size: u32) -> (Rect, u32) {
    let rel = start as i64 - scroll_x as i64;
    let clip_left = (-rel).max(0) as u32;
    let x = rel.clamp(0, area.width as i64) as u16;
    let max_w = area.width.saturating_sub(x);
    let visible_w = size.saturating_sub(clip_left).min(max_w as u32) as u16;
    (
        Rect::new(area.x + x, area.y, visible_w, area.height),
        clip_left,
    )
}

fn clipped_rect_y(area: Rect, scroll_y: u64, start: u64, size: u32) -> (Rect, u32) {
    let rel = start as i64 - scroll_y as i64;
    let clip_top = (-rel).max(0) as u32;
    let y = rel.clamp(0, area.height as i64) as u16;
    let max_h = area.height.saturating_sub(y);
    let visible_h = size.saturating_sub(clip_top).min(max_h as u32) as u16;
    (
        Rect::new(area.x, area.y + y, area.width, visible_h),
        clip_top,
    )
}
