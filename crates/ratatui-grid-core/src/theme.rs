use ratatui::style::Style;

/// Base styles the grid widget patches its own option styles onto.
#[derive(Clone, Debug)]
pub struct Theme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub accent: Style,
    /// Cells that are selected but not focused.
    pub selection: Style,
    /// Rows picked in the row registry.
    pub row_marker: Style,
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Stylize;

        Self {
            text_primary: Style::default(),
            text_muted: Style::default().dark_gray(),
            accent: Style::default().cyan(),
            selection: Style::default().on_dark_gray(),
            row_marker: Style::default().green(),
        }
    }
}
