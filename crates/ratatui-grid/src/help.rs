use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use unicode_width::UnicodeWidthStr;

use crate::keymap::SelectionBindings;
use crate::render;

#[derive(Clone, Debug)]
pub struct HelpBarOptions {
    pub style: Style,
    pub key_style: Style,
    pub separator: String,
    pub space: String,
}

impl Default for HelpBarOptions {
    fn default() -> Self {
        Self {
            style: Style::default(),
            key_style: Style::default(),
            separator: " • ".to_string(),
            space: " ".to_string(),
        }
    }
}

/// One-line list of `key description` pairs.
#[derive(Clone, Debug, Default)]
pub struct HelpBar {
    entries: Vec<(String, String)>,
    options: HelpBarOptions,
}

impl HelpBar {
    pub fn new(entries: Vec<(String, String)>) -> Self {
        Self {
            entries,
            options: HelpBarOptions::default(),
        }
    }

    pub fn with_options(entries: Vec<(String, String)>, options: HelpBarOptions) -> Self {
        Self { entries, options }
    }

    /// Navigation keys followed by the copy and select-all bindings.
    pub fn for_grid(bindings: &SelectionBindings) -> Self {
        let mut entries: Vec<(String, String)> = [
            ("←↓↑→", "move"),
            ("S-arrows", "extend"),
            ("Tab", "next cell"),
            ("Space", "toggle row"),
            ("Enter", "activate"),
        ]
        .into_iter()
        .map(|(k, d)| (k.to_string(), d.to_string()))
        .collect();
        entries.extend(
            bindings
                .help()
                .into_iter()
                .map(|(k, d)| (k.to_string(), d.to_string())),
        );
        Self::new(entries)
    }

    pub fn set_entries(&mut self, entries: Vec<(String, String)>) {
        self.entries = entries;
    }

    pub fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        buf.set_style(area, self.options.style);

        let mut x = 0u16;
        let mut put = |text: &str, style: Style| {
            let w = area.width.saturating_sub(x);
            if w > 0 {
                render::render_str_clipped(area.x + x, area.y, 0, w, buf, text, style);
            }
            x = x.saturating_add(text.width().min(w as usize) as u16);
        };
        for (i, (key, desc)) in self.entries.iter().enumerate() {
            if i > 0 {
                put(&self.options.separator, self.options.style);
            }
            put(key, self.options.key_style);
            put(&self.options.space, self.options.style);
            put(desc, self.options.style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(buf: &Buffer, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, 0)).map_or(String::new(), |c| c.symbol().to_string()))
            .collect()
    }

    #[test]
    fn help_bar_renders_narrow_width() {
        let hb = HelpBar::new(vec![("q".to_string(), "quit".to_string())]);
        let mut buf = Buffer::empty(Rect::new(0, 0, 3, 1));
        hb.render_ref(Rect::new(0, 0, 3, 1), &mut buf);
        assert_eq!(line(&buf, 3), "q q");
    }

    #[test]
    fn grid_help_lists_selection_bindings() {
        let hb = HelpBar::for_grid(&SelectionBindings::default());
        assert!(hb.entries.iter().any(|(k, d)| k == "y" && d == "copy selection"));
        assert!(hb.entries.iter().any(|(k, _)| k == "C-a"));
    }
}
