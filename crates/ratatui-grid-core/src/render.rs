use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use unicode_width::UnicodeWidthChar;

use crate::viewport::ViewportState;

const TAB_WIDTH: usize = 4;

/// Draws a one-column vertical scrollbar for `state` into `area`.
pub fn render_scrollbar(area: Rect, buf: &mut Buffer, state: &ViewportState, style: Style) {
    buf.set_style(area, style);
    if area.height == 0 {
        return;
    }
    let thumb = scrollbar_thumb(area.height, state);
    for dy in 0..area.height {
        let ch = match thumb {
            Some((top, len)) if dy >= top && dy < top + len => "█",
            _ => " ",
        };
        buf.set_stringn(area.x, area.y + dy, ch, 1, style);
    }
}

/// Thumb `(top, length)` within a track of `track_h` cells, or `None` when everything fits.
fn scrollbar_thumb(track_h: u16, state: &ViewportState) -> Option<(u16, u16)> {
    if state.content_h == 0 || state.content_h <= state.viewport_h as u32 {
        return None;
    }
    let track = track_h as f64;
    let len = ((state.viewport_h as f64 / state.content_h as f64) * track)
        .round()
        .clamp(1.0, track) as u16;
    let max_y = state
        .content_h
        .saturating_sub(state.viewport_h as u32)
        .max(1) as f64;
    let room = (track - len as f64).max(0.0);
    let top = ((state.y as f64 / max_y) * room).round().clamp(0.0, room) as u16;
    Some((top, len))
}

/// Writes `input` starting at display column `start_col`, at most `max_cols` cells wide.
///
/// Tabs expand to four spaces. A wide character cut by either edge is skipped.
pub fn render_str_clipped(
    x: u16,
    y: u16,
    start_col: u32,
    max_cols: u16,
    buf: &mut Buffer,
    input: &str,
    style: Style,
) {
    let start_col = start_col as usize;
    let max_cols = max_cols as usize;
    let mut col = 0usize;
    let mut dx = 0usize;
    let mut tmp = [0u8; 4];

    let mut put = |dx: usize, symbol: &str| {
        if let Some(cell) = buf.cell_mut((x + dx as u16, y)) {
            cell.set_style(style);
            cell.set_symbol(symbol);
        }
    };

    for ch in input.chars() {
        let (symbol, w): (&str, usize) = if ch == '\t' {
            (" ", TAB_WIDTH)
        } else {
            match UnicodeWidthChar::width(ch) {
                Some(w) if w > 0 => (ch.encode_utf8(&mut tmp), w),
                _ => continue,
            }
        };
        if ch == '\t' {
            for _ in 0..w {
                if col >= start_col {
                    if dx >= max_cols {
                        return;
                    }
                    put(dx, symbol);
                    dx += 1;
                }
                col += 1;
            }
            continue;
        }
        if col < start_col {
            col += w;
            continue;
        }
        if dx + w > max_cols {
            return;
        }
        put(dx, symbol);
        for extra in 1..w {
            put(dx + extra, "");
        }
        dx += w;
        col += w;
    }
}

/// The part of `input` visible between display columns `start_col` and `start_col + max_cols`.
pub fn slice_by_cols(input: &str, start_col: u32, max_cols: u16) -> String {
    let start_col = start_col as usize;
    let max_cols = max_cols as usize;
    let mut col = 0usize;
    let mut out_cols = 0usize;
    let mut out = String::new();

    for ch in input.chars() {
        let (piece, w) = if ch == '\t' {
            (None, TAB_WIDTH)
        } else {
            match UnicodeWidthChar::width(ch) {
                Some(w) if w > 0 => (Some(ch), w),
                _ => continue,
            }
        };
        match piece {
            None => {
                for _ in 0..w {
                    if col >= start_col && out_cols < max_cols {
                        out.push(' ');
                        out_cols += 1;
                    }
                    col += 1;
                }
            }
            Some(ch) => {
                if col >= start_col {
                    if out_cols + w > max_cols {
                        break;
                    }
                    out.push(ch);
                    out_cols += w;
                }
                col += w;
            }
        }
    }

    out
}
