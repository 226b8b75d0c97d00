use crate::navigation::scroll::ScrollPlan;
use crate::navigation::scroll::ViewportWindow;

/// Scroll offsets of a grid body plus the sizes they are clamped against.
#[derive(Clone, Copy, Debug, Default)]
pub struct ViewportState {
    pub x: u32,
    pub y: u32,
    pub viewport_w: u16,
    pub viewport_h: u16,
    pub content_w: u32,
    pub content_h: u32,
}

impl ViewportState {
    pub fn set_viewport(&mut self, w: u16, h: u16) {
        self.viewport_w = w;
        self.viewport_h = h;
        self.clamp();
    }

    pub fn set_content(&mut self, w: u32, h: u32) {
        self.content_w = w;
        self.content_h = h;
        self.clamp();
    }

    pub fn clamp(&mut self) {
        self.y = self.y.min(self.max_y());
        self.x = self.x.min(self.max_x());
    }

    pub fn scroll_y_by(&mut self, delta: i32) {
        let next = self.y as i64 + delta as i64;
        self.y = next.clamp(0, self.max_y() as i64) as u32;
    }

    pub fn scroll_x_by(&mut self, delta: i32) {
        let next = self.x as i64 + delta as i64;
        self.x = next.clamp(0, self.max_x() as i64) as u32;
    }

    pub fn to_top(&mut self) {
        self.y = 0;
    }

    pub fn to_bottom(&mut self) {
        self.y = self.max_y();
    }

    pub fn to_left(&mut self) {
        self.x = 0;
    }

    /// The window scroll decisions are made against.
    pub fn window(&self) -> ViewportWindow {
        ViewportWindow {
            scroll_x: self.x,
            scroll_y: self.y,
            width: self.viewport_w as u32,
            height: self.viewport_h as u32,
        }
    }

    /// Applies both axes of `plan`. Returns whether an offset changed.
    pub fn apply(&mut self, plan: &ScrollPlan) -> bool {
        let before = (self.x, self.y);
        if let Some(x) = plan.x {
            self.x = x;
        }
        if let Some(y) = plan.y {
            self.y = y;
        }
        self.clamp();
        before != (self.x, self.y)
    }

    fn max_y(&self) -> u32 {
        self.content_h.saturating_sub(self.viewport_h as u32)
    }

    fn max_x(&self) -> u32 {
        self.content_w.saturating_sub(self.viewport_w as u32)
    }
}
