//! Scroll input: the raw page offset and the damped progress signal
//!
//! [`ScrollPage`] plays the part of the host page: it owns a scroll offset
//! over a virtual document several viewports tall and reports the offset as a
//! fraction in [0, 1]. [`ScrollState`] is the core's view of that signal and
//! is eased toward each new fraction once per rendered frame.

use serde::Serialize;

/// Fraction of the remaining distance covered per frame
pub const SMOOTHING: f32 = 0.15;

/// Raw fraction above which the "scroll to explore" hint is hidden
pub const HINT_THRESHOLD: f32 = 0.05;

/// Damped tracking of the page's scroll fraction.
///
/// `target` is written by input handling, `current` by the frame tick. Both
/// happen on the event-loop thread, so the struct is owned by the driver and
/// lent out to each in turn. A host that delivers input from another thread
/// would need to wrap `target` in a lock or a single-writer queue.
///
/// Neither field is clamped here; staying in [0, 1] relies on the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScrollState {
    pub current: f32,
    pub target: f32,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// One exponential-smoothing step toward `target`.
    ///
    /// The step is per frame, not per second, so convergence speed follows
    /// the display refresh rate. Repeated calls at `current == target` are
    /// no-ops.
    pub fn advance(&mut self) {
        self.current += (self.target - self.current) * SMOOTHING;
    }
}

/// Scrollable virtual document measured in physical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPage {
    viewport_height: f32,
    page_viewports: f32,
    scroll_y: f32,
}

impl ScrollPage {
    /// `page_viewports` is the document height as a multiple of the viewport
    pub fn new(viewport_height: f32, page_viewports: f32) -> Self {
        Self {
            viewport_height,
            page_viewports,
            scroll_y: 0.0,
        }
    }

    pub fn content_height(&self) -> f32 {
        self.viewport_height * self.page_viewports
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    /// Furthest the page can scroll
    pub fn max_scroll(&self) -> f32 {
        (self.content_height() - self.viewport_height).max(0.0)
    }

    /// Current offset as a fraction of the scrollable range, in [0, 1].
    ///
    /// 0 when nothing scrolls or the range is not finite.
    pub fn fraction(&self) -> f32 {
        let range = self.content_height() - self.viewport_height;
        if range > 0.0 && range.is_finite() {
            (self.scroll_y / range).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn hint_visible(&self) -> bool {
        self.fraction() <= HINT_THRESHOLD
    }

    /// Moves by `dy` pixels (positive scrolls down), clamped to the document
    pub fn scroll_by(&mut self, dy: f32) {
        self.scroll_to(self.scroll_y + dy);
    }

    pub fn scroll_to(&mut self, y: f32) {
        self.scroll_y = y.clamp(0.0, self.max_scroll());
    }

    /// Jumps to a fraction of the scrollable range
    pub fn scroll_to_fraction(&mut self, fraction: f32) {
        self.scroll_to(fraction * self.max_scroll());
    }

    pub fn page_down(&mut self) {
        self.scroll_by(self.viewport_height);
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-self.viewport_height);
    }

    pub fn home(&mut self) {
        self.scroll_to(0.0);
    }

    pub fn end(&mut self) {
        self.scroll_to(self.max_scroll());
    }

    /// Keeps the pixel offset and re-clamps it, the way a browser does on resize
    pub fn resize(&mut self, viewport_height: f32) {
        self.viewport_height = viewport_height;
        self.scroll_to(self.scroll_y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_moves_fifteen_percent() {
        let mut s = ScrollState {
            current: 0.0,
            target: 1.0,
        };
        s.advance();
        assert!((s.current - 0.15).abs() < 1e-7);
        s.advance();
        assert!((s.current - 0.2775).abs() < 1e-6);
    }

    #[test]
    fn test_advance_is_noop_at_fixed_point() {
        let mut s = ScrollState {
            current: 0.6,
            target: 0.6,
        };
        for _ in 0..10 {
            s.advance();
        }
        assert_eq!(s.current, 0.6);
    }

    #[test]
    fn test_advance_converges_geometrically() {
        for start in [0.0_f32, 0.3, 1.0] {
            let mut s = ScrollState {
                current: start,
                target: 0.75,
            };
            let mut gap = (s.target - s.current).abs();
            let mut steps = 0;
            while (s.target - s.current).abs() > 1e-6 {
                s.advance();
                let next = (s.target - s.current).abs();
                assert!(next <= gap * 0.85 + 1e-7);
                gap = next;
                steps += 1;
                assert!(steps < 100, "did not converge from {start}");
            }
        }
    }

    #[test]
    fn test_page_fraction_and_clamp() {
        let mut page = ScrollPage::new(800.0, 5.0);
        assert_eq!(page.max_scroll(), 3200.0);
        assert_eq!(page.fraction(), 0.0);

        page.scroll_by(1600.0);
        assert_eq!(page.fraction(), 0.5);

        page.scroll_by(10_000.0);
        assert_eq!(page.fraction(), 1.0);

        page.scroll_by(-99_999.0);
        assert_eq!(page.fraction(), 0.0);
    }

    #[test]
    fn test_page_that_cannot_scroll() {
        let mut page = ScrollPage::new(800.0, 1.0);
        page.scroll_by(500.0);
        assert_eq!(page.scroll_y(), 0.0);
        assert_eq!(page.fraction(), 0.0);
    }

    #[test]
    fn test_page_keys() {
        let mut page = ScrollPage::new(100.0, 3.0);
        page.page_down();
        assert_eq!(page.scroll_y(), 100.0);
        page.end();
        assert_eq!(page.fraction(), 1.0);
        page.page_up();
        assert_eq!(page.scroll_y(), 100.0);
        page.home();
        assert_eq!(page.scroll_y(), 0.0);
    }

    #[test]
    fn test_scroll_to_fraction_clamps() {
        let mut page = ScrollPage::new(100.0, 5.0);
        page.scroll_to_fraction(0.25);
        assert_eq!(page.scroll_y(), 100.0);
        page.scroll_to_fraction(3.0);
        assert_eq!(page.fraction(), 1.0);
    }

    #[test]
    fn test_hint_hides_after_threshold() {
        let mut page = ScrollPage::new(100.0, 11.0);
        assert!(page.hint_visible());
        page.scroll_to(50.0);
        assert!(page.hint_visible());
        page.scroll_to(51.0);
        assert!(!page.hint_visible());
    }

    #[test]
    fn test_resize_reclamps_offset() {
        let mut page = ScrollPage::new(100.0, 5.0);
        page.end();
        assert_eq!(page.scroll_y(), 400.0);

        page.resize(50.0);
        assert_eq!(page.scroll_y(), 200.0);
        assert_eq!(page.fraction(), 1.0);

        page.resize(200.0);
        assert_eq!(page.scroll_y(), 200.0);
        assert_eq!(page.fraction(), 0.25);
    }

    #[test]
    fn test_unbounded_page_keeps_fraction_in_range() {
        let mut page = ScrollPage::new(800.0, f32::INFINITY);
        page.end();
        assert_eq!(page.fraction(), 0.0);

        let mut page = ScrollPage::new(800.0, f32::NAN);
        page.scroll_by(100.0);
        assert_eq!(page.scroll_y(), 0.0);
        assert_eq!(page.fraction(), 0.0);
        assert!(page.hint_visible());
    }
}
