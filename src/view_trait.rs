//! Viewport operations list contexts perform on their view.
//!
//! [`ViewTrait`] owns a boxed [`View`] and exposes the handful of
//! higher-level operations that selection handling needs: reading the
//! visible y-range, scrolling with clamping, paging, and writing either the
//! whole content or just the visible slice.

use crate::viewport::View;

/// Owner of a list context's view.
pub struct ViewTrait {
    view: Box<dyn View>,
}

impl std::fmt::Debug for ViewTrait {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewTrait")
            .field("name", &self.view.name())
            .field("origin", &self.view.origin())
            .field("lines", &self.view.lines_height())
            .finish()
    }
}

impl ViewTrait {
    /// Wraps a view.
    pub fn new(view: impl View + 'static) -> Self {
        Self {
            view: Box::new(view),
        }
    }

    /// Read access to the underlying view.
    pub fn view(&self) -> &dyn View {
        self.view.as_ref()
    }

    /// Write access to the underlying view.
    pub fn view_mut(&mut self) -> &mut dyn View {
        self.view.as_mut()
    }

    /// Name of the wrapped view.
    pub fn name(&self) -> &str {
        self.view.name()
    }

    /// `(first visible line, visible height)`.
    pub fn view_port_y_bounds(&self) -> (usize, usize) {
        let (_, start) = self.view.origin();
        (start, self.view.inner_height())
    }

    /// Puts the cursor on view line `y`, scrolling only if it is off screen.
    pub fn focus_point(&mut self, y: usize) {
        self.view.focus_point(0, y);
    }

    /// Replaces the full content.
    pub fn set_content(&mut self, content: &str) {
        self.view.set_content(content);
    }

    /// Resizes the content so the scroll range matches `count` lines.
    pub fn set_content_line_count(&mut self, count: usize) {
        self.view.set_content_line_count(count);
    }

    /// Blanks every line, then writes `content` at the current origin.
    pub fn set_view_port_content_and_clear_everything_else(&mut self, content: &str) {
        let count = self.view.lines_height();
        self.view.set_content_line_count(0);
        self.view.set_content_line_count(count);
        if !content.is_empty() {
            let (start, _) = self.view_port_y_bounds();
            self.view.overwrite_lines(start, content);
        }
    }

    /// Sets the footer.
    pub fn set_footer(&mut self, footer: &str) {
        self.view.set_footer(footer);
    }

    /// Sets the vertical origin directly.
    pub fn set_origin_y(&mut self, y: usize) {
        self.view.set_origin_y(y);
    }

    /// Sets the horizontal origin directly.
    pub fn set_origin_x(&mut self, x: usize) {
        self.view.set_origin_x(x);
    }

    /// Highlights a range starting at view line `y`.
    pub fn set_range_select_start(&mut self, y: usize) {
        self.view.set_range_select_start(Some(y));
    }

    /// Clears any range highlight.
    pub fn cancel_range_select(&mut self) {
        self.view.set_range_select_start(None);
    }

    /// Turns selected-line highlighting on or off.
    pub fn set_highlight(&mut self, highlight: bool) {
        self.view.set_highlight(highlight);
    }

    /// Scrolls up by `amount`, stopping at the first line.
    ///
    /// Only the origin moves; the cursor stays on its content line even if
    /// that line leaves the window.
    pub fn scroll_up(&mut self, amount: usize) {
        let (_, old) = self.view.origin();
        self.view.set_origin_y(old.saturating_sub(amount));
    }

    /// Scrolls down by `amount`, stopping once the last line is at the
    /// bottom of the window.
    pub fn scroll_down(&mut self, amount: usize) {
        let (_, old) = self.view.origin();
        let max = self
            .view
            .lines_height()
            .saturating_sub(self.view.inner_height());
        self.view.set_origin_y((old + amount).min(max.max(old)));
    }

    /// Scrolls left by half the width.
    pub fn scroll_left(&mut self) {
        let (x, _) = self.view.origin();
        self.view.set_origin_x(x.saturating_sub(self.horizontal_scroll_amount()));
    }

    /// Scrolls right by half the width, stopping at the widest line.
    pub fn scroll_right(&mut self) {
        let (x, _) = self.view.origin();
        let max = self
            .view
            .content_width()
            .saturating_sub(self.view.inner_width());
        let new = (x + self.horizontal_scroll_amount()).min(max.max(x));
        self.view.set_origin_x(new);
    }

    /// Lines moved by a page: one less than the height, at least one.
    pub fn page_delta(&self) -> usize {
        self.view.inner_height().saturating_sub(1).max(1)
    }

    /// Absolute view line under the cursor.
    pub fn selected_line_idx(&self) -> usize {
        self.view.selected_line_idx()
    }

    fn horizontal_scroll_amount(&self) -> usize {
        (self.view.inner_width() / 2).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::Model;
    use test_case::test_case;

    fn view_trait(lines: usize, height: usize) -> ViewTrait {
        let mut view = Model::new("list", 10, height);
        let content: Vec<String> = (0..lines).map(|i| i.to_string()).collect();
        view.set_content(&content.join("\n"));
        ViewTrait::new(view)
    }

    #[test_case(10 => 9)]
    #[test_case(2 => 1)]
    #[test_case(1 => 1 ; "one line still pages")]
    #[test_case(0 => 1 ; "zero height still pages")]
    fn page_delta(height: usize) -> usize {
        view_trait(50, height).page_delta()
    }

    #[test]
    fn scrolling_clamps_to_content() {
        let mut vt = view_trait(20, 5);
        vt.scroll_down(100);
        pretty_assertions::assert_eq!(vt.view_port_y_bounds(), (15, 5));
        vt.scroll_up(3);
        pretty_assertions::assert_eq!(vt.view_port_y_bounds(), (12, 5));
        vt.scroll_up(100);
        pretty_assertions::assert_eq!(vt.view_port_y_bounds(), (0, 5));
    }

    #[test]
    fn scrolling_leaves_the_cursor_on_its_line() {
        let mut vt = view_trait(20, 5);
        vt.focus_point(3);
        vt.scroll_down(6);
        pretty_assertions::assert_eq!(vt.view_port_y_bounds(), (6, 5));
        pretty_assertions::assert_eq!(vt.selected_line_idx(), 3);
    }

    #[test]
    fn horizontal_scroll_is_bounded() {
        let mut view = Model::new("list", 4, 3);
        view.set_content("0123456789");
        let mut vt = ViewTrait::new(view);
        vt.scroll_right();
        vt.scroll_right();
        vt.scroll_right();
        vt.scroll_right();
        pretty_assertions::assert_eq!(vt.view().origin(), (6, 0));
        vt.scroll_left();
        pretty_assertions::assert_eq!(vt.view().origin(), (4, 0));
    }

    #[test]
    fn view_port_content_replaces_only_the_window() {
        let mut vt = view_trait(6, 2);
        vt.set_origin_y(2);
        vt.set_view_port_content_and_clear_everything_else("x\ny");
        pretty_assertions::assert_eq!(vt.view().lines(), ["", "", "x", "y", "", ""]);
    }

    #[test]
    fn range_start_is_forwarded() {
        let mut vt = view_trait(6, 2);
        vt.set_range_select_start(4);
        pretty_assertions::assert_eq!(vt.view().range_select_start(), Some(4));
        vt.cancel_range_select();
        pretty_assertions::assert_eq!(vt.view().range_select_start(), None);
    }
}
