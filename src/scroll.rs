//! Scroll-off margin: keeping context lines around a moving selection.
//!
//! When the selection moves by one line, the viewport scrolls early so that
//! `scroll_off_margin` lines stay visible between the selection and the
//! window edge. The margin is capped at half the window height, so a huge
//! margin keeps the selection centered. On even heights the top margin may
//! be one line larger than the bottom one.
//!
//! Only moves that start inside the viewport are considered. A selection
//! that was scrolled out of view (by the mouse wheel, say) is not dragged
//! back here; focusing the line handles that.
//!
//! ```rust
//! use lazylist::scroll::calculate_lines_to_scroll_down;
//!
//! // 10-line window at line 10, margin 3: moving from 16 to 17 scrolls by 1.
//! assert_eq!(calculate_lines_to_scroll_down(10, 10, 3, 16, 17), 1);
//! ```

use crate::config::{GuiConfig, ScrollOffBehavior};
use crate::view_trait::ViewTrait;

/// Lines to scroll up after the selection moved from `line_idx_before` to
/// `line_idx_after` in a window starting at `view_port_start`.
pub fn calculate_lines_to_scroll_up(
    view_port_start: usize,
    view_port_height: usize,
    scroll_off_margin: usize,
    line_idx_before: usize,
    line_idx_after: usize,
) -> usize {
    // floor((height + 0.5) / 2)
    let margin = scroll_off_margin.min((2 * view_port_height + 1) / 4);

    if !in_view_port(view_port_start, view_port_height, line_idx_before) {
        return 0;
    }

    let margin_end = view_port_start + margin;
    margin_end.saturating_sub(line_idx_after)
}

/// Lines to scroll down after the selection moved from `line_idx_before` to
/// `line_idx_after` in a window starting at `view_port_start`.
pub fn calculate_lines_to_scroll_down(
    view_port_start: usize,
    view_port_height: usize,
    scroll_off_margin: usize,
    line_idx_before: usize,
    line_idx_after: usize,
) -> usize {
    // floor((height - 0.5) / 2)
    let margin = scroll_off_margin.min((2 * view_port_height).saturating_sub(1) / 4);

    if !in_view_port(view_port_start, view_port_height, line_idx_before) {
        return 0;
    }

    // Last line the selection may occupy before the window has to move.
    let margin_start = (view_port_start + view_port_height).saturating_sub(margin + 1);
    line_idx_after.saturating_sub(margin_start)
}

fn in_view_port(start: usize, height: usize, idx: usize) -> bool {
    idx >= start && idx < start + height
}

/// Scrolls `view` up if a one-line move upward entered the top margin.
pub fn check_scroll_up(view: &mut ViewTrait, config: &GuiConfig, before: usize, after: usize) {
    if config.scroll_off_behavior == ScrollOffBehavior::Jump {
        return;
    }
    let (start, height) = view.view_port_y_bounds();
    let lines = calculate_lines_to_scroll_up(start, height, config.scroll_off_margin, before, after);
    if lines > 0 {
        tracing::trace!(lines, before, after, "scroll-off margin: scrolling up");
        view.scroll_up(lines);
    }
}

/// Scrolls `view` down if a one-line move downward entered the bottom margin.
pub fn check_scroll_down(view: &mut ViewTrait, config: &GuiConfig, before: usize, after: usize) {
    if config.scroll_off_behavior == ScrollOffBehavior::Jump {
        return;
    }
    let (start, height) = view.view_port_y_bounds();
    let lines =
        calculate_lines_to_scroll_down(start, height, config.scroll_off_margin, before, after);
    if lines > 0 {
        tracing::trace!(lines, before, after, "scroll-off margin: scrolling down");
        view.scroll_down(lines);
    }
}
