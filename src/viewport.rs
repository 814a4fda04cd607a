//! Scrollable terminal surface that list panels render into.
//!
//! The [`View`] trait is the narrow interface list contexts need from a
//! window: an origin (scroll offset), a cursor, the
//! content lines, a footer and a range-highlight start. [`Model`] is the
//! in-memory implementation; it keeps every line in a `Vec<String>` and
//! renders the visible slice with lipgloss.
//!
//! # Coordinates
//!
//! Every line index is an absolute view line, including the cursor. Scrolling
//! moves only the origin, so the cursor keeps pointing at the same content
//! line even while that line is scrolled out of the window.
//!
//! ```rust
//! use lazylist::viewport::{Model, View};
//!
//! let mut view = Model::new("files", 20, 3);
//! view.set_content("a\nb\nc\nd\ne\nf");
//! view.focus_point(0, 5);
//! assert_eq!(view.origin(), (0, 3));
//! assert_eq!(view.selected_line_idx(), 5);
//! ```

use lipgloss_extras::lipgloss::width as lg_width;
use lipgloss_extras::prelude::*;
use unicode_width::UnicodeWidthChar;

/// A window that list contents are drawn into.
pub trait View: Send {
    /// Stable name of the view, used to map it back to its context.
    fn name(&self) -> &str;

    /// Scroll offset as `(x, y)`.
    fn origin(&self) -> (usize, usize);
    /// Sets the horizontal scroll offset.
    fn set_origin_x(&mut self, x: usize);
    /// Sets the vertical scroll offset.
    fn set_origin_y(&mut self, y: usize);

    /// Usable width inside any frame.
    fn inner_width(&self) -> usize;
    /// Usable height inside any frame.
    fn inner_height(&self) -> usize;

    /// Cursor position in content coordinates.
    fn cursor(&self) -> (usize, usize);
    /// Moves the cursor, in content coordinates.
    fn set_cursor(&mut self, x: usize, y: usize);

    /// All content lines.
    fn lines(&self) -> &[String];
    /// Replaces all content.
    fn set_content(&mut self, content: &str);
    /// Grows or truncates the content to exactly `count` lines.
    fn set_content_line_count(&mut self, count: usize);
    /// Writes `content` starting at absolute line `y`, growing as needed.
    fn overwrite_lines(&mut self, y: usize, content: &str);

    /// Footer text, typically `"3 of 12"`.
    fn footer(&self) -> &str;
    /// Sets the footer text.
    fn set_footer(&mut self, footer: &str);

    /// First line of the highlighted range, if a range is shown.
    fn range_select_start(&self) -> Option<usize>;
    /// Sets or clears the highlighted range start.
    fn set_range_select_start(&mut self, start: Option<usize>);

    /// Whether the selected line is highlighted.
    fn highlight(&self) -> bool;
    /// Turns selected-line highlighting on or off.
    fn set_highlight(&mut self, highlight: bool);

    /// Number of content lines.
    fn lines_height(&self) -> usize {
        self.lines().len()
    }

    /// Display width of the widest content line.
    fn content_width(&self) -> usize {
        find_longest_line_width(self.lines())
    }

    /// Index of the line under the cursor.
    fn selected_line_idx(&self) -> usize {
        self.cursor().1
    }

    /// Places the cursor on line `cy`, scrolling only if needed.
    ///
    /// When the line is already visible the origin is left alone. Otherwise
    /// the view re-centers on it, without scrolling past the last line.
    /// Requests beyond the content are ignored.
    fn focus_point(&mut self, cx: usize, cy: usize) {
        let line_count = self.lines_height();
        if cy > line_count {
            return;
        }
        let height = self.inner_height();
        let (_, old_origin) = self.origin();
        let origin = calculate_new_origin(cy, old_origin, line_count, height);
        self.set_origin_y(origin);
        self.set_cursor(cx, cy);
    }
}

fn calculate_new_origin(selected: usize, old_origin: usize, line_count: usize, height: usize) -> usize {
    if height >= line_count {
        0
    } else if selected < old_origin || selected >= old_origin + height {
        selected
            .saturating_sub(height / 2)
            .min(line_count - height)
    } else {
        old_origin
    }
}

/// In-memory view.
///
/// `width` and `height` are the content area. A frame from `style` (border,
/// padding) is drawn around it by [`Model::view`] and never eats into it, so
/// [`View::inner_height`] is always the number of rows [`Model::visible_lines`]
/// returns for a full window.
#[derive(Debug, Clone)]
pub struct Model {
    /// View name.
    pub name: String,
    /// Visible width in columns.
    pub width: usize,
    /// Visible height in lines.
    pub height: usize,
    /// Style applied to the whole rendered block.
    pub style: Style,
    /// Style applied to the selected line and range.
    pub selected_style: Style,

    lines: Vec<String>,
    x_offset: usize,
    y_offset: usize,
    cursor_x: usize,
    cursor_y: usize,
    footer: String,
    range_select_start: Option<usize>,
    highlight: bool,
}

impl Model {
    /// Creates an empty view of the given size.
    pub fn new(name: impl Into<String>, width: usize, height: usize) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            style: Style::new(),
            selected_style: Style::new().reverse(true),
            lines: Vec::new(),
            x_offset: 0,
            y_offset: 0,
            cursor_x: 0,
            cursor_y: 0,
            footer: String::new(),
            range_select_start: None,
            highlight: false,
        }
    }

    /// Builder-style [`Model::set_size`].
    pub fn with_dimensions(mut self, width: usize, height: usize) -> Self {
        self.set_size(width, height);
        self
    }

    /// Builder-style style setter.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Resizes the view. The origin is kept; callers re-focus afterwards.
    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// The lines currently inside the window, clipped horizontally.
    pub fn visible_lines(&self) -> Vec<String> {
        let (w, h) = (self.inner_width(), self.inner_height());
        let end = (self.y_offset + h).min(self.lines.len());
        let start = self.y_offset.min(end);
        self.lines[start..end]
            .iter()
            .map(|line| {
                if self.x_offset == 0 && lg_width(line) <= w {
                    line.clone()
                } else {
                    cut_string(line, self.x_offset, self.x_offset + w)
                }
            })
            .collect()
    }

    /// Renders the visible lines, highlighting the selection when enabled.
    pub fn view(&self) -> String {
        let selected = self.selected_line_idx();
        let (low, high) = match self.range_select_start {
            Some(start) => (start.min(selected), start.max(selected)),
            None => (selected, selected),
        };

        let output = self
            .visible_lines()
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                let idx = self.y_offset + i;
                if self.highlight && (low..=high).contains(&idx) {
                    self.selected_style.render(&line)
                } else {
                    line
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        self.style.render(&output)
    }
}

impl View for Model {
    fn name(&self) -> &str {
        &self.name
    }

    fn origin(&self) -> (usize, usize) {
        (self.x_offset, self.y_offset)
    }

    fn set_origin_x(&mut self, x: usize) {
        self.x_offset = x;
    }

    fn set_origin_y(&mut self, y: usize) {
        self.y_offset = y;
    }

    fn inner_width(&self) -> usize {
        self.width
    }

    fn inner_height(&self) -> usize {
        self.height
    }

    fn cursor(&self) -> (usize, usize) {
        (self.cursor_x, self.cursor_y)
    }

    fn set_cursor(&mut self, x: usize, y: usize) {
        self.cursor_x = x;
        self.cursor_y = y;
    }

    fn lines(&self) -> &[String] {
        &self.lines
    }

    fn set_content(&mut self, content: &str) {
        self.lines = if content.is_empty() {
            Vec::new()
        } else {
            content.split('\n').map(str::to_string).collect()
        };
    }

    fn set_content_line_count(&mut self, count: usize) {
        self.lines.resize(count, String::new());
    }

    fn overwrite_lines(&mut self, y: usize, content: &str) {
        for (i, line) in content.split('\n').enumerate() {
            let idx = y + i;
            if idx >= self.lines.len() {
                self.lines.resize(idx + 1, String::new());
            }
            self.lines[idx] = line.to_string();
        }
    }

    fn footer(&self) -> &str {
        &self.footer
    }

    fn set_footer(&mut self, footer: &str) {
        self.footer = footer.to_string();
    }

    fn range_select_start(&self) -> Option<usize> {
        self.range_select_start
    }

    fn set_range_select_start(&mut self, start: Option<usize>) {
        self.range_select_start = start;
    }

    fn highlight(&self) -> bool {
        self.highlight
    }

    fn set_highlight(&mut self, highlight: bool) {
        self.highlight = highlight;
    }
}

fn find_longest_line_width(lines: &[String]) -> usize {
    lines.iter().map(|line| lg_width(line)).max().unwrap_or(0)
}

/// Cuts `s` to the display columns `start..end`.
fn cut_string(s: &str, start: usize, end: usize) -> String {
    let mut out = String::new();
    let mut col = 0;
    for ch in s.chars() {
        if col >= end {
            break;
        }
        if col >= start {
            out.push(ch);
        }
        col += ch.width().unwrap_or(0);
    }
    out
}
