//! Turning list rows into view lines.
//!
//! A list panel's view is not always one line per item: section headers
//! ([`NonModelItem`]s) can sit between model rows. [`ListRenderer`] renders
//! a window of the list with the headers interleaved, and keeps the two
//! lookup tables that translate between *model indices* (positions in the
//! visible list) and *view indices* (lines in the view).
//!
//! ## Index semantics
//!
//! A header is drawn before the model row whose index it names, and a
//! header whose index equals the list length is drawn after the last row.
//! Both conversions clamp: model indices beyond the end map to the view line
//! after the last row, and view indices beyond the end map to the list
//! length. A header line maps to the model row that follows it.
//!
//! The tables are rebuilt on every render, so call [`render_all`] or
//! [`render_lines`] before converting indices.
//!
//! [`render_all`]: ListRenderer::render_all
//! [`render_lines`]: ListRenderer::render_lines

use super::types::NonModelItem;
use crate::cursor::LengthFn;
use unicode_width::UnicodeWidthStr;

/// Returns the display columns for model rows `start..end`.
pub type DisplayStringsFn = Box<dyn Fn(usize, usize) -> Vec<Vec<String>> + Send + Sync>;

/// Returns the headers to interleave, sorted by index.
pub type NonModelItemsFn = Box<dyn Fn() -> Vec<NonModelItem> + Send + Sync>;

/// Horizontal alignment of a rendered column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnAlignment {
    /// Pad on the right.
    #[default]
    Left,
    /// Pad on the left.
    Right,
}

/// Renders list rows and headers, and maps between model and view indices.
pub struct ListRenderer {
    get_length: LengthFn,
    get_display_strings: DisplayStringsFn,
    get_non_model_items: Option<NonModelItemsFn>,
    column_alignments: Vec<ColumnAlignment>,

    num_non_model_items: usize,
    view_indices_by_model_idx: Option<Vec<usize>>,
    model_indices_by_view_idx: Option<Vec<usize>>,
}

impl std::fmt::Debug for ListRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListRenderer")
            .field("len", &(self.get_length)())
            .field("has_non_model_items", &self.get_non_model_items.is_some())
            .field("num_non_model_items", &self.num_non_model_items)
            .finish()
    }
}

impl ListRenderer {
    /// Creates a renderer without headers.
    pub fn new(
        get_length: LengthFn,
        get_display_strings: impl Fn(usize, usize) -> Vec<Vec<String>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            get_length,
            get_display_strings: Box::new(get_display_strings),
            get_non_model_items: None,
            column_alignments: Vec::new(),
            num_non_model_items: 0,
            view_indices_by_model_idx: None,
            model_indices_by_view_idx: None,
        }
    }

    /// Interleaves the headers returned by `f`.
    pub fn with_non_model_items(
        mut self,
        f: impl Fn() -> Vec<NonModelItem> + Send + Sync + 'static,
    ) -> Self {
        self.get_non_model_items = Some(Box::new(f));
        self
    }

    /// Sets per-column alignment. Columns without an entry align left.
    pub fn with_column_alignments(mut self, alignments: Vec<ColumnAlignment>) -> Self {
        self.column_alignments = alignments;
        self
    }

    /// Number of header lines in the last render.
    pub fn num_non_model_items(&self) -> usize {
        self.num_non_model_items
    }

    /// Total view lines: model rows plus headers.
    pub fn view_len(&self) -> usize {
        (self.get_length)() + self.num_non_model_items
    }

    /// Renders the whole list.
    pub fn render_all(&mut self) -> String {
        self.render(None, None)
    }

    /// Renders view lines `start..end`. `end` may run past the last line.
    pub fn render_lines(&mut self, start: usize, end: usize) -> String {
        self.render(Some(start), Some(end))
    }

    fn render(&mut self, start: Option<usize>, end: Option<usize>) -> String {
        let non_model_items = self.get_non_model_items.as_ref().map(|f| f());
        if let Some(items) = &non_model_items {
            self.prepare_conversion_arrays(items);
        }
        let non_model_items = non_model_items.unwrap_or_default();

        let len = (self.get_length)();
        let (start_idx, start_model_idx) = match start {
            Some(s) => (s, self.view_index_to_model_index(s)),
            None => (0, 0),
        };
        let (end_idx, end_model_idx) = match end {
            Some(e) => (e, self.view_index_to_model_index(e)),
            None => (len + self.num_non_model_items, len),
        };

        let rows = if start_model_idx < end_model_idx {
            (self.get_display_strings)(start_model_idx, end_model_idx)
        } else {
            Vec::new()
        };
        let (mut lines, column_positions) = render_display_strings(&rows, &self.column_alignments);

        let mut offset = 0;
        for item in &non_model_items {
            let view_idx = item.index + offset;
            if view_idx >= end_idx {
                break;
            }
            if view_idx >= start_idx {
                let padding = column_positions.get(item.column).copied().unwrap_or(0);
                let at = (view_idx - start_idx).min(lines.len());
                lines.insert(at, format!("{}{}", " ".repeat(padding), item.content));
            }
            offset += 1;
        }

        lines.join("\n")
    }

    fn prepare_conversion_arrays(&mut self, items: &[NonModelItem]) {
        let len = (self.get_length)();
        let mut view_by_model: Vec<usize> = (0..=len).collect();
        let mut model_by_view: Vec<usize> = (0..=len).collect();

        let mut offset = 0;
        for item in items {
            let view_idx = item.index + offset;
            if view_idx >= model_by_view.len() {
                break;
            }
            for v in view_by_model.iter_mut().skip(item.index) {
                *v += 1;
            }
            model_by_view.insert(view_idx, model_by_view[view_idx]);
            offset += 1;
        }

        self.num_non_model_items = offset;
        self.view_indices_by_model_idx = Some(view_by_model);
        self.model_indices_by_view_idx = Some(model_by_view);
    }

    /// View line of model row `model_index`, clamped to the list.
    pub fn model_index_to_view_index(&self, model_index: usize) -> usize {
        let idx = model_index.min((self.get_length)());
        self.view_indices_by_model_idx
            .as_ref()
            .and_then(|table| table.get(idx).copied())
            .unwrap_or(idx)
    }

    /// Model row shown at view line `view_index`, clamped to the list.
    pub fn view_index_to_model_index(&self, view_index: usize) -> usize {
        let len = (self.get_length)();
        let idx = view_index.min(len + self.num_non_model_items);
        self.model_indices_by_view_idx
            .as_ref()
            .and_then(|table| table.get(idx).copied())
            .unwrap_or_else(|| idx.min(len))
    }
}

/// Display width of a cell, ignoring ANSI escape sequences.
fn display_width(cell: &str) -> usize {
    if cell.contains('\x1b') {
        UnicodeWidthStr::width(strip_ansi_escapes::strip_str(cell).as_str())
    } else {
        UnicodeWidthStr::width(cell)
    }
}

/// Lays rows out in aligned columns separated by one space.
///
/// Columns that are blank in every row are dropped. Returns the lines and
/// the starting display column of every input column.
pub fn render_display_strings(
    rows: &[Vec<String>],
    alignments: &[ColumnAlignment],
) -> (Vec<String>, Vec<usize>) {
    let num_columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0; num_columns];
    for row in rows {
        for (c, cell) in row.iter().enumerate() {
            widths[c] = widths[c].max(display_width(cell));
        }
    }

    let kept: Vec<usize> = (0..num_columns).filter(|&c| widths[c] > 0).collect();

    let mut positions = Vec::with_capacity(num_columns);
    let mut pos = 0;
    for (c, &width) in widths.iter().enumerate() {
        positions.push(pos);
        if kept.contains(&c) {
            pos += width + 1;
        }
    }

    let lines = rows
        .iter()
        .map(|row| {
            let mut line = String::new();
            for (k, &c) in kept.iter().enumerate() {
                let cell = row.get(c).map(String::as_str).unwrap_or("");
                let pad = " ".repeat(widths[c] - display_width(cell));
                let is_last = k + 1 == kept.len();
                if k > 0 {
                    line.push(' ');
                }
                match alignments.get(c).copied().unwrap_or_default() {
                    ColumnAlignment::Left if is_last => line.push_str(cell),
                    ColumnAlignment::Left => {
                        line.push_str(cell);
                        line.push_str(&pad);
                    }
                    ColumnAlignment::Right => {
                        line.push_str(&pad);
                        line.push_str(cell);
                    }
                }
            }
            line
        })
        .collect();

    (lines, positions)
}
