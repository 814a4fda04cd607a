//! Selection cursor for list panels.
//!
//! [`ListCursor`] tracks which row of a list is selected and, optionally, a
//! contiguous range of rows. It never owns the list: the number of rows is
//! read through a length callback every time it is needed, because the
//! backing list may be replaced by a background refresh at any moment. Every
//! read of the length re-clamps the cursor so that indices never point past
//! the end of the list.
//!
//! Range selection comes in two flavours:
//!
//! - **Sticky** ranges are toggled on explicitly and stay active while the
//!   cursor moves around.
//! - **Non-sticky** ranges are created by shift+arrow style expansion and are
//!   dropped as soon as the cursor moves without expanding.
//!
//! ```rust
//! use lazylist::cursor::{ListCursor, RangeSelectMode};
//!
//! let mut cursor = ListCursor::with_len(10);
//! cursor.set_selection(4);
//! cursor.expand_non_sticky_range(2);
//! assert_eq!(cursor.selection_range(), Some((4, 6)));
//! assert_eq!(cursor.selection_range_and_mode().2, RangeSelectMode::NonSticky);
//!
//! // A plain move collapses a non-sticky range.
//! cursor.move_selected_line(1);
//! assert!(!cursor.is_selecting_range());
//! assert_eq!(cursor.selected_line_idx(), Some(7));
//! ```

use std::fmt;
use std::sync::Arc;

/// Callback that reports how many rows the cursor ranges over.
pub type LengthFn = Arc<dyn Fn() -> usize + Send + Sync>;

/// Range selection state of a [`ListCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeSelectMode {
    /// Single selection.
    #[default]
    None,
    /// A range that survives plain cursor movement.
    Sticky,
    /// A range that collapses on the next plain cursor movement.
    NonSticky,
}

/// Selected index plus optional range anchor over a list of varying length.
///
/// Indices are clamped to `0..len` whenever they are written and whenever
/// [`len`](Self::len) is read. When the list is empty the selection reads as
/// `None`.
#[derive(Clone)]
pub struct ListCursor {
    selected_idx: usize,
    range_select_mode: RangeSelectMode,
    range_start_idx: usize,
    get_length: LengthFn,
}

impl fmt::Debug for ListCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListCursor")
            .field("selected_idx", &self.selected_idx)
            .field("range_select_mode", &self.range_select_mode)
            .field("range_start_idx", &self.range_start_idx)
            .field("len", &(self.get_length)())
            .finish()
    }
}

impl ListCursor {
    /// Creates a cursor whose list length is read from `get_length`.
    pub fn new(get_length: impl Fn() -> usize + Send + Sync + 'static) -> Self {
        Self::from_length_fn(Arc::new(get_length))
    }

    /// Creates a cursor from an already shared length callback.
    pub fn from_length_fn(get_length: LengthFn) -> Self {
        Self {
            selected_idx: 0,
            range_select_mode: RangeSelectMode::None,
            range_start_idx: 0,
            get_length,
        }
    }

    /// Creates a cursor over a list of fixed length. Mostly useful in tests.
    pub fn with_len(len: usize) -> Self {
        Self::new(move || len)
    }

    /// The selected index, or `None` if the list is empty.
    ///
    /// The value is bounded by the current length even if the list shrank
    /// since the last write.
    pub fn selected_line_idx(&self) -> Option<usize> {
        match (self.get_length)() {
            0 => None,
            len => Some(self.selected_idx.min(len - 1)),
        }
    }

    /// Moves the selection without touching range state.
    pub fn set_selected_line_idx(&mut self, value: usize) {
        self.selected_idx = self.clamp_value(value);
    }

    /// Selects `value` and cancels any range selection.
    pub fn set_selection(&mut self, value: usize) {
        self.selected_idx = self.clamp_value(value);
        self.cancel_range_select();
    }

    /// Restores a full selection state.
    ///
    /// A non-sticky range whose two ends coincide after clamping is not a
    /// range at all and is stored as [`RangeSelectMode::None`].
    pub fn set_selection_range_and_mode(
        &mut self,
        selected_idx: usize,
        range_start_idx: usize,
        mode: RangeSelectMode,
    ) {
        self.selected_idx = self.clamp_value(selected_idx);
        self.range_start_idx = self.clamp_value(range_start_idx);
        self.range_select_mode =
            if mode == RangeSelectMode::NonSticky && self.selected_idx == self.range_start_idx {
                RangeSelectMode::None
            } else {
                mode
            };
    }

    /// Returns `(selected, range_start, mode)`, for saving and restoring.
    pub fn selection_range_and_mode(&self) -> (usize, usize, RangeSelectMode) {
        (self.selected_idx, self.range_start_idx, self.range_select_mode)
    }

    /// Moves the selected line by `change`, clamping at both ends.
    ///
    /// A non-sticky range is cancelled first; a sticky one keeps its anchor.
    pub fn move_selected_line(&mut self, change: isize) {
        if self.range_select_mode == RangeSelectMode::NonSticky {
            self.cancel_range_select();
        }
        self.selected_idx = self.clamp_value(offset(self.selected_idx, change));
    }

    /// Shifts the selection and, when a range is active, its anchor by the
    /// same `delta`. Used when items are moved up or down in the list.
    pub fn move_selection(&mut self, delta: isize) {
        self.selected_idx = self.clamp_value(offset(self.selected_idx, delta));
        if self.is_selecting_range() {
            self.range_start_idx = self.clamp_value(offset(self.range_start_idx, delta));
        }
    }

    /// Re-clamps the selection and anchor against the current length.
    pub fn clamp_selection(&mut self) {
        self.selected_idx = self.clamp_value(self.selected_idx);
        self.range_start_idx = self.clamp_value(self.range_start_idx);
    }

    /// Current length of the list. Clamps the selection as a side effect.
    pub fn len(&mut self) -> usize {
        self.clamp_selection();
        (self.get_length)()
    }

    /// Reports whether the list is empty.
    pub fn is_empty(&self) -> bool {
        (self.get_length)() == 0
    }

    /// The range anchor, if a range is being selected.
    pub fn range_start_idx(&self) -> Option<usize> {
        if self.is_selecting_range() {
            Some(self.range_start_idx)
        } else {
            None
        }
    }

    /// Inclusive `(low, high)` bounds of the selection.
    ///
    /// Without a range both ends equal the selected index. `None` means the
    /// list is empty.
    pub fn selection_range(&self) -> Option<(usize, usize)> {
        let selected = self.selected_line_idx()?;
        if self.is_selecting_range() {
            let anchor = self.clamp_value(self.range_start_idx);
            Some((selected.min(anchor), selected.max(anchor)))
        } else {
            Some((selected, selected))
        }
    }

    /// Starts a sticky range anchored at the selection, or cancels any range.
    pub fn toggle_sticky_range(&mut self) {
        if self.is_selecting_range() {
            self.cancel_range_select();
        } else {
            self.range_start_idx = self.selected_idx;
            self.range_select_mode = RangeSelectMode::Sticky;
        }
    }

    /// Grows or shrinks a non-sticky range by moving the selection.
    ///
    /// The anchor is set to the current selection only when no range is
    /// active. An existing sticky range is converted to non-sticky.
    pub fn expand_non_sticky_range(&mut self, change: isize) {
        if !self.is_selecting_range() {
            self.range_start_idx = self.selected_idx;
        }
        self.range_select_mode = RangeSelectMode::NonSticky;
        self.selected_idx = self.clamp_value(offset(self.selected_idx, change));
    }

    /// Drops back to single selection.
    pub fn cancel_range_select(&mut self) {
        self.range_select_mode = RangeSelectMode::None;
    }

    /// True in either range mode, even when the range covers one item.
    pub fn is_selecting_range(&self) -> bool {
        self.range_select_mode != RangeSelectMode::None
    }

    /// True when a range covers more than one item.
    pub fn are_multiple_items_selected(&self) -> bool {
        matches!(self.selection_range(), Some((low, high)) if low != high)
    }

    fn clamp_value(&self, value: usize) -> usize {
        let len = (self.get_length)();
        if len == 0 {
            0
        } else {
            value.min(len - 1)
        }
    }
}

fn offset(idx: usize, delta: isize) -> usize {
    idx.saturating_add_signed(delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn shared_len(initial: usize) -> (Arc<AtomicUsize>, ListCursor) {
        let len = Arc::new(AtomicUsize::new(initial));
        let reader = Arc::clone(&len);
        (len, ListCursor::new(move || reader.load(Ordering::SeqCst)))
    }

    #[test]
    fn empty_list_has_no_selection() {
        let mut cursor = ListCursor::with_len(0);
        cursor.move_selected_line(3);
        assert_eq!(cursor.selected_line_idx(), None);
        assert_eq!(cursor.selection_range(), None);
        assert!(!cursor.are_multiple_items_selected());
    }

    #[test]
    fn selection_clamps_at_both_ends() {
        let mut cursor = ListCursor::with_len(5);
        cursor.move_selected_line(-3);
        assert_eq!(cursor.selected_line_idx(), Some(0));
        cursor.move_selected_line(100);
        assert_eq!(cursor.selected_line_idx(), Some(4));
        cursor.set_selection(17);
        assert_eq!(cursor.selected_line_idx(), Some(4));
    }

    #[test]
    fn len_reclamps_after_the_list_shrinks() {
        let (len, mut cursor) = shared_len(10);
        cursor.set_selection(3);
        cursor.toggle_sticky_range();
        cursor.set_selected_line_idx(9);

        len.store(4, Ordering::SeqCst);
        assert_eq!(cursor.len(), 4);
        assert_eq!(cursor.selection_range_and_mode(), (3, 3, RangeSelectMode::Sticky));

        len.store(0, Ordering::SeqCst);
        assert_eq!(cursor.len(), 0);
        assert_eq!(cursor.selected_line_idx(), None);
    }

    #[test]
    fn sticky_range_survives_plain_moves() {
        let mut cursor = ListCursor::with_len(10);
        cursor.set_selection(2);
        cursor.toggle_sticky_range();
        cursor.move_selected_line(3);
        assert!(cursor.is_selecting_range());
        assert_eq!(cursor.selection_range(), Some((2, 5)));
        assert!(cursor.are_multiple_items_selected());

        cursor.toggle_sticky_range();
        assert!(!cursor.is_selecting_range());
        assert_eq!(cursor.selection_range(), Some((5, 5)));
    }

    #[test]
    fn range_bounds_are_ordered() {
        let mut cursor = ListCursor::with_len(10);
        cursor.set_selection(6);
        cursor.expand_non_sticky_range(-4);
        assert_eq!(cursor.selection_range(), Some((2, 6)));
    }

    #[test]
    fn expanding_a_sticky_range_keeps_its_anchor() {
        let mut cursor = ListCursor::with_len(10);
        cursor.set_selection(1);
        cursor.toggle_sticky_range();
        cursor.move_selected_line(2);
        cursor.expand_non_sticky_range(1);
        assert_eq!(
            cursor.selection_range_and_mode(),
            (4, 1, RangeSelectMode::NonSticky)
        );
    }

    #[test]
    fn one_item_range_is_still_a_range() {
        let mut cursor = ListCursor::with_len(3);
        cursor.toggle_sticky_range();
        assert!(cursor.is_selecting_range());
        assert!(!cursor.are_multiple_items_selected());
        assert_eq!(cursor.range_start_idx(), Some(0));
    }

    #[test]
    fn restoring_a_collapsed_non_sticky_range_drops_the_mode() {
        let mut cursor = ListCursor::with_len(5);
        cursor.set_selection_range_and_mode(3, 3, RangeSelectMode::NonSticky);
        assert!(!cursor.is_selecting_range());

        // Both ends clamp to 4, so the range collapses.
        cursor.set_selection_range_and_mode(9, 7, RangeSelectMode::NonSticky);
        assert_eq!(cursor.selection_range_and_mode(), (4, 4, RangeSelectMode::None));

        cursor.set_selection_range_and_mode(2, 2, RangeSelectMode::Sticky);
        assert_eq!(cursor.selection_range_and_mode().2, RangeSelectMode::Sticky);
    }

    #[test]
    fn move_selection_drags_the_anchor_along() {
        let mut cursor = ListCursor::with_len(10);
        cursor.set_selection(3);
        cursor.toggle_sticky_range();
        cursor.set_selected_line_idx(5);
        cursor.move_selection(2);
        assert_eq!(cursor.selection_range(), Some((5, 7)));

        cursor.cancel_range_select();
        cursor.move_selection(-10);
        assert_eq!(cursor.selection_range_and_mode(), (0, 5, RangeSelectMode::None));
    }

    #[test]
    fn set_selection_cancels_range() {
        let mut cursor = ListCursor::with_len(10);
        cursor.toggle_sticky_range();
        cursor.set_selection(4);
        assert!(!cursor.is_selecting_range());
    }
}
