//! A list paired with its selection cursor.
//!
//! [`ListViewModel`] is the plain version over a whole backing list.
//! [`FilteredListViewModel`] puts a [`FilteredList`] in between, so the
//! cursor indexes visible items rather than backing ones.

use super::filtering::FilteredList;
use super::model::ModelHandle;
use super::types::Item;
use crate::config::FilterMode;
use crate::cursor::ListCursor;

/// Backing list plus cursor.
#[derive(Debug, Clone)]
pub struct ListViewModel<T> {
    model: ModelHandle<T>,
    cursor: ListCursor,
}

impl<T: Send + Sync + 'static> ListViewModel<T> {
    /// Creates a view model whose cursor ranges over `model`.
    pub fn new(model: ModelHandle<T>) -> Self {
        let len_model = model.clone();
        Self {
            model,
            cursor: ListCursor::new(move || len_model.len()),
        }
    }
}

impl<T> ListViewModel<T> {
    /// The selection cursor.
    pub fn cursor(&self) -> &ListCursor {
        &self.cursor
    }

    /// Mutable access to the selection cursor.
    pub fn cursor_mut(&mut self) -> &mut ListCursor {
        &mut self.cursor
    }

    /// The backing list.
    pub fn model(&self) -> &ModelHandle<T> {
        &self.model
    }

    /// Number of backing items.
    pub fn model_len(&self) -> usize {
        self.model.len()
    }
}

impl<T: Clone> ListViewModel<T> {
    /// The item under the cursor.
    pub fn selected_item(&self) -> Option<T> {
        self.model.get(self.cursor.selected_line_idx()?)
    }

    /// Every item in the selection range.
    pub fn selected_items(&self) -> Vec<T> {
        match self.cursor.selection_range() {
            Some((low, high)) => self.model.with_items(|items| {
                items.iter().skip(low).take(high + 1 - low).cloned().collect()
            }),
            None => Vec::new(),
        }
    }
}

impl<T: Item> ListViewModel<T> {
    /// Identity of the item under the cursor.
    pub fn selected_urn(&self) -> Option<String> {
        self.selected_item().map(|item| item.urn())
    }
}

/// Filtered list plus a cursor over the visible items.
#[derive(Debug, Clone)]
pub struct FilteredListViewModel<T> {
    list: FilteredList<T>,
    cursor: ListCursor,
}

impl<T: Send + Sync + 'static> FilteredListViewModel<T> {
    /// Creates an unfiltered view model over `model`.
    pub fn new(model: ModelHandle<T>, mode: FilterMode) -> Self {
        let list = FilteredList::new(model, mode);
        let cursor = ListCursor::from_length_fn(list.length_fn());
        Self { list, cursor }
    }
}

impl<T> FilteredListViewModel<T> {
    /// The selection cursor, over visible positions.
    pub fn cursor(&self) -> &ListCursor {
        &self.cursor
    }

    /// Mutable access to the selection cursor.
    pub fn cursor_mut(&mut self) -> &mut ListCursor {
        &mut self.cursor
    }

    /// The filtered list.
    pub fn filtered_list(&self) -> &FilteredList<T> {
        &self.list
    }

    /// Mutable access to the filtered list.
    pub fn filtered_list_mut(&mut self) -> &mut FilteredList<T> {
        &mut self.list
    }

    /// The backing list.
    pub fn model(&self) -> &ModelHandle<T> {
        self.list.model()
    }

    /// Number of backing items, ignoring the filter.
    pub fn model_len(&self) -> usize {
        self.list.unfiltered_len()
    }

    /// Clears the filter, keeping the same item selected.
    pub fn clear_filter(&mut self) {
        let backing = self.list.unfiltered_index(self.cursor.selected_line_idx());
        self.list.clear_filter();
        self.cursor.set_selection(backing.unwrap_or(0));
    }
}

impl<T: Clone> FilteredListViewModel<T> {
    /// The visible item under the cursor.
    pub fn selected_item(&self) -> Option<T> {
        self.list.item_at(self.cursor.selected_line_idx()?)
    }

    /// Every visible item in the selection range.
    pub fn selected_items(&self) -> Vec<T> {
        match self.cursor.selection_range() {
            Some((low, high)) => self.list.map_range(low, high + 1, T::clone),
            None => Vec::new(),
        }
    }
}

impl<T: Item> FilteredListViewModel<T> {
    /// Identity of the visible item under the cursor.
    pub fn selected_urn(&self) -> Option<String> {
        self.selected_item().map(|item| item.urn())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn files() -> ModelHandle<String> {
        ModelHandle::new(
            ["Cargo.toml", "README.md", "src/lib.rs", "src/main.rs", "tests/it.rs"]
                .into_iter()
                .map(String::from)
                .collect(),
        )
    }

    #[test]
    fn plain_view_model_reads_through_the_cursor() {
        let mut vm = ListViewModel::new(files());
        vm.cursor_mut().set_selection(1);
        vm.cursor_mut().expand_non_sticky_range(2);
        assert_eq!(vm.selected_item().as_deref(), Some("src/main.rs"));
        assert_eq!(vm.selected_items(), vec!["README.md", "src/lib.rs", "src/main.rs"]);
        assert_eq!(vm.selected_urn().as_deref(), Some("src/main.rs"));
    }

    #[test]
    fn empty_view_model_selects_nothing() {
        let vm: ListViewModel<String> = ListViewModel::new(ModelHandle::default());
        assert_eq!(vm.selected_item(), None);
        assert!(vm.selected_items().is_empty());
    }

    #[test]
    fn cursor_follows_the_filtered_length() {
        let mut vm = FilteredListViewModel::new(files(), FilterMode::Substring);
        vm.cursor_mut().set_selection(4);
        vm.filtered_list_mut().set_filter("src/");
        assert_eq!(vm.cursor_mut().len(), 2);
        assert_eq!(vm.cursor().selected_line_idx(), Some(1));
        assert_eq!(vm.selected_item().as_deref(), Some("src/main.rs"));
        assert_eq!(vm.model_len(), 5);
    }

    #[test]
    fn clearing_the_filter_keeps_the_selected_item() {
        let mut vm = FilteredListViewModel::new(files(), FilterMode::Substring);
        vm.filtered_list_mut().set_filter(".rs");
        vm.cursor_mut().set_selection(2);
        assert_eq!(vm.selected_item().as_deref(), Some("tests/it.rs"));

        vm.clear_filter();
        assert!(!vm.filtered_list().is_filtering());
        assert_eq!(vm.cursor().selected_line_idx(), Some(4));
        assert_eq!(vm.selected_item().as_deref(), Some("tests/it.rs"));
    }

    #[test]
    fn filtered_range_selection_maps_to_visible_items() {
        let mut vm = FilteredListViewModel::new(files(), FilterMode::Substring);
        vm.filtered_list_mut().set_filter(".rs");
        vm.cursor_mut().toggle_sticky_range();
        vm.cursor_mut().move_selected_line(1);
        assert_eq!(vm.selected_items(), vec!["src/lib.rs", "src/main.rs"]);
    }
}
