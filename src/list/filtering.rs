//! Filtered projection of a backing list.
//!
//! [`FilteredList`] keeps the filter string and the backing indices of the
//! matching items. It never copies items: reads go through the shared
//! [`ModelHandle`], mapped through the index array. The indices are computed
//! when the filter is set and only recomputed by
//! [`re_apply_filter`](FilteredList::re_apply_filter), so after a refresh
//! some may point past the end of a shrunk list; those are skipped.
//!
//! Filter state lives behind its own `Arc<RwLock<_>>` so that the length
//! callback handed to a [`ListCursor`](crate::cursor::ListCursor) sees every
//! change without holding a borrow of the list.

use super::model::ModelHandle;
use super::types::Item;
use crate::config::FilterMode;
use crate::cursor::LengthFn;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct FilterState {
    filter: String,
    // None when not filtering.
    indices: Option<Vec<usize>>,
}

impl FilterState {
    fn visible_indices(&self, model_len: usize) -> Option<impl Iterator<Item = usize> + '_> {
        self.indices
            .as_ref()
            .map(move |indices| indices.iter().copied().filter(move |&i| i < model_len))
    }

    fn len(&self, model_len: usize) -> usize {
        match self.visible_indices(model_len) {
            Some(indices) => indices.count(),
            None => model_len,
        }
    }

    fn unfiltered_index(&self, idx: usize, model_len: usize) -> Option<usize> {
        match self.visible_indices(model_len) {
            Some(mut indices) => indices.nth(idx),
            None => (idx < model_len).then_some(idx),
        }
    }
}

/// A backing list seen through a filter.
///
/// ```
/// use lazylist::config::FilterMode;
/// use lazylist::list::{FilteredList, ModelHandle};
///
/// let model = ModelHandle::new(vec!["main".to_string(), "feature/x".to_string(), "fix".to_string()]);
/// let mut list = FilteredList::new(model, FilterMode::Substring);
/// list.set_filter("f");
/// assert_eq!(list.get_list(), vec!["feature/x".to_string(), "fix".to_string()]);
/// assert_eq!(list.unfiltered_index(Some(1)), Some(2));
/// ```
pub struct FilteredList<T> {
    model: ModelHandle<T>,
    state: Arc<RwLock<FilterState>>,
    mode: FilterMode,
}

impl<T> Clone for FilteredList<T> {
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
            state: Arc::clone(&self.state),
            mode: self.mode,
        }
    }
}

impl<T> fmt::Debug for FilteredList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteredList")
            .field("filter", &self.filter())
            .field("mode", &self.mode)
            .field("len", &self.len())
            .field("unfiltered_len", &self.unfiltered_len())
            .finish()
    }
}

impl<T> FilteredList<T> {
    /// Creates an unfiltered view of `model`.
    pub fn new(model: ModelHandle<T>, mode: FilterMode) -> Self {
        Self {
            model,
            state: Arc::new(RwLock::new(FilterState::default())),
            mode,
        }
    }

    fn state(&self) -> RwLockReadGuard<'_, FilterState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, FilterState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// The backing list.
    pub fn model(&self) -> &ModelHandle<T> {
        &self.model
    }

    /// Matching used by [`set_filter`](Self::set_filter).
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Changes the matching mode. Takes effect on the next filter change.
    pub fn set_mode(&mut self, mode: FilterMode) {
        self.mode = mode;
    }

    /// Current filter string; empty when not filtering.
    pub fn filter(&self) -> String {
        self.state().filter.clone()
    }

    /// True while a non-empty filter is applied.
    pub fn is_filtering(&self) -> bool {
        !self.state().filter.is_empty()
    }

    /// Drops the filter; every backing item becomes visible again.
    pub fn clear_filter(&mut self) {
        let mut state = self.state_mut();
        state.filter.clear();
        state.indices = None;
    }

    /// Number of visible items.
    pub fn len(&self) -> usize {
        self.state().len(self.model.len())
    }

    /// Reports whether no items are visible.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of items in the backing list.
    pub fn unfiltered_len(&self) -> usize {
        self.model.len()
    }

    /// Maps a visible position to its backing index.
    ///
    /// Identity when not filtering. `None` for a position past the end.
    pub fn unfiltered_index(&self, idx: Option<usize>) -> Option<usize> {
        let idx = idx?;
        self.state().unfiltered_index(idx, self.model.len())
    }

    /// A length callback that tracks both the backing list and the filter.
    pub fn length_fn(&self) -> LengthFn
    where
        T: Send + Sync + 'static,
    {
        let model = self.model.clone();
        let state = Arc::clone(&self.state);
        Arc::new(move || {
            let state = state.read().unwrap_or_else(PoisonError::into_inner);
            state.len(model.len())
        })
    }

    /// Applies `f` to the visible items at positions `start..end`.
    pub fn map_range<R>(&self, start: usize, end: usize, f: impl Fn(&T) -> R) -> Vec<R> {
        let state = self.state();
        self.model.with_items(|items| match state.visible_indices(items.len()) {
            Some(indices) => indices
                .skip(start)
                .take(end.saturating_sub(start))
                .map(|i| f(&items[i]))
                .collect(),
            None => {
                let end = end.min(items.len());
                let start = start.min(end);
                items[start..end].iter().map(f).collect()
            }
        })
    }
}

impl<T: Clone> FilteredList<T> {
    /// The visible items, in backing order.
    pub fn get_list(&self) -> Vec<T> {
        self.map_range(0, usize::MAX, T::clone)
    }

    /// Clones the visible item at position `idx`.
    pub fn item_at(&self, idx: usize) -> Option<T> {
        let backing = self.unfiltered_index(Some(idx))?;
        self.model.get(backing)
    }
}

impl<T: Item> FilteredList<T> {
    /// Filters the list. An empty string clears the filter.
    pub fn set_filter(&mut self, filter: &str) {
        self.state_mut().filter = filter.to_string();
        self.re_apply_filter();
    }

    /// Recomputes the matching indices against the current backing list.
    ///
    /// Call after the backing list was replaced while filtering.
    pub fn re_apply_filter(&mut self) {
        let filter = self.filter();
        if filter.is_empty() {
            self.state_mut().indices = None;
            return;
        }

        let indices: Vec<usize> = self.model.with_items(|items| {
            let matcher = FieldMatcher::new(self.mode, &filter);
            items
                .iter()
                .enumerate()
                .filter(|(_, item)| item.filter_fields().iter().any(|f| matcher.is_match(f)))
                .map(|(i, _)| i)
                .collect()
        });

        tracing::debug!(
            filter = %filter,
            mode = ?self.mode,
            matched = indices.len(),
            total = self.model.len(),
            "applied list filter"
        );
        self.state_mut().indices = Some(indices);
    }
}

enum FieldMatcher<'a> {
    Substring(&'a str),
    Fuzzy(SkimMatcherV2, &'a str),
}

impl<'a> FieldMatcher<'a> {
    fn new(mode: FilterMode, pattern: &'a str) -> Self {
        match mode {
            FilterMode::Substring => Self::Substring(pattern),
            FilterMode::Fuzzy => Self::Fuzzy(SkimMatcherV2::default(), pattern),
        }
    }

    fn is_match(&self, field: &str) -> bool {
        match self {
            Self::Substring(pattern) => field.contains(pattern),
            Self::Fuzzy(matcher, pattern) => matcher.fuzzy_match(field, pattern).is_some(),
        }
    }
}
