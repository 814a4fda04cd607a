//! In-list search and search history.
//!
//! Searching differs from filtering: every item stays visible and the
//! selection jumps between matches. Matching is smart-case: a query with an
//! uppercase letter is case-sensitive, an all-lowercase one is not.

use std::collections::VecDeque;

/// Number of queries remembered by default.
pub const DEFAULT_HISTORY_SIZE: usize = 1000;

/// Previously entered queries, most recent first.
#[derive(Debug, Clone)]
pub struct SearchHistory {
    entries: VecDeque<String>,
    capacity: usize,
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}

impl SearchHistory {
    /// Creates an empty history holding at most `capacity` queries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// Records a query. Empty queries are ignored; repeating an older query
    /// moves it to the front instead of storing it twice.
    pub fn push(&mut self, query: &str) {
        if query.is_empty() {
            return;
        }
        self.entries.retain(|e| e != query);
        self.entries.push_front(query.to_string());
        self.entries.truncate(self.capacity);
    }

    /// The query `idx` steps back; 0 is the most recent.
    pub fn peek_at(&self, idx: usize) -> Option<&str> {
        self.entries.get(idx).map(String::as_str)
    }

    /// Number of stored queries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// True if `query` should match case-sensitively.
pub fn is_case_sensitive(query: &str) -> bool {
    query.chars().any(char::is_uppercase)
}

/// Active search: the query and the model indices that match it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    query: String,
    matches: Vec<usize>,
    current: Option<usize>,
}

impl SearchState {
    /// The query; empty when not searching.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// True while a non-empty query is active.
    pub fn is_searching(&self) -> bool {
        !self.query.is_empty()
    }

    /// Model indices of matching items, ascending.
    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    /// `(position among matches, number of matches)`.
    pub fn status(&self) -> (Option<usize>, usize) {
        (self.current, self.matches.len())
    }

    /// Sets the query and recomputes matches over `fields`, one entry per
    /// item in model order.
    pub fn set_query(&mut self, query: &str, fields: &[Vec<String>]) {
        self.query = query.to_string();
        self.recompute(fields);
    }

    /// Recomputes matches for the current query, e.g. after a refresh.
    pub fn recompute(&mut self, fields: &[Vec<String>]) {
        self.current = None;
        if self.query.is_empty() {
            self.matches.clear();
            return;
        }

        let case_sensitive = is_case_sensitive(&self.query);
        let needle = if case_sensitive {
            self.query.clone()
        } else {
            self.query.to_lowercase()
        };
        self.matches = fields
            .iter()
            .enumerate()
            .filter(|(_, item_fields)| {
                item_fields.iter().any(|f| {
                    if case_sensitive {
                        f.contains(&needle)
                    } else {
                        f.to_lowercase().contains(&needle)
                    }
                })
            })
            .map(|(i, _)| i)
            .collect();
    }

    /// Selects the first match at or after `from`, wrapping to the first.
    pub fn first_from(&mut self, from: usize) -> Option<usize> {
        let pos = self
            .matches
            .iter()
            .position(|&m| m >= from)
            .or_else(|| (!self.matches.is_empty()).then_some(0))?;
        self.select(pos)
    }

    /// Selects the first match after `selected`, wrapping to the first.
    pub fn next(&mut self, selected: usize) -> Option<usize> {
        let pos = self
            .matches
            .iter()
            .position(|&m| m > selected)
            .or_else(|| (!self.matches.is_empty()).then_some(0))?;
        self.select(pos)
    }

    /// Selects the last match before `selected`, wrapping to the last.
    pub fn prev(&mut self, selected: usize) -> Option<usize> {
        let pos = self
            .matches
            .iter()
            .rposition(|&m| m < selected)
            .or_else(|| self.matches.len().checked_sub(1))?;
        self.select(pos)
    }

    /// Forgets the query and its matches.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn select(&mut self, pos: usize) -> Option<usize> {
        self.current = Some(pos);
        self.matches.get(pos).copied()
    }
}
