//! Core types shared by the list modules.
//!
//! - [`Item`]: what a list row must provide (identity, filter text, columns)
//! - [`NonModelItem`]: a decorative line such as a section header
//! - [`OnFocusOpts`] / [`OnFocusLostOpts`]: focus lifecycle arguments

use std::fmt::Display;

/// A row of a list panel.
///
/// Only [`Display`] is required; every other method has a default built on
/// it. Override [`urn`](Item::urn) when two rows can print the same, and
/// [`filter_fields`](Item::filter_fields) when filtering should look at more
/// than the printed text.
///
/// # Examples
///
/// ```
/// use lazylist::list::Item;
/// use std::fmt;
///
/// #[derive(Clone)]
/// struct Branch {
///     name: String,
///     upstream: Option<String>,
/// }
///
/// impl fmt::Display for Branch {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "{}", self.name)
///     }
/// }
///
/// impl Item for Branch {
///     fn urn(&self) -> String {
///         format!("branch:{}", self.name)
///     }
///
///     fn display_strings(&self) -> Vec<String> {
///         vec![self.name.clone(), self.upstream.clone().unwrap_or_default()]
///     }
/// }
///
/// let b = Branch { name: "main".into(), upstream: Some("origin/main".into()) };
/// assert_eq!(b.filter_fields(), vec!["main".to_string()]);
/// ```
pub trait Item: Display + Clone {
    /// Stable identity used to find the same item across refreshes.
    fn urn(&self) -> String {
        self.to_string()
    }

    /// Texts matched by filters and searches.
    fn filter_fields(&self) -> Vec<String> {
        vec![self.to_string()]
    }

    /// One string per rendered column.
    fn display_strings(&self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl Item for String {}

/// A line rendered between model rows that is not itself selectable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonModelItem {
    /// Model index this line is rendered before. Equal to the list length
    /// for a trailing line.
    pub index: usize,
    /// Column whose start position the content is indented to.
    pub column: usize,
    /// Text of the line.
    pub content: String,
}

impl NonModelItem {
    /// Creates a header before model row `index`, starting at column 0.
    pub fn new(index: usize, content: impl Into<String>) -> Self {
        Self {
            index,
            column: 0,
            content: content.into(),
        }
    }

    /// Aligns the content with the given column.
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }
}

/// Details passed when a context gains focus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnFocusOpts {
    /// View line that was clicked to focus the context, if any.
    pub clicked_view_line_idx: Option<usize>,
}

/// Details passed when a context loses focus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnFocusLostOpts {
    /// Key of the context taking focus.
    pub new_context_key: Option<String>,
}
