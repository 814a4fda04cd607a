//! List panels: backing model, filtering, rendering and navigation.
//!
//! The pieces stack up from data to behaviour:
//!
//! - [`ModelHandle`]: the shared backing items, swapped wholesale on refresh
//! - [`FilteredList`]: a filtered projection of the model
//! - [`FilteredListViewModel`] / [`ListViewModel`]: a list plus its
//!   [`ListCursor`](crate::cursor::ListCursor)
//! - [`ListRenderer`]: rows to view lines, with section headers and the
//!   model/view index tables
//! - [`ListContext`]: all of the above bound to a view, kept in sync on
//!   every selection change
//! - [`ListController`]: keys, clicks and wheel scrolls for any list
//!
//! ## Indices
//!
//! *Model indices* are positions in the visible (filtered) list; the cursor
//! works in them. *View indices* are lines in the view, which differ from
//! model indices only when section headers are rendered. Conversion always
//! goes through the context, never by hand.
//!
//! ## Refresh
//!
//! When the application reloads the items it calls
//! [`ListContext::apply_refresh`], which replaces the model, re-applies any
//! filter or search, re-clamps the selection and redraws.

/// Navigation key bindings.
///
/// `ListKeyMap` holds every binding [`ListController`] reacts to. Replace
/// fields to remap keys; the struct implements
/// [`KeyMap`](crate::key::KeyMap) for help views.
///
/// # Examples
///
/// ```
/// use lazylist::key;
/// use lazylist::list::ListKeyMap;
///
/// let mut keys = ListKeyMap::default();
/// keys.goto_top = key::new_binding(vec![key::with_keys_str(&["g"]), key::with_help("g", "top")]);
/// ```
pub mod keys;

/// Search state and history.
pub mod search;

mod context;
mod controller;
mod filtering;
mod model;
mod rendering;
mod types;
mod view_model;

#[cfg(test)]
mod tests;

pub use context::ListContext;
pub use controller::ListController;
pub use filtering::FilteredList;
pub use keys::ListKeyMap;
pub use model::ModelHandle;
pub use rendering::{
    render_display_strings, ColumnAlignment, DisplayStringsFn, ListRenderer, NonModelItemsFn,
};
pub use search::{SearchHistory, SearchState};
pub use types::{Item, NonModelItem, OnFocusLostOpts, OnFocusOpts};
pub use view_model::{FilteredListViewModel, ListViewModel};
