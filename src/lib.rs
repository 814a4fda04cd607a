#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/lazylist/")]

//! # lazylist
//!
//! Selection and viewport plumbing for list panels in
//! [bubbletea-rs](https://github.com/joshka/bubbletea-rs) applications: a
//! clamped list cursor with range selection, filtered lists, a scroll-off
//! margin, and list contexts that keep a scrollable view in step with the
//! selection.
//!
//! ## Overview
//!
//! A list panel is built from a few layers, each usable on its own:
//!
//! - [`cursor::ListCursor`]: the selected index and an optional range,
//!   always clamped to the current length of the list
//! - [`list::FilteredList`]: a filtered projection of a shared
//!   [`list::ModelHandle`]
//! - [`scroll`]: the scroll-off margin that keeps a few lines of context
//!   around the selection
//! - [`viewport::View`] / [`view_trait::ViewTrait`]: the window lists
//!   render into
//! - [`list::ListContext`]: ties the layers together and re-syncs the view
//!   after every change
//! - [`list::ListController`]: key, click and wheel handling for any list
//! - [`context::ContextTree`]: the registry of panels and the focus stack
//! - [`background::ResultInbox`]: hands background results back to the UI
//!   thread, discarding stale ones
//!
//! ## Quick Start
//!
//! ```rust
//! use lazylist::prelude::*;
//!
//! let model = ModelHandle::new(
//!     ["main", "develop", "feature/login", "fix/typo"]
//!         .into_iter()
//!         .map(String::from)
//!         .collect(),
//! );
//! let mut branches = ListContext::new("branches", Viewport::new("branches", 30, 3), model, GuiConfig::default());
//! let controller = ListController::new(GuiConfig::default());
//!
//! branches.handle_render();
//! branches.focus();
//! controller.handle_next_line(&mut branches);
//! controller.handle_next_line(&mut branches);
//!
//! assert_eq!(branches.selected_item().as_deref(), Some("feature/login"));
//! assert_eq!(branches.view().view().footer(), "3 of 4");
//! ```
//!
//! ## Focus Management
//!
//! List contexts implement the [`Component`] trait, so they slot into the
//! same focus handling as any other bubbletea-rs widget:
//!
//! ```rust
//! use lazylist::prelude::*;
//! use bubbletea_rs::Cmd;
//!
//! fn toggle<T: Component>(component: &mut T) {
//!     let _cmd: Option<Cmd> = component.focus();
//!     assert!(component.focused());
//!     component.blur();
//!     assert!(!component.focused());
//! }
//!
//! let mut files = ListContext::new(
//!     "files",
//!     Viewport::new("files", 30, 5),
//!     ModelHandle::new(vec!["Cargo.toml".to_string()]),
//!     GuiConfig::default(),
//! );
//! toggle(&mut files);
//! ```
//!
//! ## Integration with bubbletea-rs
//!
//! Forward key messages to a [`list::ListController`]; it reports whether the
//! key was a list key so the application can handle the rest:
//!
//! ```rust
//! use lazylist::prelude::*;
//! use bubbletea_rs::{Cmd, Model, Msg};
//!
//! struct App {
//!     commits: ListContext<String>,
//!     controller: ListController,
//! }
//!
//! impl Model for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let model = ModelHandle::new((0..100).map(|i| format!("commit {i}")).collect());
//!         let mut commits = ListContext::new("commits", Viewport::new("commits", 60, 20), model, GuiConfig::default())
//!             .with_render_only_visible_lines(true);
//!         commits.handle_render();
//!         commits.focus();
//!         let controller = ListController::new(GuiConfig::default());
//!         (Self { commits, controller }, None)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         self.controller.update(&mut self.commits, &msg);
//!         None
//!     }
//!
//!     fn view(&self) -> String {
//!         self.commits.view().view().footer().to_string()
//!     }
//! }
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events for focus
//! changes, scroll decisions, filter application and stale background
//! results. It never installs a subscriber.

pub mod background;
pub mod config;
pub mod context;
pub mod cursor;
pub mod key;
pub mod list;
pub mod scroll;
pub mod view_trait;
pub mod viewport;

use bubbletea_rs::Cmd;

/// Core trait for components that support focus management.
///
/// ## Focus States
///
/// - **Focused**: the component receives keyboard input and shows its
///   selection highlighted
/// - **Blurred**: the component ignores keyboard input
///
/// ## Implementation Guidelines
///
/// - `focus()` sets the focused state and may return a command
/// - `blur()` unsets it and drops any focus-only state
/// - `focused()` reports the current state
///
/// # Examples
///
/// ```rust
/// use lazylist::prelude::*;
///
/// let mut list = ListContext::new(
///     "stash",
///     Viewport::new("stash", 30, 5),
///     ModelHandle::new(vec!["stash@{0}".to_string()]),
///     GuiConfig::default(),
/// );
/// assert!(!list.focused());
///
/// list.focus();
/// assert!(list.focused());
///
/// list.blur();
/// assert!(!list.focused());
/// ```
pub trait Component {
    /// Sets the component to focused state.
    ///
    /// # Returns
    ///
    /// An optional command to be executed by the bubbletea runtime.
    fn focus(&mut self) -> Option<Cmd>;

    /// Sets the component to blurred (unfocused) state.
    fn blur(&mut self);

    /// Returns the current focus state of the component.
    fn focused(&self) -> bool;
}

/// Prelude module for convenient imports.
///
/// ```rust
/// use lazylist::prelude::*;
///
/// let mut cursor = ListCursor::with_len(3);
/// cursor.move_selected_line(5);
/// assert_eq!(cursor.selected_line_idx(), Some(2));
/// ```
pub mod prelude {
    pub use crate::background::{ResultInbox, ResultSender};
    pub use crate::config::{ConfigError, FilterMode, GuiConfig, ScrollOffBehavior};
    pub use crate::context::{
        Capability, Context, ContextError, ContextKey, ContextKind, ContextTree, Filterable,
        Focusable, Renderable, Searchable, Selectable, ViewContextMap,
    };
    pub use crate::cursor::{ListCursor, RangeSelectMode};
    pub use crate::key::{
        matches, new_binding, with_disabled, with_help, with_keys, with_keys_str, Binding,
        Help as KeyHelp, KeyMap, KeyPress,
    };
    pub use crate::list::{
        ColumnAlignment, FilteredList, FilteredListViewModel, Item, ListContext, ListController,
        ListKeyMap, ListRenderer, ListViewModel, ModelHandle, NonModelItem, OnFocusLostOpts,
        OnFocusOpts, SearchHistory,
    };
    pub use crate::view_trait::ViewTrait;
    pub use crate::viewport::{Model as Viewport, View};
    pub use crate::Component;
}
