//! Contexts, their capabilities, and the focus stack.
//!
//! A *context* is one focusable panel: a list of branches, a commit log, a
//! confirmation popup. Each one is registered once in a [`ContextTree`],
//! which the application builds at startup and passes to whatever needs to
//! move focus around. The tree owns:
//!
//! - the registry of boxed contexts, keyed by [`ContextKey`];
//! - a [`ViewContextMap`] from view name to the context currently shown in
//!   that view;
//! - the focus stack.
//!
//! Contexts advertise what they can do through [`Context::capability`],
//! which returns a [`Capability`] variant. Callers match on it instead of
//! probing the concrete type.
//!
//! ```rust
//! use lazylist::config::GuiConfig;
//! use lazylist::context::{ContextKind, ContextTree};
//! use lazylist::list::{ListContext, ModelHandle};
//! use lazylist::viewport::Model;
//!
//! let branches = ListContext::new(
//!     "branches",
//!     Model::new("branches", 40, 10),
//!     ModelHandle::new(vec!["main".to_string(), "dev".to_string()]),
//!     GuiConfig::default(),
//! );
//! let menu = ListContext::new(
//!     "menu",
//!     Model::new("menu", 40, 10),
//!     ModelHandle::new(vec!["Checkout".to_string()]),
//!     GuiConfig::default(),
//! )
//! .with_kind(ContextKind::TemporaryPopup);
//!
//! let mut tree = ContextTree::new();
//! tree.add(Box::new(branches)).unwrap();
//! tree.add(Box::new(menu)).unwrap();
//!
//! tree.push(&"branches".into(), Default::default()).unwrap();
//! tree.push(&"menu".into(), Default::default()).unwrap();
//! assert_eq!(tree.stack().len(), 2);
//!
//! tree.pop().unwrap();
//! assert_eq!(tree.current().map(|c| c.key().as_str()), Some("branches"));
//! ```

use crate::cursor::ListCursor;
use crate::list::{OnFocusLostOpts, OnFocusOpts, SearchHistory};
use crate::view_trait::ViewTrait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Unique name of a context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextKey(String);

impl ContextKey {
    /// Creates a key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContextKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for ContextKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Where a context sits in the layout, which decides how pushing it
/// affects the focus stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContextKind {
    /// A side panel. Pushing one replaces the whole stack.
    #[default]
    Side,
    /// The main panel. Pushing one keeps side panels and drops the rest.
    Main,
    /// A popup that stays until explicitly popped.
    PersistentPopup,
    /// A popup that is dismissed when anything else is pushed over it.
    TemporaryPopup,
}

/// Failures of the context registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    /// No context is registered under this key.
    #[error("no context registered for key `{0}`")]
    Unknown(ContextKey),
    /// A context is already registered under this key.
    #[error("a context is already registered for key `{0}`")]
    Duplicate(ContextKey),
    /// Popping would leave the focus stack empty.
    #[error("cannot pop the last context off the focus stack")]
    LastContext,
    /// The context does not hold a selectable list.
    #[error("context `{0}` is not a list")]
    NotAList(ContextKey),
}

/// Something that draws its content into a view.
pub trait Renderable {
    /// Re-renders the content from the model.
    fn handle_render(&mut self);
}

/// Lifecycle hooks fired as focus moves between contexts.
pub trait Focusable {
    /// Called when the context gains focus.
    fn handle_focus(&mut self, opts: &OnFocusOpts);
    /// Called when the context loses focus.
    fn handle_focus_lost(&mut self, opts: &OnFocusLostOpts);
}

/// A panel that can be registered in a [`ContextTree`].
pub trait Context: Renderable + Focusable + Send {
    /// Unique key.
    fn key(&self) -> &ContextKey;
    /// Layout kind.
    fn kind(&self) -> ContextKind;
    /// Name of the view the context renders into.
    fn view_name(&self) -> &str;
    /// What this context can do beyond focus and rendering.
    fn capability(&mut self) -> Capability<'_> {
        Capability::Plain
    }
}

/// A context with a cursor over a rendered list.
pub trait Selectable: Renderable + Focusable {
    /// The selection cursor.
    fn list_cursor(&self) -> &ListCursor;
    /// Mutable access to the selection cursor.
    fn list_cursor_mut(&mut self) -> &mut ListCursor;
    /// The view the list renders into.
    fn view_trait(&self) -> &ViewTrait;
    /// Mutable access to the view.
    fn view_trait_mut(&mut self) -> &mut ViewTrait;
    /// Brings the view in line with the selection.
    fn focus_line(&mut self);
    /// View line of a model row.
    fn model_index_to_view_index(&self, idx: usize) -> usize;
    /// Model row at a view line.
    fn view_index_to_model_index(&self, idx: usize) -> usize;
    /// Where "go to bottom" lands.
    fn index_for_goto_bottom(&self) -> usize;
    /// Whether range selection keys apply.
    fn range_select_enabled(&self) -> bool;
    /// Whether only the visible slice of the list is rendered.
    fn render_only_visible_lines(&self) -> bool;
    /// Whether the context currently has focus.
    fn is_focused(&self) -> bool;
    /// Runs the click action for the selected item. Returns false if the
    /// context has none.
    fn on_click(&mut self) -> bool;
    /// Selects the item at view line `view_idx` and re-focuses.
    fn on_search_select(&mut self, view_idx: usize);
}

/// A list that can be narrowed by a filter string.
pub trait Filterable: Selectable {
    /// Current filter; empty when not filtering.
    fn filter(&self) -> String;
    /// True while a filter is applied.
    fn is_filtering(&self) -> bool;
    /// Applies a filter and resets the selection to the first match.
    fn set_filter(&mut self, filter: &str);
    /// Applies the final filter and records a non-empty one in the history.
    fn confirm_filter(&mut self, filter: &str);
    /// Removes the filter, keeping the selected item selected.
    fn clear_filter(&mut self);
    /// Recomputes the filter against the current model.
    fn re_apply_filter(&mut self);
    /// Previously applied filters.
    fn filter_history(&mut self) -> &mut SearchHistory;
    /// Upcast to the list capability.
    fn as_selectable(&mut self) -> &mut dyn Selectable;
}

/// A list whose items can be searched without hiding any of them.
pub trait Searchable: Selectable {
    /// Sets the query and jumps to the first match at or after the
    /// selection.
    fn set_search_string(&mut self, query: &str);
    /// Sets the final query and records a non-empty one in the history.
    fn confirm_search(&mut self, query: &str);
    /// Jumps to the next match. Returns false if nothing matches.
    fn next_search_match(&mut self) -> bool;
    /// Jumps to the previous match. Returns false if nothing matches.
    fn prev_search_match(&mut self) -> bool;
    /// `(position among matches, number of matches)`.
    fn search_status(&self) -> (Option<usize>, usize);
    /// Forgets the query.
    fn clear_search(&mut self);
    /// Recomputes matches against the current model.
    fn re_apply_search(&mut self);
    /// Previously entered queries.
    fn search_history(&mut self) -> &mut SearchHistory;
    /// Upcast to the list capability.
    fn as_selectable(&mut self) -> &mut dyn Selectable;
}

/// What a context can do, for dispatch without downcasting.
pub enum Capability<'a> {
    /// Focus and rendering only.
    Plain,
    /// A selectable list.
    List(&'a mut dyn Selectable),
    /// A selectable list with a filter.
    Filterable(&'a mut dyn Filterable),
    /// A selectable list with search.
    Searchable(&'a mut dyn Searchable),
}

impl fmt::Debug for Capability<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Capability::Plain => "Plain",
            Capability::List(_) => "List",
            Capability::Filterable(_) => "Filterable",
            Capability::Searchable(_) => "Searchable",
        })
    }
}

impl<'a> Capability<'a> {
    /// The list behind any list capability.
    pub fn into_selectable(self) -> Option<&'a mut dyn Selectable> {
        match self {
            Capability::Plain => None,
            Capability::List(list) => Some(list),
            Capability::Filterable(list) => Some(list.as_selectable()),
            Capability::Searchable(list) => Some(list.as_selectable()),
        }
    }

    /// The filterable list, if that is what this is.
    pub fn into_filterable(self) -> Option<&'a mut dyn Filterable> {
        match self {
            Capability::Filterable(list) => Some(list),
            _ => None,
        }
    }

    /// The searchable list, if that is what this is.
    pub fn into_searchable(self) -> Option<&'a mut dyn Searchable> {
        match self {
            Capability::Searchable(list) => Some(list),
            _ => None,
        }
    }
}

/// Which context is currently shown in each view.
///
/// Several contexts can share one view (e.g. a list and its sub-list), so
/// this is updated every time a context is activated.
#[derive(Debug, Default)]
pub struct ViewContextMap {
    inner: Mutex<HashMap<String, ContextKey>>,
}

impl ViewContextMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `view` now shows `key`.
    pub fn set(&self, view: &str, key: ContextKey) {
        self.lock().insert(view.to_string(), key);
    }

    /// The context shown in `view`.
    pub fn get(&self, view: &str) -> Option<ContextKey> {
        self.lock().get(view).cloned()
    }

    /// Forgets `view`.
    pub fn remove(&self, view: &str) -> Option<ContextKey> {
        self.lock().remove(view)
    }

    /// Every `(view, context)` pair, sorted by view name.
    pub fn entries(&self) -> Vec<(String, ContextKey)> {
        let mut entries: Vec<_> = self
            .lock()
            .iter()
            .map(|(view, key)| (view.clone(), key.clone()))
            .collect();
        entries.sort();
        entries
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, ContextKey>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Registry of contexts plus the focus stack.
#[derive(Default)]
pub struct ContextTree {
    contexts: HashMap<ContextKey, Box<dyn Context>>,
    view_context_map: ViewContextMap,
    stack: Vec<ContextKey>,
}

impl fmt::Debug for ContextTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.contexts.keys().collect();
        keys.sort();
        f.debug_struct("ContextTree")
            .field("contexts", &keys)
            .field("stack", &self.stack)
            .finish()
    }
}

impl ContextTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a context. The first context added for a view becomes
    /// that view's context until another one is activated in it.
    pub fn add(&mut self, context: Box<dyn Context>) -> Result<(), ContextError> {
        let key = context.key().clone();
        if self.contexts.contains_key(&key) {
            return Err(ContextError::Duplicate(key));
        }
        let view = context.view_name().to_string();
        if self.view_context_map.get(&view).is_none() {
            self.view_context_map.set(&view, key.clone());
        }
        self.contexts.insert(key, context);
        Ok(())
    }

    /// Looks up a context.
    pub fn get(&self, key: &ContextKey) -> Option<&dyn Context> {
        self.contexts.get(key).map(|c| c.as_ref())
    }

    /// Looks up a context for mutation.
    pub fn get_mut(&mut self, key: &ContextKey) -> Option<&mut dyn Context> {
        match self.contexts.get_mut(key) {
            Some(context) => Some(context.as_mut()),
            None => None,
        }
    }

    /// The list behind `key`, if it is one.
    pub fn selectable_mut(&mut self, key: &ContextKey) -> Result<&mut dyn Selectable, ContextError> {
        let context = self
            .contexts
            .get_mut(key)
            .ok_or_else(|| ContextError::Unknown(key.clone()))?;
        context
            .capability()
            .into_selectable()
            .ok_or_else(|| ContextError::NotAList(key.clone()))
    }

    /// The view → context map.
    pub fn view_context_map(&self) -> &ViewContextMap {
        &self.view_context_map
    }

    /// Key of the context shown in `view`.
    pub fn context_for_view(&self, view: &str) -> Option<ContextKey> {
        self.view_context_map.get(view)
    }

    /// Marks `key` as the context shown in `view`.
    pub fn set_view_context(&self, view: &str, key: ContextKey) {
        self.view_context_map.set(view, key);
    }

    /// The focus stack, bottom first.
    pub fn stack(&self) -> &[ContextKey] {
        &self.stack
    }

    /// The focused context.
    pub fn current(&self) -> Option<&dyn Context> {
        self.stack.last().and_then(|key| self.get(key))
    }

    /// The focused context, for mutation.
    pub fn current_mut(&mut self) -> Option<&mut dyn Context> {
        let key = self.stack.last()?.clone();
        self.get_mut(&key)
    }

    /// Key of the focused context.
    pub fn current_key(&self) -> Option<&ContextKey> {
        self.stack.last()
    }

    /// The topmost side context on the stack.
    pub fn current_side(&self) -> Option<&dyn Context> {
        self.stack
            .iter()
            .rev()
            .filter_map(|key| self.get(key))
            .find(|c| c.kind() == ContextKind::Side)
    }

    /// Focuses a context.
    ///
    /// - A side context replaces the whole stack.
    /// - A main context keeps the side contexts and drops everything else.
    /// - A popup goes on top, first dismissing a temporary popup that is
    ///   already there.
    ///
    /// Contexts leaving the stack get `handle_focus_lost`, then the pushed
    /// context is activated. Pushing the context that is already on top
    /// just re-activates it.
    pub fn push(&mut self, key: &ContextKey, opts: OnFocusOpts) -> Result<(), ContextError> {
        let kind = match self.contexts.get(key) {
            Some(context) => context.kind(),
            None => {
                tracing::warn!(context = %key, "push of unregistered context");
                return Err(ContextError::Unknown(key.clone()));
            }
        };

        let mut deactivated = Vec::new();
        if self.stack.last() != Some(key) {
            match kind {
                ContextKind::Side => {
                    deactivated = std::mem::take(&mut self.stack);
                    self.stack.push(key.clone());
                }
                ContextKind::Main => {
                    let (keep, drop): (Vec<_>, Vec<_>) = std::mem::take(&mut self.stack)
                        .into_iter()
                        .partition(|k| self.kind_of(k) == Some(ContextKind::Side));
                    self.stack = keep;
                    deactivated = drop;
                    self.stack.push(key.clone());
                }
                ContextKind::PersistentPopup | ContextKind::TemporaryPopup => {
                    if let Some(top) = self.stack.last() {
                        if self.kind_of(top) == Some(ContextKind::TemporaryPopup) {
                            deactivated.extend(self.stack.pop());
                        }
                    }
                    self.stack.retain(|k| k != key);
                    self.stack.push(key.clone());
                }
            }
        }

        tracing::debug!(context = %key, ?kind, stack = ?self.stack, "pushed context");

        let lost = OnFocusLostOpts {
            new_context_key: Some(key.to_string()),
        };
        for old in deactivated.iter().filter(|k| *k != key) {
            if let Some(context) = self.contexts.get_mut(old) {
                context.handle_focus_lost(&lost);
            }
        }
        self.activate(key, &opts)
    }

    /// Removes the focused context and re-activates the one below it.
    pub fn pop(&mut self) -> Result<(), ContextError> {
        if self.stack.len() <= 1 {
            return Err(ContextError::LastContext);
        }
        let Some(old) = self.stack.pop() else {
            return Err(ContextError::LastContext);
        };
        let Some(new) = self.stack.last().cloned() else {
            return Err(ContextError::LastContext);
        };

        tracing::debug!(popped = %old, current = %new, "popped context");

        if let Some(context) = self.contexts.get_mut(&old) {
            context.handle_focus_lost(&OnFocusLostOpts {
                new_context_key: Some(new.to_string()),
            });
        }
        self.activate(&new, &OnFocusOpts::default())
    }

    /// Swaps the focused context for `key`, without firing focus-lost on
    /// the one replaced.
    pub fn replace(&mut self, key: &ContextKey) -> Result<(), ContextError> {
        if !self.contexts.contains_key(key) {
            return Err(ContextError::Unknown(key.clone()));
        }
        self.stack.pop();
        self.stack.push(key.clone());
        tracing::debug!(context = %key, "replaced focused context");
        self.activate(key, &OnFocusOpts::default())
    }

    fn kind_of(&self, key: &ContextKey) -> Option<ContextKind> {
        self.contexts.get(key).map(|c| c.kind())
    }

    fn activate(&mut self, key: &ContextKey, opts: &OnFocusOpts) -> Result<(), ContextError> {
        let context = self
            .contexts
            .get_mut(key)
            .ok_or_else(|| ContextError::Unknown(key.clone()))?;
        self.view_context_map.set(context.view_name(), key.clone());
        context.handle_focus(opts);
        Ok(())
    }
}
