//! A list panel: model, cursor, renderer and view wired together.
//!
//! [`ListContext`] keeps the view in step with the selection. Every change
//! to the selection ends in [`focus_line`](ListContext::focus_line), which
//! clamps, moves the view's cursor to the selected line (scrolling only if
//! it left the window), mirrors any range selection into the view's
//! highlight and refreshes the `"3 of 12"` footer.
//!
//! Lists with section headers render one view line per header on top of one
//! per item, so every index handed to the view goes through
//! [`model_index_to_view_index`](ListContext::model_index_to_view_index).
//!
//! ```rust
//! use lazylist::config::GuiConfig;
//! use lazylist::list::{ListContext, ModelHandle};
//! use lazylist::viewport::{Model, View};
//!
//! let model = ModelHandle::new((0..20).map(|i| format!("commit {i}")).collect());
//! let mut commits = ListContext::new("commits", Model::new("commits", 30, 5), model, GuiConfig::default());
//! commits.handle_render();
//!
//! commits.list_mut().cursor_mut().set_selection(12);
//! commits.focus_line();
//! assert_eq!(commits.view().view().footer(), "13 of 20");
//! assert_eq!(commits.view().view_port_y_bounds(), (10, 5));
//! ```

use super::filtering::FilteredList;
use super::model::ModelHandle;
use super::rendering::{ColumnAlignment, ListRenderer};
use super::search::{SearchHistory, SearchState};
use super::types::{Item, NonModelItem, OnFocusLostOpts, OnFocusOpts};
use super::view_model::FilteredListViewModel;
use crate::config::GuiConfig;
use crate::context::{
    Capability, Context, ContextKey, ContextKind, Filterable, Focusable, Renderable, Searchable,
    Selectable,
};
use crate::cursor::ListCursor;
use crate::view_trait::ViewTrait;
use crate::viewport::View;
use crate::Component;
use bubbletea_rs::Cmd;
use std::fmt;
use std::sync::Arc;

type DisplayFn<T> = Arc<dyn Fn(&T) -> Vec<String> + Send + Sync>;
type HeadersFn = Arc<dyn Fn() -> Vec<NonModelItem> + Send + Sync>;
type ClickFn<T> = Box<dyn FnMut(&T) + Send>;
type FocusFn = Box<dyn FnMut(&OnFocusOpts) + Send>;
type FocusLostFn = Box<dyn FnMut(&OnFocusLostOpts) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Plain,
    Filter,
    Search,
}

/// A focusable list panel.
pub struct ListContext<T> {
    key: ContextKey,
    kind: ContextKind,
    view: ViewTrait,
    list: FilteredListViewModel<T>,
    renderer: ListRenderer,
    display: DisplayFn<T>,
    non_model_items: Option<HeadersFn>,
    column_alignments: Vec<ColumnAlignment>,
    config: GuiConfig,
    render_only_visible_lines: bool,
    range_select_enabled: bool,
    mode: Mode,
    search: SearchState,
    history: SearchHistory,
    focused: bool,
    on_click: Option<ClickFn<T>>,
    on_focus: Option<FocusFn>,
    on_focus_lost: Option<FocusLostFn>,
}

impl<T> fmt::Debug for ListContext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListContext")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("view", &self.view)
            .field("cursor", self.list.cursor())
            .field("mode", &self.mode)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

impl<T: Item + Send + Sync + 'static> ListContext<T> {
    /// Creates a side-panel list over `model`, rendering each item's
    /// [`Item::display_strings`].
    pub fn new(
        key: impl Into<ContextKey>,
        view: impl View + 'static,
        model: ModelHandle<T>,
        config: GuiConfig,
    ) -> Self {
        let list = FilteredListViewModel::new(model, config.filter_mode);
        let display: DisplayFn<T> = Arc::new(|item: &T| item.display_strings());
        let renderer = build_renderer(list.filtered_list(), &display, None, &[]);
        Self {
            key: key.into(),
            kind: ContextKind::Side,
            view: ViewTrait::new(view),
            list,
            renderer,
            display,
            non_model_items: None,
            column_alignments: Vec::new(),
            config,
            render_only_visible_lines: false,
            range_select_enabled: true,
            mode: Mode::Plain,
            search: SearchState::default(),
            history: SearchHistory::default(),
            focused: false,
            on_click: None,
            on_focus: None,
            on_focus_lost: None,
        }
    }

    /// Sets the layout kind.
    pub fn with_kind(mut self, kind: ContextKind) -> Self {
        self.kind = kind;
        self
    }

    /// Renders items with `f` instead of [`Item::display_strings`].
    pub fn with_display_strings(
        mut self,
        f: impl Fn(&T) -> Vec<String> + Send + Sync + 'static,
    ) -> Self {
        self.display = Arc::new(f);
        self.rebuild_renderer();
        self
    }

    /// Interleaves section headers between rows.
    pub fn with_non_model_items(
        mut self,
        f: impl Fn() -> Vec<NonModelItem> + Send + Sync + 'static,
    ) -> Self {
        self.non_model_items = Some(Arc::new(f));
        self.rebuild_renderer();
        self
    }

    /// Sets per-column alignment.
    pub fn with_column_alignments(mut self, alignments: Vec<ColumnAlignment>) -> Self {
        self.column_alignments = alignments;
        self.rebuild_renderer();
        self
    }

    /// Renders only the lines inside the window. Meant for very long
    /// lists such as the commit log.
    pub fn with_render_only_visible_lines(mut self, enabled: bool) -> Self {
        self.render_only_visible_lines = enabled;
        self
    }

    /// Enables or disables the range selection keys.
    pub fn with_range_select(mut self, enabled: bool) -> Self {
        self.range_select_enabled = enabled;
        self
    }

    /// Advertises the [`Filterable`] capability.
    pub fn filterable(mut self) -> Self {
        self.mode = Mode::Filter;
        self
    }

    /// Advertises the [`Searchable`] capability.
    pub fn searchable(mut self) -> Self {
        self.mode = Mode::Search;
        self
    }

    /// Runs `f` on the selected item when it is clicked while focused.
    pub fn with_on_click(mut self, f: impl FnMut(&T) + Send + 'static) -> Self {
        self.on_click = Some(Box::new(f));
        self
    }

    /// Runs `f` every time the context gains focus.
    pub fn with_on_focus(mut self, f: impl FnMut(&OnFocusOpts) + Send + 'static) -> Self {
        self.on_focus = Some(Box::new(f));
        self
    }

    /// Runs `f` every time the context loses focus.
    pub fn with_on_focus_lost(mut self, f: impl FnMut(&OnFocusLostOpts) + Send + 'static) -> Self {
        self.on_focus_lost = Some(Box::new(f));
        self
    }

    fn rebuild_renderer(&mut self) {
        self.renderer = build_renderer(
            self.list.filtered_list(),
            &self.display,
            self.non_model_items.as_ref(),
            &self.column_alignments,
        );
    }

    /// Replaces the backing items and resynchronises everything derived
    /// from them: filter, search matches, selection, content and focus.
    pub fn apply_refresh(&mut self, items: Vec<T>) {
        self.list.model().replace(items);
        self.list.filtered_list_mut().re_apply_filter();
        if self.search.is_searching() {
            let fields = self.search_fields();
            self.search.recompute(&fields);
        }
        self.handle_render();
        self.focus_line();
    }

    /// Applies a filter and selects the first match.
    pub fn set_filter(&mut self, filter: &str) {
        self.list.cursor_mut().set_selection(0);
        self.view.set_origin_y(0);
        self.list.filtered_list_mut().set_filter(filter);
        self.handle_render();
        self.focus_line();
    }

    /// Re-applies `filter` and records it in the history. Called once when
    /// the filter prompt is confirmed; [`set_filter`](Self::set_filter) runs
    /// on every keystroke before that.
    pub fn confirm_filter(&mut self, filter: &str) {
        self.set_filter(filter);
        if !filter.is_empty() {
            self.history.push(filter);
        }
    }

    /// Sets the search query and jumps to the first match at or after the
    /// selection.
    pub fn set_search_string(&mut self, query: &str) {
        let fields = self.search_fields();
        self.search.set_query(query, &fields);
        let from = self.list.cursor().selected_line_idx().unwrap_or(0);
        if let Some(idx) = self.search.first_from(from) {
            self.select_search_match(idx);
        }
    }

    /// Sets the final search query and records it in the history.
    pub fn confirm_search(&mut self, query: &str) {
        self.set_search_string(query);
        if !query.is_empty() {
            self.history.push(query);
        }
    }

    /// Jumps to the next search match, wrapping around.
    pub fn next_search_match(&mut self) -> bool {
        let selected = self.list.cursor().selected_line_idx().unwrap_or(0);
        match self.search.next(selected) {
            Some(idx) => {
                self.select_search_match(idx);
                true
            }
            None => false,
        }
    }

    /// Jumps to the previous search match, wrapping around.
    pub fn prev_search_match(&mut self) -> bool {
        let selected = self.list.cursor().selected_line_idx().unwrap_or(0);
        match self.search.prev(selected) {
            Some(idx) => {
                self.select_search_match(idx);
                true
            }
            None => false,
        }
    }

    fn select_search_match(&mut self, model_idx: usize) {
        let view_idx = self.renderer.model_index_to_view_index(model_idx);
        self.on_search_select(view_idx);
    }

    fn search_fields(&self) -> Vec<Vec<String>> {
        self.list
            .filtered_list()
            .map_range(0, usize::MAX, |item| item.filter_fields())
    }

    /// True if an item with the same identity as `item` is inside the
    /// window.
    pub fn is_item_visible(&self, item: &T) -> bool {
        let (start, height) = self.view.view_port_y_bounds();
        let first = self.renderer.view_index_to_model_index(start);
        let end = self.renderer.view_index_to_model_index(start + height);
        let urn = item.urn();
        self.list
            .filtered_list()
            .map_range(first, end, |visible| visible.urn())
            .contains(&urn)
    }

    /// The item under the cursor.
    pub fn selected_item(&self) -> Option<T> {
        self.list.selected_item()
    }

    /// Every item in the selection range.
    pub fn selected_items(&self) -> Vec<T> {
        self.list.selected_items()
    }
}

impl<T> ListContext<T> {
    /// The list and its cursor.
    pub fn list(&self) -> &FilteredListViewModel<T> {
        &self.list
    }

    /// Mutable access to the list and its cursor. Call
    /// [`focus_line`](Self::focus_line) after moving the selection.
    pub fn list_mut(&mut self) -> &mut FilteredListViewModel<T> {
        &mut self.list
    }

    /// The view.
    pub fn view(&self) -> &ViewTrait {
        &self.view
    }

    /// Mutable access to the view.
    pub fn view_mut(&mut self) -> &mut ViewTrait {
        &mut self.view
    }

    /// Settings this context was built with.
    pub fn config(&self) -> &GuiConfig {
        &self.config
    }

    /// Current filter; empty when not filtering.
    pub fn filter(&self) -> String {
        self.list.filtered_list().filter()
    }

    /// True while a filter is applied.
    pub fn is_filtering(&self) -> bool {
        self.list.filtered_list().is_filtering()
    }

    /// `(position among matches, number of matches)`.
    pub fn search_status(&self) -> (Option<usize>, usize) {
        self.search.status()
    }

    /// Confirmed queries and filters, most recent first.
    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    /// Moves the view to the selection; see the module docs.
    pub fn focus_line(&mut self) {
        self.list.cursor_mut().clamp_selection();
        let (old_origin, _) = self.view.view_port_y_bounds();

        let selected = self.list.cursor().selected_line_idx().unwrap_or(0);
        self.view
            .focus_point(self.renderer.model_index_to_view_index(selected));

        match self.list.cursor().range_start_idx() {
            Some(start) => {
                let start = self.renderer.model_index_to_view_index(start);
                self.view.set_range_select_start(start);
            }
            None => self.view.cancel_range_select(),
        }

        let (new_origin, _) = self.view.view_port_y_bounds();
        if self.render_only_visible_lines && new_origin != old_origin {
            tracing::trace!(
                context = %self.key,
                old_origin,
                new_origin,
                "origin moved, re-rendering visible lines"
            );
            self.handle_render();
        }
        self.set_footer();
    }

    /// Renders the list into the view: everything, or only the window when
    /// rendering visible lines.
    pub fn handle_render(&mut self) {
        self.list.cursor_mut().clamp_selection();
        if self.render_only_visible_lines {
            let headers = self.non_model_items.as_ref().map_or(0, |f| f().len());
            let total = self.list.filtered_list().len() + headers;
            self.view.set_content_line_count(total);

            let (start, height) = self.view.view_port_y_bounds();
            let max_start = total.saturating_sub(height);
            let start = if start > max_start {
                self.view.set_origin_y(max_start);
                max_start
            } else {
                start
            };
            let content = self.renderer.render_lines(start, start + height);
            self.view
                .set_view_port_content_and_clear_everything_else(&content);
        } else {
            let content = self.renderer.render_all();
            self.view.set_content(&content);
        }
        self.set_footer();
    }

    fn set_footer(&mut self) {
        let len = self.list.cursor_mut().len();
        let selected = self.list.cursor().selected_line_idx().map_or(0, |i| i + 1);
        self.view.set_footer(&format!("{selected} of {len}"));
    }

    /// Marks the context focused, highlights a non-empty list, re-focuses
    /// the selection and runs the focus hook.
    pub fn handle_focus(&mut self, opts: &OnFocusOpts) {
        self.focused = true;
        self.focus_line();
        let has_items = !self.list.cursor().is_empty();
        self.view.set_highlight(has_items);
        tracing::debug!(context = %self.key, "focused");
        if let Some(hook) = self.on_focus.as_mut() {
            hook(opts);
        }
    }

    /// Marks the context unfocused, scrolls back to the first column and
    /// runs the focus-lost hook.
    pub fn handle_focus_lost(&mut self, opts: &OnFocusLostOpts) {
        self.focused = false;
        self.view.set_origin_x(0);
        if let Some(hook) = self.on_focus_lost.as_mut() {
            hook(opts);
        }
    }

    /// Selects the row at view line `view_idx` and re-focuses.
    pub fn on_search_select(&mut self, view_idx: usize) {
        let model_idx = self.renderer.view_index_to_model_index(view_idx);
        self.list.cursor_mut().set_selection(model_idx);
        self.handle_focus(&OnFocusOpts::default());
    }

    /// Last item; where "go to bottom" lands.
    pub fn index_for_goto_bottom(&self) -> usize {
        self.list.filtered_list().len().saturating_sub(1)
    }

    /// View line of model row `idx`.
    pub fn model_index_to_view_index(&self, idx: usize) -> usize {
        self.renderer.model_index_to_view_index(idx)
    }

    /// Model row shown at view line `idx`.
    pub fn view_index_to_model_index(&self, idx: usize) -> usize {
        self.renderer.view_index_to_model_index(idx)
    }
}

fn build_renderer<T: Send + Sync + 'static>(
    list: &FilteredList<T>,
    display: &DisplayFn<T>,
    non_model_items: Option<&HeadersFn>,
    alignments: &[ColumnAlignment],
) -> ListRenderer {
    let rows_list = list.clone();
    let display = Arc::clone(display);
    let renderer = ListRenderer::new(list.length_fn(), move |start, end| {
        rows_list.map_range(start, end, |item| display(item))
    })
    .with_column_alignments(alignments.to_vec());

    match non_model_items {
        Some(f) => {
            let f = Arc::clone(f);
            renderer.with_non_model_items(move || f())
        }
        None => renderer,
    }
}

impl<T> Renderable for ListContext<T> {
    fn handle_render(&mut self) {
        ListContext::handle_render(self);
    }
}

impl<T> Focusable for ListContext<T> {
    fn handle_focus(&mut self, opts: &OnFocusOpts) {
        ListContext::handle_focus(self, opts);
    }

    fn handle_focus_lost(&mut self, opts: &OnFocusLostOpts) {
        ListContext::handle_focus_lost(self, opts);
    }
}

impl<T: Item + Send + Sync + 'static> Context for ListContext<T> {
    fn key(&self) -> &ContextKey {
        &self.key
    }

    fn kind(&self) -> ContextKind {
        self.kind
    }

    fn view_name(&self) -> &str {
        self.view.name()
    }

    fn capability(&mut self) -> Capability<'_> {
        match self.mode {
            Mode::Plain => Capability::List(self),
            Mode::Filter => Capability::Filterable(self),
            Mode::Search => Capability::Searchable(self),
        }
    }
}

impl<T: Item + Send + Sync + 'static> Selectable for ListContext<T> {
    fn list_cursor(&self) -> &ListCursor {
        self.list.cursor()
    }

    fn list_cursor_mut(&mut self) -> &mut ListCursor {
        self.list.cursor_mut()
    }

    fn view_trait(&self) -> &ViewTrait {
        &self.view
    }

    fn view_trait_mut(&mut self) -> &mut ViewTrait {
        &mut self.view
    }

    fn focus_line(&mut self) {
        ListContext::focus_line(self);
    }

    fn model_index_to_view_index(&self, idx: usize) -> usize {
        ListContext::model_index_to_view_index(self, idx)
    }

    fn view_index_to_model_index(&self, idx: usize) -> usize {
        ListContext::view_index_to_model_index(self, idx)
    }

    fn index_for_goto_bottom(&self) -> usize {
        ListContext::index_for_goto_bottom(self)
    }

    fn range_select_enabled(&self) -> bool {
        self.range_select_enabled
    }

    fn render_only_visible_lines(&self) -> bool {
        self.render_only_visible_lines
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn on_click(&mut self) -> bool {
        let Some(item) = self.list.selected_item() else {
            return false;
        };
        match self.on_click.as_mut() {
            Some(f) => {
                f(&item);
                true
            }
            None => false,
        }
    }

    fn on_search_select(&mut self, view_idx: usize) {
        ListContext::on_search_select(self, view_idx);
    }
}

impl<T: Item + Send + Sync + 'static> Filterable for ListContext<T> {
    fn filter(&self) -> String {
        ListContext::filter(self)
    }

    fn is_filtering(&self) -> bool {
        ListContext::is_filtering(self)
    }

    fn set_filter(&mut self, filter: &str) {
        ListContext::set_filter(self, filter);
    }

    fn confirm_filter(&mut self, filter: &str) {
        ListContext::confirm_filter(self, filter);
    }

    fn clear_filter(&mut self) {
        self.list.clear_filter();
        self.handle_render();
        self.focus_line();
    }

    fn re_apply_filter(&mut self) {
        self.list.filtered_list_mut().re_apply_filter();
        self.list.cursor_mut().clamp_selection();
    }

    fn filter_history(&mut self) -> &mut SearchHistory {
        &mut self.history
    }

    fn as_selectable(&mut self) -> &mut dyn Selectable {
        self
    }
}

impl<T: Item + Send + Sync + 'static> Searchable for ListContext<T> {
    fn set_search_string(&mut self, query: &str) {
        ListContext::set_search_string(self, query);
    }

    fn confirm_search(&mut self, query: &str) {
        ListContext::confirm_search(self, query);
    }

    fn next_search_match(&mut self) -> bool {
        ListContext::next_search_match(self)
    }

    fn prev_search_match(&mut self) -> bool {
        ListContext::prev_search_match(self)
    }

    fn search_status(&self) -> (Option<usize>, usize) {
        ListContext::search_status(self)
    }

    fn clear_search(&mut self) {
        self.search.clear();
    }

    fn re_apply_search(&mut self) {
        let fields = self.search_fields();
        self.search.recompute(&fields);
    }

    fn search_history(&mut self) -> &mut SearchHistory {
        &mut self.history
    }

    fn as_selectable(&mut self) -> &mut dyn Selectable {
        self
    }
}

impl<T> Component for ListContext<T> {
    fn focus(&mut self) -> Option<Cmd> {
        self.handle_focus(&OnFocusOpts::default());
        None
    }

    fn blur(&mut self) {
        self.handle_focus_lost(&OnFocusLostOpts::default());
    }

    fn focused(&self) -> bool {
        self.focused
    }
}
