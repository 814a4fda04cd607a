//! Navigation for any list context.
//!
//! [`ListController`] turns key presses, clicks and wheel scrolls into
//! cursor moves on a [`Selectable`] and then resynchronises the view. It
//! holds no per-list state, so one controller can serve every list in the
//! application.
//!
//! Single-line moves respect the scroll-off margin (see [`crate::scroll`]).
//! Everything else relies on the view re-centring when the selection leaves
//! the window.

use super::keys::ListKeyMap;
use super::types::OnFocusOpts;
use crate::config::GuiConfig;
use crate::context::{ContextError, ContextKey, ContextTree, Selectable};
use crate::cursor::ListCursor;
use crate::scroll;
use bubbletea_rs::{KeyMsg, Msg};

/// Key, mouse and wheel handling shared by all lists.
#[derive(Debug, Clone, Default)]
pub struct ListController {
    config: GuiConfig,
    keys: ListKeyMap,
}

impl ListController {
    /// Creates a controller with the default key map.
    pub fn new(config: GuiConfig) -> Self {
        Self {
            config,
            keys: ListKeyMap::default(),
        }
    }

    /// Replaces the key map.
    pub fn with_keymap(mut self, keys: ListKeyMap) -> Self {
        self.keys = keys;
        self
    }

    /// The key map in use.
    pub fn keymap(&self) -> &ListKeyMap {
        &self.keys
    }

    /// The settings in use.
    pub fn config(&self) -> &GuiConfig {
        &self.config
    }

    /// Dispatches a key message. Returns true if it was a list key.
    pub fn update(&self, ctx: &mut dyn Selectable, msg: &Msg) -> bool {
        let Some(key_msg) = msg.downcast_ref::<KeyMsg>() else {
            return false;
        };
        let keys = &self.keys;

        if keys.prev_item.matches(key_msg) {
            self.handle_prev_line(ctx);
        } else if keys.next_item.matches(key_msg) {
            self.handle_next_line(ctx);
        } else if keys.prev_page.matches(key_msg) {
            self.handle_prev_page(ctx);
        } else if keys.next_page.matches(key_msg) {
            self.handle_next_page(ctx);
        } else if keys.goto_top.matches(key_msg) {
            self.handle_goto_top(ctx);
        } else if keys.goto_bottom.matches(key_msg) {
            self.handle_goto_bottom(ctx);
        } else if keys.scroll_left.matches(key_msg) {
            self.handle_scroll_left(ctx);
        } else if keys.scroll_right.matches(key_msg) {
            self.handle_scroll_right(ctx);
        } else if ctx.range_select_enabled() && keys.toggle_range_select.matches(key_msg) {
            self.handle_toggle_range_select(ctx);
        } else if ctx.range_select_enabled() && keys.range_select_up.matches(key_msg) {
            self.handle_range_select_up(ctx);
        } else if ctx.range_select_enabled() && keys.range_select_down.matches(key_msg) {
            self.handle_range_select_down(ctx);
        } else {
            return false;
        }
        true
    }

    /// Dispatches a key message to the focused context, if it is a list.
    pub fn update_focused(&self, tree: &mut ContextTree, msg: &Msg) -> Result<bool, ContextError> {
        let Some(key) = tree.current_key().cloned() else {
            return Ok(false);
        };
        let ctx = tree.selectable_mut(&key)?;
        Ok(self.update(ctx, msg))
    }

    /// Selects the previous item.
    pub fn handle_prev_line(&self, ctx: &mut dyn Selectable) {
        self.handle_line_change(ctx, -1, ListCursor::move_selected_line);
    }

    /// Selects the next item.
    pub fn handle_next_line(&self, ctx: &mut dyn Selectable) {
        self.handle_line_change(ctx, 1, ListCursor::move_selected_line);
    }

    /// Extends the range one item up.
    pub fn handle_range_select_up(&self, ctx: &mut dyn Selectable) {
        self.handle_line_change(ctx, -1, ListCursor::expand_non_sticky_range);
    }

    /// Extends the range one item down.
    pub fn handle_range_select_down(&self, ctx: &mut dyn Selectable) {
        self.handle_line_change(ctx, 1, ListCursor::expand_non_sticky_range);
    }

    /// Starts or stops a sticky range at the selection.
    pub fn handle_toggle_range_select(&self, ctx: &mut dyn Selectable) {
        ctx.list_cursor_mut().toggle_sticky_range();
        ctx.handle_focus(&OnFocusOpts::default());
    }

    /// Jumps to the first item.
    pub fn handle_goto_top(&self, ctx: &mut dyn Selectable) {
        let len = ctx.list_cursor_mut().len();
        self.handle_line_change(ctx, -to_isize(len), ListCursor::move_selected_line);
    }

    /// Jumps to the last item.
    pub fn handle_goto_bottom(&self, ctx: &mut dyn Selectable) {
        let Some(selected) = ctx.list_cursor().selected_line_idx() else {
            return;
        };
        let change = to_isize(ctx.index_for_goto_bottom()) - to_isize(selected);
        self.handle_line_change(ctx, change, ListCursor::move_selected_line);
    }

    /// Moves up a page. The first press only moves the selection to the top
    /// of the window; later presses move and scroll by a page.
    pub fn handle_prev_page(&self, ctx: &mut dyn Selectable) {
        self.handle_page_change(ctx, false);
    }

    /// Moves down a page. The first press only moves the selection to the
    /// bottom of the window; later presses move and scroll by a page.
    pub fn handle_next_page(&self, ctx: &mut dyn Selectable) {
        self.handle_page_change(ctx, true);
    }

    /// Wheel scroll up by the configured scroll height. The selection
    /// stays where it is.
    pub fn handle_scroll_up(&self, ctx: &mut dyn Selectable) {
        ctx.view_trait_mut().scroll_up(self.config.scroll_height);
        if ctx.render_only_visible_lines() {
            ctx.handle_render();
        }
    }

    /// Wheel scroll down by the configured scroll height. The selection
    /// stays where it is.
    pub fn handle_scroll_down(&self, ctx: &mut dyn Selectable) {
        ctx.view_trait_mut().scroll_down(self.config.scroll_height);
        if ctx.render_only_visible_lines() {
            ctx.handle_render();
        }
    }

    /// Scrolls the view half a width to the left.
    pub fn handle_scroll_left(&self, ctx: &mut dyn Selectable) {
        ctx.view_trait_mut().scroll_left();
        ctx.handle_focus(&OnFocusOpts::default());
    }

    /// Scrolls the view half a width to the right.
    pub fn handle_scroll_right(&self, ctx: &mut dyn Selectable) {
        ctx.view_trait_mut().scroll_right();
        ctx.handle_focus(&OnFocusOpts::default());
    }

    /// Handles a click on view line `view_y` of the context `key`.
    ///
    /// Focuses the context if needed and selects the clicked row. A double
    /// click on an already focused list runs its click action. Clicks below
    /// the last row only focus.
    pub fn handle_click(
        &self,
        tree: &mut ContextTree,
        key: &ContextKey,
        view_y: usize,
        is_double_click: bool,
    ) -> Result<(), ContextError> {
        let already_focused = tree.current_key() == Some(key);
        let new_idx = tree.selectable_mut(key)?.view_index_to_model_index(view_y);

        if !already_focused {
            tree.push(
                key,
                OnFocusOpts {
                    clicked_view_line_idx: Some(view_y),
                },
            )?;
        }

        let ctx = tree.selectable_mut(key)?;
        if new_idx >= ctx.list_cursor_mut().len() {
            return Ok(());
        }
        ctx.list_cursor_mut().set_selection(new_idx);
        tracing::debug!(context = %key, new_idx, is_double_click, "list click");

        if is_double_click && already_focused && ctx.on_click() {
            return Ok(());
        }
        ctx.handle_focus(&OnFocusOpts::default());
        Ok(())
    }

    fn handle_line_change(
        &self,
        ctx: &mut dyn Selectable,
        change: isize,
        apply: impl FnOnce(&mut ListCursor, isize),
    ) {
        let range_before = ctx.list_cursor().is_selecting_range();
        let before = ctx.list_cursor().selected_line_idx();
        let (origin_before, _) = ctx.view_trait().view_port_y_bounds();
        apply(ctx.list_cursor_mut(), change);
        let range_after = ctx.list_cursor().is_selecting_range();
        let after = ctx.list_cursor().selected_line_idx();

        // Holding a key at either end must not re-focus on every repeat.
        let moved = before != after;
        if moved {
            if let (Some(before), Some(after)) = (before, after) {
                let before = ctx.model_index_to_view_index(before);
                let after = ctx.model_index_to_view_index(after);
                match change {
                    -1 => scroll::check_scroll_up(ctx.view_trait_mut(), &self.config, before, after),
                    1 => scroll::check_scroll_down(ctx.view_trait_mut(), &self.config, before, after),
                    _ => {}
                }
            }
        }
        // The margin scroll happens before focusing, so focus_line alone
        // would not see the origin move.
        let (origin_after, _) = ctx.view_trait().view_port_y_bounds();
        if ctx.render_only_visible_lines() && origin_after != origin_before {
            ctx.handle_render();
        }
        if moved || range_before != range_after {
            ctx.handle_focus(&OnFocusOpts::default());
        }
    }

    fn handle_page_change(&self, ctx: &mut dyn Selectable, forward: bool) {
        let Some(before) = ctx.list_cursor().selected_line_idx() else {
            return;
        };
        let delta = ctx.view_trait().page_delta();
        let (start, height) = ctx.view_trait().view_port_y_bounds();
        let before_view = ctx.model_index_to_view_index(before);

        let (edge, target) = if forward {
            (
                ctx.view_index_to_model_index((start + height).saturating_sub(1)),
                ctx.view_index_to_model_index(before_view + delta),
            )
        } else {
            (
                ctx.view_index_to_model_index(start),
                ctx.view_index_to_model_index(before_view.saturating_sub(delta)),
            )
        };

        if before != edge {
            ctx.list_cursor_mut()
                .move_selected_line(to_isize(edge) - to_isize(before));
        } else {
            ctx.list_cursor_mut()
                .move_selected_line(to_isize(target) - to_isize(before));
            if forward {
                ctx.view_trait_mut().scroll_down(delta);
            } else {
                ctx.view_trait_mut().scroll_up(delta);
            }
        }

        // The view may have scrolled without the selection leaving the
        // window, so re-focusing alone would not redraw it.
        if ctx.render_only_visible_lines() {
            ctx.handle_render();
        }

        ctx.handle_focus(&OnFocusOpts::default());
    }
}

fn to_isize(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}
