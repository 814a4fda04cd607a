//! Tests for list contexts and the list controller.

use super::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GuiConfig, ScrollOffBehavior};
    use crate::context::{Capability, Context, ContextKind, ContextTree};
    use crate::viewport::Model as Viewport;
    use crate::Component;
    use bubbletea_rs::{KeyMsg, Msg};
    use crossterm::event::{KeyCode, KeyModifiers};
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};

    fn numbered(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("item {i}")).collect()
    }

    fn files() -> Vec<String> {
        ["Cargo.toml", "README.md", "src/lib.rs", "src/main.rs", "tests/it.rs"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn context(key: &str, items: Vec<String>, height: usize, config: GuiConfig) -> ListContext<String> {
        ListContext::new(key, Viewport::new(key, 40, height), ModelHandle::new(items), config)
    }

    fn rendered(n: usize, height: usize) -> ListContext<String> {
        let mut ctx = context("list", numbered(n), height, GuiConfig::default());
        ctx.handle_render();
        ctx.focus();
        ctx
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Msg {
        Box::new(KeyMsg {
            key: code,
            modifiers,
        }) as Msg
    }

    fn selected(ctx: &ListContext<String>) -> Option<usize> {
        ctx.list().cursor().selected_line_idx()
    }

    fn footer(ctx: &ListContext<String>) -> String {
        ctx.view().view().footer().to_string()
    }

    fn window(ctx: &ListContext<String>) -> Vec<String> {
        let (start, height) = ctx.view().view_port_y_bounds();
        let lines = ctx.view().view().lines();
        let end = (start + height).min(lines.len());
        lines[start.min(end)..end].to_vec()
    }

    fn visible_only(n: usize, height: usize) -> ListContext<String> {
        let mut ctx = context("commits", numbered(n), height, GuiConfig::default())
            .with_render_only_visible_lines(true);
        ctx.handle_render();
        ctx.focus();
        ctx
    }

    fn assert_window_filled(ctx: &ListContext<String>) {
        let (start, _) = ctx.view().view_port_y_bounds();
        let expected: Vec<String> = (start..start + window(ctx).len())
            .map(|i| format!("item {i}"))
            .collect();
        assert_eq!(window(ctx), expected);
    }

    #[test]
    fn test_footer_and_highlight_follow_the_list() {
        let mut empty = context("empty", Vec::new(), 5, GuiConfig::default());
        empty.handle_render();
        empty.focus();
        assert_eq!(footer(&empty), "0 of 0");
        assert!(!empty.view().view().highlight());

        let ctx = rendered(3, 5);
        assert_eq!(footer(&ctx), "1 of 3");
        assert!(ctx.view().view().highlight());
        assert_eq!(ctx.view().view().lines(), ["item 0", "item 1", "item 2"]);
    }

    #[test]
    fn test_next_line_stops_at_the_end() {
        let mut ctx = rendered(50, 10);
        let controller = ListController::default();
        for _ in 0..49 {
            controller.handle_next_line(&mut ctx);
        }
        assert_eq!(selected(&ctx), Some(49));
        assert_eq!(ctx.list_mut().cursor_mut().len(), 50);

        controller.handle_next_line(&mut ctx);
        assert_eq!(selected(&ctx), Some(49));
        assert_eq!(footer(&ctx), "50 of 50");
        assert_eq!(ctx.view().selected_line_idx(), 49);
    }

    #[test]
    fn test_margin_scrolls_before_the_edge() {
        let mut ctx = rendered(20, 10);
        let controller = ListController::default();
        for _ in 0..7 {
            controller.handle_next_line(&mut ctx);
        }
        assert_eq!(ctx.view().view_port_y_bounds(), (0, 10));

        controller.handle_next_line(&mut ctx);
        assert_eq!(selected(&ctx), Some(8));
        assert_eq!(ctx.view().view_port_y_bounds(), (1, 10));

        controller.handle_prev_line(&mut ctx);
        assert_eq!(ctx.view().view_port_y_bounds(), (1, 10));
    }

    #[test]
    fn test_jump_behavior_recenters_only_when_leaving_the_window() {
        let config = GuiConfig {
            scroll_off_behavior: ScrollOffBehavior::Jump,
            ..GuiConfig::default()
        };
        let mut ctx = context("list", numbered(20), 10, config.clone());
        ctx.handle_render();
        ctx.focus();
        let controller = ListController::new(config);

        for _ in 0..9 {
            controller.handle_next_line(&mut ctx);
        }
        assert_eq!(ctx.view().view_port_y_bounds(), (0, 10));

        controller.handle_next_line(&mut ctx);
        assert_eq!(selected(&ctx), Some(10));
        assert_eq!(ctx.view().view_port_y_bounds(), (5, 10));
    }

    #[test]
    fn test_pages_stop_at_the_window_edge_first() {
        let mut ctx = rendered(30, 10);
        let controller = ListController::default();

        controller.handle_next_page(&mut ctx);
        assert_eq!(selected(&ctx), Some(9));
        assert_eq!(ctx.view().view_port_y_bounds(), (0, 10));

        controller.handle_next_page(&mut ctx);
        assert_eq!(selected(&ctx), Some(18));
        assert_eq!(ctx.view().view_port_y_bounds(), (9, 10));

        controller.handle_prev_page(&mut ctx);
        assert_eq!(selected(&ctx), Some(9));
        assert_eq!(ctx.view().view_port_y_bounds(), (9, 10));

        controller.handle_prev_page(&mut ctx);
        assert_eq!(selected(&ctx), Some(0));
        assert_eq!(ctx.view().view_port_y_bounds(), (0, 10));
    }

    #[test]
    fn test_goto_bottom_and_top() {
        let mut ctx = rendered(30, 10);
        let controller = ListController::default();

        controller.handle_goto_bottom(&mut ctx);
        assert_eq!(selected(&ctx), Some(29));
        assert_eq!(ctx.view().view_port_y_bounds(), (20, 10));
        assert_eq!(footer(&ctx), "30 of 30");

        controller.handle_goto_top(&mut ctx);
        assert_eq!(selected(&ctx), Some(0));
        assert_eq!(ctx.view().view_port_y_bounds(), (0, 10));
    }

    #[test]
    fn test_keys_drive_the_controller() {
        let mut ctx = rendered(10, 5);
        let controller = ListController::default();

        assert!(controller.update(&mut ctx, &key(KeyCode::Char('j'), KeyModifiers::NONE)));
        assert!(controller.update(&mut ctx, &key(KeyCode::Down, KeyModifiers::NONE)));
        assert_eq!(selected(&ctx), Some(2));

        assert!(controller.update(&mut ctx, &key(KeyCode::Char('>'), KeyModifiers::SHIFT)));
        assert_eq!(selected(&ctx), Some(9));

        assert!(controller.update(&mut ctx, &key(KeyCode::Home, KeyModifiers::NONE)));
        assert_eq!(selected(&ctx), Some(0));

        assert!(!controller.update(&mut ctx, &key(KeyCode::Char('x'), KeyModifiers::NONE)));
        let not_a_key: Msg = Box::new(42u32);
        assert!(!controller.update(&mut ctx, &not_a_key));
    }

    #[test]
    fn test_range_selection_is_highlighted() {
        let mut ctx = rendered(10, 5);
        let controller = ListController::default();
        controller.handle_next_line(&mut ctx);

        assert!(controller.update(&mut ctx, &key(KeyCode::Char('v'), KeyModifiers::NONE)));
        controller.handle_next_line(&mut ctx);
        controller.handle_next_line(&mut ctx);

        assert_eq!(ctx.view().view().range_select_start(), Some(1));
        assert_eq!(ctx.view().selected_line_idx(), 3);
        assert_eq!(ctx.selected_items(), vec!["item 1", "item 2", "item 3"]);

        controller.handle_toggle_range_select(&mut ctx);
        assert_eq!(ctx.view().view().range_select_start(), None);
    }

    #[test]
    fn test_shift_arrows_extend_a_non_sticky_range() {
        let mut ctx = rendered(10, 5);
        let controller = ListController::default();

        controller.update(&mut ctx, &key(KeyCode::Down, KeyModifiers::SHIFT));
        controller.update(&mut ctx, &key(KeyCode::Down, KeyModifiers::SHIFT));
        assert_eq!(ctx.list().cursor().selection_range(), Some((0, 2)));

        // A plain move ends a non-sticky range.
        controller.handle_next_line(&mut ctx);
        assert!(!ctx.list().cursor().is_selecting_range());
        assert_eq!(ctx.view().view().range_select_start(), None);
    }

    #[test]
    fn test_range_keys_need_range_select() {
        let mut ctx = context("list", numbered(5), 5, GuiConfig::default()).with_range_select(false);
        ctx.handle_render();
        let controller = ListController::default();
        assert!(!controller.update(&mut ctx, &key(KeyCode::Char('v'), KeyModifiers::NONE)));
        assert!(!ctx.list().cursor().is_selecting_range());
    }

    #[test]
    fn test_horizontal_scroll_resets_on_blur() {
        let mut ctx = context("list", vec!["x".repeat(100)], 5, GuiConfig::default());
        ctx.handle_render();
        ctx.focus();
        let controller = ListController::default();

        controller.handle_scroll_right(&mut ctx);
        assert_eq!(ctx.view().view().origin(), (20, 0));

        ctx.blur();
        assert_eq!(ctx.view().view().origin(), (0, 0));
        assert!(!ctx.focused());
    }

    #[test]
    fn test_visible_only_rendering_follows_the_origin() {
        let mut ctx = context("commits", numbered(100), 5, GuiConfig::default())
            .with_render_only_visible_lines(true);
        ctx.handle_render();
        ctx.focus();

        let lines = ctx.view().view().lines();
        assert_eq!(lines.len(), 100);
        assert_eq!(lines[4], "item 4");
        assert_eq!(lines[50], "");

        ctx.list_mut().cursor_mut().set_selection(50);
        ctx.focus_line();
        assert_eq!(ctx.view().view_port_y_bounds(), (48, 5));
        let lines = ctx.view().view().lines();
        assert_eq!(lines[0], "");
        assert_eq!(lines[50], "item 50");
        assert_eq!(lines[52], "item 52");
        assert_eq!(lines[53], "");
    }

    #[test]
    fn test_margin_scroll_redraws_visible_lines() {
        let mut ctx = visible_only(50, 8);
        let controller = ListController::default();

        for _ in 0..8 {
            controller.handle_next_line(&mut ctx);
            assert_window_filled(&ctx);
        }
        assert_eq!(selected(&ctx), Some(8));
        assert_eq!(ctx.view().view_port_y_bounds(), (3, 8));
        assert_eq!(window(&ctx).len(), 8);

        for _ in 0..8 {
            controller.handle_prev_line(&mut ctx);
            assert_window_filled(&ctx);
        }
        assert_eq!(selected(&ctx), Some(0));
        assert_eq!(ctx.view().view_port_y_bounds(), (0, 8));
    }

    #[test]
    fn test_page_moves_redraw_visible_lines() {
        let mut ctx = visible_only(50, 8);
        let controller = ListController::default();

        controller.handle_next_page(&mut ctx);
        assert_eq!(selected(&ctx), Some(7));
        controller.handle_next_page(&mut ctx);
        assert_eq!(selected(&ctx), Some(14));
        assert_eq!(ctx.view().view_port_y_bounds(), (7, 8));
        assert_window_filled(&ctx);

        controller.handle_prev_page(&mut ctx);
        controller.handle_prev_page(&mut ctx);
        assert_eq!(selected(&ctx), Some(0));
        assert_eq!(ctx.view().view_port_y_bounds(), (0, 8));
        assert_window_filled(&ctx);
    }

    #[test]
    fn test_page_at_the_top_still_refocuses() {
        let focuses = Arc::new(Mutex::new(0));
        let hook = Arc::clone(&focuses);
        let mut ctx = context("list", numbered(30), 10, GuiConfig::default())
            .with_on_focus(move |_: &OnFocusOpts| *hook.lock().unwrap() += 1);
        ctx.handle_render();
        ctx.focus();
        let controller = ListController::default();

        controller.handle_prev_page(&mut ctx);
        assert_eq!(selected(&ctx), Some(0));
        assert_eq!(*focuses.lock().unwrap(), 2);

        // Single-line moves that go nowhere do not.
        controller.handle_prev_line(&mut ctx);
        assert_eq!(*focuses.lock().unwrap(), 2);
    }

    #[test]
    fn test_wheel_scroll_keeps_the_selection() {
        let mut ctx = context("commits", numbered(100), 5, GuiConfig::default())
            .with_render_only_visible_lines(true);
        ctx.handle_render();
        ctx.focus();
        let controller = ListController::default();

        controller.handle_scroll_down(&mut ctx);
        controller.handle_scroll_down(&mut ctx);
        assert_eq!(ctx.view().view_port_y_bounds(), (4, 5));
        assert_eq!(ctx.view().view().lines()[8], "item 8");
        assert_eq!(selected(&ctx), Some(0));
        assert_eq!(ctx.view().selected_line_idx(), 0);
        assert_window_filled(&ctx);

        controller.handle_scroll_up(&mut ctx);
        assert_eq!(ctx.view().view_port_y_bounds(), (2, 5));
        assert_window_filled(&ctx);
    }

    #[test]
    fn test_is_item_visible() {
        let ctx = rendered(20, 5);
        assert!(ctx.is_item_visible(&"item 3".to_string()));
        assert!(!ctx.is_item_visible(&"item 7".to_string()));
    }

    #[test]
    fn test_section_headers_shift_view_lines() {
        let mut ctx = context("branches", numbered(4), 10, GuiConfig::default())
            .with_non_model_items(|| vec![NonModelItem::new(0, "Local"), NonModelItem::new(2, "Remote")]);
        ctx.handle_render();
        ctx.focus();
        assert_eq!(
            ctx.view().view().lines(),
            ["Local", "item 0", "item 1", "Remote", "item 2", "item 3"]
        );
        assert_eq!(ctx.view().selected_line_idx(), 1);

        ctx.list_mut().cursor_mut().set_selection(2);
        ctx.focus_line();
        assert_eq!(ctx.view().selected_line_idx(), 4);
        assert_eq!(footer(&ctx), "3 of 4");
        assert_eq!(ctx.view_index_to_model_index(3), 2);
        assert_eq!(ctx.index_for_goto_bottom(), 3);
    }

    #[test]
    fn test_filter_through_the_capability() {
        let mut ctx = context("files", files(), 10, GuiConfig::default()).filterable();
        ctx.handle_render();
        ctx.focus();
        ctx.list_mut().cursor_mut().set_selection(4);

        let filterable = ctx.capability().into_filterable().expect("filterable");
        filterable.set_filter("s");
        filterable.set_filter("sr");
        filterable.set_filter("src");
        assert!(filterable.filter_history().is_empty());
        filterable.confirm_filter("src");
        assert!(filterable.is_filtering());
        assert_eq!(filterable.list_cursor().selected_line_idx(), Some(0));
        filterable.list_cursor_mut().set_selection(1);
        filterable.focus_line();

        assert_eq!(ctx.view().view().lines(), ["src/lib.rs", "src/main.rs"]);
        assert_eq!(footer(&ctx), "2 of 2");
        assert_eq!(ctx.history().len(), 1);
        assert_eq!(ctx.history().peek_at(0), Some("src"));

        let filterable = ctx.capability().into_filterable().expect("filterable");
        filterable.clear_filter();
        assert_eq!(selected(&ctx), Some(3));
        assert_eq!(ctx.selected_item().as_deref(), Some("src/main.rs"));
        assert_eq!(ctx.view().view().lines().len(), 5);
    }

    #[test]
    fn test_search_jumps_between_matches() {
        let mut ctx = context("files", files(), 10, GuiConfig::default()).searchable();
        ctx.handle_render();
        ctx.focus();
        assert!(matches!(ctx.capability(), Capability::Searchable(_)));

        ctx.set_search_string("rs");
        assert_eq!(selected(&ctx), Some(2));
        assert_eq!(ctx.search_status(), (Some(0), 3));

        assert!(ctx.next_search_match());
        assert!(ctx.next_search_match());
        assert_eq!(selected(&ctx), Some(4));
        assert!(ctx.next_search_match());
        assert_eq!(selected(&ctx), Some(2));

        assert!(ctx.prev_search_match());
        assert_eq!(selected(&ctx), Some(4));
        assert_eq!(footer(&ctx), "5 of 5");

        let searchable = ctx.capability().into_searchable().expect("searchable");
        searchable.clear_search();
        assert!(!searchable.next_search_match());
    }

    #[test]
    fn test_history_records_confirmed_queries_only() {
        let mut ctx = context("files", files(), 10, GuiConfig::default()).searchable();
        ctx.handle_render();
        ctx.focus();

        let searchable = ctx.capability().into_searchable().expect("searchable");
        searchable.set_search_string("m");
        searchable.set_search_string("ma");
        searchable.set_search_string("main");
        assert!(searchable.search_history().is_empty());

        searchable.confirm_search("main");
        searchable.confirm_search("");
        assert_eq!(searchable.search_history().len(), 1);
        assert_eq!(searchable.search_history().peek_at(0), Some("main"));

        let mut files_ctx = context("files", files(), 10, GuiConfig::default());
        files_ctx.confirm_filter("");
        assert!(files_ctx.history().is_empty());
        files_ctx.confirm_filter("tests");
        assert_eq!(files_ctx.view().view().lines(), ["tests/it.rs"]);
        assert_eq!(files_ctx.history().peek_at(0), Some("tests"));
    }

    #[test]
    fn test_refresh_reclamps_and_refilters() {
        let mut ctx = rendered(5, 10);
        ctx.list_mut().cursor_mut().set_selection(2);
        ctx.apply_refresh(numbered(3));
        assert_eq!(selected(&ctx), Some(2));

        ctx.apply_refresh(numbered(2));
        assert_eq!(selected(&ctx), Some(1));
        assert_eq!(footer(&ctx), "2 of 2");
        assert_eq!(ctx.view().view().lines(), ["item 0", "item 1"]);

        let mut files_ctx = context("files", files(), 10, GuiConfig::default());
        files_ctx.set_filter("src");
        let mut refreshed = files();
        refreshed.push("src/context.rs".to_string());
        files_ctx.apply_refresh(refreshed);
        assert_eq!(
            files_ctx.view().view().lines(),
            ["src/lib.rs", "src/main.rs", "src/context.rs"]
        );
    }

    #[test]
    fn test_click_focuses_and_selects() {
        let clicks = Arc::new(Mutex::new(Vec::new()));
        let focus_opts = Arc::new(Mutex::new(Vec::new()));

        let mut files_ctx = context("files", files(), 10, GuiConfig::default());
        files_ctx.handle_render();
        let clicks_hook = Arc::clone(&clicks);
        let focus_hook = Arc::clone(&focus_opts);
        let mut branches = context("branches", numbered(5), 10, GuiConfig::default())
            .with_on_click(move |item: &String| clicks_hook.lock().unwrap().push(item.clone()))
            .with_on_focus(move |opts: &OnFocusOpts| {
                focus_hook.lock().unwrap().push(opts.clicked_view_line_idx)
            });
        branches.handle_render();

        let mut tree = ContextTree::new();
        tree.add(Box::new(files_ctx)).unwrap();
        tree.add(Box::new(branches)).unwrap();
        tree.push(&"files".into(), OnFocusOpts::default()).unwrap();

        let controller = ListController::default();
        let key = "branches".into();

        controller.handle_click(&mut tree, &key, 2, false).unwrap();
        assert_eq!(tree.current_key(), Some(&key));
        assert_eq!(focus_opts.lock().unwrap().first(), Some(&Some(2)));
        let branches = tree.selectable_mut(&key).unwrap();
        assert_eq!(branches.list_cursor().selected_line_idx(), Some(2));
        assert!(branches.is_focused());

        // Below the last row: nothing changes.
        controller.handle_click(&mut tree, &key, 99, false).unwrap();
        let branches = tree.selectable_mut(&key).unwrap();
        assert_eq!(branches.list_cursor().selected_line_idx(), Some(2));

        controller.handle_click(&mut tree, &key, 1, true).unwrap();
        assert_eq!(*clicks.lock().unwrap(), vec!["item 1".to_string()]);

        // A double click that moves focus only focuses.
        controller
            .handle_click(&mut tree, &"files".into(), 0, true)
            .unwrap();
        assert_eq!(clicks.lock().unwrap().len(), 1);
        assert_eq!(tree.current().map(|c| c.key().as_str()), Some("files"));
    }

    #[test]
    fn test_update_focused_routes_to_the_top_context() {
        let mut tree = ContextTree::new();
        let mut ctx = context("commits", numbered(10), 5, GuiConfig::default()).with_kind(ContextKind::Side);
        ctx.handle_render();
        tree.add(Box::new(ctx)).unwrap();

        let controller = ListController::default();
        let down = key(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(controller.update_focused(&mut tree, &down), Ok(false));

        tree.push(&"commits".into(), OnFocusOpts::default()).unwrap();
        assert_eq!(controller.update_focused(&mut tree, &down), Ok(true));
        let commits = tree.selectable_mut(&"commits".into()).unwrap();
        assert_eq!(commits.list_cursor().selected_line_idx(), Some(1));
    }
}
