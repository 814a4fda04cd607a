//! Key bindings for list navigation.
//!
//! ## Defaults
//!
//! - **Line**: `↑/k` (previous), `↓/j` (next)
//! - **Page**: `pgup/,` (previous), `pgdown/.` (next)
//! - **Jump**: `home/<` (top), `end/>` (bottom)
//! - **Horizontal**: `←/H` (scroll left), `→/L` (scroll right)
//! - **Range**: `v` (toggle sticky range), `shift+↑/shift+↓` (extend range)
//!
//! ## Example
//!
//! ```rust
//! use lazylist::key::KeyMap;
//! use lazylist::list::ListKeyMap;
//!
//! let keymap = ListKeyMap::default();
//! assert_eq!(keymap.short_help().len(), 4);
//! ```

use crate::key;

/// Key bindings understood by [`ListController`](super::ListController).
#[derive(Debug, Clone)]
pub struct ListKeyMap {
    /// Select the previous item.
    pub prev_item: key::Binding,
    /// Select the next item.
    pub next_item: key::Binding,
    /// Move up a page.
    pub prev_page: key::Binding,
    /// Move down a page.
    pub next_page: key::Binding,
    /// Jump to the first item.
    pub goto_top: key::Binding,
    /// Jump to the last item.
    pub goto_bottom: key::Binding,
    /// Scroll the view left.
    pub scroll_left: key::Binding,
    /// Scroll the view right.
    pub scroll_right: key::Binding,
    /// Start or stop a sticky range selection.
    pub toggle_range_select: key::Binding,
    /// Extend the range upwards.
    pub range_select_up: key::Binding,
    /// Extend the range downwards.
    pub range_select_down: key::Binding,
}

impl Default for ListKeyMap {
    fn default() -> Self {
        Self {
            prev_item: key::new_binding(vec![
                key::with_keys_str(&["up", "k"]),
                key::with_help("↑/k", "previous item"),
            ]),
            next_item: key::new_binding(vec![
                key::with_keys_str(&["down", "j"]),
                key::with_help("↓/j", "next item"),
            ]),
            prev_page: key::new_binding(vec![
                key::with_keys_str(&["pgup", ","]),
                key::with_help(",", "previous page"),
            ]),
            next_page: key::new_binding(vec![
                key::with_keys_str(&["pgdown", "."]),
                key::with_help(".", "next page"),
            ]),
            goto_top: key::new_binding(vec![
                key::with_keys_str(&["home", "<"]),
                key::with_help("<", "scroll to top"),
            ]),
            goto_bottom: key::new_binding(vec![
                key::with_keys_str(&["end", ">"]),
                key::with_help(">", "scroll to bottom"),
            ]),
            scroll_left: key::new_binding(vec![
                key::with_keys_str(&["left", "H"]),
                key::with_help("H", "scroll left"),
            ]),
            scroll_right: key::new_binding(vec![
                key::with_keys_str(&["right", "L"]),
                key::with_help("L", "scroll right"),
            ]),
            toggle_range_select: key::new_binding(vec![
                key::with_keys_str(&["v"]),
                key::with_help("v", "toggle range select"),
            ]),
            range_select_up: key::new_binding(vec![
                key::with_keys_str(&["shift+up"]),
                key::with_help("shift+↑", "range select up"),
            ]),
            range_select_down: key::new_binding(vec![
                key::with_keys_str(&["shift+down"]),
                key::with_help("shift+↓", "range select down"),
            ]),
        }
    }
}

impl key::KeyMap for ListKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![
            &self.prev_item,
            &self.next_item,
            &self.goto_top,
            &self.goto_bottom,
        ]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![
            vec![
                &self.prev_item,
                &self.next_item,
                &self.prev_page,
                &self.next_page,
                &self.goto_top,
                &self.goto_bottom,
            ],
            vec![&self.scroll_left, &self.scroll_right],
            vec![
                &self.toggle_range_select,
                &self.range_select_up,
                &self.range_select_down,
            ],
        ]
    }
}
