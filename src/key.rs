//! Type-safe key bindings built on crossterm key codes.
//!
//! A [`Binding`] groups one or more [`KeyPress`]es with the help text shown
//! for them. Bindings can be assembled either with the builder methods on
//! [`Binding`] or with the option-style helpers [`new_binding`],
//! [`with_keys_str`], [`with_help`] and [`with_disabled`]:
//!
//! ```rust
//! use lazylist::key::{self, KeyPress};
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let up = key::new_binding(vec![
//!     key::with_keys_str(&["up", "k"]),
//!     key::with_help("↑/k", "previous item"),
//! ]);
//! assert!(up.matches_key(KeyCode::Char('k'), KeyModifiers::NONE));
//! assert_eq!(up.keys()[0], KeyPress::from(KeyCode::Up));
//! ```
//!
//! Key strings use the names terminals commonly print: `"up"`, `"pgdown"`,
//! `"home"`, `"ctrl+u"`, `"shift+down"`, or a single character such as `"<"`.

use bubbletea_rs::KeyMsg;
use crossterm::event::{KeyCode, KeyModifiers};
use std::fmt;
use std::str::FromStr;

/// A single key combination: a key code plus the modifiers held with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPress {
    /// The key that was pressed.
    pub code: KeyCode,
    /// Modifiers held while pressing it.
    pub modifiers: KeyModifiers,
}

impl KeyPress {
    /// Creates a key press from a code and modifier set.
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Reports whether an incoming key event is this key press.
    ///
    /// Character keys ignore `SHIFT`, since terminals disagree on whether an
    /// uppercase letter or `<` arrives with the shift modifier set.
    pub fn matches(&self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if self.code != code {
            return false;
        }
        match code {
            KeyCode::Char(_) => {
                self.modifiers.difference(KeyModifiers::SHIFT)
                    == modifiers.difference(KeyModifiers::SHIFT)
            }
            _ => self.modifiers == modifiers,
        }
    }
}

impl From<KeyCode> for KeyPress {
    fn from(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }
}

impl From<(KeyCode, KeyModifiers)> for KeyPress {
    fn from((code, modifiers): (KeyCode, KeyModifiers)) -> Self {
        Self::new(code, modifiers)
    }
}

/// Error returned when a key string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised key `{0}`")]
pub struct ParseKeyError(pub String);

impl FromStr for KeyPress {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // A lone "+" is the plus key, not a separator.
        if s == "+" {
            return Ok(KeyCode::Char('+').into());
        }

        let mut parts: Vec<&str> = s.split('+').collect();
        let key = parts.pop().unwrap_or_default();
        let mut modifiers = KeyModifiers::NONE;
        for part in parts {
            modifiers |= match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => KeyModifiers::CONTROL,
                "shift" => KeyModifiers::SHIFT,
                "alt" | "meta" => KeyModifiers::ALT,
                _ => return Err(ParseKeyError(s.to_string())),
            };
        }

        let code = match key.to_ascii_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "pgup" | "pageup" => KeyCode::PageUp,
            "pgdown" | "pgdn" | "pagedown" => KeyCode::PageDown,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "space" => KeyCode::Char(' '),
            lower => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => match lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                        Some(n) if (1..=12).contains(&n) => KeyCode::F(n),
                        _ => return Err(ParseKeyError(s.to_string())),
                    },
                }
            }
        };

        Ok(Self::new(code, modifiers))
    }
}

impl fmt::Display for KeyPress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            write!(f, "ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            write!(f, "alt+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) && !matches!(self.code, KeyCode::Char(_)) {
            write!(f, "shift+")?;
        }
        match self.code {
            KeyCode::Up => write!(f, "up"),
            KeyCode::Down => write!(f, "down"),
            KeyCode::Left => write!(f, "left"),
            KeyCode::Right => write!(f, "right"),
            KeyCode::PageUp => write!(f, "pgup"),
            KeyCode::PageDown => write!(f, "pgdown"),
            KeyCode::Home => write!(f, "home"),
            KeyCode::End => write!(f, "end"),
            KeyCode::Enter => write!(f, "enter"),
            KeyCode::Esc => write!(f, "esc"),
            KeyCode::Tab => write!(f, "tab"),
            KeyCode::Backspace => write!(f, "backspace"),
            KeyCode::Delete => write!(f, "delete"),
            KeyCode::Char(' ') => write!(f, "space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::F(n) => write!(f, "f{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Help text for a binding: the short key label and what it does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// Label for the key column, e.g. `"↑/k"`.
    pub key: String,
    /// Description of the action.
    pub desc: String,
}

/// A set of key presses that trigger one action.
#[derive(Debug, Clone, Default)]
pub struct Binding {
    keys: Vec<KeyPress>,
    help: Help,
    disabled: bool,
}

impl Binding {
    /// Creates a binding for the given keys.
    pub fn new<K: Into<KeyPress>>(keys: Vec<K>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the help text.
    pub fn with_help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help {
            key: key.into(),
            desc: desc.into(),
        };
        self
    }

    /// The key presses this binding responds to.
    pub fn keys(&self) -> &[KeyPress] {
        &self.keys
    }

    /// Replaces the key presses.
    pub fn set_keys(&mut self, keys: Vec<KeyPress>) {
        self.keys = keys;
    }

    /// The help text.
    pub fn help(&self) -> &Help {
        &self.help
    }

    /// Whether the binding is active. A binding with no keys is never enabled.
    pub fn enabled(&self) -> bool {
        !self.disabled && !self.keys.is_empty()
    }

    /// Enables or disables the binding.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Reports whether `code`/`modifiers` trigger this binding.
    pub fn matches_key(&self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        self.enabled() && self.keys.iter().any(|k| k.matches(code, modifiers))
    }

    /// Reports whether a bubbletea key message triggers this binding.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.matches_key(msg.key, msg.modifiers)
    }
}

/// An option applied by [`new_binding`].
#[derive(Debug, Clone)]
pub enum BindingOpt {
    /// Adds key presses.
    Keys(Vec<KeyPress>),
    /// Sets the help text.
    Help(Help),
    /// Disables the binding.
    Disabled,
}

/// Builds a binding from a list of options.
pub fn new_binding(opts: Vec<BindingOpt>) -> Binding {
    let mut binding = Binding::default();
    for opt in opts {
        match opt {
            BindingOpt::Keys(keys) => binding.keys.extend(keys),
            BindingOpt::Help(help) => binding.help = help,
            BindingOpt::Disabled => binding.disabled = true,
        }
    }
    binding
}

/// Adds already-built key presses.
pub fn with_keys(keys: Vec<KeyPress>) -> BindingOpt {
    BindingOpt::Keys(keys)
}

/// Adds key presses parsed from strings. Unparseable strings are skipped
/// with a warning.
pub fn with_keys_str(keys: &[&str]) -> BindingOpt {
    let parsed = keys
        .iter()
        .filter_map(|s| match s.parse::<KeyPress>() {
            Ok(k) => Some(k),
            Err(err) => {
                tracing::warn!(%err, "skipping key binding");
                None
            }
        })
        .collect();
    BindingOpt::Keys(parsed)
}

/// Sets the help text.
pub fn with_help(key: impl Into<String>, desc: impl Into<String>) -> BindingOpt {
    BindingOpt::Help(Help {
        key: key.into(),
        desc: desc.into(),
    })
}

/// Disables the binding.
pub fn with_disabled() -> BindingOpt {
    BindingOpt::Disabled
}

/// Reports whether a key message matches any of the given bindings.
pub fn matches(msg: &KeyMsg, bindings: &[&Binding]) -> bool {
    bindings.iter().any(|b| b.matches(msg))
}

/// A collection of bindings that can describe itself for a help view.
pub trait KeyMap {
    /// Bindings shown in the compact help line.
    fn short_help(&self) -> Vec<&Binding>;
    /// Bindings grouped into columns for the expanded help view.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("up", KeyCode::Up, KeyModifiers::NONE)]
    #[test_case("pgdown", KeyCode::PageDown, KeyModifiers::NONE)]
    #[test_case("shift+down", KeyCode::Down, KeyModifiers::SHIFT)]
    #[test_case("ctrl+u", KeyCode::Char('u'), KeyModifiers::CONTROL)]
    #[test_case("<", KeyCode::Char('<'), KeyModifiers::NONE)]
    #[test_case("+", KeyCode::Char('+'), KeyModifiers::NONE)]
    #[test_case("f5", KeyCode::F(5), KeyModifiers::NONE)]
    fn parses_key_strings(input: &str, code: KeyCode, modifiers: KeyModifiers) {
        assert_eq!(input.parse::<KeyPress>(), Ok(KeyPress::new(code, modifiers)));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!("hyper+x".parse::<KeyPress>().is_err());
        assert!("nosuchkey".parse::<KeyPress>().is_err());
    }

    #[test]
    fn character_keys_ignore_shift() {
        let press: KeyPress = KeyCode::Char('>').into();
        assert!(press.matches(KeyCode::Char('>'), KeyModifiers::SHIFT));
        assert!(!press.matches(KeyCode::Char('>'), KeyModifiers::CONTROL));

        let arrow: KeyPress = "shift+up".parse().unwrap();
        assert!(arrow.matches(KeyCode::Up, KeyModifiers::SHIFT));
        assert!(!arrow.matches(KeyCode::Up, KeyModifiers::NONE));
    }

    #[test]
    fn disabled_binding_never_matches() {
        let binding = new_binding(vec![with_keys_str(&["v"]), with_disabled()]);
        assert!(!binding.matches_key(KeyCode::Char('v'), KeyModifiers::NONE));
    }

    #[test]
    fn matches_checks_every_binding() {
        let a = Binding::new(vec![KeyCode::Char('a')]);
        let b = Binding::new(vec![KeyCode::Char('b')]);
        let msg = KeyMsg {
            key: KeyCode::Char('b'),
            modifiers: KeyModifiers::NONE,
        };
        assert!(matches(&msg, &[&a, &b]));
        assert!(!matches(&msg, &[&a]));
    }

    #[test]
    fn display_round_trips_named_keys() {
        let press: KeyPress = "ctrl+pgup".parse().unwrap();
        assert_eq!(press.to_string(), "ctrl+pgup");
    }
}
