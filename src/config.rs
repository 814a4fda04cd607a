//! User-tunable behavior for list panels.
//!
//! Settings are plain data loaded from TOML. Missing keys fall back to their
//! defaults, so an empty document is a valid configuration:
//!
//! ```rust
//! use lazylist::config::{GuiConfig, ScrollOffBehavior};
//!
//! let config = GuiConfig::from_toml_str("scroll_off_margin = 4").unwrap();
//! assert_eq!(config.scroll_off_margin, 4);
//! assert_eq!(config.scroll_height, 2);
//! assert_eq!(config.scroll_off_behavior, ScrollOffBehavior::Margin);
//! ```

use serde::{Deserialize, Serialize};

/// How the viewport follows a selection that moves by one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollOffBehavior {
    /// Keep `scroll_off_margin` lines of context between the selection and
    /// the viewport edge.
    #[default]
    Margin,
    /// Only scroll once the selection leaves the viewport, then re-center.
    Jump,
}

/// How a filter string is matched against an item's filter fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Case-sensitive substring containment.
    #[default]
    Substring,
    /// Skim-style fuzzy matching.
    Fuzzy,
}

/// Error raised while loading or validating a [`GuiConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The document was not valid TOML or had the wrong shape.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A field held a value outside its allowed range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },
}

/// Scrolling and filtering settings shared by every list panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    /// Lines moved per mouse-wheel scroll.
    pub scroll_height: usize,
    /// Lines of context kept above and below the selection.
    pub scroll_off_margin: usize,
    /// Margin or jump scrolling.
    pub scroll_off_behavior: ScrollOffBehavior,
    /// Matching used when a list is filtered.
    pub filter_mode: FilterMode,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            scroll_height: 2,
            scroll_off_margin: 2,
            scroll_off_behavior: ScrollOffBehavior::Margin,
            filter_mode: FilterMode::Substring,
        }
    }
}

impl GuiConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scroll_height == 0 {
            return Err(ConfigError::Invalid {
                field: "scroll_height",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
