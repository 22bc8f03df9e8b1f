//! Configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a user file overrides only the keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! default_language = "en"          # en | fi
//! # default_theme = "dark"         # light | dark; omit to follow the system
//! page_url = "http://localhost/"   # Address copied by the share button
//!
//! [gallery]
//! entrance_delay_ms = 10           # Delay before the modal becomes visible
//! swipe_min_distance = 50.0        # Horizontal travel (px) that counts as a swipe
//! swipe_axis_ratio = 2.0           # |dx| must exceed ratio * |dy|
//! swipe_cooldown_ms = 300          # Clicks ignored this long after a swipe
//! copy_feedback_ms = 2000          # How long the "copied" checkmark shows
//!
//! [reveal]
//! threshold = 0.1                  # Visible area fraction that triggers a reveal
//! bottom_inset_px = 50.0           # Viewport bottom edge pulled up by this much
//! stagger_ms = 120                 # Delay between siblings revealed together
//! marker = "animate-on-scroll"     # Class marking reveal-eligible elements
//! visible_class = "is-visible"     # Class applied on reveal
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::{Language, Theme};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Top-level configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FolioConfig {
    /// Page-wide settings (language, theme, canonical address).
    pub site: SiteSettings,
    /// Gallery viewer timings and gesture thresholds.
    pub gallery: GalleryConfig,
    /// Scroll reveal watch and stagger settings.
    pub reveal: RevealConfig,
}

impl FolioConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Comparisons are written so that NaN fails every check.
        let threshold = self.reveal.threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::Validation(
                "reveal.threshold must be in (0, 1]".into(),
            ));
        }
        let inset = self.reveal.bottom_inset_px;
        if !(inset >= 0.0 && inset.is_finite()) {
            return Err(ConfigError::Validation(
                "reveal.bottom_inset_px must be a finite, non-negative number".into(),
            ));
        }
        let marker = self.reveal.marker.trim();
        if marker.is_empty() || self.reveal.visible_class.trim().is_empty() {
            return Err(ConfigError::Validation(
                "reveal.marker and reveal.visible_class must not be empty".into(),
            ));
        }
        let min_distance = self.gallery.swipe_min_distance;
        if !(min_distance > 0.0 && min_distance.is_finite()) {
            return Err(ConfigError::Validation(
                "gallery.swipe_min_distance must be a finite, positive number".into(),
            ));
        }
        let ratio = self.gallery.swipe_axis_ratio;
        if !(ratio >= 1.0 && ratio.is_finite()) {
            return Err(ConfigError::Validation(
                "gallery.swipe_axis_ratio must be a finite number of at least 1.0".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSettings {
    pub default_language: Language,
    /// When absent the system color-scheme preference decides.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_theme: Option<Theme>,
    pub page_url: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            default_language: Language::En,
            default_theme: None,
            page_url: "http://localhost/".to_string(),
        }
    }
}

/// Gallery viewer timings and gesture thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    pub entrance_delay_ms: u64,
    pub swipe_min_distance: f64,
    pub swipe_axis_ratio: f64,
    pub swipe_cooldown_ms: u64,
    pub copy_feedback_ms: u64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            entrance_delay_ms: 10,
            swipe_min_distance: 50.0,
            swipe_axis_ratio: 2.0,
            swipe_cooldown_ms: 300,
            copy_feedback_ms: 2000,
        }
    }
}

impl GalleryConfig {
    pub fn entrance_delay(&self) -> Duration {
        Duration::from_millis(self.entrance_delay_ms)
    }

    pub fn swipe_cooldown(&self) -> Duration {
        Duration::from_millis(self.swipe_cooldown_ms)
    }

    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }
}

/// Scroll reveal settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    pub threshold: f64,
    pub bottom_inset_px: f64,
    pub stagger_ms: u64,
    pub marker: String,
    pub visible_class: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            bottom_inset_px: 50.0,
            stagger_ms: 120,
            marker: "animate-on-scroll".to_string(),
            visible_class: "is-visible".to_string(),
        }
    }
}

impl RevealConfig {
    /// Delay for the `k`-th element of a reveal group.
    pub fn stagger_delay(&self, k: usize) -> Duration {
        Duration::from_millis(self.stagger_ms.saturating_mul(k as u64))
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(FolioConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<FolioConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: FolioConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is absent.
pub fn load_config(path: &Path) -> Result<FolioConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Folio Configuration
# ===================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
# Initial language: "en" or "fi".
default_language = "en"

# Initial theme: "light" or "dark". Omit to follow the system preference.
# default_theme = "dark"

# Address written to the clipboard by the gallery share button.
page_url = "http://localhost/"

# ---------------------------------------------------------------------------
# Gallery viewer
# ---------------------------------------------------------------------------
[gallery]
# Delay (ms) between opening a project and starting the entrance transition.
entrance_delay_ms = 10

# Minimum horizontal finger travel (logical px) recognized as a swipe.
swipe_min_distance = 50.0

# A gesture is horizontal only if |dx| > swipe_axis_ratio * |dy|.
swipe_axis_ratio = 2.0

# Clicks are ignored for this long (ms) after a swipe completes.
swipe_cooldown_ms = 300

# How long (ms) the share button shows its "copied" state.
copy_feedback_ms = 2000

# ---------------------------------------------------------------------------
# Scroll reveal
# ---------------------------------------------------------------------------
[reveal]
# Fraction of an element's area that must be on screen to reveal it.
threshold = 0.1

# The viewport's bottom edge is pulled up by this many logical px, so
# reveals start just before an element is fully on screen.
bottom_inset_px = 50.0

# Delay (ms) between consecutive elements revealed in the same container.
stagger_ms = 120

# Class that marks reveal-eligible elements, and the class added on reveal.
marker = "animate-on-scroll"
visible_class = "is-visible"
"##
}
