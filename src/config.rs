//! Carousel configuration module.
//!
//! Handles loading, validating, and merging `config.toml` files. Stock
//! defaults are the base layer; a user `config.toml` next to the slides
//! overrides just the keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [autoplay]
//! enabled = true            # Start the slideshow on load
//! interval_ms = 5000        # Time between automatic advances
//!
//! [transition]
//! duration_ms = 600         # Slide animation length
//! easing = "ease"           # CSS timing function
//! fallback_unlock_ms = 1000 # Force-unlock if the animation end is never seen
//! restore_delay_ms = 10     # Delay before re-enabling animation after a loop jump
//!
//! [swipe]
//! threshold_px = 50.0       # Minimum horizontal travel for a swipe
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want:
//!
//! ```toml
//! [autoplay]
//! enabled = false
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Longest delay a browser timer honours (`2^31 - 1` ms, about 24.8 days).
pub const MAX_DELAY_MS: u64 = i32::MAX as u64;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Carousel configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    /// Slideshow settings.
    pub autoplay: AutoplayConfig,
    /// Animation timing and the lock safety net.
    pub transition: TransitionConfig,
    /// Touch gesture settings.
    pub swipe: SwipeConfig,
}

impl CarouselConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.autoplay.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "autoplay.interval_ms must be greater than 0".into(),
            ));
        }
        for (key, value) in [
            ("autoplay.interval_ms", self.autoplay.interval_ms),
            ("transition.duration_ms", self.transition.duration_ms),
            ("transition.fallback_unlock_ms", self.transition.fallback_unlock_ms),
            ("transition.restore_delay_ms", self.transition.restore_delay_ms),
        ] {
            if value > MAX_DELAY_MS {
                return Err(ConfigError::Validation(format!(
                    "{key} must be at most {MAX_DELAY_MS}"
                )));
            }
        }
        if self.transition.duration_ms == 0 {
            return Err(ConfigError::Validation(
                "transition.duration_ms must be greater than 0".into(),
            ));
        }
        if self.transition.fallback_unlock_ms <= self.transition.duration_ms {
            return Err(ConfigError::Validation(
                "transition.fallback_unlock_ms must be longer than transition.duration_ms".into(),
            ));
        }
        if self.transition.easing.trim().is_empty() {
            return Err(ConfigError::Validation(
                "transition.easing must not be empty".into(),
            ));
        }
        if !self.swipe.threshold_px.is_finite() || self.swipe.threshold_px <= 0.0 {
            return Err(ConfigError::Validation(
                "swipe.threshold_px must be a positive number".into(),
            ));
        }
        Ok(())
    }
}

/// Slideshow settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutoplayConfig {
    /// Whether the slideshow runs when the carousel is first shown.
    pub enabled: bool,
    /// Milliseconds between automatic advances.
    pub interval_ms: u64,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: 5000,
        }
    }
}

impl AutoplayConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Animation timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitionConfig {
    /// Length of the slide animation in milliseconds.
    pub duration_ms: u64,
    /// CSS timing function used for the animation.
    pub easing: String,
    /// Milliseconds after which a lock is cleared even if the animation end
    /// was never reported. Must exceed `duration_ms`.
    pub fallback_unlock_ms: u64,
    /// Milliseconds between an instant loop jump and re-enabling animation.
    pub restore_delay_ms: u64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: 600,
            easing: "ease".to_string(),
            fallback_unlock_ms: 1000,
            restore_delay_ms: 10,
        }
    }
}

impl TransitionConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    pub fn fallback_unlock(&self) -> Duration {
        Duration::from_millis(self.fallback_unlock_ms)
    }

    pub fn restore_delay(&self) -> Duration {
        Duration::from_millis(self.restore_delay_ms)
    }

    /// The CSS `transition` value for animated moves, e.g. `transform 0.6s ease`.
    pub fn to_css(&self) -> String {
        crate::host::transition_css(self.duration(), &self.easing)
    }
}

/// Touch gesture settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwipeConfig {
    /// Horizontal travel (CSS pixels) a touch must exceed to count as a swipe.
    pub threshold_px: f64,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self { threshold_px: 50.0 }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(CarouselConfig::default()).expect("default config must serialize")
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

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<CarouselConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CarouselConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<CarouselConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Carousel Configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file next to your slide images as config.toml.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Slideshow
# ---------------------------------------------------------------------------
[autoplay]
# Start advancing automatically when the page loads.
enabled = true

# Milliseconds between automatic advances. Any click, key press or swipe
# restarts this countdown.
interval_ms = 5000

# ---------------------------------------------------------------------------
# Animation
# ---------------------------------------------------------------------------
[transition]
# Length of the slide animation in milliseconds.
duration_ms = 600

# CSS timing function for the slide animation.
easing = "ease"

# If the browser never reports the end of an animation (background tabs do
# this), navigation is unlocked after this many milliseconds anyway.
# Must be longer than duration_ms.
fallback_unlock_ms = 1000

# Delay before animation is switched back on after the instant jump that
# closes the loop. Keeps the jump invisible.
restore_delay_ms = 10

# ---------------------------------------------------------------------------
# Touch
# ---------------------------------------------------------------------------
[swipe]
# Minimum horizontal finger travel, in CSS pixels, that counts as a swipe.
threshold_px = 50.0
"##
}
