//! Page configuration.
//!
//! Every knob the controllers read (thresholds, durations, selectors, the nav
//! breakpoint) lives in [`PageConfig`]. The stock defaults match the markup the
//! site ships with, so most pages never configure anything.
//!
//! ## Config Source
//!
//! A page may embed a sparse TOML document in an inline script element:
//!
//! ```html
//! <script type="application/toml" data-page-config>
//! [partials]
//! base = "/partials/"
//!
//! [counters]
//! duration_ms = 900
//! </script>
//! ```
//!
//! The overrides are merged on top of the stock defaults, unknown keys are
//! rejected, and the result is validated. A page without the element gets the
//! defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! [partials]
//! base = "partials/"                  # Prefix for header.html / footer.html
//! no_store = true                     # Bypass the HTTP cache when fetching
//! current_link_color = "var(--accent)"
//! nav_links = "#primary-nav a"        # Links considered for highlighting
//!
//! [reveal]
//! threshold = 0.12
//! class = "is-visible"
//!
//! [counters]
//! threshold = 0.4
//! duration_ms = 1200
//!
//! [gallery]
//! name = "kah"                        # Value of data-gallery
//!
//! [nav]
//! breakpoint = 640                    # Resize above this width closes the menu
//!
//! [boot]
//! on_partial_error = "continue"       # or "abort"
//! ```

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration for every controller on the page.
///
/// All fields have defaults; a config document only needs the values it wants
/// to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    pub partials: PartialsConfig,
    pub reveal: RevealConfig,
    pub counters: CountersConfig,
    pub gallery: GalleryConfig,
    pub nav: NavConfig,
    pub boot: BootConfig,
}

impl PageConfig {
    /// Validate values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(ConfigError::Validation(
                "reveal.threshold must be between 0 and 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.counters.threshold) {
            return Err(ConfigError::Validation(
                "counters.threshold must be between 0 and 1".into(),
            ));
        }
        if self.counters.duration_ms == 0 {
            return Err(ConfigError::Validation(
                "counters.duration_ms must be greater than 0".into(),
            ));
        }
        if self.partials.base.is_empty() {
            return Err(ConfigError::Validation(
                "partials.base must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Header/footer fragment loading.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialsConfig {
    /// Prefix joined with `header.html` / `footer.html`. Relative values are
    /// resolved against the document base URI.
    pub base: String,
    /// Fetch with `cache: "no-store"`.
    pub no_store: bool,
    /// CSS color written to the current nav link's `style.color`.
    pub current_link_color: String,
    /// Selector for the links compared against the page path.
    pub nav_links: String,
}

impl Default for PartialsConfig {
    fn default() -> Self {
        Self {
            base: "partials/".to_string(),
            no_store: true,
            current_link_color: "var(--accent)".to_string(),
            nav_links: "#primary-nav a".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Fraction of the element that must be visible before it is revealed.
    pub threshold: f64,
    /// Class added to revealed elements.
    pub class: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.12,
            class: "is-visible".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CountersConfig {
    pub threshold: f64,
    /// Count-up duration in milliseconds.
    pub duration_ms: u32,
}

impl Default for CountersConfig {
    fn default() -> Self {
        Self {
            threshold: 0.4,
            duration_ms: 1200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Value of the gallery container's `data-gallery` attribute.
    pub name: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            name: "kah".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavConfig {
    /// Viewport width (CSS px) above which the mobile menu is forced closed.
    pub breakpoint: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self { breakpoint: 640.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BootConfig {
    pub on_partial_error: PartialErrorPolicy,
}

/// What the bootstrapper does when loading the header/footer fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartialErrorPolicy {
    /// Log the failure and initialize the remaining controllers anyway.
    #[default]
    Continue,
    /// Log the failure and stop initialization.
    Abort,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`, parsed from
/// [`stock_config_toml`].
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::from_str(stock_config_toml())?)
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

/// Parse a sparse TOML document, merge it over the stock defaults and validate.
///
/// Blank input (an empty config element) yields the defaults.
pub fn parse_config(source: &str) -> Result<PageConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = if source.trim().is_empty() {
        base
    } else {
        let overlay: toml::Value = toml::from_str(source)?;
        merge_toml(base, overlay)
    };
    let config: PageConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Resolve the effective config from an optional embedded document.
///
/// A broken document is logged and replaced by the stock defaults: a typo in
/// page config must not take the whole page's interactivity down with it.
pub fn load_config(source: Option<&str>) -> PageConfig {
    let Some(source) = source else {
        return PageConfig::default();
    };
    match parse_config(source) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("ignoring page config: {e}");
            PageConfig::default()
        }
    }
}

/// Returns a fully-commented stock config document with all keys.
pub fn stock_config_toml() -> &'static str {
    r##"# Page interactivity configuration
# ================================
# Embed in a page as:
#   <script type="application/toml" data-page-config> ... </script>
# All settings are optional; values shown are the defaults.
# Unknown keys cause the whole document to be ignored.

# ---------------------------------------------------------------------------
# Shared header/footer fragments
# ---------------------------------------------------------------------------
[partials]
# Prefix for header.html and footer.html. Relative to the document base URI
# unless it starts with "/".
base = "partials/"

# Bypass the HTTP cache when fetching fragments.
no_store = true

# Color written to the nav link matching the current page.
current_link_color = "var(--accent)"

# Links compared against the current page path.
nav_links = "#primary-nav a"

# ---------------------------------------------------------------------------
# Scroll reveal ([data-reveal])
# ---------------------------------------------------------------------------
[reveal]
# Fraction of the element that must be visible (0-1).
threshold = 0.12

# Class added once the element has been seen.
class = "is-visible"

# ---------------------------------------------------------------------------
# Counters ([data-count])
# ---------------------------------------------------------------------------
[counters]
threshold = 0.4

# Count-up duration in milliseconds.
duration_ms = 1200

# ---------------------------------------------------------------------------
# Gallery lightbox
# ---------------------------------------------------------------------------
[gallery]
# Value of the container's data-gallery attribute.
name = "kah"

# ---------------------------------------------------------------------------
# Mobile navigation
# ---------------------------------------------------------------------------
[nav]
# Resizing wider than this (CSS px) closes the menu.
breakpoint = 640

# ---------------------------------------------------------------------------
# Startup
# ---------------------------------------------------------------------------
[boot]
# "continue": initialize the other controllers even if fragments fail to load.
# "abort":    stop after a fragment failure.
on_partial_error = "continue"
"##
}
