//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml` files. Configuration
//! is hierarchical: stock defaults are overridden by user config files at any
//! level of the site tree (root → section → subsection).
//!
//! ## Config File Location
//!
//! ```text
//! site/
//! ├── config.toml              # Root config (overrides stock defaults)
//! ├── index.html
//! └── reports/
//!     ├── config.toml          # Section config (overrides root)
//!     └── trip.html
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! default_title = "Заголовок по умолчанию"  # Used when data-page-title is absent
//!
//! [header]
//! mount_id = "header-placeholder"   # Element whose content becomes the header
//! menu_label = "Меню"               # Text of the menu toggle
//! links = [
//!     { href = "index.html", label = "Главная" },
//!     # ...
//! ]
//!
//! [overlay]
//! enabled = true                    # Append the image preview surface
//!
//! [runtime]
//! inject_script = true              # Append the interaction script to pages
//!
//! [processing]
//! max_processes = 4                 # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Config files are sparse and unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in every directory of the site.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Header title for pages without `data-page-title`.
    pub default_title: String,
    /// Header mount point, menu label and navigation links.
    pub header: HeaderConfig,
    /// Image preview surface.
    pub overlay: OverlayConfig,
    /// Interaction script appended to built pages.
    pub runtime: RuntimeConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            default_title: "Заголовок по умолчанию".to_string(),
            header: HeaderConfig::default(),
            overlay: OverlayConfig::default(),
            runtime: RuntimeConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.header.mount_id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "header.mount_id must not be empty".into(),
            ));
        }
        if self.header.links.is_empty() {
            return Err(ConfigError::Validation(
                "header.links must not be empty".into(),
            ));
        }
        if let Some(link) = self.header.links.iter().find(|l| l.href.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "header.links entry '{}' has an empty href",
                link.label
            )));
        }
        Ok(())
    }
}

/// Header settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeaderConfig {
    /// `id` of the element the header is mounted into.
    pub mount_id: String,
    /// Label of the menu toggle button.
    pub menu_label: String,
    /// Dropdown navigation, in display order.
    pub links: Vec<NavLink>,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            mount_id: "header-placeholder".to_string(),
            menu_label: "Меню".to_string(),
            links: default_links(),
        }
    }
}

/// One dropdown destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavLink {
    pub href: String,
    pub label: String,
}

fn default_links() -> Vec<NavLink> {
    [
        ("index.html", "Главная"),
        ("content-1.html", "Краеведческая работа"),
        ("content-2.html", "Методические разработки"),
        ("content-3.html", "Фотоотчёт"),
        ("content-4.html", "Экскурсии"),
    ]
    .into_iter()
    .map(|(href, label)| NavLink {
        href: href.to_string(),
        label: label.to_string(),
    })
    .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverlayConfig {
    pub enabled: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Append the embedded interaction script to every built page.
    pub inject_script: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            inject_script: true,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel page workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values (including arrays such as `header.links`) replace
///   base values entirely.
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

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no config file.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
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
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory, on top of the stock
/// defaults.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# page-enhance configuration
# ==========================
# All settings are optional. Values shown below are the defaults.
#
# Config files can be placed in any directory of the site:
#   site/config.toml          -> root (overrides stock defaults)
#   site/reports/config.toml  -> section (overrides root)
#
# Each level only needs the keys it wants to override.
# Unknown keys will cause an error.

# Header title for pages whose <body> has no data-page-title.
default_title = "Заголовок по умолчанию"

# ---------------------------------------------------------------------------
# Header
# ---------------------------------------------------------------------------
[header]
# id of the element whose content is replaced by the header.
mount_id = "header-placeholder"

# Text of the menu toggle button.
menu_label = "Меню"

# Dropdown destinations, in order. A nested config replaces the whole list.
links = [
    { href = "index.html", label = "Главная" },
    { href = "content-1.html", label = "Краеведческая работа" },
    { href = "content-2.html", label = "Методические разработки" },
    { href = "content-3.html", label = "Фотоотчёт" },
    { href = "content-4.html", label = "Экскурсии" },
]

# ---------------------------------------------------------------------------
# Image overlay
# ---------------------------------------------------------------------------
[overlay]
# Append the full-size image preview surface to every page.
enabled = true

# ---------------------------------------------------------------------------
# Runtime
# ---------------------------------------------------------------------------
[runtime]
# Append the interaction script (accordion, menu, overlay) to built pages.
inject_script = true

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel page workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
