//! Build configuration.
//!
//! Handles loading, validating, and merging `content-nav.toml`. The file is
//! optional and sparse: stock defaults are serialized to a TOML table, the
//! user file is merged on top key-by-key, and the merged table is
//! deserialized and validated.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── content-nav.toml     # Build config (optional)
//! ├── ordering.json5       # Sidecar inputs, see `inputs`
//! ├── home.json5
//! ├── site.json5
//! ├── vanity.json5
//! └── articles/            # Category tree
//! ```
//!
//! This file only configures the build tool itself. The content-facing
//! configuration (ordering, homepage, redirects, site metadata) lives in the
//! JSON5 sidecar files loaded by [`crate::inputs`].
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the build config file within the content root.
pub const CONFIG_FILENAME: &str = "content-nav.toml";

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

/// Build configuration loaded from `content-nav.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Directory under the content root that holds the category tree.
    pub articles_dir: String,
    /// Treat warnings as build-blocking.
    pub deny_warnings: bool,
    /// Directory discovery settings.
    pub scan: ScanConfig,
    /// Sidecar file names, relative to the content root.
    pub files: FilesConfig,
    /// Parallel extraction settings.
    pub processing: ProcessingConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            articles_dir: "articles".to_string(),
            deny_warnings: false,
            scan: ScanConfig::default(),
            files: FilesConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl BuildConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.articles_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "articles_dir must not be empty".into(),
            ));
        }
        if Path::new(&self.articles_dir).is_absolute() {
            return Err(ConfigError::Validation(
                "articles_dir must be relative to the content root".into(),
            ));
        }
        let files = [
            ("files.ordering", &self.files.ordering),
            ("files.home", &self.files.home),
            ("files.site", &self.files.site),
            ("files.vanity", &self.files.vanity),
        ];
        for (key, value) in files {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Directory discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Directory names that never count as content nodes (asset folders).
    /// Names starting with `.` or `_` are always skipped.
    pub ignore_dirs: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignore_dirs: ["assets", "images", "img", "media"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Sidecar JSON5 file names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilesConfig {
    pub ordering: String,
    pub home: String,
    pub site: String,
    pub vanity: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            ordering: "ordering.json5".to_string(),
            home: "home.json5".to_string(),
            site: "site.json5".to_string(),
            vanity: "vanity.json5".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel extraction workers.
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
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(BuildConfig::default())?)
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

/// Load `content-nav.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load the build config from the content root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<BuildConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: BuildConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `content-nav.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# content-nav build configuration
# ================================
# All settings are optional. Values shown below are the defaults.
# Place this file in the content root as content-nav.toml.
# Unknown keys will cause an error.

# Directory under the content root holding <category>/<topic>/<article>/README.md
articles_dir = "articles"

# Exit non-zero on warnings as well as errors.
deny_warnings = false

# ---------------------------------------------------------------------------
# Discovery
# ---------------------------------------------------------------------------
[scan]
# Directory names that are never content nodes (asset folders next to an
# article). Names starting with "." or "_" are always skipped.
ignore_dirs = ["assets", "images", "img", "media"]

# ---------------------------------------------------------------------------
# Sidecar files (JSON5), relative to the content root
# ---------------------------------------------------------------------------
[files]
ordering = "ordering.json5"
home = "home.json5"
site = "site.json5"
vanity = "vanity.json5"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for markdown extraction.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
