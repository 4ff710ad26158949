//! Preview configuration.
//!
//! Handles loading, validating, and merging `e2e-preview.toml`. Stock
//! defaults are overridden by whatever the user file sets; the CLI's
//! `--base` flag overrides `base` on top of that.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! base = "data/waymo-e2e"   # Shard file or directory searched for *.tfrecord*
//! max_records = 500         # Records scanned per run
//! max_frames = 300          # Frames buffered for browsing/export
//!
//! [mosaic]
//! tile = [2, 3]             # Grid as [rows, cols], at most 64 cells
//! pad = 4                   # Black border in pixels
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Upper bound on `mosaic.tile` rows times cols.
pub const MAX_TILE_CELLS: u32 = 64;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Run configuration loaded from `e2e-preview.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    /// Shard file, or directory searched recursively for shards.
    pub base: String,
    /// Maximum number of records read from the shard.
    pub max_records: usize,
    /// Maximum number of frames kept for display.
    pub max_frames: usize,
    /// Mosaic layout.
    pub mosaic: MosaicConfig,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            base: "data/waymo-e2e".to_string(),
            max_records: 500,
            max_frames: 300,
            mosaic: MosaicConfig::default(),
        }
    }
}

impl PreviewConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_records == 0 {
            return Err(ConfigError::Validation(
                "max_records must be at least 1".into(),
            ));
        }
        if self.max_frames == 0 {
            return Err(ConfigError::Validation(
                "max_frames must be at least 1".into(),
            ));
        }
        let [rows, cols] = self.mosaic.tile;
        if rows == 0 || cols == 0 {
            return Err(ConfigError::Validation(
                "mosaic.tile rows and cols must be non-zero".into(),
            ));
        }
        if rows
            .checked_mul(cols)
            .is_none_or(|cells| cells > MAX_TILE_CELLS)
        {
            return Err(ConfigError::Validation(format!(
                "mosaic.tile must have at most {MAX_TILE_CELLS} cells, got {rows}x{cols}"
            )));
        }
        Ok(())
    }
}

/// Mosaic grid settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MosaicConfig {
    /// Grid shape as `[rows, cols]`.
    pub tile: [u32; 2],
    /// Black border around the whole mosaic, in pixels.
    pub pad: u32,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            tile: [2, 3],
            pad: 4,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(PreviewConfig::default())?)
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

/// Load a config file as a raw TOML value. `Ok(None)` if it doesn't exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `path`, merged over stock defaults and validated.
pub fn load_config(path: &Path) -> Result<PreviewConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match load_raw_config(path)? {
        Some(overlay) => merge_toml(base, overlay),
        None => {
            log::debug!("no config at {}, using defaults", path.display());
            base
        }
    };
    let config: PreviewConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock config file.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# e2e-preview Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# Shard file, or a directory searched recursively for *.tfrecord* files.
# Within a directory, training shards are preferred, then validation, then test.
base = "data/waymo-e2e"

# Records read from the shard, including records without images.
max_records = 500

# Frames kept after sorting by (segment, timestamp).
max_frames = 300

# ---------------------------------------------------------------------------
# Mosaic layout
# ---------------------------------------------------------------------------
[mosaic]
# Grid as [rows, cols], at most 64 cells. Cameras beyond rows * cols are
# not drawn.
tile = [2, 3]

# Black border around the mosaic, in pixels.
pad = 4
"##
}
