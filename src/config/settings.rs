//! Rotation settings for backup-rotation
//!
//! Loads the JSON configuration, validates every backup item independently,
//! and merges per-item overrides onto the immutable `Defaults`.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{RotationError, RotationResult};
use crate::models::{BackupItem, Compression, Retention, Schedule};

/// Optional settings shared by the `default` block and each backup item
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawSettings {
    /// Any JSON value; only known codec names select a codec
    #[serde(default)]
    pub compression: Option<Value>,

    /// 0 = Monday .. 6 = Sunday
    #[serde(default)]
    pub weekly_backup_day: Option<u32>,

    #[serde(default)]
    pub monthly_backup_day: Option<u32>,

    #[serde(default)]
    pub yearly_backup_day: Option<u32>,

    #[serde(default)]
    pub daily_backups: Option<u32>,

    #[serde(default)]
    pub weekly_backups: Option<u32>,

    #[serde(default)]
    pub monthly_backups: Option<u32>,

    #[serde(default)]
    pub yearly_backups: Option<u32>,
}

/// One entry of `backup_items` as written in the file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub source: Option<PathBuf>,

    #[serde(default)]
    pub destination: Option<PathBuf>,

    #[serde(flatten)]
    pub overrides: RawSettings,
}

/// Top-level document shape
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    pub default: RawSettings,

    /// Kept untyped so one malformed item cannot reject the whole file
    pub backup_items: Vec<Value>,
}

/// Process-wide base layer merged under every backup item
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Defaults {
    pub compression: Compression,
    pub schedule: Schedule,
    pub retention: Retention,
}

impl Defaults {
    /// Build defaults from the `default` block, filling gaps with built-in values
    pub fn from_raw(raw: &RawSettings) -> RotationResult<Self> {
        let builtin = Self::default();
        let compression = match &raw.compression {
            Some(value) => resolve_compression(value, "default"),
            None => builtin.compression,
        };

        let schedule = Schedule {
            day_of_week: raw.weekly_backup_day.unwrap_or(builtin.schedule.day_of_week),
            day_of_month: raw.monthly_backup_day.unwrap_or(builtin.schedule.day_of_month),
            day_of_year: raw.yearly_backup_day.unwrap_or(builtin.schedule.day_of_year),
        };
        schedule
            .validate()
            .map_err(|e| RotationError::Config(format!("Invalid default settings: {}", e)))?;

        let retention = Retention {
            daily: raw.daily_backups.unwrap_or(builtin.retention.daily),
            weekly: raw.weekly_backups.unwrap_or(builtin.retention.weekly),
            monthly: raw.monthly_backups.unwrap_or(builtin.retention.monthly),
            yearly: raw.yearly_backups.unwrap_or(builtin.retention.yearly),
        };

        Ok(Self {
            compression,
            schedule,
            retention,
        })
    }

    /// Merge an item's overrides onto these defaults
    ///
    /// Pure apart from the warning logged for an unknown compression name.
    /// Does not touch the filesystem; see [`check_directories`].
    pub fn resolve(&self, raw: RawItem) -> RotationResult<BackupItem> {
        let source = raw
            .source
            .ok_or_else(|| RotationError::Validation("missing required field 'source'".into()))?;
        let destination = raw.destination.ok_or_else(|| {
            RotationError::Validation("missing required field 'destination'".into())
        })?;

        let overrides = raw.overrides;
        let compression = match &overrides.compression {
            Some(value) => resolve_compression(value, &source.display().to_string()),
            None => self.compression,
        };

        let schedule = Schedule {
            day_of_week: overrides
                .weekly_backup_day
                .unwrap_or(self.schedule.day_of_week),
            day_of_month: overrides
                .monthly_backup_day
                .unwrap_or(self.schedule.day_of_month),
            day_of_year: overrides
                .yearly_backup_day
                .unwrap_or(self.schedule.day_of_year),
        };
        schedule.validate()?;

        let retention = Retention {
            daily: overrides.daily_backups.unwrap_or(self.retention.daily),
            weekly: overrides.weekly_backups.unwrap_or(self.retention.weekly),
            monthly: overrides.monthly_backups.unwrap_or(self.retention.monthly),
            yearly: overrides.yearly_backups.unwrap_or(self.retention.yearly),
        };

        Ok(BackupItem {
            source,
            destination,
            compression,
            schedule,
            retention,
        })
    }
}

/// Map a configured codec value, substituting lzma for anything unknown
///
/// Non-string values (numbers, booleans, objects) are treated like unknown
/// names rather than rejecting the item or the whole file.
fn resolve_compression(value: &Value, item: &str) -> Compression {
    if let Some(codec) = value.as_str().and_then(Compression::parse) {
        return codec;
    }

    let fallback = Compression::default();
    let shown = match value.as_str() {
        Some(name) => name.to_string(),
        None => value.to_string(),
    };
    warn!(
        item,
        compression = %shown,
        "Unknown compression '{}', using {}",
        shown,
        fallback
    );
    fallback
}

/// Check that an item's source and destination exist and are directories
pub fn check_directories(item: &BackupItem) -> RotationResult<()> {
    for dir in [&item.source, &item.destination] {
        if !dir.is_dir() {
            return Err(RotationError::directory_not_found(dir.display().to_string()));
        }
    }
    Ok(())
}

/// Fully loaded configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Valid items, in file order
    pub items: Vec<BackupItem>,
    /// Number of entries skipped as invalid
    pub skipped: usize,
}

impl Config {
    /// Load configuration from a JSON file
    ///
    /// # Errors
    ///
    /// Fails if the file is missing, is not valid JSON, or has an invalid
    /// `default` block. Invalid backup items are skipped with a warning.
    pub fn load(path: &Path) -> RotationResult<Self> {
        if !path.is_file() {
            return Err(RotationError::config_not_found(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| RotationError::Io(format!("Failed to read config file: {}", e)))?;

        Self::from_json_str(&contents)
    }

    /// Parse configuration from a JSON string
    pub fn from_json_str(contents: &str) -> RotationResult<Self> {
        let raw: RawConfig = serde_json::from_str(contents)
            .map_err(|e| RotationError::Json(format!("Failed to parse config file: {}", e)))?;

        let defaults = Defaults::from_raw(&raw.default)?;
        let mut items = Vec::with_capacity(raw.backup_items.len());
        let mut skipped = 0;

        for (index, value) in raw.backup_items.into_iter().enumerate() {
            match resolve_value(&defaults, value) {
                Ok(item) => {
                    debug!(item = %item.label(), "Loaded backup item");
                    items.push(item);
                }
                Err(e) => {
                    warn!(index, "Skipping invalid backup item #{}: {}", index, e);
                    skipped += 1;
                }
            }
        }

        Ok(Self { items, skipped })
    }
}

fn resolve_value(defaults: &Defaults, value: Value) -> RotationResult<BackupItem> {
    let raw: RawItem = serde_json::from_value(value)
        .map_err(|e| RotationError::Validation(format!("malformed item: {}", e)))?;
    let item = defaults.resolve(raw)?;
    check_directories(&item)?;
    Ok(item)
}
