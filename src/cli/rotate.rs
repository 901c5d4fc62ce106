//! Rotate command
//!
//! Loads the configuration and runs one rotation pass over every valid item.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Args;
use tracing::{error, info, warn};

use crate::archive::TarArchiveWriter;
use crate::config::{Config, ConfigPaths};
use crate::engine::{RotationEngine, RunReport};
use crate::error::RotationResult;

/// Arguments for a rotation run
#[derive(Args, Debug, Clone, Default)]
pub struct RotateArgs {
    /// Configuration file (default: config.json beside the executable)
    #[arg(value_name = "CONFIG", env = "BACKUP_ROTATION_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run as if today were this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub date: Option<NaiveDate>,
}

/// Handle a rotation run
///
/// Fails only when the configuration cannot be loaded; everything that goes
/// wrong per item is logged and recorded in the returned report.
pub fn handle_rotate(args: &RotateArgs) -> RotationResult<RunReport> {
    let paths = ConfigPaths::new(args.config.clone())?;
    let config_file = paths.config_file();

    let config = Config::load(config_file).map_err(|e| {
        error!(path = %config_file.display(), "Failed to load configuration: {}", e);
        e
    })?;

    info!(
        path = %config_file.display(),
        items = config.items.len(),
        "Loaded configuration"
    );
    if config.skipped > 0 {
        warn!(skipped = config.skipped, "Some backup items were invalid and will not run");
    }

    let today = args.date.unwrap_or_else(|| Local::now().date_naive());
    let engine = RotationEngine::new(TarArchiveWriter::new());

    Ok(engine.run(&config.items, today))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_fails() {
        let temp_dir = TempDir::new().unwrap();
        let args = RotateArgs {
            config: Some(temp_dir.path().join("config.json")),
            date: None,
        };
        assert!(handle_rotate(&args).unwrap_err().is_not_found());
    }

    #[test]
    fn test_rotation_with_date_override() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("etc");
        let destination = temp_dir.path().join("out");
        std::fs::create_dir(&source).unwrap();
        std::fs::create_dir(&destination).unwrap();
        std::fs::write(source.join("hosts"), b"127.0.0.1 localhost").unwrap();

        let config_file = temp_dir.path().join("config.json");
        let doc = json!({
            "default": {"compression": "gzip", "monthly_backup_day": 15},
            "backup_items": [
                {"source": source, "destination": destination},
                {"source": temp_dir.path().join("nope"), "destination": destination}
            ]
        });
        std::fs::write(&config_file, doc.to_string()).unwrap();

        let args = RotateArgs {
            config: Some(config_file),
            date: Some(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()),
        };
        let report = handle_rotate(&args).unwrap();

        assert_eq!(report.items.len(), 1);
        assert_eq!(report.created(), 2);
        assert!(destination.join("2024-05-15-DAILY.tar.gz").exists());
        assert!(destination.join("2024-05-15-MONTHLY.tar.gz").exists());
    }
}
