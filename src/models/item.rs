//! Resolved backup item model
//!
//! A `BackupItem` is one source -> destination mapping after per-item overrides
//! have been merged onto the defaults. Every field is populated.

use std::path::PathBuf;

use super::compression::Compression;
use super::period::Period;
use crate::error::{RotationError, RotationResult};

/// Calendar days on which the periodic snapshots are taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Day of week for weekly snapshots (0 = Monday .. 6 = Sunday)
    pub day_of_week: u32,
    /// Day of month for monthly snapshots (1-based)
    pub day_of_month: u32,
    /// Day of year for yearly snapshots (1-based)
    pub day_of_year: u32,
}

impl Schedule {
    /// Create a schedule, checking every day against its calendar range
    pub fn new(day_of_week: u32, day_of_month: u32, day_of_year: u32) -> RotationResult<Self> {
        let schedule = Self {
            day_of_week,
            day_of_month,
            day_of_year,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Validate the schedule
    pub fn validate(&self) -> RotationResult<()> {
        if self.day_of_week > 6 {
            return Err(RotationError::Validation(format!(
                "weekly_backup_day must be between 0 and 6, got {}",
                self.day_of_week
            )));
        }
        if !(1..=31).contains(&self.day_of_month) {
            return Err(RotationError::Validation(format!(
                "monthly_backup_day must be between 1 and 31, got {}",
                self.day_of_month
            )));
        }
        if !(1..=366).contains(&self.day_of_year) {
            return Err(RotationError::Validation(format!(
                "yearly_backup_day must be between 1 and 366, got {}",
                self.day_of_year
            )));
        }
        Ok(())
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            day_of_week: 6,
            day_of_month: 1,
            day_of_year: 1,
        }
    }
}

/// Maximum number of archives kept per period (0 disables creation)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retention {
    pub daily: u32,
    pub weekly: u32,
    pub monthly: u32,
    pub yearly: u32,
}

impl Retention {
    /// Get the retention count for a period
    pub fn count(&self, period: Period) -> u32 {
        match period {
            Period::Daily => self.daily,
            Period::Weekly => self.weekly,
            Period::Monthly => self.monthly,
            Period::Yearly => self.yearly,
        }
    }
}

impl Default for Retention {
    fn default() -> Self {
        Self {
            daily: 7,
            weekly: 4,
            monthly: 12,
            yearly: 2,
        }
    }
}

/// One fully-resolved rotation unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupItem {
    /// Directory to archive
    pub source: PathBuf,
    /// Directory where archives are written and scanned
    pub destination: PathBuf,
    /// Archive codec
    pub compression: Compression,
    /// Snapshot days
    pub schedule: Schedule,
    /// Per-period retention counts
    pub retention: Retention,
}

impl BackupItem {
    /// Name used in log events
    pub fn label(&self) -> String {
        self.source.display().to_string()
    }
}
