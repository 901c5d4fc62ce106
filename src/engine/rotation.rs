//! Rotation engine
//!
//! Drives one pass over every configured item: create the snapshots that are
//! due, then prune each period back to its retention count. Items are
//! processed strictly in order and a failure in one never stops the next.

use chrono::NaiveDate;
use tracing::{debug, error, info, warn};

use super::report::{ItemReport, RunReport};
use crate::archive::{ArchiveWriter, CreateOutcome};
use crate::models::BackupItem;
use crate::retention::{archive_name, decide_creations, decide_deletions, scan_destination};

/// Runs rotation passes using an archive writer
pub struct RotationEngine<W: ArchiveWriter> {
    writer: W,
}

impl<W: ArchiveWriter> RotationEngine<W> {
    /// Create a new rotation engine
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Process every item for the given run date
    pub fn run(&self, items: &[BackupItem], today: NaiveDate) -> RunReport {
        let mut report = RunReport::default();

        for item in items {
            report.items.push(self.process_item(item, today));
        }

        info!(
            items = report.items.len(),
            created = report.created(),
            skipped = report.skipped(),
            deleted = report.deleted(),
            errors = report.errors(),
            "Rotation finished"
        );

        report
    }

    /// Create due snapshots for one item, then enforce its retention
    pub fn process_item(&self, item: &BackupItem, today: NaiveDate) -> ItemReport {
        let label = item.label();
        let mut report = ItemReport::for_item(item);

        info!(
            item = %label,
            destination = %item.destination.display(),
            compression = %item.compression,
            "Processing backup item"
        );

        self.create_due(item, today, &mut report);
        self.prune(item, &mut report);

        report
    }

    fn create_due(&self, item: &BackupItem, today: NaiveDate, report: &mut ItemReport) {
        let label = item.label();
        let due = decide_creations(item, today);

        if due.is_empty() {
            info!(item = %label, "No backups created");
            return;
        }

        for period in due {
            let name = archive_name(period, today, item.compression);
            let path = item.destination.join(&name);

            match self.writer.create(&item.source, &path, item.compression) {
                Ok(CreateOutcome::Created(archive)) => {
                    if archive.is_complete() {
                        info!(item = %label, %period, archive = %name, "Backup created");
                    } else {
                        warn!(
                            item = %label,
                            %period,
                            archive = %name,
                            failed_entries = archive.failures.len(),
                            "Backup created with entries missing"
                        );
                    }
                    report.entry_failures += archive.failures.len();
                    report.created.push(path);
                }
                Ok(CreateOutcome::Skipped) => {
                    info!(
                        item = %label,
                        %period,
                        archive = %name,
                        "Backup already exists, skipping"
                    );
                    report.skipped.push(path);
                }
                Err(e) => {
                    error!(
                        item = %label,
                        %period,
                        archive = %name,
                        "Failed to create backup: {}",
                        e
                    );
                    report.errors.push(e.to_string());
                }
            }
        }
    }

    fn prune(&self, item: &BackupItem, report: &mut ItemReport) {
        let label = item.label();

        let existing = match scan_destination(&item.destination, item.compression) {
            Ok(existing) => existing,
            Err(e) => {
                error!(item = %label, "Failed to list destination: {}", e);
                report.errors.push(e.to_string());
                return;
            }
        };

        let deletions = decide_deletions(&existing, &item.retention);
        if deletions.is_empty() {
            debug!(item = %label, "Nothing to rotate out");
        }

        for (period, archives) in deletions {
            for archive in archives {
                match self.writer.remove(&archive.path) {
                    Ok(()) => {
                        info!(
                            item = %label,
                            %period,
                            archive = %archive.path.display(),
                            "Deleted old backup"
                        );
                        report.deleted.push(archive.path);
                    }
                    Err(e) => {
                        error!(
                            item = %label,
                            %period,
                            archive = %archive.path.display(),
                            "Failed to delete old backup: {}",
                            e
                        );
                        report.errors.push(e.to_string());
                    }
                }
            }
        }
    }
}
