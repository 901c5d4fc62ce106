//! Destination directory listing
//!
//! Every run re-derives the set of existing archives from the filesystem.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::warn;

use super::policy::{classify, ArchiveFile};
use crate::error::{RotationError, RotationResult};
use crate::models::{Compression, Period};

/// List a destination directory and bucket its archives by period
///
/// Entries that are not regular files or do not match the archive naming
/// pattern for `compression` are ignored. Files within a bucket are kept in
/// directory listing order.
pub fn scan_destination(
    dir: &Path,
    compression: Compression,
) -> RotationResult<BTreeMap<Period, Vec<ArchiveFile>>> {
    let mut buckets: BTreeMap<Period, Vec<ArchiveFile>> = BTreeMap::new();

    let entries = fs::read_dir(dir).map_err(|e| {
        RotationError::Io(format!(
            "Failed to read destination {}: {}",
            dir.display(),
            e
        ))
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| {
            RotationError::Io(format!("Failed to read directory entry: {}", e))
        })?;

        let file_name = entry.file_name();
        let Some(period) = file_name.to_str().and_then(|n| classify(n, compression)) else {
            continue;
        };

        let path = entry.path();
        let metadata = match entry.metadata() {
            Ok(m) if m.is_file() => m,
            Ok(_) => continue,
            Err(e) => {
                warn!(path = %path.display(), "Cannot stat archive, ignoring: {}", e);
                continue;
            }
        };

        // Birth time is not available everywhere
        let created = match metadata.created().or_else(|_| metadata.modified()) {
            Ok(t) => t,
            Err(e) => {
                warn!(path = %path.display(), "No timestamp for archive, ignoring: {}", e);
                continue;
            }
        };

        buckets.entry(period).or_default().push(ArchiveFile {
            path,
            period,
            created,
        });
    }

    Ok(buckets)
}
