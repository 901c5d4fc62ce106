//! Retention policy for backup-rotation
//!
//! Decides which periodic snapshots are due and which old archives must go.
//!
//! # Retention Policy
//!
//! Each item keeps up to N archives per period:
//! - DAILY: created on every run
//! - WEEKLY: created when the weekday matches the schedule (0 = Monday)
//! - MONTHLY: created when the day of month matches
//! - YEARLY: created when the day of year matches
//!
//! A count of zero disables creation for that period. Once a period holds
//! more archives than its count, the oldest (by filesystem creation time)
//! are deleted.
//!
//! # Example
//!
//! ```rust,ignore
//! use backup_rotation::retention::{decide_creations, decide_deletions, scan_destination};
//!
//! let due = decide_creations(&item, today);
//! let existing = scan_destination(&item.destination, item.compression)?;
//! let doomed = decide_deletions(&existing, &item.retention);
//! ```

mod policy;
mod scan;

pub use policy::{archive_name, classify, decide_creations, decide_deletions, ArchiveFile};
pub use scan::scan_destination;
