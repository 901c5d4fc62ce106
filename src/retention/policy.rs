//! Retention policy decisions
//!
//! Pure functions: which periods are due today, what an archive is called,
//! which file names belong to which period, and which archives overflow
//! their period's retention count.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::SystemTime;

use chrono::{Datelike, NaiveDate};

use crate::models::{BackupItem, Compression, Period, Retention};

/// An existing archive found in a destination directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFile {
    /// Full path to the archive
    pub path: PathBuf,
    /// Bucket the file name places it in
    pub period: Period,
    /// Filesystem creation time (retention sort key)
    pub created: SystemTime,
}

/// Periods whose snapshot is due on `today`, in evaluation order
///
/// A period with a retention count of zero is never due.
pub fn decide_creations(item: &BackupItem, today: NaiveDate) -> Vec<Period> {
    Period::ALL
        .into_iter()
        .filter(|&period| item.retention.count(period) > 0)
        .filter(|&period| match period {
            Period::Daily => true,
            Period::Weekly => today.weekday().num_days_from_monday() == item.schedule.day_of_week,
            Period::Monthly => today.day() == item.schedule.day_of_month,
            Period::Yearly => today.ordinal() == item.schedule.day_of_year,
        })
        .collect()
}

/// File name for a period's snapshot taken on `date`
///
/// Format: `YYYY-MM-DD-<PERIOD>.tar.<ext>`
pub fn archive_name(period: Period, date: NaiveDate, compression: Compression) -> String {
    format!(
        "{}-{}{}",
        date.format("%Y-%m-%d"),
        period.tag(),
        compression.archive_suffix()
    )
}

/// Classify a file name into a period bucket
///
/// Only names of the exact form `DDDD-DD-DD-<PERIOD>.tar.<ext>` with the
/// given codec's extension match. Archives written with another codec are
/// not counted.
pub fn classify(file_name: &str, compression: Compression) -> Option<Period> {
    let stem = file_name.strip_suffix(&compression.archive_suffix())?;
    let date = stem.get(..11)?.as_bytes();
    let tag = stem.get(11..)?;

    let date_shaped = date.iter().enumerate().all(|(i, b)| match i {
        4 | 7 | 10 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !date_shaped {
        return None;
    }

    Period::from_tag(tag)
}

/// Select, per period, the oldest archives beyond the retention count
///
/// Each bucket is considered on its own; periods with nothing to delete are
/// omitted from the result. Files with equal creation times keep their
/// discovery order.
pub fn decide_deletions(
    existing: &BTreeMap<Period, Vec<ArchiveFile>>,
    retention: &Retention,
) -> BTreeMap<Period, Vec<ArchiveFile>> {
    let mut deletions = BTreeMap::new();

    for (&period, files) in existing {
        let keep = retention.count(period) as usize;
        let overflow = files.len().saturating_sub(keep);
        if overflow == 0 {
            continue;
        }

        let mut oldest_first = files.clone();
        oldest_first.sort_by_key(|f| f.created);
        oldest_first.truncate(overflow);
        deletions.insert(period, oldest_first);
    }

    deletions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Schedule;
    use std::time::Duration;

    fn item(retention: Retention, schedule: Schedule) -> BackupItem {
        BackupItem {
            source: PathBuf::from("/srv/data"),
            destination: PathBuf::from("/backups"),
            compression: Compression::Gzip,
            schedule,
            retention,
        }
    }

    fn all_enabled() -> Retention {
        Retention {
            daily: 1,
            weekly: 1,
            monthly: 1,
            yearly: 1,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn archive(name: &str, period: Period, secs: u64) -> ArchiveFile {
        ArchiveFile {
            path: PathBuf::from(name),
            period,
            created: SystemTime::UNIX_EPOCH + Duration::from_secs(secs),
        }
    }

    #[test]
    fn test_daily_due_every_run() {
        let item = item(all_enabled(), Schedule::new(0, 15, 100).unwrap());
        // 2024-06-05 is a Wednesday, day 5, ordinal 157
        assert_eq!(decide_creations(&item, date(2024, 6, 5)), vec![Period::Daily]);
    }

    #[test]
    fn test_weekday_is_monday_zero() {
        // 2024-01-01 is a Monday
        let monday = item(all_enabled(), Schedule::new(0, 31, 366).unwrap());
        assert!(decide_creations(&monday, date(2024, 1, 1)).contains(&Period::Weekly));

        let sunday = item(all_enabled(), Schedule::new(6, 31, 366).unwrap());
        assert!(decide_creations(&sunday, date(2024, 1, 7)).contains(&Period::Weekly));
        assert!(!decide_creations(&sunday, date(2024, 1, 6)).contains(&Period::Weekly));
    }

    #[test]
    fn test_all_periods_due() {
        // 2024-01-01: Monday, day 1, ordinal 1
        let item = item(all_enabled(), Schedule::new(0, 1, 1).unwrap());
        assert_eq!(decide_creations(&item, date(2024, 1, 1)), Period::ALL.to_vec());
    }

    #[test]
    fn test_zero_retention_disables_creation() {
        let retention = Retention {
            daily: 0,
            weekly: 0,
            monthly: 0,
            yearly: 0,
        };
        let item = item(retention, Schedule::new(0, 1, 1).unwrap());
        assert!(decide_creations(&item, date(2024, 1, 1)).is_empty());
    }

    #[test]
    fn test_day_31_never_fires_in_30_day_month() {
        let item = item(all_enabled(), Schedule::new(6, 31, 366).unwrap());
        let mut day = date(2024, 4, 1);
        while day.month() == 4 {
            assert!(!decide_creations(&item, day).contains(&Period::Monthly));
            day = day.succ_opt().unwrap();
        }
        assert!(decide_creations(&item, date(2024, 5, 31)).contains(&Period::Monthly));
    }

    #[test]
    fn test_off_by_one_days_do_not_fire() {
        let item = item(all_enabled(), Schedule::new(2, 15, 100).unwrap());
        let due = decide_creations(&item, date(2024, 3, 14));
        assert!(!due.contains(&Period::Monthly));
        let due = decide_creations(&item, date(2024, 3, 16));
        assert!(!due.contains(&Period::Monthly));
        // ordinal 100 in a leap year is April 9th
        assert!(decide_creations(&item, date(2024, 4, 9)).contains(&Period::Yearly));
        assert!(!decide_creations(&item, date(2024, 4, 10)).contains(&Period::Yearly));
    }

    #[test]
    fn test_day_366_only_in_leap_years() {
        let item = item(all_enabled(), Schedule::new(0, 1, 366).unwrap());
        assert!(decide_creations(&item, date(2024, 12, 31)).contains(&Period::Yearly));
        assert!(!decide_creations(&item, date(2023, 12, 31)).contains(&Period::Yearly));
    }

    #[test]
    fn test_archive_name_format() {
        let name = archive_name(Period::Daily, date(2024, 1, 1), Compression::Gzip);
        assert_eq!(name, "2024-01-01-DAILY.tar.gz");
        let name = archive_name(Period::Yearly, date(2025, 12, 31), Compression::Lzma);
        assert_eq!(name, "2025-12-31-YEARLY.tar.xz");
    }

    #[test]
    fn test_archive_name_classifies_as_own_period() {
        let day = date(2024, 2, 29);
        for compression in [Compression::Gzip, Compression::Bzip2, Compression::Lzma] {
            for period in Period::ALL {
                let name = archive_name(period, day, compression);
                assert_eq!(classify(&name, compression), Some(period), "{}", name);
            }
        }
    }

    #[test]
    fn test_classify_rejects_near_misses() {
        let gz = Compression::Gzip;
        assert_eq!(classify("2024-01-01-DAILY.tar.gz", gz), Some(Period::Daily));
        assert_eq!(classify("2024-01-01-DAILY.tar.xz", gz), None);
        assert_eq!(classify("2024-01-01-daily.tar.gz", gz), None);
        assert_eq!(classify("2024-1-01-DAILY.tar.gz", gz), None);
        assert_eq!(classify("x2024-01-01-DAILY.tar.gz", gz), None);
        assert_eq!(classify("2024-01-01-DAILYX.tar.gz", gz), None);
        assert_eq!(classify("2024-01-01-DAILY.tar.gz.partial", gz), None);
        assert_eq!(classify("2024_01_01-DAILY.tar.gz", gz), None);
        assert_eq!(classify("notes.txt", gz), None);
        // digits only; the date itself is not validated
        assert_eq!(classify("9999-99-99-WEEKLY.tar.gz", gz), Some(Period::Weekly));
    }

    #[test]
    fn test_compression_change_orphans_old_archives() {
        // Archives from a previous codec are invisible to retention
        assert_eq!(classify("2024-01-01-DAILY.tar.gz", Compression::Lzma), None);
    }

    #[test]
    fn test_deletes_exactly_overflow_oldest_first() {
        for n in 0..6u64 {
            for r in 0..6u32 {
                let files: Vec<_> = (0..n)
                    .rev()
                    .map(|i| archive(&format!("d{}", i), Period::Daily, i * 10))
                    .collect();
                let existing = BTreeMap::from([(Period::Daily, files)]);
                let retention = Retention {
                    daily: r,
                    ..all_enabled()
                };

                let deletions = decide_deletions(&existing, &retention);
                let expected = (n as usize).saturating_sub(r as usize);
                let selected = deletions.get(&Period::Daily).map_or(0, Vec::len);
                assert_eq!(selected, expected, "n={} r={}", n, r);

                if let Some(selected) = deletions.get(&Period::Daily) {
                    let names: Vec<_> = selected.iter().map(|f| f.path.clone()).collect();
                    let oldest: Vec<_> = (0..expected as u64)
                        .map(|i| PathBuf::from(format!("d{}", i)))
                        .collect();
                    assert_eq!(names, oldest);
                }
            }
        }
    }

    #[test]
    fn test_periods_are_independent() {
        let existing = BTreeMap::from([
            (
                Period::Daily,
                vec![
                    archive("a", Period::Daily, 1),
                    archive("b", Period::Daily, 2),
                ],
            ),
            (
                Period::Weekly,
                vec![
                    archive("w1", Period::Weekly, 0),
                    archive("w2", Period::Weekly, 5),
                ],
            ),
        ]);
        let retention = Retention {
            daily: 1,
            weekly: 2,
            monthly: 1,
            yearly: 1,
        };

        let deletions = decide_deletions(&existing, &retention);
        assert_eq!(deletions.len(), 1);
        assert_eq!(deletions[&Period::Daily], vec![archive("a", Period::Daily, 1)]);
        assert!(!deletions.contains_key(&Period::Weekly));
    }

    #[test]
    fn test_lowered_zero_retention_deletes_everything() {
        let existing = BTreeMap::from([(
            Period::Yearly,
            vec![
                archive("y1", Period::Yearly, 1),
                archive("y2", Period::Yearly, 2),
            ],
        )]);
        let retention = Retention {
            yearly: 0,
            ..all_enabled()
        };
        assert_eq!(decide_deletions(&existing, &retention)[&Period::Yearly].len(), 2);
    }

    #[test]
    fn test_deletion_is_idempotent() {
        let files = vec![
            archive("day-3", Period::Daily, 1),
            archive("day-2", Period::Daily, 2),
            archive("day-1", Period::Daily, 3),
            archive("today", Period::Daily, 4),
        ];
        let retention = Retention {
            daily: 3,
            ..all_enabled()
        };
        let mut existing = BTreeMap::from([(Period::Daily, files)]);

        let first = decide_deletions(&existing, &retention);
        assert_eq!(first[&Period::Daily], vec![archive("day-3", Period::Daily, 1)]);

        existing
            .get_mut(&Period::Daily)
            .unwrap()
            .retain(|f| f.path != PathBuf::from("day-3"));
        assert!(decide_deletions(&existing, &retention).is_empty());
    }

    #[test]
    fn test_equal_timestamps_keep_discovery_order() {
        let files = vec![
            archive("first", Period::Monthly, 7),
            archive("second", Period::Monthly, 7),
            archive("third", Period::Monthly, 7),
        ];
        let existing = BTreeMap::from([(Period::Monthly, files)]);
        let retention = Retention {
            monthly: 1,
            ..all_enabled()
        };
        let selected: Vec<_> = decide_deletions(&existing, &retention)[&Period::Monthly]
            .iter()
            .map(|f| f.path.clone())
            .collect();
        assert_eq!(selected, vec![PathBuf::from("first"), PathBuf::from("second")]);
    }
}
