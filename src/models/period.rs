//! Retention period representation
//!
//! Every archive belongs to exactly one period bucket. Buckets are independent:
//! each has its own cadence and its own maximum archive count.

use std::fmt;

/// A retention bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Period {
    /// Taken on every run
    Daily,
    /// Taken on the scheduled day of the week
    Weekly,
    /// Taken on the scheduled day of the month
    Monthly,
    /// Taken on the scheduled day of the year
    Yearly,
}

impl Period {
    /// All periods, in the order they are evaluated during a run
    pub const ALL: [Period; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Yearly];

    /// The tag embedded in archive file names (e.g. "DAILY")
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }

    /// Look up a period by its exact file name tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.tag() == tag)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
