//! Per-item and per-run outcome records

use std::path::PathBuf;

use crate::models::BackupItem;

/// What happened to one backup item during a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemReport {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Archives written this run
    pub created: Vec<PathBuf>,
    /// Archives that already existed
    pub skipped: Vec<PathBuf>,
    /// Archives removed by retention
    pub deleted: Vec<PathBuf>,
    /// Source entries left out of new archives
    pub entry_failures: usize,
    /// Errors that cut a step short (creation, listing, deletion)
    pub errors: Vec<String>,
}

impl ItemReport {
    /// Start an empty report for an item
    pub fn for_item(item: &BackupItem) -> Self {
        Self {
            source: item.source.clone(),
            destination: item.destination.clone(),
            ..Default::default()
        }
    }

    /// Check if every step of the item succeeded
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.entry_failures == 0
    }
}

/// Outcome of a whole rotation pass, items in configured order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub items: Vec<ItemReport>,
}

impl RunReport {
    pub fn created(&self) -> usize {
        self.items.iter().map(|i| i.created.len()).sum()
    }

    pub fn skipped(&self) -> usize {
        self.items.iter().map(|i| i.skipped.len()).sum()
    }

    pub fn deleted(&self) -> usize {
        self.items.iter().map(|i| i.deleted.len()).sum()
    }

    /// Step errors plus unarchived entries
    pub fn errors(&self) -> usize {
        self.items
            .iter()
            .map(|i| i.errors.len() + i.entry_failures)
            .sum()
    }
}
