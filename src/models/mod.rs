//! Core data models for backup-rotation
//!
//! This module contains the data structures that describe a rotation run:
//! retention periods, compression codecs, and resolved backup items.

pub mod compression;
pub mod item;
pub mod period;

pub use compression::Compression;
pub use item::{BackupItem, Retention, Schedule};
pub use period::Period;
