//! Rotation engine for backup-rotation
//!
//! Orchestrates a full rotation pass over the configured backup items.
//!
//! # Example
//!
//! ```rust,ignore
//! use backup_rotation::archive::TarArchiveWriter;
//! use backup_rotation::engine::RotationEngine;
//!
//! let engine = RotationEngine::new(TarArchiveWriter::new());
//! let report = engine.run(&config.items, chrono::Local::now().date_naive());
//! println!("{} created, {} deleted", report.created(), report.deleted());
//! ```

mod report;
mod rotation;

pub use report::{ItemReport, RunReport};
pub use rotation::RotationEngine;
