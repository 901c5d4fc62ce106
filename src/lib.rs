//! backup-rotation - Scheduled, retention-bounded directory backups
//!
//! For each configured source/destination pair this crate writes compressed
//! tar snapshots on daily, weekly, monthly and yearly cadences, and prunes the
//! oldest archives once a period holds more than its retention count.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Config file location, JSON loading, defaults merging
//! - `error`: Custom error types
//! - `models`: Periods, compression codecs and resolved backup items
//! - `retention`: Pure decisions on what to create and what to delete
//! - `archive`: Compressed tarball creation with per-entry fault tolerance
//! - `engine`: One rotation pass over all items
//! - `logging`: tracing subscriber setup
//! - `cli`: Command handlers used by the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use backup_rotation::archive::TarArchiveWriter;
//! use backup_rotation::config::Config;
//! use backup_rotation::engine::RotationEngine;
//!
//! let config = Config::load(Path::new("config.json"))?;
//! let engine = RotationEngine::new(TarArchiveWriter::new());
//! let report = engine.run(&config.items, chrono::Local::now().date_naive());
//! ```

pub mod archive;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod retention;

pub use error::RotationError;
