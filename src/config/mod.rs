//! Configuration module for backup-rotation
//!
//! This module provides configuration management including:
//! - Config file location
//! - JSON loading and per-item validation
//! - Merging item overrides onto defaults

pub mod paths;
pub mod settings;

pub use paths::ConfigPaths;
pub use settings::{Config, Defaults};
