//! Logging setup for backup-rotation
//!
//! The library only emits `tracing` events. The binary installs a subscriber
//! here: console output on stderr (unless quiet), an optional append-only log
//! file, and one global level filter.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::{Args, ValueEnum};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::error::{RotationError, RotationResult};

/// Log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Logging flags shared by the command line
#[derive(Args, Debug, Clone, Default)]
pub struct LogArgs {
    /// Suppress console output
    #[arg(short, long)]
    pub quiet: bool,

    /// Also append log events to this file
    #[arg(short, long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Minimum level of events to record
    #[arg(short = 'L', long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

/// Install the global tracing subscriber
///
/// # Errors
///
/// Fails if the log file cannot be opened or a subscriber is already set.
pub fn init_logging(args: &LogArgs) -> RotationResult<()> {
    let console = (!args.quiet).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    let file = match &args.log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    RotationError::Config(format!(
                        "Failed to open log file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(LevelFilter::from(args.log_level))
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| RotationError::Config(format!("Failed to initialize logging: {}", e)))
}
