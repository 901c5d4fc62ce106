//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the rotation engine.

pub mod rotate;

pub use rotate::{handle_rotate, RotateArgs};
