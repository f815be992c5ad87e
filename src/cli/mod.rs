//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod diff;
pub mod export;
pub mod log;
pub mod steps;

pub use diff::{handle_diff_command, DiffArgs};
pub use export::{handle_export_command, ExportArgs, ExportFormat};
pub use log::{handle_log_command, LogArgs};
pub use steps::{handle_steps_command, ContextArgs};
