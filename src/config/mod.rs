//! Configuration module for process-audit
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::ProcessAuditPaths;
pub use settings::Settings;
