//! User settings for process-audit
//!
//! Manages narrative date formatting, the logical time unit used to sequence
//! audit entries, the step catalog location and the default log filter.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::paths::ProcessAuditPaths;
use crate::audit::MAX_SEQUENCE_STEP_MS;
use crate::error::AuditError;
use crate::storage::write_json_atomic;

/// User settings for process-audit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Date format used in narratives (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Milliseconds between consecutive entries of one batch
    #[serde(default = "default_sequence_step_ms")]
    pub sequence_step_ms: i64,

    /// Step catalog to use instead of the built-in closing process
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_file: Option<PathBuf>,

    /// Default tracing filter when RUST_LOG is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_sequence_step_ms() -> i64 {
    1
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            date_format: default_date_format(),
            sequence_step_ms: default_sequence_step_ms(),
            catalog_file: None,
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &ProcessAuditPaths) -> Result<Self, AuditError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| AuditError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                AuditError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ProcessAuditPaths) -> Result<(), AuditError> {
        paths.ensure_directories()?;

        write_json_atomic(paths.settings_file(), self)
    }

    /// Check that the settings can drive the audit pipeline
    pub fn validate(&self) -> Result<(), AuditError> {
        if !(1..=MAX_SEQUENCE_STEP_MS).contains(&self.sequence_step_ms) {
            return Err(AuditError::Config(format!(
                "sequence_step_ms must be between 1 and {} (got {})",
                MAX_SEQUENCE_STEP_MS, self.sequence_step_ms
            )));
        }

        if self.date_format.trim().is_empty() {
            return Err(AuditError::Config("date_format cannot be empty".into()));
        }

        Ok(())
    }

    /// Resolve the catalog file, relative paths being taken from the base directory
    pub fn resolved_catalog_file(&self, paths: &ProcessAuditPaths) -> Option<PathBuf> {
        self.catalog_file.as_ref().map(|file| {
            if file.is_absolute() {
                file.clone()
            } else {
                paths.base_dir().join(file)
            }
        })
    }
}
