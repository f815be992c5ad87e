//! Storage initialization
//!
//! Handles first-run setup: default settings and an editable copy of the
//! built-in step catalog.

use std::path::PathBuf;

use crate::config::{ProcessAuditPaths, Settings};
use crate::error::AuditError;
use crate::registry::StepConfigRegistry;

use super::file_io::write_text_atomic;

/// File name of the catalog written on first run
pub const CATALOG_FILE_NAME: &str = "steps.yaml";

/// Initialize storage for a fresh installation
///
/// Existing files are left untouched. Returns the settings in effect.
pub fn initialize_storage(paths: &ProcessAuditPaths) -> Result<Settings, AuditError> {
    paths.ensure_directories()?;

    let catalog_path = paths.catalog_file();
    if !catalog_path.exists() {
        let yaml = StepConfigRegistry::closing_process().to_yaml()?;
        write_text_atomic(&catalog_path, &yaml)?;
        tracing::debug!(path = %catalog_path.display(), "wrote default step catalog");
    }

    if paths.settings_file().exists() {
        return Settings::load_or_create(paths);
    }

    let settings = Settings {
        catalog_file: Some(PathBuf::from(CATALOG_FILE_NAME)),
        ..Settings::default()
    };
    settings.save(paths)?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_creates_files() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ProcessAuditPaths::with_base_dir(temp_dir.path().join("data"));

        let settings = initialize_storage(&paths).unwrap();

        assert!(paths.is_initialized());
        assert!(paths.catalog_file().exists());
        assert_eq!(
            settings.resolved_catalog_file(&paths),
            Some(paths.catalog_file())
        );

        let registry = StepConfigRegistry::from_settings(&settings, &paths).unwrap();
        assert_eq!(registry, StepConfigRegistry::closing_process());
    }

    #[test]
    fn test_initialize_keeps_existing_settings() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ProcessAuditPaths::with_base_dir(temp_dir.path().to_path_buf());

        let custom = Settings {
            date_format: "%d.%m.%Y".into(),
            ..Settings::default()
        };
        custom.save(&paths).unwrap();

        let settings = initialize_storage(&paths).unwrap();
        assert_eq!(settings.date_format, "%d.%m.%Y");
        assert!(settings.catalog_file.is_none());
    }
}
