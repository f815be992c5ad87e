//! YAML Export functionality
//!
//! Same content as the JSON export, for human-readable archives.

use std::io::Write;

use crate::error::{AuditError, AuditResult};
use crate::export::json::AuditExport;

/// Export entries to YAML format
pub fn export_entries_yaml<W: Write>(export: &AuditExport, writer: &mut W) -> AuditResult<()> {
    writeln!(writer, "# process-audit log export")
        .map_err(|e| AuditError::Export(e.to_string()))?;
    writeln!(writer, "# Generated: {}", export.exported_at)
        .map_err(|e| AuditError::Export(e.to_string()))?;
    writeln!(writer, "# Entries: {}", export.metadata.entry_count)
        .map_err(|e| AuditError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| AuditError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, export).map_err(|e| AuditError::Export(e.to_string()))?;

    Ok(())
}
