//! JSON Export functionality
//!
//! Exports audit entries to JSON with schema versioning.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::audit::{AuditLogEntry, PAYLOAD_VERSION};
use crate::error::{AuditError, AuditResult};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Audit log export structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Version of the structured payloads inside the entries
    pub payload_version: u32,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// Exported entries, oldest first
    pub entries: Vec<AuditLogEntry>,

    pub metadata: ExportMetadata,
}

/// Export metadata for reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub entry_count: usize,

    /// Number of distinct clients
    pub client_count: usize,

    pub earliest_entry: Option<DateTime<Utc>>,

    pub latest_entry: Option<DateTime<Utc>>,
}

impl AuditExport {
    /// Build an export of the given entries
    pub fn new(entries: Vec<AuditLogEntry>, exported_at: DateTime<Utc>) -> Self {
        let mut clients: Vec<_> = entries.iter().map(|e| e.entity_refs.client_id).collect();
        clients.sort_by_key(|id| *id.as_uuid());
        clients.dedup();

        let metadata = ExportMetadata {
            entry_count: entries.len(),
            client_count: clients.len(),
            earliest_entry: entries.iter().map(|e| e.sequence_timestamp).min(),
            latest_entry: entries.iter().map(|e| e.sequence_timestamp).max(),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            payload_version: PAYLOAD_VERSION,
            exported_at,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            entries,
            metadata,
        }
    }

    /// Check that the export can be read by this version
    pub fn validate(&self) -> AuditResult<()> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(AuditError::Export(format!(
                "Unsupported export schema version: {}",
                self.schema_version
            )));
        }

        if self.metadata.entry_count != self.entries.len() {
            return Err(AuditError::Export(format!(
                "Export declares {} entries but contains {}",
                self.metadata.entry_count,
                self.entries.len()
            )));
        }

        for entry in &self.entries {
            entry.structured_payload.validate()?;
        }

        Ok(())
    }
}

/// Export entries to pretty-printed JSON
pub fn export_entries_json<W: Write>(export: &AuditExport, writer: &mut W) -> AuditResult<()> {
    serde_json::to_writer_pretty(&mut *writer, export)
        .map_err(|e| AuditError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| AuditError::Export(e.to_string()))?;
    Ok(())
}
