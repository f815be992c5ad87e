//! CSV Export functionality
//!
//! One row per audit entry, built from the structured payload so the export
//! can be filtered in a spreadsheet.

use std::io::Write;

use crate::audit::AuditLogEntry;
use crate::error::{AuditError, AuditResult};

const HEADER: [&str; 14] = [
    "Timestamp",
    "Actor ID",
    "Actor",
    "Client ID",
    "Property ID",
    "Process ID",
    "Type",
    "Step Key",
    "Step",
    "Step Number",
    "Total Steps",
    "Date Before",
    "Date After",
    "Reopening Reason",
];

/// Export audit entries to CSV
pub fn export_entries_csv<W: Write>(entries: &[AuditLogEntry], writer: W) -> AuditResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    csv.write_record(HEADER)
        .map_err(|e| AuditError::Export(e.to_string()))?;

    for entry in entries {
        let payload = &entry.structured_payload;
        let date = |d: Option<chrono::DateTime<chrono::Utc>>| {
            d.map(|d| d.to_rfc3339()).unwrap_or_default()
        };

        csv.write_record([
            entry.sequence_timestamp.to_rfc3339(),
            entry.actor.id.clone(),
            entry.actor.display_name.clone(),
            entry.entity_refs.client_id.as_uuid().to_string(),
            entry
                .entity_refs
                .property_id
                .map(|id| id.as_uuid().to_string())
                .unwrap_or_default(),
            entry
                .entity_refs
                .process_id
                .map(|id| id.as_uuid().to_string())
                .unwrap_or_default(),
            serde_json::to_value(payload.change_type)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default(),
            payload.step.key.clone(),
            payload.step.name.clone(),
            payload.step.number.to_string(),
            payload.step.total.to_string(),
            date(payload.dates.before),
            date(payload.dates.after),
            payload.metadata.reopening_reason.clone().unwrap_or_default(),
        ])
        .map_err(|e| AuditError::Export(e.to_string()))?;
    }

    csv.flush().map_err(|e| AuditError::Export(e.to_string()))?;
    Ok(())
}
