//! Export module for process-audit
//!
//! Exports the audit log in multiple formats:
//! - CSV: one row per entry (spreadsheet-compatible)
//! - JSON: machine-readable export with schema versioning
//! - YAML: human-readable export of the same content

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_entries_csv;
pub use json::{export_entries_json, AuditExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_entries_yaml;

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use crate::audit::payload::{
        PayloadDates, PayloadEvidences, PayloadFlags, PayloadMetadata, PayloadStep, PayloadType,
        StructuredChangePayload, PAYLOAD_VERSION,
    };
    use crate::audit::AuditLogEntry;
    use crate::models::{Actor, ClientId, EntityRefs, ProcessId};

    /// A completion followed by a reopening of the same client
    pub(crate) fn sample_entries() -> Vec<AuditLogEntry> {
        let base = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();
        let refs = EntityRefs::client(ClientId::new()).with_process(ProcessId::new());
        let step = PayloadStep {
            key: "deedSigned".into(),
            name: "Deed signed".into(),
            number: 4,
            total: 6,
        };

        vec![
            AuditLogEntry {
                sequence_timestamp: base,
                actor: Actor::new("u-1", "Ana"),
                entity_refs: refs,
                narrative: "Step completed: Deed signed".into(),
                structured_payload: StructuredChangePayload {
                    version: PAYLOAD_VERSION,
                    change_type: PayloadType::Completion,
                    step: step.clone(),
                    dates: PayloadDates {
                        before: None,
                        after: Some(base),
                    },
                    evidences: PayloadEvidences::default(),
                    metadata: PayloadMetadata::default(),
                },
            },
            AuditLogEntry {
                sequence_timestamp: base + Duration::milliseconds(1),
                actor: Actor::new("u-2", "Bruno"),
                entity_refs: refs,
                narrative: "Step reopened and completed again: Deed signed".into(),
                structured_payload: StructuredChangePayload {
                    version: PAYLOAD_VERSION,
                    change_type: PayloadType::Reopening,
                    step,
                    dates: PayloadDates {
                        before: Some(base),
                        after: Some(base + Duration::days(2)),
                    },
                    evidences: PayloadEvidences::default(),
                    metadata: PayloadMetadata {
                        flags: PayloadFlags {
                            has_date_change: true,
                            has_evidence_change: false,
                        },
                        reopening_reason: Some("wrong date, see \"deed\"".into()),
                        ..PayloadMetadata::default()
                    },
                },
            },
        ]
    }
}
