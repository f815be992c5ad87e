//! Audit publishers
//!
//! The engine only guarantees the content and relative order of entries;
//! publishers own durability. `JsonlAuditLog` appends entries to a
//! line-delimited JSON file, `MemoryPublisher` keeps them in memory.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{AuditError, AuditResult};
use crate::models::ClientId;

use super::entry::AuditLogEntry;

/// Destination of finished audit entries
pub trait AuditPublisher {
    /// Publish the entries of one batch, in order
    fn publish(&self, entries: &[AuditLogEntry]) -> AuditResult<()>;
}

/// Append-only JSONL audit log
///
/// Each line is a complete JSON object representing one audit entry.
pub struct JsonlAuditLog {
    log_path: PathBuf,
}

impl JsonlAuditLog {
    /// Create a log writing to the specified path
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Read all audit entries from the log file, oldest first
    pub fn read_all(&self) -> AuditResult<Vec<AuditLogEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| AuditError::Io(format!("Failed to open audit log: {}", e)))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                AuditError::Io(format!("Failed to read audit log line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: AuditLogEntry = serde_json::from_str(&line).map_err(|e| {
                AuditError::Json(format!(
                    "Failed to parse audit entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            entries.push(entry);
        }

        Ok(entries)
    }

    /// Read the most recent N entries
    pub fn read_recent(&self, count: usize) -> AuditResult<Vec<AuditLogEntry>> {
        let all_entries = self.read_all()?;
        let start = all_entries.len().saturating_sub(count);
        Ok(all_entries[start..].to_vec())
    }

    /// Read the entries of one client, ordered by sequence timestamp
    pub fn read_for_client(&self, client_id: ClientId) -> AuditResult<Vec<AuditLogEntry>> {
        let mut entries: Vec<_> = self
            .read_all()?
            .into_iter()
            .filter(|entry| entry.is_for_client(client_id))
            .collect();
        entries.sort_by_key(|entry| entry.sequence_timestamp);
        Ok(entries)
    }

    /// Get the number of entries in the audit log
    pub fn entry_count(&self) -> AuditResult<usize> {
        if !self.log_path.exists() {
            return Ok(0);
        }

        let file = File::open(&self.log_path)
            .map_err(|e| AuditError::Io(format!("Failed to open audit log: {}", e)))?;

        let reader = BufReader::new(file);
        let count = reader
            .lines()
            .map_while(Result::ok)
            .filter(|l| !l.trim().is_empty())
            .count();

        Ok(count)
    }

    /// Check if the audit log file exists
    pub fn exists(&self) -> bool {
        self.log_path.exists()
    }

    /// Get the path to the audit log file
    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}

impl AuditPublisher for JsonlAuditLog {
    /// Writes all entries and flushes once at the end
    fn publish(&self, entries: &[AuditLogEntry]) -> AuditResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        // Serialize everything first so a bad entry leaves the log untouched
        let mut buffer = String::new();
        for entry in entries {
            let json = serde_json::to_string(entry)
                .map_err(|e| AuditError::Json(format!("Failed to serialize audit entry: {}", e)))?;
            buffer.push_str(&json);
            buffer.push('\n');
        }

        if let Some(parent) = self.log_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AuditError::Io(format!("Failed to create audit log directory: {}", e)))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| AuditError::Io(format!("Failed to open audit log: {}", e)))?;

        file.write_all(buffer.as_bytes())
            .map_err(|e| AuditError::Io(format!("Failed to write audit entries: {}", e)))?;

        file.flush()
            .map_err(|e| AuditError::Io(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }
}

/// Publisher keeping entries in memory
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    entries: Mutex<Vec<AuditLogEntry>>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything published so far
    pub fn entries(&self) -> Vec<AuditLogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl AuditPublisher for MemoryPublisher {
    fn publish(&self, entries: &[AuditLogEntry]) -> AuditResult<()> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .extend_from_slice(entries);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::payload::{
        PayloadDates, PayloadEvidences, PayloadMetadata, PayloadStep, PayloadType,
        StructuredChangePayload, PAYLOAD_VERSION,
    };
    use crate::models::{Actor, EntityRefs};
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::TempDir;

    fn entry(client_id: ClientId, key: &str, offset_ms: i64) -> AuditLogEntry {
        AuditLogEntry {
            sequence_timestamp: Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap()
                + Duration::milliseconds(offset_ms),
            actor: Actor::new("u-1", "Ana"),
            entity_refs: EntityRefs::client(client_id),
            narrative: format!("Step completed: {}", key),
            structured_payload: StructuredChangePayload {
                version: PAYLOAD_VERSION,
                change_type: PayloadType::Completion,
                step: PayloadStep {
                    key: key.into(),
                    name: key.into(),
                    number: 1,
                    total: 3,
                },
                dates: PayloadDates::default(),
                evidences: PayloadEvidences::default(),
                metadata: PayloadMetadata::default(),
            },
        }
    }

    fn create_test_log() -> (TempDir, JsonlAuditLog) {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("audit.log");
        (temp_dir, JsonlAuditLog::new(log_path))
    }

    #[test]
    fn test_publish_and_read() {
        let (_temp_dir, log) = create_test_log();
        let client = ClientId::new();

        log.publish(&[entry(client, "promiseSent", 0), entry(client, "deedSigned", 1)])
            .unwrap();

        let entries = log.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].step_key(), "promiseSent");
        assert_eq!(entries[1].step_key(), "deedSigned");
        assert_eq!(log.entry_count().unwrap(), 2);
    }

    #[test]
    fn test_empty_batch_does_not_create_file() {
        let (_temp_dir, log) = create_test_log();
        log.publish(&[]).unwrap();
        assert!(!log.exists());
        assert_eq!(log.entry_count().unwrap(), 0);
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_read_recent() {
        let (_temp_dir, log) = create_test_log();
        let client = ClientId::new();

        for i in 0..5 {
            log.publish(&[entry(client, &format!("step{}", i), i)]).unwrap();
        }

        let recent = log.read_recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].step_key(), "step3");
        assert_eq!(recent[1].step_key(), "step4");
    }

    #[test]
    fn test_read_for_client_sorted() {
        let (_temp_dir, log) = create_test_log();
        let ana = ClientId::new();
        let bruno = ClientId::new();

        log.publish(&[entry(ana, "late", 5)]).unwrap();
        log.publish(&[entry(bruno, "other", 0), entry(ana, "early", 1)])
            .unwrap();

        let history = log.read_for_client(ana).unwrap();
        let keys: Vec<_> = history.iter().map(|e| e.step_key()).collect();
        assert_eq!(keys, vec!["early", "late"]);
    }

    #[test]
    fn test_append_only() {
        let (_temp_dir, log) = create_test_log();
        let client = ClientId::new();

        log.publish(&[entry(client, "a", 0)]).unwrap();
        log.publish(&[entry(client, "b", 1)]).unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_memory_publisher() {
        let publisher = MemoryPublisher::new();
        let client = ClientId::new();

        publisher.publish(&[entry(client, "a", 0)]).unwrap();
        publisher.publish(&[entry(client, "b", 1)]).unwrap();

        assert_eq!(publisher.entries().len(), 2);
    }
}
