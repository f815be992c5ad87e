//! Audit entry data structures
//!
//! An audit entry pairs the narrative of a step change with its structured
//! payload, the sequence timestamp of its batch, the actor and the entities it
//! belongs to. Entries are immutable once built.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Actor, ClientId, EntityRefs};

use super::payload::{PayloadType, StructuredChangePayload};

/// Narrative and payload of one change, waiting for its sequence timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEntryDraft {
    pub narrative: String,
    pub payload: StructuredChangePayload,
}

/// A single audit log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    /// Logical timestamp ordering entries of one batch (UTC)
    pub sequence_timestamp: DateTime<Utc>,

    /// Who made the change
    pub actor: Actor,

    /// Entities the change belongs to
    pub entity_refs: EntityRefs,

    /// Human-readable description of the change
    pub narrative: String,

    /// Machine-readable description of the change
    pub structured_payload: StructuredChangePayload,
}

impl AuditLogEntry {
    /// Kind of change recorded by this entry
    pub fn change_type(&self) -> PayloadType {
        self.structured_payload.change_type
    }

    /// Key of the step this entry is about
    pub fn step_key(&self) -> &str {
        &self.structured_payload.step.key
    }

    /// Whether this entry belongs to the given client
    pub fn is_for_client(&self, client_id: ClientId) -> bool {
        self.entity_refs.client_id == client_id
    }

    /// First line of the narrative
    pub fn headline(&self) -> &str {
        self.narrative.lines().next().unwrap_or_default()
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let step = &self.structured_payload.step;
        format!(
            "[{}] {} {} ({}/{}) by {} for {}\n  {}",
            self.sequence_timestamp.format("%Y-%m-%d %H:%M:%S%.3f UTC"),
            self.change_type(),
            step.name,
            step.number,
            step.total,
            self.actor.display_name,
            self.entity_refs.client_id,
            self.headline()
        )
    }
}
