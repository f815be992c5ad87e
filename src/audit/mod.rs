//! Process change audit engine
//!
//! Compares two snapshots of a client's closing process and turns every
//! meaningful step change into an audit entry carrying both a narrative and a
//! structured payload.
//!
//! # Architecture
//!
//! - `detect_changes`: walks the step catalog in order and emits one
//!   `StepChange` per changed step, classified by the `RULES` table.
//! - `MessageComposer`: renders the narrative of a change.
//! - `build_payload`: builds the versioned `StructuredChangePayload`.
//! - `AuditSequencer`: stamps the entries of one update with strictly
//!   increasing timestamps derived from an injected `Clock`.
//! - `AuditPublisher`: receives the finished entries (`JsonlAuditLog`,
//!   `MemoryPublisher`).
//!
//! # Example
//!
//! ```rust,ignore
//! use process_audit::audit::{compose_audit_entries, detect_changes, SystemClock};
//!
//! let changes = detect_changes(&before, &after, &registry, &ctx)?;
//! let entries = compose_audit_entries(&changes, &actor, &refs, &SystemClock)?;
//! log.publish(&entries)?;
//! ```

pub mod change;
pub mod classify;
mod compose;
mod diff;
pub mod entry;
pub mod evidence_delta;
mod logger;
pub mod narrative;
pub mod payload;
mod sequencer;

pub use change::{ChangeCategory, ChangeFlags, DateDirection, StepChange, StepStateView};
pub use classify::{classify, ClassificationRule, RULES};
pub use compose::{compose_audit_entries, enforce_reopening_rule, AuditComposer};
pub use diff::detect_changes;
pub use entry::{AuditEntryDraft, AuditLogEntry};
pub use evidence_delta::{EvidenceDelta, EvidenceFile, ReplacedEvidence};
pub use logger::{AuditPublisher, JsonlAuditLog, MemoryPublisher};
pub use narrative::{render_plain, MessageComposer, Narrative, NarrativeSection};
pub use payload::{
    build_payload, validate_payload_json, PayloadType, StructuredChangePayload, PAYLOAD_VERSION,
};
pub use sequencer::{
    AuditSequencer, Clock, FixedClock, MonotonicClock, SystemClock, MAX_SEQUENCE_STEP_MS,
};
