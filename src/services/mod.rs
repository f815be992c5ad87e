//! Service layer for process-audit
//!
//! The service layer wires the audit engine to its collaborators: the step
//! catalog, the clock and the publisher.

pub mod process_audit;

pub use process_audit::{ProcessAuditService, ProcessUpdate};
