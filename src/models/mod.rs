//! Core data models for process-audit
//!
//! This module contains the data structures describing a client's closing
//! process: step states, evidences, snapshots, the financial context and the
//! references attached to audit entries.

pub mod actor;
pub mod dates;
pub mod evidence;
pub mod financial;
pub mod ids;
pub mod snapshot;
pub mod step_state;

pub use actor::{Actor, EntityRefs};
pub use evidence::{Evidence, EvidenceSet};
pub use financial::{FinancialContext, PaymentMethod};
pub use ids::{ClientId, ProcessId, PropertyId};
pub use snapshot::ProcessSnapshot;
pub use step_state::{StepState, StepStateSnapshot};
