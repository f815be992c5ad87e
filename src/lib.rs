//! process-audit - audit trail engine for multi-step client processes
//!
//! This library detects what changed between two snapshots of a client's
//! closing process, classifies each step change, and composes audit entries
//! that pair a narrative with a versioned structured payload.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Step states, snapshots, evidences and the financial context
//! - `registry`: Step catalog and applicability rules
//! - `audit`: Change detection, classification, composition and publishing
//! - `services`: Orchestration of one workflow update
//! - `storage`: JSON/YAML file helpers and first-run setup
//! - `display`, `export`, `cli`: Terminal output, exports and command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use process_audit::audit::{compose_audit_entries, detect_changes, SystemClock};
//! use process_audit::registry::StepConfigRegistry;
//!
//! let registry = StepConfigRegistry::closing_process();
//! let changes = detect_changes(&before, &after, &registry, &ctx)?;
//! let entries = compose_audit_entries(&changes, &actor, &refs, &SystemClock)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod registry;
pub mod services;
pub mod storage;

pub use error::{AuditError, AuditResult};
