//! Display formatting for terminal output
//!
//! Provides plain-text tables and detail views for audit entries and the
//! step catalog.

pub mod entry;
pub mod steps;

pub use entry::{format_client_history, format_entry_details, format_entry_list};
pub use steps::format_step_list;
