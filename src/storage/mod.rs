//! Storage layer for process-audit
//!
//! JSON and YAML files with atomic writes and first-run initialization. The
//! audit log itself lives in `audit::JsonlAuditLog`.

pub mod file_io;
pub mod init;

pub use file_io::{read_json_required, write_json_atomic, write_text_atomic};
pub use init::initialize_storage;
