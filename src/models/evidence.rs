//! Evidence model
//!
//! An evidence is a file attached to an evidence slot of a step. Identity is
//! the slot id: replacing the file keeps the id and changes the url.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::dates;

/// Evidences of one step, keyed (and therefore ordered) by slot id
pub type EvidenceSet = BTreeMap<String, Evidence>;

/// A file attached to an evidence slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Evidence {
    /// Evidence slot id
    pub id: String,

    /// Name shown to users (usually the uploaded file name)
    pub display_name: String,

    /// Location of the stored file
    pub url: String,

    /// MIME type or document kind
    #[serde(rename = "type")]
    pub evidence_type: String,

    /// File size in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// When the file was last modified
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "dates::deserialize_optional"
    )]
    pub last_modified_at: Option<DateTime<Utc>>,
}

impl Evidence {
    /// Create a new evidence without the optional fields
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        url: impl Into<String>,
        evidence_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            url: url.into(),
            evidence_type: evidence_type.into(),
            size: None,
            last_modified_at: None,
        }
    }

    /// Set the file size
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the last modification time
    pub fn with_last_modified_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_modified_at = Some(at);
        self
    }

    /// Validate the evidence
    pub fn validate(&self) -> Result<(), EvidenceValidationError> {
        if self.id.trim().is_empty() {
            return Err(EvidenceValidationError::EmptyId);
        }

        if self.url.trim().is_empty() {
            return Err(EvidenceValidationError::EmptyUrl(self.id.clone()));
        }

        Ok(())
    }
}

/// Compare two evidence sets by their slot id to url pairs
pub fn same_files(before: &EvidenceSet, after: &EvidenceSet) -> bool {
    before.len() == after.len()
        && before
            .iter()
            .all(|(id, evidence)| after.get(id).is_some_and(|other| other.url == evidence.url))
}

/// Validation errors for evidences
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvidenceValidationError {
    EmptyId,
    EmptyUrl(String),
}

impl std::fmt::Display for EvidenceValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "Evidence id cannot be empty"),
            Self::EmptyUrl(id) => write!(f, "Evidence '{}' has no url", id),
        }
    }
}

impl std::error::Error for EvidenceValidationError {}
