//! Evidence differences between two step states
//!
//! Shared by the narrative and the structured payload so both describe the
//! same evidence changes.

use serde::{Deserialize, Serialize};

use crate::models::Evidence;

/// File location on one side of a replacement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceFile {
    pub url: String,
}

/// A slot whose file changed between the two states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacedEvidence {
    pub id: String,
    pub before: EvidenceFile,
    pub after: EvidenceFile,
}

/// Evidence changes joined on slot id
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EvidenceDelta {
    /// Same slot, new file, and both sides hold the same number of slots
    pub replaced: Vec<ReplacedEvidence>,
    /// Same slot, new file, while slots were also added or removed
    pub updated: Vec<ReplacedEvidence>,
    /// Slot ids present only after
    pub added: Vec<String>,
    /// Slot ids present only before
    pub removed: Vec<String>,
}

impl EvidenceDelta {
    /// Compare two evidence lists
    pub fn between(before: &[Evidence], after: &[Evidence]) -> Self {
        let same_count = before.len() == after.len();
        let mut delta = Self::default();

        for old in before {
            match after.iter().find(|new| new.id == old.id) {
                Some(new) if new.url != old.url => {
                    let pair = ReplacedEvidence {
                        id: old.id.clone(),
                        before: EvidenceFile {
                            url: old.url.clone(),
                        },
                        after: EvidenceFile {
                            url: new.url.clone(),
                        },
                    };
                    if same_count {
                        delta.replaced.push(pair);
                    } else {
                        delta.updated.push(pair);
                    }
                }
                Some(_) => {}
                None => delta.removed.push(old.id.clone()),
            }
        }

        for new in after {
            if !before.iter().any(|old| old.id == new.id) {
                delta.added.push(new.id.clone());
            }
        }

        delta
    }

    /// Whether no evidence changed
    pub fn is_empty(&self) -> bool {
        self.replaced.is_empty()
            && self.updated.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
    }
}
