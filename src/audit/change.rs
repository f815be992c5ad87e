//! Detected step changes
//!
//! A `StepChange` is the ephemeral result of comparing two snapshots for one
//! step. It is never persisted: the composer turns it into an audit entry.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::dates::compare_days;
use crate::models::{Evidence, StepState, StepStateSnapshot};
use crate::registry::EvidenceSlot;

/// Business meaning of a step change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeCategory {
    /// The step was completed for the first time
    Completion,
    /// The step was reopened and completed again
    Reopening,
    /// The completion date of a completed step was edited
    DateEdit,
    /// Evidence swap on a completed step, kept out of the audit trail
    Suppressed,
    /// Nothing recognizable changed
    NoChange,
}

impl fmt::Display for ChangeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completion => write!(f, "COMPLETION"),
            Self::Reopening => write!(f, "REOPENING"),
            Self::DateEdit => write!(f, "DATE_EDIT"),
            Self::Suppressed => write!(f, "SUPPRESSED"),
            Self::NoChange => write!(f, "NO_CHANGE"),
        }
    }
}

/// Comparison flags computed by the differ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeFlags {
    pub completion_occurred: bool,
    pub date_changed: bool,
    pub evidence_changed: bool,
    pub is_reopening: bool,
}

impl ChangeFlags {
    /// Whether any flag is set
    pub fn any(&self) -> bool {
        self.completion_occurred || self.date_changed || self.evidence_changed || self.is_reopening
    }
}

/// Direction of a completion date move, at day granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateDirection {
    Earlier,
    Later,
    Same,
}

impl DateDirection {
    /// Compare two optional dates; `None` unless both are present
    pub fn between(before: Option<&DateTime<Utc>>, after: Option<&DateTime<Utc>>) -> Option<Self> {
        let (before, after) = (before?, after?);
        Some(match compare_days(before, after) {
            std::cmp::Ordering::Less => Self::Later,
            std::cmp::Ordering::Greater => Self::Earlier,
            std::cmp::Ordering::Equal => Self::Same,
        })
    }
}

impl fmt::Display for DateDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Earlier => write!(f, "earlier"),
            Self::Later => write!(f, "later"),
            Self::Same => write!(f, "same day"),
        }
    }
}

/// Read-only view of a step state used by the composer
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepStateView {
    pub completed: bool,
    pub completion_date: Option<DateTime<Utc>>,
    /// Evidences ordered by slot id
    pub evidences: Vec<Evidence>,
    pub reopening_reason: Option<String>,
    pub reopening_at: Option<DateTime<Utc>>,
}

impl StepStateView {
    /// Evidence of a slot, if attached
    pub fn evidence(&self, slot_id: &str) -> Option<&Evidence> {
        self.evidences.iter().find(|e| e.id == slot_id)
    }
}

impl From<&StepState> for StepStateView {
    fn from(state: &StepState) -> Self {
        Self {
            completed: state.completed,
            completion_date: state.completion_date,
            evidences: state.evidences.values().cloned().collect(),
            reopening_reason: state.reopening_reason.clone(),
            reopening_at: state.reopening_at,
        }
    }
}

impl From<&StepStateSnapshot> for StepStateView {
    fn from(snapshot: &StepStateSnapshot) -> Self {
        Self {
            completed: snapshot.completed,
            completion_date: snapshot.completion_date,
            evidences: snapshot.evidences.values().cloned().collect(),
            reopening_reason: None,
            reopening_at: None,
        }
    }
}

/// One classified change of one step
///
/// For reopenings, `before` is the state right before the reopening, not
/// the state passed to the differ.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepChange {
    pub category: ChangeCategory,
    pub step_key: String,
    pub step_name: String,
    pub step_number: usize,
    pub total_applicable_steps: usize,
    pub before: StepStateView,
    pub after: StepStateView,
    pub flags: ChangeFlags,
    /// Evidence slots declared by the step configuration
    pub evidence_slots: Vec<EvidenceSlot>,
}

impl StepChange {
    /// Label of an evidence slot of this step
    pub fn slot_label(&self, slot_id: &str) -> Option<&str> {
        self.evidence_slots
            .iter()
            .find(|slot| slot.id == slot_id)
            .map(|slot| slot.label.as_str())
    }
}
