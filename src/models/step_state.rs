//! Step state model
//!
//! Tracks whether a workflow step is completed, when, with which evidences,
//! and whether it was reopened. Lifecycle helpers return new values and never
//! touch the state they were called on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::dates;
use super::evidence::{Evidence, EvidenceSet};
use crate::error::{AuditError, AuditResult};

/// Frozen copy of a step state taken when the step is reopened
///
/// Snapshots never nest: reopening a step twice keeps only the state right
/// before the latest reopening.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StepStateSnapshot {
    #[serde(default)]
    pub completed: bool,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "dates::deserialize_optional"
    )]
    pub completion_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "EvidenceSet::is_empty")]
    pub evidences: EvidenceSet,
}

/// Current state of one workflow step
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StepState {
    /// Whether the step is completed
    #[serde(default)]
    pub completed: bool,

    /// When the step was completed
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "dates::deserialize_optional"
    )]
    pub completion_date: Option<DateTime<Utc>>,

    /// Attached evidences keyed by slot id
    #[serde(default, skip_serializing_if = "EvidenceSet::is_empty")]
    pub evidences: EvidenceSet,

    /// Why the step was reopened
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reopening_reason: Option<String>,

    /// When the step was reopened
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "dates::deserialize_optional"
    )]
    pub reopening_at: Option<DateTime<Utc>>,

    /// State right before the latest reopening
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_state: Option<StepStateSnapshot>,
}

impl StepState {
    /// A step that has not been started
    pub fn not_started() -> Self {
        Self::default()
    }

    /// A step completed on the given date
    pub fn completed_on(date: DateTime<Utc>) -> Self {
        Self {
            completed: true,
            completion_date: Some(date),
            ..Self::default()
        }
    }

    /// Complete the step on the given date
    ///
    /// Reopening details are kept: they describe the reopening this
    /// completion resolves.
    pub fn complete(&self, date: DateTime<Utc>) -> Self {
        Self {
            completed: true,
            completion_date: Some(date),
            ..self.clone()
        }
    }

    /// Reopen the step, freezing the current state into `previous_state`
    pub fn reopen(&self, reason: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            completed: false,
            completion_date: None,
            evidences: self.evidences.clone(),
            reopening_reason: Some(reason.into()),
            reopening_at: Some(at),
            previous_state: Some(self.snapshot()),
        }
    }

    /// Attach (or replace) an evidence in its slot
    pub fn with_evidence(&self, evidence: Evidence) -> Self {
        let mut next = self.clone();
        next.evidences.insert(evidence.id.clone(), evidence);
        next
    }

    /// Remove the evidence of a slot
    pub fn without_evidence(&self, slot_id: &str) -> Self {
        let mut next = self.clone();
        next.evidences.remove(slot_id);
        next
    }

    /// Deep copy of the trackable fields
    pub fn snapshot(&self) -> StepStateSnapshot {
        StepStateSnapshot {
            completed: self.completed,
            completion_date: self.completion_date,
            evidences: self.evidences.clone(),
        }
    }

    /// Whether both reopening fields are set
    pub fn has_reopening(&self) -> bool {
        self.reopening_reason.is_some() && self.reopening_at.is_some()
    }

    /// Validate the state of the step identified by `step_key`
    pub fn validate(&self, step_key: &str) -> AuditResult<()> {
        if self.completed && self.completion_date.is_none() {
            return Err(AuditError::invalid_step(
                step_key,
                "completed step has no completion date",
            ));
        }

        if self.reopening_reason.is_some() != self.reopening_at.is_some() {
            return Err(AuditError::invalid_step(
                step_key,
                "reopening reason and reopening time must be set together",
            ));
        }

        if let Some(reason) = &self.reopening_reason {
            if reason.trim().is_empty() {
                return Err(AuditError::invalid_step(step_key, "reopening reason is empty"));
            }
        }

        validate_evidences(step_key, &self.evidences)?;

        if let Some(previous) = &self.previous_state {
            if previous.completed && previous.completion_date.is_none() {
                return Err(AuditError::invalid_step(
                    step_key,
                    "state before reopening is completed without a completion date",
                ));
            }
            validate_evidences(step_key, &previous.evidences)?;
        }

        Ok(())
    }
}

impl From<&StepStateSnapshot> for StepState {
    fn from(snapshot: &StepStateSnapshot) -> Self {
        Self {
            completed: snapshot.completed,
            completion_date: snapshot.completion_date,
            evidences: snapshot.evidences.clone(),
            ..Self::default()
        }
    }
}

fn validate_evidences(step_key: &str, evidences: &EvidenceSet) -> AuditResult<()> {
    for (slot_id, evidence) in evidences {
        if slot_id != &evidence.id {
            return Err(AuditError::invalid_step(
                step_key,
                format!(
                    "evidence stored under slot '{}' declares id '{}'",
                    slot_id, evidence.id
                ),
            ));
        }

        evidence
            .validate()
            .map_err(|e| AuditError::invalid_step(step_key, e.to_string()))?;
    }

    Ok(())
}
