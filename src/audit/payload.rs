//! Structured change payload
//!
//! Machine-readable twin of the narrative. It carries no display text other
//! than names coming from the step catalog and the evidences themselves, so
//! any view can render it in its own language.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AuditError, AuditResult};
use crate::models::Evidence;

use super::change::{ChangeCategory, DateDirection, StepChange};
use super::evidence_delta::{EvidenceDelta, ReplacedEvidence};

/// Current payload schema version
pub const PAYLOAD_VERSION: u32 = 1;

/// Kind of change described by a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PayloadType {
    Completion,
    Reopening,
    DateEdit,
    Unknown,
}

impl From<ChangeCategory> for PayloadType {
    fn from(category: ChangeCategory) -> Self {
        match category {
            ChangeCategory::Completion => Self::Completion,
            ChangeCategory::Reopening => Self::Reopening,
            ChangeCategory::DateEdit => Self::DateEdit,
            ChangeCategory::Suppressed | ChangeCategory::NoChange => Self::Unknown,
        }
    }
}

impl std::fmt::Display for PayloadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completion => write!(f, "Completion"),
            Self::Reopening => write!(f, "Reopening"),
            Self::DateEdit => write!(f, "Date edit"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadStep {
    pub key: String,
    pub name: String,
    pub number: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PayloadDates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<DateTime<Utc>>,
}

/// Evidence as exposed in payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadEvidence {
    pub id: String,

    /// Label of the evidence slot in the step catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub display_name: String,

    pub url: String,

    #[serde(rename = "type")]
    pub evidence_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PayloadEvidences {
    pub before: Vec<PayloadEvidence>,
    pub after: Vec<PayloadEvidence>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadFlags {
    pub has_date_change: bool,
    pub has_evidence_change: bool,
}

/// Category-specific details
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadMetadata {
    pub flags: PayloadFlags,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_direction: Option<DateDirection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reopening_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reopened_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub replaced_evidences: Vec<ReplacedEvidence>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub updated_evidences: Vec<ReplacedEvidence>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added_evidences: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed_evidences: Vec<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unknown_type: bool,
}

/// Versioned, machine-readable description of one step change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredChangePayload {
    pub version: u32,
    #[serde(rename = "type")]
    pub change_type: PayloadType,
    pub step: PayloadStep,
    pub dates: PayloadDates,
    pub evidences: PayloadEvidences,
    pub metadata: PayloadMetadata,
}

impl StructuredChangePayload {
    /// Check the payload shape before it is published
    pub fn validate(&self) -> AuditResult<()> {
        let key = self.step.key.as_str();
        let fail = |message: String| {
            if key.is_empty() {
                AuditError::Validation(message)
            } else {
                AuditError::invalid_step(key, message)
            }
        };

        if self.version == 0 || self.version > PAYLOAD_VERSION {
            return Err(fail(format!("unsupported payload version {}", self.version)));
        }

        if key.trim().is_empty() {
            return Err(fail("payload is missing step.key".to_string()));
        }

        if self.step.name.trim().is_empty() {
            return Err(fail("payload is missing step.name".to_string()));
        }

        if self.step.number < 1 {
            return Err(fail(format!("step.number must be at least 1 (got {})", self.step.number)));
        }

        if self.step.number > self.step.total {
            return Err(fail(format!(
                "step.number {} exceeds step.total {}",
                self.step.number, self.step.total
            )));
        }

        Ok(())
    }
}

/// Build the payload of a classified change
pub fn build_payload(change: &StepChange) -> AuditResult<StructuredChangePayload> {
    let change_type = PayloadType::from(change.category);
    let is_reopening = change_type == PayloadType::Reopening;
    let delta = EvidenceDelta::between(&change.before.evidences, &change.after.evidences);

    let metadata = PayloadMetadata {
        flags: PayloadFlags {
            has_date_change: change.flags.date_changed,
            has_evidence_change: change.flags.evidence_changed,
        },
        date_direction: if change.flags.date_changed {
            DateDirection::between(
                change.before.completion_date.as_ref(),
                change.after.completion_date.as_ref(),
            )
        } else {
            None
        },
        reopening_reason: if is_reopening {
            change.after.reopening_reason.clone()
        } else {
            None
        },
        reopened_at: if is_reopening {
            change.after.reopening_at
        } else {
            None
        },
        replaced_evidences: delta.replaced,
        updated_evidences: delta.updated,
        added_evidences: delta.added,
        removed_evidences: delta.removed,
        unknown_type: change_type == PayloadType::Unknown,
    };

    let payload = StructuredChangePayload {
        version: PAYLOAD_VERSION,
        change_type,
        step: PayloadStep {
            key: change.step_key.clone(),
            name: change.step_name.clone(),
            number: change.step_number,
            total: change.total_applicable_steps,
        },
        dates: PayloadDates {
            before: change.before.completion_date,
            after: change.after.completion_date,
        },
        evidences: PayloadEvidences {
            before: payload_evidences(change, &change.before.evidences),
            after: payload_evidences(change, &change.after.evidences),
        },
        metadata,
    };

    payload.validate()?;
    Ok(payload)
}

fn payload_evidences(change: &StepChange, evidences: &[Evidence]) -> Vec<PayloadEvidence> {
    evidences
        .iter()
        .map(|e| PayloadEvidence {
            id: e.id.clone(),
            name: change.slot_label(&e.id).map(str::to_string),
            display_name: e.display_name.clone(),
            url: e.url.clone(),
            evidence_type: e.evidence_type.clone(),
            size: e.size,
            last_modified_at: e.last_modified_at,
        })
        .collect()
}

/// Validate a loosely-typed JSON payload and convert it
pub fn validate_payload_json(value: &Value) -> AuditResult<StructuredChangePayload> {
    let object = value
        .as_object()
        .ok_or_else(|| AuditError::Validation("payload must be a JSON object".into()))?;

    let step_key = object
        .get("step")
        .and_then(|s| s.get("key"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let fail = |message: &str| {
        if step_key.is_empty() {
            AuditError::Validation(message.to_string())
        } else {
            AuditError::invalid_step(&step_key, message)
        }
    };

    let step = object
        .get("step")
        .and_then(Value::as_object)
        .ok_or_else(|| fail("payload is missing step"))?;

    match step.get("name").and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => {}
        _ => return Err(fail("payload is missing step.name")),
    }

    match step.get("number").and_then(Value::as_i64) {
        Some(number) if number >= 1 => {}
        _ => return Err(fail("step.number must be an integer of at least 1")),
    }

    let evidences = object
        .get("evidences")
        .and_then(Value::as_object)
        .ok_or_else(|| fail("payload is missing evidences"))?;

    for side in ["before", "after"] {
        if !evidences.get(side).is_some_and(Value::is_array) {
            return Err(fail(&format!("evidences.{} must be an array", side)));
        }
    }

    let payload: StructuredChangePayload = serde_json::from_value(value.clone())
        .map_err(|e| fail(&format!("malformed payload: {}", e)))?;
    payload.validate()?;

    Ok(payload)
}
