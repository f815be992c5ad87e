//! Step configuration
//!
//! A step configuration names a workflow step, says under which financial
//! contexts it applies and lists the evidence slots it requires.

use serde::{Deserialize, Serialize};

use crate::models::{FinancialContext, PaymentMethod};

/// Condition under which a step applies to a client's process
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "when", rename_all = "snake_case")]
pub enum Applicability {
    /// Every process goes through the step
    #[default]
    Always,
    /// A financial institution takes part in the purchase
    Financed,
    /// The purchase is paid with one of the listed methods
    PaymentMethod { methods: Vec<PaymentMethod> },
    /// A housing subsidy is involved
    Subsidy,
    /// Severance funds are involved
    SeveranceFunds,
    AllOf { conditions: Vec<Applicability> },
    AnyOf { conditions: Vec<Applicability> },
    Not { condition: Box<Applicability> },
}

impl Applicability {
    /// Evaluate the condition against a financial context
    pub fn applies(&self, ctx: &FinancialContext) -> bool {
        match self {
            Self::Always => true,
            Self::Financed => ctx.is_financed(),
            Self::PaymentMethod { methods } => methods.contains(&ctx.payment_method),
            Self::Subsidy => ctx.has_subsidy,
            Self::SeveranceFunds => ctx.uses_severance_funds,
            Self::AllOf { conditions } => conditions.iter().all(|c| c.applies(ctx)),
            Self::AnyOf { conditions } => conditions.iter().any(|c| c.applies(ctx)),
            Self::Not { condition } => !condition.applies(ctx),
        }
    }
}

/// An evidence requirement of a step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceSlot {
    pub id: String,
    pub label: String,
}

/// Static configuration of a workflow step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepConfig {
    /// Key used in process snapshots
    pub key: String,

    /// Name shown in narratives and views
    pub label: String,

    #[serde(default)]
    pub applicability: Applicability,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_evidence: Vec<EvidenceSlot>,
}

impl StepConfig {
    /// Create a step that always applies and requires no evidence
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            applicability: Applicability::Always,
            required_evidence: Vec::new(),
        }
    }

    /// Restrict the step to contexts matching `applicability`
    pub fn applicable_when(mut self, applicability: Applicability) -> Self {
        self.applicability = applicability;
        self
    }

    /// Add a required evidence slot
    pub fn requires(mut self, id: impl Into<String>, label: impl Into<String>) -> Self {
        self.required_evidence.push(EvidenceSlot {
            id: id.into(),
            label: label.into(),
        });
        self
    }

    /// Whether the step applies under the given context
    pub fn applies_to(&self, ctx: &FinancialContext) -> bool {
        self.applicability.applies(ctx)
    }
}
