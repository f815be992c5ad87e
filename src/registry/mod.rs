//! Step configuration registry
//!
//! The registry is the ordered catalog of workflow steps. Step numbers shown in
//! narratives and payloads are positions among the steps applicable under the
//! client's current financial context, never positions in the full catalog.

mod catalog;
pub mod step_config;

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{ProcessAuditPaths, Settings};
use crate::error::{AuditError, AuditResult};
use crate::models::FinancialContext;

pub use catalog::closing_process_steps;
pub use step_config::{Applicability, EvidenceSlot, StepConfig};

/// 1-based position of a step among the applicable steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepPosition {
    pub number: usize,
    pub total: usize,
}

/// On-disk catalog layout
#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    steps: Vec<StepConfig>,
}

/// Immutable, ordered catalog of workflow steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepConfigRegistry {
    steps: Vec<StepConfig>,
}

impl StepConfigRegistry {
    /// Create a registry, rejecting duplicate keys, empty labels and
    /// duplicate evidence slots
    pub fn new(steps: Vec<StepConfig>) -> AuditResult<Self> {
        let mut keys = HashSet::new();

        for step in &steps {
            if step.key.trim().is_empty() {
                return Err(AuditError::Validation("Step key cannot be empty".into()));
            }

            if !keys.insert(step.key.as_str()) {
                return Err(AuditError::invalid_step(&step.key, "duplicate step key"));
            }

            if step.label.trim().is_empty() {
                return Err(AuditError::invalid_step(&step.key, "step label cannot be empty"));
            }

            let mut slots = HashSet::new();
            for slot in &step.required_evidence {
                if !slots.insert(slot.id.as_str()) {
                    return Err(AuditError::invalid_step(
                        &step.key,
                        format!("duplicate evidence slot '{}'", slot.id),
                    ));
                }
            }
        }

        Ok(Self { steps })
    }

    /// The built-in closing process
    pub fn closing_process() -> Self {
        Self {
            steps: closing_process_steps(),
        }
    }

    /// Parse a catalog from YAML (`steps: [...]`)
    pub fn from_yaml_str(yaml: &str) -> AuditResult<Self> {
        let file: CatalogFile = serde_yaml::from_str(yaml)
            .map_err(|e| AuditError::Config(format!("Failed to parse step catalog: {}", e)))?;
        Self::new(file.steps)
    }

    /// Load a catalog from a YAML file
    pub fn load(path: &Path) -> AuditResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AuditError::Io(format!(
                "Failed to read step catalog {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// The catalog configured in settings, or the built-in one
    pub fn from_settings(settings: &Settings, paths: &ProcessAuditPaths) -> AuditResult<Self> {
        match settings.resolved_catalog_file(paths) {
            Some(path) => Self::load(&path),
            None => Ok(Self::closing_process()),
        }
    }

    /// Serialize the catalog to YAML
    pub fn to_yaml(&self) -> AuditResult<String> {
        let file = CatalogFile {
            steps: self.steps.clone(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }

    /// All steps in catalog order
    pub fn steps(&self) -> &[StepConfig] {
        &self.steps
    }

    /// Look up a step by key
    pub fn get(&self, key: &str) -> Option<&StepConfig> {
        self.steps.iter().find(|step| step.key == key)
    }

    /// Whether the catalog knows a step key
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Steps applicable under the context, in catalog order
    pub fn applicable_steps(&self, ctx: &FinancialContext) -> Vec<&StepConfig> {
        self.steps.iter().filter(|step| step.applies_to(ctx)).collect()
    }

    /// Position of a step among the applicable steps
    ///
    /// Returns `None` when the step is unknown or not applicable.
    pub fn position(&self, key: &str, ctx: &FinancialContext) -> Option<StepPosition> {
        let applicable = self.applicable_steps(ctx);
        let total = applicable.len();

        applicable
            .iter()
            .position(|step| step.key == key)
            .map(|index| StepPosition {
                number: index + 1,
                total,
            })
    }
}

impl Default for StepConfigRegistry {
    fn default() -> Self {
        Self::closing_process()
    }
}
