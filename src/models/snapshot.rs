//! Process snapshot model
//!
//! A snapshot maps step keys to their state. A step missing from a snapshot
//! is archived or not applicable to the entity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::step_state::StepState;

/// State of every tracked step of one client's process
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessSnapshot {
    steps: BTreeMap<String, StepState>,
}

impl ProcessSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion of a step state
    pub fn with_step(mut self, key: impl Into<String>, state: StepState) -> Self {
        self.steps.insert(key.into(), state);
        self
    }

    /// Insert or replace the state of a step
    pub fn insert(&mut self, key: impl Into<String>, state: StepState) -> Option<StepState> {
        self.steps.insert(key.into(), state)
    }

    /// Get the state of a step
    pub fn get(&self, key: &str) -> Option<&StepState> {
        self.steps.get(key)
    }

    /// Whether the snapshot tracks a step
    pub fn contains(&self, key: &str) -> bool {
        self.steps.contains_key(key)
    }

    /// Tracked step keys in key order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.steps.keys().map(String::as_str)
    }

    /// Iterate over tracked steps in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StepState)> {
        self.steps.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of tracked steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no step is tracked
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_builder_and_lookup() {
        let date = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let snapshot = ProcessSnapshot::new()
            .with_step("promiseSent", StepState::completed_on(date))
            .with_step("deedSigned", StepState::not_started());

        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.get("promiseSent").unwrap().completed);
        assert!(!snapshot.contains("keysDelivered"));
        assert_eq!(snapshot.keys().collect::<Vec<_>>(), vec!["deedSigned", "promiseSent"]);
    }

    #[test]
    fn test_transparent_json() {
        let json = r#"{"promiseSent": {"completed": true, "completionDate": "2024-01-10"}}"#;
        let snapshot: ProcessSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.get("promiseSent").unwrap().completed);
    }
}
