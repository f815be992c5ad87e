//! Who made a change and what it is about

use serde::{Deserialize, Serialize};

use super::ids::{ClientId, ProcessId, PropertyId};

/// The user or system that performed a workflow update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: String,
    pub display_name: String,
}

impl Actor {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Entities an audit entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRefs {
    pub client_id: ClientId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<PropertyId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_id: Option<ProcessId>,
}

impl EntityRefs {
    /// References pointing at a client only
    pub fn client(client_id: ClientId) -> Self {
        Self {
            client_id,
            property_id: None,
            process_id: None,
        }
    }

    pub fn with_property(mut self, property_id: PropertyId) -> Self {
        self.property_id = Some(property_id);
        self
    }

    pub fn with_process(mut self, process_id: ProcessId) -> Self {
        self.process_id = Some(process_id);
        self
    }
}
