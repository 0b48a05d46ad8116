//! Commands sent to, and readings received from, the light-control
//! collaborator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::EntityId;
use crate::light::{Attribute, AttributeValue};

/// Target values for one entity.
///
/// Only attributes that actually need to change are present; the
/// collaborator applies them as a single adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightCommand {
    pub entity_id: EntityId,
    pub values: BTreeMap<Attribute, AttributeValue>,
}

impl LightCommand {
    #[must_use]
    pub fn new(entity_id: EntityId) -> Self {
        Self {
            entity_id,
            values: BTreeMap::new(),
        }
    }

    /// Add a target value, consuming and returning the command.
    #[must_use]
    pub fn with(mut self, attribute: Attribute, value: impl Into<AttributeValue>) -> Self {
        self.values.insert(attribute, value.into());
        self
    }

    /// Whether the command carries no values at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Observed values reported back for one entity.
///
/// Readings arrive asynchronously from the collaborator, both as echoes of
/// applied commands and as genuinely external changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightReading {
    pub entity_id: EntityId,
    pub values: BTreeMap<Attribute, AttributeValue>,
}

impl LightReading {
    #[must_use]
    pub fn new(entity_id: EntityId) -> Self {
        Self {
            entity_id,
            values: BTreeMap::new(),
        }
    }

    /// Add an observed value, consuming and returning the reading.
    #[must_use]
    pub fn with(mut self, attribute: Attribute, value: impl Into<AttributeValue>) -> Self {
        self.values.insert(attribute, value.into());
        self
    }
}
