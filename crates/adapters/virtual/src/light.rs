//! Virtual light — holds its attribute values in memory.

use std::collections::BTreeMap;
use std::sync::Mutex;

use lumen_domain::id::EntityId;
use lumen_domain::light::{Attribute, AttributeValue};

/// A simulated light that remembers the last values written to it.
pub struct VirtualLight {
    entity_id: EntityId,
    values: Mutex<BTreeMap<Attribute, AttributeValue>>,
}

impl VirtualLight {
    /// Create a light with no attribute values set yet.
    #[must_use]
    pub fn new(entity_id: EntityId) -> Self {
        Self {
            entity_id,
            values: Mutex::new(BTreeMap::new()),
        }
    }

    /// The entity id of this light.
    #[must_use]
    pub fn entity_id(&self) -> &EntityId {
        &self.entity_id
    }

    /// Snapshot of the current attribute values.
    #[must_use]
    pub fn values(&self) -> BTreeMap<Attribute, AttributeValue> {
        self.lock_values().clone()
    }

    /// Merge new values into the current state, attribute by attribute.
    pub fn set_values(&self, values: &BTreeMap<Attribute, AttributeValue>) {
        let mut current = self.lock_values();
        for (attribute, value) in values {
            current.insert(*attribute, *value);
        }
    }

    fn lock_values(&self) -> std::sync::MutexGuard<'_, BTreeMap<Attribute, AttributeValue>> {
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
