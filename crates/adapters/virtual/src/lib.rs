//! # lumen-adapter-virtual
//!
//! Virtual light adapter that simulates a small set of lights for testing
//! and demonstration purposes.
//!
//! Commands applied through the [`LightCommander`] port update in-memory
//! state and are echoed back on a broadcast channel as [`LightReading`]s,
//! the same way a real light platform reports state changes after a
//! command. [`VirtualLights::simulate_external_change`] plays the part of
//! a person at a wall switch: it changes the state and emits a reading
//! without any command having been issued.
//!
//! ## Dependency rule
//!
//! Depends on `lumen-app` (port traits) and `lumen-domain` only.

mod light;

use std::collections::BTreeMap;
use std::collections::HashMap;

use tokio::sync::broadcast;

use lumen_app::ports::LightCommander;
use lumen_domain::command::{LightCommand, LightReading};
use lumen_domain::error::{DeliveryError, LumenError};
use lumen_domain::id::EntityId;
use lumen_domain::light::{Attribute, AttributeValue};

pub use light::VirtualLight;

/// A set of simulated lights behind the [`LightCommander`] port.
pub struct VirtualLights {
    lights: HashMap<EntityId, VirtualLight>,
    readings: broadcast::Sender<LightReading>,
}

impl VirtualLights {
    /// Create one simulated light per entity id.
    ///
    /// `capacity` bounds the read-back broadcast channel; slow subscribers
    /// miss older readings rather than blocking the lights.
    #[must_use]
    pub fn new(entity_ids: Vec<EntityId>, capacity: usize) -> Self {
        let (readings, _) = broadcast::channel(capacity);
        let lights = entity_ids
            .into_iter()
            .map(|entity_id| (entity_id.clone(), VirtualLight::new(entity_id)))
            .collect();
        Self { lights, readings }
    }

    /// The entity ids of every simulated light.
    #[must_use]
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.lights.keys().cloned().collect()
    }

    /// Subscribe to the read-back channel.
    ///
    /// Every applied command and every simulated external change emits one
    /// [`LightReading`].
    #[must_use]
    pub fn subscribe_readings(&self) -> broadcast::Receiver<LightReading> {
        self.readings.subscribe()
    }

    /// Snapshot of one light's current values.
    #[must_use]
    pub fn values(&self, entity_id: &EntityId) -> Option<BTreeMap<Attribute, AttributeValue>> {
        self.lights.get(entity_id).map(VirtualLight::values)
    }

    /// Change a light's state as if someone used a wall switch or app.
    ///
    /// The change is echoed on the read-back channel but no command is
    /// involved, so an engine watching the channel sees it as external.
    pub fn simulate_external_change(
        &self,
        entity_id: &EntityId,
        values: BTreeMap<Attribute, AttributeValue>,
    ) {
        let Some(light) = self.lights.get(entity_id) else {
            return;
        };
        light.set_values(&values);
        self.emit_reading(light);
    }

    fn emit_reading(&self, light: &VirtualLight) {
        let reading = LightReading {
            entity_id: light.entity_id().clone(),
            values: light.values(),
        };
        // Fire-and-forget: without subscribers there is nobody to inform.
        let _ = self.readings.send(reading);
    }
}

impl LightCommander for VirtualLights {
    async fn apply(&self, command: LightCommand) -> Result<(), LumenError> {
        let Some(light) = self.lights.get(&command.entity_id) else {
            return Err(DeliveryError {
                entity_id: command.entity_id,
                reason: "no such virtual light".to_string(),
            }
            .into());
        };
        light.set_values(&command.values);
        self.emit_reading(light);
        Ok(())
    }
}
