//! Per-entity timeshift — sliding an entity's perceived time along its
//! curves.

use std::collections::HashMap;

use lumen_domain::id::EntityId;

/// Largest allowed shift in either direction, in minutes (12 hours).
pub const MAX_SHIFT_MINUTES: i32 = 720;

/// Per-entity timeshift in whole minutes, lazily defaulting to zero.
#[derive(Debug, Default)]
pub struct TimeshiftTable {
    minutes: HashMap<EntityId, i32>,
}

impl TimeshiftTable {
    /// The entity's current shift in minutes.
    #[must_use]
    pub fn get(&self, entity_id: &EntityId) -> i32 {
        self.minutes.get(entity_id).copied().unwrap_or(0)
    }

    /// Replace the entity's shift, clamping into the allowed range.
    ///
    /// Returns the value actually stored.
    pub fn set(&mut self, entity_id: &EntityId, minutes: i32) -> i32 {
        let clamped = minutes.clamp(-MAX_SHIFT_MINUTES, MAX_SHIFT_MINUTES);
        self.minutes.insert(entity_id.clone(), clamped);
        clamped
    }

    /// Adjust the entity's shift by a delta, clamping the result.
    ///
    /// The clamp applies to the sum, so a shift already at the boundary
    /// absorbs further pushes in that direction.
    pub fn shift(&mut self, entity_id: &EntityId, delta: i32) -> i32 {
        let current = self.get(entity_id);
        self.set(entity_id, current.saturating_add(delta))
    }
}
