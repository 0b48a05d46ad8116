//! Manual-override tracking — suspending entities a human has touched.

use std::collections::{BTreeMap, HashMap};

use lumen_domain::command::LightReading;
use lumen_domain::id::EntityId;
use lumen_domain::light::{Attribute, AttributeValue};

#[derive(Debug, Default)]
struct EntityRecord {
    suspended: bool,
    last_commanded: Option<BTreeMap<Attribute, AttributeValue>>,
}

/// Detects manual overrides by comparing readings against the values the
/// engine itself last commanded.
///
/// Without a recorded baseline nothing can be called an override, so
/// readings are ignored until the engine has commanded the entity at
/// least once. The baseline doubles as the redundancy gate: evaluation
/// skips attributes whose target matches it.
#[derive(Debug, Default)]
pub struct OverrideTracker {
    records: HashMap<EntityId, EntityRecord>,
}

impl OverrideTracker {
    /// Whether the entity is currently suspended from automatic control.
    #[must_use]
    pub fn is_suspended(&self, entity_id: &EntityId) -> bool {
        self.records
            .get(entity_id)
            .is_some_and(|record| record.suspended)
    }

    /// The values last commanded for this entity, if any.
    #[must_use]
    pub fn last_commanded(
        &self,
        entity_id: &EntityId,
    ) -> Option<&BTreeMap<Attribute, AttributeValue>> {
        self.records.get(entity_id)?.last_commanded.as_ref()
    }

    /// Record values the engine just commanded.
    ///
    /// Merged attribute by attribute, so a brightness-only command keeps
    /// the previously recorded power.
    pub fn record_command(
        &mut self,
        entity_id: &EntityId,
        values: &BTreeMap<Attribute, AttributeValue>,
    ) {
        let record = self.records.entry(entity_id.clone()).or_default();
        record
            .last_commanded
            .get_or_insert_with(BTreeMap::new)
            .extend(values.iter().map(|(attribute, value)| (*attribute, *value)));
    }

    /// Compare a reading against the recorded baseline.
    ///
    /// Suspends the entity when any read-back attribute materially differs
    /// from what the engine last commanded for it. Returns `true` only on
    /// the edge where suspension switches on.
    pub fn observe(&mut self, reading: &LightReading) -> bool {
        let Some(record) = self.records.get_mut(&reading.entity_id) else {
            return false;
        };
        let Some(baseline) = &record.last_commanded else {
            return false;
        };
        let overridden = reading.values.iter().any(|(attribute, value)| {
            baseline
                .get(attribute)
                .is_some_and(|expected| expected.materially_differs(value))
        });
        if overridden && !record.suspended {
            record.suspended = true;
            return true;
        }
        false
    }

    /// Suspend the entity unconditionally.
    ///
    /// Returns whether the flag actually changed.
    pub fn stop(&mut self, entity_id: &EntityId) -> bool {
        let record = self.records.entry(entity_id.clone()).or_default();
        let changed = !record.suspended;
        record.suspended = true;
        changed
    }

    /// Lift the suspension and clear the baseline.
    ///
    /// Clearing the baseline makes the next evaluation emit every target
    /// value again, snapping the entity back onto its curves. Returns
    /// whether the suspension flag actually changed.
    pub fn resume(&mut self, entity_id: &EntityId) -> bool {
        let record = self.records.entry(entity_id.clone()).or_default();
        let changed = record.suspended;
        record.suspended = false;
        record.last_commanded = None;
        changed
    }
}
