//! Scene engine — arbitrates active scenes and drives lights along their
//! curves.
//!
//! All engine state lives behind one internal mutex, so service calls,
//! periodic ticks, and read-back observations apply strictly one at a
//! time. Every state-changing call re-evaluates the entities it touched
//! immediately instead of waiting for the next tick.

use std::collections::{BTreeMap, BTreeSet};

use tokio::sync::Mutex;

use lumen_domain::command::{LightCommand, LightReading};
use lumen_domain::error::{LumenError, UnknownSceneError};
use lumen_domain::event::{Event, EventType};
use lumen_domain::id::{EntityId, SceneName};
use lumen_domain::light::{Attribute, AttributeValue};
use lumen_domain::scene::{SceneDefinition, SceneSet};
use lumen_domain::time::TimeOfDay;

use crate::activation::ActivationSet;
use crate::override_tracker::OverrideTracker;
use crate::ports::{Clock, EventPublisher, LightCommander};
use crate::resolve::governing_scene;
use crate::timeshift::TimeshiftTable;

/// Point-in-time view of one managed entity, for the read surface.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityStatus {
    pub entity_id: EntityId,
    pub suspended: bool,
    pub timeshift_minutes: i32,
    pub active_scenes: Vec<SceneName>,
    pub governing_scene: Option<SceneName>,
    pub last_commanded: Option<BTreeMap<Attribute, AttributeValue>>,
}

struct EngineState {
    scenes: SceneSet,
    entities: BTreeSet<EntityId>,
    activation: ActivationSet,
    timeshift: TimeshiftTable,
    overrides: OverrideTracker,
}

/// The scene engine.
///
/// Generic over the light commander, the event publisher, and the clock,
/// all injected at construction.
pub struct SceneEngine<LC, P, C> {
    commander: LC,
    publisher: P,
    clock: C,
    state: Mutex<EngineState>,
}

impl<LC, P, C> SceneEngine<LC, P, C>
where
    LC: LightCommander,
    P: EventPublisher,
    C: Clock,
{
    /// Create an engine with an empty snapshot and no managed entities.
    pub fn new(commander: LC, publisher: P, clock: C) -> Self {
        Self {
            commander,
            publisher,
            clock,
            state: Mutex::new(EngineState {
                scenes: SceneSet::default(),
                entities: BTreeSet::new(),
                activation: ActivationSet::default(),
                timeshift: TimeshiftTable::default(),
                overrides: OverrideTracker::default(),
            }),
        }
    }

    /// Introduce entities under engine management.
    ///
    /// The engine never invents entities: only registered ones are
    /// evaluated, and service calls naming anything else are skipped.
    pub async fn register_entities(&self, entity_ids: Vec<EntityId>) {
        let mut state = self.state.lock().await;
        for entity_id in entity_ids {
            state.entities.insert(entity_id);
        }
    }

    /// Mark `scene` condition-met for the given entities.
    ///
    /// Idempotent per (scene, entity) pair: repeated calls change nothing
    /// and publish nothing. Unknown entities are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::UnknownScene`] when `scene` is not in the
    /// current snapshot.
    pub async fn set_scene_condition_met(
        &self,
        entity_ids: &[EntityId],
        scene: &SceneName,
    ) -> Result<(), LumenError> {
        let mut state = self.state.lock().await;
        if !state.scenes.contains(scene) {
            return Err(UnknownSceneError {
                name: scene.to_string(),
            }
            .into());
        }
        let mut affected = Vec::new();
        for entity_id in Self::known(&state.entities, entity_ids) {
            if state.activation.set(&entity_id, scene) {
                self.publish(
                    EventType::SceneActivated,
                    Some(entity_id.clone()),
                    serde_json::json!({ "scene": scene }),
                )
                .await;
                affected.push(entity_id);
            }
        }
        self.evaluate_entities(&mut state, &affected).await;
        Ok(())
    }

    /// Clear `scene`'s condition-met flag for the given entities.
    ///
    /// Idempotent; affected entities are re-evaluated immediately, so
    /// control falls back to the next scene in priority order.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::UnknownScene`] when `scene` is not in the
    /// current snapshot.
    pub async fn unset_scene_condition_met(
        &self,
        entity_ids: &[EntityId],
        scene: &SceneName,
    ) -> Result<(), LumenError> {
        let mut state = self.state.lock().await;
        if !state.scenes.contains(scene) {
            return Err(UnknownSceneError {
                name: scene.to_string(),
            }
            .into());
        }
        let mut affected = Vec::new();
        for entity_id in Self::known(&state.entities, entity_ids) {
            if state.activation.unset(&entity_id, scene) {
                self.publish(
                    EventType::SceneDeactivated,
                    Some(entity_id.clone()),
                    serde_json::json!({ "scene": scene }),
                )
                .await;
                affected.push(entity_id);
            }
        }
        self.evaluate_entities(&mut state, &affected).await;
        Ok(())
    }

    /// Suspend automatic control for the given entities.
    ///
    /// Suspended entities keep their current values until someone resumes
    /// them; evaluation skips them entirely.
    pub async fn stop_adjustments(&self, entity_ids: &[EntityId]) {
        let mut state = self.state.lock().await;
        for entity_id in Self::known(&state.entities, entity_ids) {
            if state.overrides.stop(&entity_id) {
                self.publish(
                    EventType::AdjustmentsStopped,
                    Some(entity_id),
                    serde_json::json!({}),
                )
                .await;
            }
        }
    }

    /// Resume automatic control for the given entities.
    ///
    /// Clears the recorded baseline, so the next evaluation re-emits every
    /// target value and the entity snaps back onto its curves. That
    /// evaluation happens before the call returns.
    pub async fn continue_adjustments(&self, entity_ids: &[EntityId]) {
        let mut state = self.state.lock().await;
        let mut affected = Vec::new();
        for entity_id in Self::known(&state.entities, entity_ids) {
            if state.overrides.resume(&entity_id) {
                self.publish(
                    EventType::AdjustmentsResumed,
                    Some(entity_id.clone()),
                    serde_json::json!({}),
                )
                .await;
            }
            affected.push(entity_id);
        }
        self.evaluate_entities(&mut state, &affected).await;
    }

    /// Replace the given entities' timeshift, clamped to ±12 hours.
    pub async fn set_timeshift(&self, entity_ids: &[EntityId], minutes: i32) {
        let mut state = self.state.lock().await;
        let mut affected = Vec::new();
        for entity_id in Self::known(&state.entities, entity_ids) {
            let before = state.timeshift.get(&entity_id);
            let stored = state.timeshift.set(&entity_id, minutes);
            if stored != before {
                self.publish(
                    EventType::TimeshiftChanged,
                    Some(entity_id.clone()),
                    serde_json::json!({ "minutes": stored }),
                )
                .await;
                affected.push(entity_id);
            }
        }
        self.evaluate_entities(&mut state, &affected).await;
    }

    /// Adjust the given entities' timeshift by a delta, clamped to ±12 hours.
    pub async fn shift_timeshift(&self, entity_ids: &[EntityId], delta: i32) {
        let mut state = self.state.lock().await;
        let mut affected = Vec::new();
        for entity_id in Self::known(&state.entities, entity_ids) {
            let before = state.timeshift.get(&entity_id);
            let stored = state.timeshift.shift(&entity_id, delta);
            if stored != before {
                self.publish(
                    EventType::TimeshiftChanged,
                    Some(entity_id.clone()),
                    serde_json::json!({ "minutes": stored }),
                )
                .await;
                affected.push(entity_id);
            }
        }
        self.evaluate_entities(&mut state, &affected).await;
    }

    /// Ingest a read-back from the light-control collaborator.
    ///
    /// A material mismatch against the values the engine last commanded
    /// suspends the entity. Readings for unmanaged entities are ignored.
    pub async fn observe_reading(&self, reading: LightReading) {
        let mut state = self.state.lock().await;
        if !state.entities.contains(&reading.entity_id) {
            tracing::debug!(entity_id = %reading.entity_id, "reading for unmanaged entity");
            return;
        }
        if state.overrides.observe(&reading) {
            tracing::info!(entity_id = %reading.entity_id, "manual override detected");
            self.publish(
                EventType::OverrideDetected,
                Some(reading.entity_id.clone()),
                serde_json::json!({ "observed": reading.values }),
            )
            .await;
        }
    }

    /// Replace the whole scene snapshot.
    ///
    /// Malformed curves are dropped with a warning; condition flags
    /// pointing at scenes that no longer exist are pruned. Every managed
    /// entity is re-evaluated against the new snapshot before the call
    /// returns.
    ///
    /// # Errors
    ///
    /// Returns [`LumenError::Validation`] when two definitions share a
    /// name; the previous snapshot stays in place.
    pub async fn replace_scenes(
        &self,
        definitions: Vec<SceneDefinition>,
    ) -> Result<(), LumenError> {
        let (scenes, issues) = SceneSet::compile(definitions)?;
        for issue in &issues {
            tracing::warn!(
                scene = %issue.scene,
                entity_id = %issue.entity_id,
                attribute = %issue.attribute,
                error = %issue.error,
                "dropped malformed curve"
            );
        }

        let mut state = self.state.lock().await;
        state.scenes = scenes;
        let EngineState {
            scenes, activation, ..
        } = &mut *state;
        activation.retain_scenes(|name| scenes.contains(name));

        self.publish(
            EventType::ScenesReloaded,
            None,
            serde_json::json!({
                "scenes": state.scenes.len(),
                "dropped_curves": issues.len(),
            }),
        )
        .await;

        let targets: Vec<_> = state.entities.iter().cloned().collect();
        self.evaluate_entities(&mut state, &targets).await;
        Ok(())
    }

    /// Evaluate every managed entity against the current time.
    ///
    /// The daemon calls this on a fixed cadence; it is also safe to call
    /// at any other moment.
    pub async fn tick(&self) {
        let mut state = self.state.lock().await;
        let targets: Vec<_> = state.entities.iter().cloned().collect();
        self.evaluate_entities(&mut state, &targets).await;
    }

    /// Point-in-time view of every managed entity.
    pub async fn entity_statuses(&self) -> Vec<EntityStatus> {
        let state = self.state.lock().await;
        state
            .entities
            .iter()
            .map(|entity_id| EntityStatus {
                entity_id: entity_id.clone(),
                suspended: state.overrides.is_suspended(entity_id),
                timeshift_minutes: state.timeshift.get(entity_id),
                active_scenes: state.activation.active_for(entity_id).cloned().collect(),
                governing_scene: governing_scene(&state.scenes, &state.activation, entity_id)
                    .map(|scene| scene.name().clone()),
                last_commanded: state.overrides.last_commanded(entity_id).cloned(),
            })
            .collect()
    }

    /// Authored forms of the scenes in the current snapshot.
    pub async fn scene_definitions(&self) -> Vec<SceneDefinition> {
        self.state.lock().await.scenes.definitions()
    }

    /// Filter a service call's entity list down to managed entities,
    /// warning about the rest.
    fn known(entities: &BTreeSet<EntityId>, entity_ids: &[EntityId]) -> Vec<EntityId> {
        entity_ids
            .iter()
            .filter(|entity_id| {
                if entities.contains(*entity_id) {
                    true
                } else {
                    tracing::warn!(entity_id = %entity_id, "ignoring unknown entity");
                    false
                }
            })
            .cloned()
            .collect()
    }

    async fn publish(
        &self,
        event_type: EventType,
        entity_id: Option<EntityId>,
        data: serde_json::Value,
    ) {
        // Fire-and-forget: a full or closed bus never blocks the engine.
        let _ = self
            .publisher
            .publish(Event::new(event_type, entity_id, data))
            .await;
    }

    /// Run the evaluation pass for a set of entities.
    ///
    /// An empty snapshot halts all automatic control, whatever flags or
    /// shifts are in place.
    async fn evaluate_entities(&self, state: &mut EngineState, targets: &[EntityId]) {
        if state.scenes.is_empty() {
            return;
        }
        let now = self.clock.time_of_day();
        for entity_id in targets {
            self.evaluate_entity(state, entity_id, now).await;
        }
    }

    async fn evaluate_entity(&self, state: &mut EngineState, entity_id: &EntityId, now: TimeOfDay) {
        if state.overrides.is_suspended(entity_id) {
            return;
        }
        let shifted = now.shifted_by(state.timeshift.get(entity_id));
        let Some(scene) = governing_scene(&state.scenes, &state.activation, entity_id) else {
            return;
        };
        let scene_name = scene.name().clone();
        let Some(curves) = scene.curves_for(entity_id) else {
            return;
        };

        let mut changed = BTreeMap::new();
        for (attribute, curve) in curves {
            let target = curve.value_at(shifted);
            let redundant = state
                .overrides
                .last_commanded(entity_id)
                .and_then(|baseline| baseline.get(attribute))
                .is_some_and(|previous| !previous.materially_differs(&target));
            if !redundant {
                changed.insert(*attribute, target);
            }
        }
        if changed.is_empty() {
            return;
        }

        // Record before delivery: the read-back echo then compares equal,
        // and a failed delivery is never retried.
        state.overrides.record_command(entity_id, &changed);
        let command = LightCommand {
            entity_id: entity_id.clone(),
            values: changed,
        };
        if let Err(error) = self.commander.apply(command.clone()).await {
            tracing::warn!(entity_id = %entity_id, error = %error, "command delivery failed");
        }
        self.publish(
            EventType::CommandIssued,
            Some(entity_id.clone()),
            serde_json::json!({
                "scene": scene_name,
                "values": command.values,
            }),
        )
        .await;
    }
}
