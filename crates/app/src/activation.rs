//! Condition-met flags — which scenes are currently active for which
//! entities.

use std::collections::{BTreeSet, HashMap};

use lumen_domain::id::{EntityId, SceneName};

/// Tracks which scenes are marked condition-met for which entities.
///
/// A (scene, entity) flag is a plain boolean: setting it twice is the same
/// as setting it once, and unsetting an absent flag is a no-op.
#[derive(Debug, Default)]
pub struct ActivationSet {
    active: HashMap<EntityId, BTreeSet<SceneName>>,
}

impl ActivationSet {
    /// Mark a scene condition-met for an entity.
    ///
    /// Returns whether the flag actually changed.
    pub fn set(&mut self, entity_id: &EntityId, scene: &SceneName) -> bool {
        self.active
            .entry(entity_id.clone())
            .or_default()
            .insert(scene.clone())
    }

    /// Clear a scene's flag for an entity.
    ///
    /// Returns whether the flag actually changed.
    pub fn unset(&mut self, entity_id: &EntityId, scene: &SceneName) -> bool {
        let Some(scenes) = self.active.get_mut(entity_id) else {
            return false;
        };
        let removed = scenes.remove(scene);
        if scenes.is_empty() {
            self.active.remove(entity_id);
        }
        removed
    }

    /// Scene names currently active for an entity, in lexical order.
    pub fn active_for(&self, entity_id: &EntityId) -> impl Iterator<Item = &SceneName> {
        self.active.get(entity_id).into_iter().flatten()
    }

    /// Whether any scene is active for the entity.
    #[must_use]
    pub fn any_active(&self, entity_id: &EntityId) -> bool {
        self.active.contains_key(entity_id)
    }

    /// Drop flags for scenes `keep` rejects.
    ///
    /// Called when a new snapshot arrives, so flags for scenes that no
    /// longer exist cannot linger forever.
    pub fn retain_scenes(&mut self, keep: impl Fn(&SceneName) -> bool) {
        self.active.retain(|_, scenes| {
            scenes.retain(&keep);
            !scenes.is_empty()
        });
    }
}
