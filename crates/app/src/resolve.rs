//! Governing-scene selection.

use std::cmp::Reverse;

use lumen_domain::id::EntityId;
use lumen_domain::scene::{Scene, SceneSet};

use crate::activation::ActivationSet;

/// Pick the scene that governs an entity right now.
///
/// Highest priority wins; a tie breaks to the lexically smallest scene
/// name, so the winner is stable across ticks. Flags pointing at scenes
/// missing from the snapshot are skipped. Returns `None` when no active
/// scene remains, which leaves the entity untouched.
#[must_use]
pub fn governing_scene<'a>(
    scenes: &'a SceneSet,
    activation: &ActivationSet,
    entity_id: &EntityId,
) -> Option<&'a Scene> {
    activation
        .active_for(entity_id)
        .filter_map(|name| scenes.get(name))
        .max_by_key(|scene| (scene.priority(), Reverse(scene.name())))
}
