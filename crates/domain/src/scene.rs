//! Scenes — named, prioritised bundles of curves.
//!
//! A scene arrives from the scene-editing collaborator as a
//! [`SceneDefinition`] and is compiled into a [`Scene`] whose curves are
//! validated. The full set the engine arbitrates between is a [`SceneSet`],
//! replaced atomically as one snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::curve::{Curve, TimePoint};
use crate::error::{CurveError, ValidationError};
use crate::id::{EntityId, SceneName};
use crate::light::Attribute;

/// The authored form of a scene, as shipped by the scene-editing collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDefinition {
    pub name: SceneName,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub entities: BTreeMap<EntityId, BTreeMap<Attribute, Vec<TimePoint>>>,
}

/// A curve that failed validation and was dropped during compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveIssue {
    pub scene: SceneName,
    pub entity_id: EntityId,
    pub attribute: Attribute,
    pub error: CurveError,
}

/// A compiled scene holding validated curves.
#[derive(Debug, Clone)]
pub struct Scene {
    name: SceneName,
    priority: i32,
    curves: BTreeMap<EntityId, BTreeMap<Attribute, Curve>>,
}

impl Scene {
    /// Compile an authored definition, dropping malformed curves.
    ///
    /// A malformed curve never takes the whole scene down: the valid rest
    /// keeps working and every dropped curve is reported in the issue list.
    #[must_use]
    pub fn compile(definition: SceneDefinition) -> (Self, Vec<CurveIssue>) {
        let mut curves: BTreeMap<EntityId, BTreeMap<Attribute, Curve>> = BTreeMap::new();
        let mut issues = Vec::new();
        for (entity_id, attributes) in definition.entities {
            for (attribute, points) in attributes {
                match Curve::new(attribute, points) {
                    Ok(curve) => {
                        curves
                            .entry(entity_id.clone())
                            .or_default()
                            .insert(attribute, curve);
                    }
                    Err(error) => issues.push(CurveIssue {
                        scene: definition.name.clone(),
                        entity_id: entity_id.clone(),
                        attribute,
                        error,
                    }),
                }
            }
        }
        (
            Self {
                name: definition.name,
                priority: definition.priority,
                curves,
            },
            issues,
        )
    }

    #[must_use]
    pub fn name(&self) -> &SceneName {
        &self.name
    }

    #[must_use]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// The curves this scene defines for one entity.
    #[must_use]
    pub fn curves_for(&self, entity_id: &EntityId) -> Option<&BTreeMap<Attribute, Curve>> {
        self.curves.get(entity_id)
    }

    /// Whether the scene defines anything for the entity.
    #[must_use]
    pub fn covers(&self, entity_id: &EntityId) -> bool {
        self.curves.contains_key(entity_id)
    }

    /// Reconstruct the authored form from the surviving curves.
    #[must_use]
    pub fn definition(&self) -> SceneDefinition {
        SceneDefinition {
            name: self.name.clone(),
            priority: self.priority,
            entities: self
                .curves
                .iter()
                .map(|(entity_id, attributes)| {
                    (
                        entity_id.clone(),
                        attributes
                            .iter()
                            .map(|(attribute, curve)| (*attribute, curve.points().to_vec()))
                            .collect(),
                    )
                })
                .collect(),
        }
    }
}

/// The live set of scenes the engine arbitrates between.
#[derive(Debug, Clone, Default)]
pub struct SceneSet {
    scenes: BTreeMap<SceneName, Scene>,
}

impl SceneSet {
    /// Compile authored definitions into one snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateScene`] when two definitions
    /// share a name. Malformed curves are dropped and reported, never
    /// fatal.
    pub fn compile(
        definitions: Vec<SceneDefinition>,
    ) -> Result<(Self, Vec<CurveIssue>), ValidationError> {
        let mut scenes = BTreeMap::new();
        let mut issues = Vec::new();
        for definition in definitions {
            let name = definition.name.clone();
            let (scene, mut scene_issues) = Scene::compile(definition);
            issues.append(&mut scene_issues);
            if scenes.insert(name.clone(), scene).is_some() {
                return Err(ValidationError::DuplicateScene {
                    name: name.to_string(),
                });
            }
        }
        Ok((Self { scenes }, issues))
    }

    /// Whether any scene is loaded at all.
    ///
    /// An empty set halts all automatic control.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    #[must_use]
    pub fn get(&self, name: &SceneName) -> Option<&Scene> {
        self.scenes.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &SceneName) -> bool {
        self.scenes.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values()
    }

    /// Authored forms of every scene, for the read surface.
    #[must_use]
    pub fn definitions(&self) -> Vec<SceneDefinition> {
        self.scenes.values().map(Scene::definition).collect()
    }
}
