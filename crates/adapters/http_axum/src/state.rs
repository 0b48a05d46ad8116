//! Shared application state for axum handlers.

use std::sync::Arc;

use lumen_app::engine::SceneEngine;
use lumen_app::event_bus::InProcessEventBus;
use lumen_app::ports::{Clock, EventPublisher, LightCommander};

/// Application state shared across all axum handlers.
///
/// Generic over the light commander, event publisher, and clock to avoid
/// dynamic dispatch. `Clone` is implemented manually so the underlying
/// types themselves do not need to be `Clone` — only the `Arc` wrappers
/// are cloned.
pub struct AppState<LC, P, C> {
    /// The scene engine every handler drives.
    pub engine: Arc<SceneEngine<LC, P, C>>,
    /// Event bus the SSE endpoint subscribes to.
    pub event_bus: Arc<InProcessEventBus>,
}

impl<LC, P, C> Clone for AppState<LC, P, C> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            event_bus: Arc::clone(&self.event_bus),
        }
    }
}

impl<LC, P, C> AppState<LC, P, C>
where
    LC: LightCommander + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Create a new application state from an engine instance.
    pub fn new(engine: SceneEngine<LC, P, C>, event_bus: Arc<InProcessEventBus>) -> Self {
        Self {
            engine: Arc::new(engine),
            event_bus,
        }
    }

    /// Create a new application state from a pre-wrapped `Arc` engine.
    ///
    /// Use this when the engine needs to be shared with background tasks
    /// before constructing the HTTP state.
    pub fn from_arcs(engine: Arc<SceneEngine<LC, P, C>>, event_bus: Arc<InProcessEventBus>) -> Self {
        Self { engine, event_bus }
    }
}
