//! JSON API handler modules.

pub mod entities;
#[allow(clippy::missing_errors_doc)]
pub mod scenes;
#[allow(clippy::missing_errors_doc)]
pub mod services;
pub mod sse;

use axum::Router;
use axum::routing::{get, post};

use lumen_app::ports::{Clock, EventPublisher, LightCommander};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<LC, P, C>() -> Router<AppState<LC, P, C>>
where
    LC: LightCommander + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        // Services
        .route(
            "/services/set_scene_condition_met",
            post(services::set_scene_condition_met::<LC, P, C>),
        )
        .route(
            "/services/unset_scene_condition_met",
            post(services::unset_scene_condition_met::<LC, P, C>),
        )
        .route(
            "/services/stop_adjustments",
            post(services::stop_adjustments::<LC, P, C>),
        )
        .route(
            "/services/continue_adjustments",
            post(services::continue_adjustments::<LC, P, C>),
        )
        .route(
            "/services/set_timeshift",
            post(services::set_timeshift::<LC, P, C>),
        )
        .route(
            "/services/shift_timeshift",
            post(services::shift_timeshift::<LC, P, C>),
        )
        // Scenes
        .route(
            "/scenes",
            get(scenes::list::<LC, P, C>).put(scenes::replace::<LC, P, C>),
        )
        // Entities
        .route("/entities", get(entities::list::<LC, P, C>))
        // Events
        .route("/events/stream", get(sse::stream::<LC, P, C>))
}
