//! JSON handlers for per-entity status.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use lumen_app::engine::EntityStatus;
use lumen_app::ports::{Clock, EventPublisher, LightCommander};
use lumen_domain::id::{EntityId, SceneName};
use lumen_domain::light::{Attribute, AttributeValue};

use crate::state::AppState;

/// Response body describing one managed entity.
#[derive(Serialize)]
pub struct EntityStatusResponse {
    pub entity_id: EntityId,
    pub suspended: bool,
    pub timeshift_minutes: i32,
    pub active_scenes: Vec<SceneName>,
    pub governing_scene: Option<SceneName>,
    pub last_commanded: Option<BTreeMap<Attribute, AttributeValue>>,
}

impl From<EntityStatus> for EntityStatusResponse {
    fn from(status: EntityStatus) -> Self {
        Self {
            entity_id: status.entity_id,
            suspended: status.suspended,
            timeshift_minutes: status.timeshift_minutes,
            active_scenes: status.active_scenes,
            governing_scene: status.governing_scene,
            last_commanded: status.last_commanded,
        }
    }
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<EntityStatusResponse>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `GET /api/entities` — status of every managed entity.
pub async fn list<LC, P, C>(State(state): State<AppState<LC, P, C>>) -> ListResponse
where
    LC: LightCommander + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let statuses = state
        .engine
        .entity_statuses()
        .await
        .into_iter()
        .map(EntityStatusResponse::from)
        .collect();
    ListResponse::Ok(Json(statuses))
}
