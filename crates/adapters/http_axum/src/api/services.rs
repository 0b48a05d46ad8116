//! JSON handlers for the scene service calls.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use lumen_app::ports::{Clock, EventPublisher, LightCommander};
use lumen_domain::error::LumenError;
use lumen_domain::id::{EntityId, SceneName};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `set_scene_condition_met` / `unset_scene_condition_met`.
#[derive(Deserialize)]
pub struct SceneConditionRequest {
    pub entity_ids: Vec<String>,
    pub scene: String,
}

/// Request body for `stop_adjustments` / `continue_adjustments`.
#[derive(Deserialize)]
pub struct AdjustmentsRequest {
    pub entity_ids: Vec<String>,
}

/// Request body for `set_timeshift`.
#[derive(Deserialize)]
pub struct SetTimeshiftRequest {
    pub entity_ids: Vec<String>,
    pub timeshift: i32,
}

/// Request body for `shift_timeshift`.
#[derive(Deserialize)]
pub struct ShiftTimeshiftRequest {
    pub entity_ids: Vec<String>,
    pub shift: i32,
}

/// Possible responses from the service call endpoints.
pub enum CallResponse {
    NoContent,
}

impl IntoResponse for CallResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

fn parse_entity_ids(raw: Vec<String>) -> Result<Vec<EntityId>, ApiError> {
    raw.into_iter()
        .map(|id| {
            EntityId::new(id).map_err(|err| ApiError::from(LumenError::Validation(err)))
        })
        .collect()
}

fn parse_scene(raw: String) -> Result<SceneName, ApiError> {
    SceneName::new(raw).map_err(|err| ApiError::from(LumenError::Validation(err)))
}

/// `POST /api/services/set_scene_condition_met`
pub async fn set_scene_condition_met<LC, P, C>(
    State(state): State<AppState<LC, P, C>>,
    Json(req): Json<SceneConditionRequest>,
) -> Result<CallResponse, ApiError>
where
    LC: LightCommander + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let entity_ids = parse_entity_ids(req.entity_ids)?;
    let scene = parse_scene(req.scene)?;
    state
        .engine
        .set_scene_condition_met(&entity_ids, &scene)
        .await?;
    Ok(CallResponse::NoContent)
}

/// `POST /api/services/unset_scene_condition_met`
pub async fn unset_scene_condition_met<LC, P, C>(
    State(state): State<AppState<LC, P, C>>,
    Json(req): Json<SceneConditionRequest>,
) -> Result<CallResponse, ApiError>
where
    LC: LightCommander + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let entity_ids = parse_entity_ids(req.entity_ids)?;
    let scene = parse_scene(req.scene)?;
    state
        .engine
        .unset_scene_condition_met(&entity_ids, &scene)
        .await?;
    Ok(CallResponse::NoContent)
}

/// `POST /api/services/stop_adjustments`
pub async fn stop_adjustments<LC, P, C>(
    State(state): State<AppState<LC, P, C>>,
    Json(req): Json<AdjustmentsRequest>,
) -> Result<CallResponse, ApiError>
where
    LC: LightCommander + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let entity_ids = parse_entity_ids(req.entity_ids)?;
    state.engine.stop_adjustments(&entity_ids).await;
    Ok(CallResponse::NoContent)
}

/// `POST /api/services/continue_adjustments`
pub async fn continue_adjustments<LC, P, C>(
    State(state): State<AppState<LC, P, C>>,
    Json(req): Json<AdjustmentsRequest>,
) -> Result<CallResponse, ApiError>
where
    LC: LightCommander + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let entity_ids = parse_entity_ids(req.entity_ids)?;
    state.engine.continue_adjustments(&entity_ids).await;
    Ok(CallResponse::NoContent)
}

/// `POST /api/services/set_timeshift`
pub async fn set_timeshift<LC, P, C>(
    State(state): State<AppState<LC, P, C>>,
    Json(req): Json<SetTimeshiftRequest>,
) -> Result<CallResponse, ApiError>
where
    LC: LightCommander + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let entity_ids = parse_entity_ids(req.entity_ids)?;
    state.engine.set_timeshift(&entity_ids, req.timeshift).await;
    Ok(CallResponse::NoContent)
}

/// `POST /api/services/shift_timeshift`
pub async fn shift_timeshift<LC, P, C>(
    State(state): State<AppState<LC, P, C>>,
    Json(req): Json<ShiftTimeshiftRequest>,
) -> Result<CallResponse, ApiError>
where
    LC: LightCommander + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let entity_ids = parse_entity_ids(req.entity_ids)?;
    state.engine.shift_timeshift(&entity_ids, req.shift).await;
    Ok(CallResponse::NoContent)
}
