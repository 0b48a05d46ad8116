//! JSON handlers for reading and replacing the scene snapshot.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use lumen_app::ports::{Clock, EventPublisher, LightCommander};
use lumen_domain::scene::SceneDefinition;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<SceneDefinition>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the replace endpoint.
pub enum ReplaceResponse {
    NoContent,
}

impl IntoResponse for ReplaceResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/scenes` — authored form of the current snapshot.
pub async fn list<LC, P, C>(State(state): State<AppState<LC, P, C>>) -> ListResponse
where
    LC: LightCommander + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    let definitions = state.engine.scene_definitions().await;
    ListResponse::Ok(Json(definitions))
}

/// `PUT /api/scenes` — replace the whole snapshot.
pub async fn replace<LC, P, C>(
    State(state): State<AppState<LC, P, C>>,
    Json(definitions): Json<Vec<SceneDefinition>>,
) -> Result<ReplaceResponse, ApiError>
where
    LC: LightCommander + Send + Sync + 'static,
    P: EventPublisher + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    state.engine.replace_scenes(definitions).await?;
    Ok(ReplaceResponse::NoContent)
}
