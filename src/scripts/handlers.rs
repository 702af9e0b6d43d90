use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use super::{
    dto::ScriptResponse,
    services::{invoke, ScriptKind},
};
use crate::{error::AppResult, state::AppState};

pub fn script_routes() -> Router<AppState> {
    Router::new()
        .route("/recognize", post(recognize_signs))
        .route("/collect", post(collect_data))
}

#[instrument(skip(state))]
pub async fn recognize_signs(State(state): State<AppState>) -> AppResult<Json<ScriptResponse>> {
    run(&state, ScriptKind::Recognize).await
}

#[instrument(skip(state))]
pub async fn collect_data(State(state): State<AppState>) -> AppResult<Json<ScriptResponse>> {
    run(&state, ScriptKind::Collect).await
}

async fn run(state: &AppState, kind: ScriptKind) -> AppResult<Json<ScriptResponse>> {
    invoke(state.scripts.as_ref(), &state.config.scripts, kind).await?;
    Ok(Json(ScriptResponse {
        message: kind.success_message(),
    }))
}
