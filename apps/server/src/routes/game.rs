//! Game endpoints

use axum::{extract::State, Json};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::AppState;

/// GET /api/game
pub async fn current(State(state): State<AppState>) -> Json<SessionView> {
    Json(state.host.view())
}

/// POST /api/game/start
pub async fn start(
    State(state): State<AppState>,
    Json(request): Json<StartGameRequest>,
) -> Result<Json<SessionView>> {
    let difficulty: Difficulty = request.difficulty.parse()?;
    Ok(Json(state.host.start(difficulty)?))
}

/// POST /api/game/select
pub async fn select(
    State(state): State<AppState>,
    Json(request): Json<SelectCardRequest>,
) -> Json<SessionView> {
    Json(state.host.select(request.card_id))
}

/// POST /api/game/reset
pub async fn reset(State(state): State<AppState>) -> Result<Json<SessionView>> {
    Ok(Json(state.host.reset()?))
}

/// GET /api/game/completion
pub async fn completion(State(state): State<AppState>) -> Result<Json<CompletionEvent>> {
    state
        .mailbox
        .latest()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No completed game yet".to_string()))
}
