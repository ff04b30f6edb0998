//! Difficulty endpoints

use axum::{extract::State, Json};

use crate::models::DifficultyInfo;
use crate::AppState;

/// GET /api/difficulties
pub async fn list(State(state): State<AppState>) -> Json<Vec<DifficultyInfo>> {
    let levels = state
        .host
        .glossary()
        .levels()
        .iter()
        .map(|(difficulty, level)| DifficultyInfo {
            difficulty,
            pairs: level.pairs,
            description: level.description.clone(),
        })
        .collect();

    Json(levels)
}
