//! API request and response types

use serde::{Deserialize, Serialize};

// Re-export shared types from memory-core
pub use memory_core::{CardKind, CardView, CompletionEvent, Difficulty, GameStatus, SessionView};

/// POST /api/game/start body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartGameRequest {
    /// Kept as a string so unknown levels get a proper error body.
    pub difficulty: String,
}

/// POST /api/game/select body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectCardRequest {
    pub card_id: u32,
}

/// One row of GET /api/difficulties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyInfo {
    pub difficulty: Difficulty,
    pub pairs: usize,
    pub description: String,
}
