//! Request bodies for the game API.

use serde_json::{json, Value};

/// Body for POST /api/game/start.
pub fn start_request(difficulty: &str) -> Value {
    json!({ "difficulty": difficulty })
}

/// Body for POST /api/game/select.
pub fn select_request(card_id: u64) -> Value {
    json!({ "cardId": card_id })
}
