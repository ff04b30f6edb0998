//! Completion event contract delivered to the embedding host.

use serde::{Deserialize, Serialize};

use crate::scoring::MAX_SCORE;
use crate::types::Difficulty;

/// Module identifier carried by every completion event.
pub const BLOCK_ID: &str = "memory-iso13485";

/// Event type tag carried by every completion event.
pub const BLOCK_COMPLETION: &str = "BLOCK_COMPLETION";

/// Final tally of a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionOutcome {
    pub score: u32,
    pub time_spent_seconds: u64,
    pub move_count: u32,
    pub difficulty: Difficulty,
}

/// Wire payload published to the self and parent contexts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub block_id: String,
    pub completed: bool,
    pub score: u32,
    pub max_score: u32,
    pub time_spent: u64,
    pub data: CompletionData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionData {
    pub moves: u32,
    pub difficulty: Difficulty,
}

impl From<&CompletionOutcome> for CompletionEvent {
    fn from(outcome: &CompletionOutcome) -> Self {
        Self {
            event_type: BLOCK_COMPLETION.to_string(),
            block_id: BLOCK_ID.to_string(),
            completed: true,
            score: outcome.score,
            max_score: MAX_SCORE,
            time_spent: outcome.time_spent_seconds,
            data: CompletionData {
                moves: outcome.move_count,
                difficulty: outcome.difficulty,
            },
        }
    }
}
