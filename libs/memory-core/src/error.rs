//! Error types for memory-core.

use thiserror::Error;

use crate::types::{Difficulty, GameStatus};

/// Result type alias using SessionError.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Errors that can occur while reading a glossary file or validating a glossary.
#[derive(Debug, Error)]
pub enum GlossaryError {
    #[error("missing ID at line {line}")]
    MissingId { line: usize },

    #[error("missing term at line {line}")]
    MissingTerm { line: usize },

    #[error("missing definition at line {line}")]
    MissingDefinition { line: usize },

    #[error("invalid ID format at line {line}: {value}")]
    InvalidId { line: usize, value: String },

    #[error("duplicate ID {id} at line {line}")]
    DuplicateId { id: i64, line: usize },

    #[error("duplicate pair ID {id} at position {position}")]
    DuplicatePairId { id: i64, position: usize },

    #[error("no difficulty level configured for {0}")]
    MissingLevel(Difficulty),

    #[error("difficulty {0} deals no pairs")]
    EmptyLevel(Difficulty),

    #[error("empty glossary")]
    Empty,
}

/// Integration contract violations raised by the session engine.
///
/// Player mistakes never produce these; they are absorbed as no-ops.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unsupported difficulty: {0}")]
    UnsupportedDifficulty(String),

    #[error("glossary has {available} pairs but {difficulty} needs {required}")]
    GlossaryTooShort {
        difficulty: Difficulty,
        required: usize,
        available: usize,
    },

    #[error("reset is only allowed from completed, session is {0:?}")]
    ResetNotAllowed(GameStatus),
}
