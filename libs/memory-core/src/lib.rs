//! Core memory game library shared by the hosting applications.
//!
//! Provides:
//! - Glossary provider and markdown glossary parser
//! - Session engine (deck shuffling, card selection, match resolution)
//! - Scoring formula and elapsed-time formatting
//! - Completion event contract for the embedding host
//! - Shared types (Card, Difficulty, GameStatus, SessionView, etc.)

pub mod error;
pub mod event;
pub mod glossary;
pub mod parser;
pub mod scoring;
pub mod session;
pub mod types;

pub use error::{GlossaryError, Result, SessionError};
pub use event::{CompletionData, CompletionEvent, CompletionOutcome, BLOCK_ID};
pub use glossary::{DifficultyLevel, DifficultyTable, Glossary};
pub use parser::parse;
pub use scoring::{format_time, score, MAX_SCORE};
pub use session::{PendingResolution, Resolution, Selection, Session};
pub use types::{Card, CardKind, CardView, Difficulty, GameStatus, Pair, SessionView};
