//! Core types for the memory game.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SessionError;

/// Difficulty level chosen by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

impl Difficulty {
    /// All supported levels, easiest first.
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Get the difficulty name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            other => Err(SessionError::UnsupportedDifficulty(other.to_string())),
        }
    }
}

/// Term/definition unit supplied by the glossary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub id: i64,
    pub term: String,
    pub definition: String,
}

/// Which side of a pair a card shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Term,
    Definition,
}

/// Card dealt into a session deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: u32,
    pub kind: CardKind,
    pub content: String,
    pub pair_id: i64,
    pub flipped: bool,
    pub matched: bool,
}

impl Card {
    /// Whether the player may still pick this card.
    pub fn is_selectable(&self) -> bool {
        !self.flipped && !self.matched
    }
}

/// Session lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    NotStarted,
    Playing,
    Completed,
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// Render-relevant projection of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub id: u32,
    pub flipped: bool,
    pub matched: bool,
    pub kind: CardKind,
    pub content: String,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        Self {
            id: card.id,
            flipped: card.flipped,
            matched: card.matched,
            kind: card.kind,
            content: card.content.clone(),
        }
    }
}

/// Everything the presentation layer needs to draw a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub status: GameStatus,
    pub difficulty: Difficulty,
    pub cards: Vec<CardView>,
    pub move_count: u32,
    pub elapsed_seconds: u64,
    pub elapsed_display: String,
    pub matched_pair_count: usize,
    pub total_pairs: usize,
}
