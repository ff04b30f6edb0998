//! Session engine: deck building, card selection, match resolution and scoring.
//!
//! A session moves through `NotStarted -> Playing -> Completed -> NotStarted`.
//! Player input that does not fit the current state is ignored rather than
//! reported, so stale or double clicks from the presentation layer are harmless.
//! Only integration mistakes (bad difficulty, short glossary, early reset)
//! surface as [`SessionError`].

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Result, SessionError};
use crate::event::CompletionOutcome;
use crate::glossary::Glossary;
use crate::scoring;
use crate::types::{Card, CardKind, CardView, Difficulty, GameStatus, SessionView};

/// Two selected card ids captured when the second card was flipped.
///
/// A deferred resolution only applies while the session still holds exactly
/// this selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingResolution {
    pub first: u32,
    pub second: u32,
}

/// What happened to a `select_card` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Absorbed as a no-op.
    Ignored,
    /// First card of a pair is face up.
    Flipped,
    /// Second card is face up; resolve after the reveal delay.
    Pending(PendingResolution),
}

/// Result of applying a pending resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Matched {
        pair_id: i64,
        /// Present only on the match that completed the session.
        completion: Option<CompletionOutcome>,
    },
    Mismatched,
}

/// One play-through of the memory game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    cards: Vec<Card>,
    selected: Vec<u32>,
    matched_pair_count: usize,
    move_count: u32,
    elapsed_seconds: u64,
    status: GameStatus,
    difficulty: Difficulty,
    total_pairs: usize,
    started_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Fresh session waiting for the player to start.
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            cards: Vec::new(),
            selected: Vec::with_capacity(2),
            matched_pair_count: 0,
            move_count: 0,
            elapsed_seconds: 0,
            status: GameStatus::NotStarted,
            difficulty,
            total_pairs: 0,
            started_at: None,
        }
    }

    /// Deal and shuffle a deck for `difficulty` and start playing at `now`.
    pub fn initialize<R: Rng + ?Sized>(
        difficulty: Difficulty,
        glossary: &Glossary,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let pairs = glossary.pairs_for(difficulty)?;

        let mut cards = Vec::with_capacity(pairs.len() * 2);
        for (index, pair) in pairs.iter().enumerate() {
            let base = (index * 2) as u32;
            cards.push(Card {
                id: base,
                kind: CardKind::Term,
                content: pair.term.clone(),
                pair_id: pair.id,
                flipped: false,
                matched: false,
            });
            cards.push(Card {
                id: base + 1,
                kind: CardKind::Definition,
                content: pair.definition.clone(),
                pair_id: pair.id,
                flipped: false,
                matched: false,
            });
        }

        // Fisher-Yates
        cards.shuffle(rng);

        Ok(Self {
            cards,
            total_pairs: pairs.len(),
            status: GameStatus::Playing,
            started_at: Some(now),
            ..Self::new(difficulty)
        })
    }

    /// Flip a card face up if the player is allowed to.
    pub fn select_card(&mut self, card_id: u32) -> Selection {
        if self.status != GameStatus::Playing || self.selected.len() >= 2 {
            return Selection::Ignored;
        }

        let Some(card) = self.cards.iter_mut().find(|c| c.id == card_id) else {
            return Selection::Ignored;
        };
        if !card.is_selectable() {
            return Selection::Ignored;
        }

        card.flipped = true;
        self.selected.push(card_id);

        match self.selected[..] {
            [first, second] => Selection::Pending(PendingResolution { first, second }),
            _ => Selection::Flipped,
        }
    }

    /// Apply a deferred resolution.
    ///
    /// Returns `None` when the session is no longer playing or the selection
    /// changed since `pending` was captured.
    pub fn resolve(&mut self, pending: PendingResolution, now: DateTime<Utc>) -> Option<Resolution> {
        if self.status != GameStatus::Playing || self.selected != [pending.first, pending.second] {
            return None;
        }

        let first = self.position(pending.first)?;
        let second = self.position(pending.second)?;
        self.selected.clear();
        self.move_count += 1;

        let pair_id = self.cards[first].pair_id;
        if pair_id != self.cards[second].pair_id {
            self.cards[first].flipped = false;
            self.cards[second].flipped = false;
            return Some(Resolution::Mismatched);
        }

        self.cards[first].matched = true;
        self.cards[second].matched = true;
        self.matched_pair_count += 1;

        let completion = if self.matched_pair_count == self.total_pairs {
            self.tick(now);
            self.status = GameStatus::Completed;
            self.outcome()
        } else {
            None
        };

        Some(Resolution::Matched {
            pair_id,
            completion,
        })
    }

    /// Refresh the elapsed time. Has no effect outside `Playing`.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if self.status != GameStatus::Playing {
            return;
        }
        if let Some(started_at) = self.started_at {
            self.elapsed_seconds = (now - started_at).num_seconds().max(0) as u64;
        }
    }

    /// Fresh `NotStarted` session keeping only the chosen difficulty.
    pub fn reset(&self) -> Result<Self> {
        if self.status != GameStatus::Completed {
            return Err(SessionError::ResetNotAllowed(self.status));
        }
        Ok(Self::new(self.difficulty))
    }

    pub fn score(&self) -> u32 {
        scoring::score(self.move_count, self.elapsed_seconds)
    }

    /// Final tally, available once the session is completed.
    pub fn outcome(&self) -> Option<CompletionOutcome> {
        (self.status == GameStatus::Completed).then(|| CompletionOutcome {
            score: self.score(),
            time_spent_seconds: self.elapsed_seconds,
            move_count: self.move_count,
            difficulty: self.difficulty,
        })
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            status: self.status,
            difficulty: self.difficulty,
            cards: self.cards.iter().map(CardView::from).collect(),
            move_count: self.move_count,
            elapsed_seconds: self.elapsed_seconds,
            elapsed_display: scoring::format_time(self.elapsed_seconds),
            matched_pair_count: self.matched_pair_count,
            total_pairs: self.total_pairs,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, card_id: u32) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    pub fn selected(&self) -> &[u32] {
        &self.selected
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn matched_pair_count(&self) -> usize {
        self.matched_pair_count
    }

    pub fn total_pairs(&self) -> usize {
        self.total_pairs
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    fn position(&self, card_id: u32) -> Option<usize> {
        self.cards.iter().position(|c| c.id == card_id)
    }
}
