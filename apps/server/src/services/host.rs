//! Game host: owns the current session and its timers.
//!
//! Every timer carries the generation of the session that scheduled it. Starting
//! or resetting a game aborts outstanding timers and bumps the generation, so a
//! task that already woke up still sees it is stale and leaves the new session
//! alone.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use memory_core::{
    Difficulty, GameStatus, Glossary, PendingResolution, Resolution, Selection, Session,
    SessionError, SessionView,
};
use rand_chacha::ChaCha8Rng;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::services::clock::Clock;
use crate::services::notifier::HostNotifier;

/// Delays used by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostTiming {
    /// How long both selected cards stay face up before resolution.
    pub resolution_delay: Duration,
    /// Period of the elapsed-time refresh.
    pub tick_interval: Duration,
}

impl Default for HostTiming {
    fn default() -> Self {
        Self {
            resolution_delay: Duration::from_secs(1),
            tick_interval: Duration::from_secs(1),
        }
    }
}

struct HostState {
    session: Session,
    generation: u64,
    rng: ChaCha8Rng,
    ticker: Option<JoinHandle<()>>,
    resolution: Option<JoinHandle<()>>,
}

impl HostState {
    fn cancel_timers(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        if let Some(resolution) = self.resolution.take() {
            resolution.abort();
        }
    }

    /// Swap in a new session; outstanding timers no longer apply.
    fn replace_session(&mut self, session: Session) -> u64 {
        self.cancel_timers();
        self.generation += 1;
        self.session = session;
        self.generation
    }
}

struct Shared {
    state: Mutex<HostState>,
    glossary: Glossary,
    notifier: HostNotifier,
    clock: Clock,
    timing: HostTiming,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, HostState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply_resolution(&self, generation: u64, pending: PendingResolution) {
        let completion = {
            let mut state = self.lock();
            if state.generation != generation {
                tracing::debug!(generation, "Dropping resolution for replaced session");
                return;
            }
            state.resolution = None;

            match state.session.resolve(pending, self.clock.now()) {
                None => {
                    tracing::debug!(?pending, "Stale resolution ignored");
                    None
                }
                Some(Resolution::Mismatched) => None,
                Some(Resolution::Matched {
                    completion: Some(outcome),
                    ..
                }) => {
                    if let Some(ticker) = state.ticker.take() {
                        ticker.abort();
                    }
                    Some(outcome)
                }
                Some(Resolution::Matched { pair_id, .. }) => {
                    tracing::debug!(pair_id, "Pair matched");
                    None
                }
            }
        };

        if let Some(outcome) = completion {
            tracing::info!(
                score = outcome.score,
                moves = outcome.move_count,
                seconds = outcome.time_spent_seconds,
                difficulty = %outcome.difficulty,
                "Game completed"
            );
            self.notifier.notify_completion(&outcome);
        }
    }
}

/// Runs one game session at a time for the presentation layer.
pub struct GameHost {
    shared: Arc<Shared>,
}

impl GameHost {
    pub fn new(
        glossary: Glossary,
        notifier: HostNotifier,
        rng: ChaCha8Rng,
        timing: HostTiming,
    ) -> Self {
        let state = HostState {
            session: Session::new(Difficulty::default()),
            generation: 0,
            rng,
            ticker: None,
            resolution: None,
        };

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                glossary,
                notifier,
                clock: Clock::new(),
                timing,
            }),
        }
    }

    pub fn glossary(&self) -> &Glossary {
        &self.shared.glossary
    }

    pub fn view(&self) -> SessionView {
        self.shared.lock().session.view()
    }

    /// Deal a new game, abandoning whatever session was current.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, difficulty: Difficulty) -> Result<SessionView, SessionError> {
        let mut state = self.shared.lock();
        let now = self.shared.clock.now();
        let session = Session::initialize(difficulty, &self.shared.glossary, &mut state.rng, now)?;

        let generation = state.replace_session(session);
        state.ticker = Some(self.spawn_ticker(generation));

        tracing::info!(%difficulty, generation, "Game started");
        Ok(state.session.view())
    }

    /// Forward a card click. Invalid clicks leave the session untouched.
    pub fn select(&self, card_id: u32) -> SessionView {
        let mut state = self.shared.lock();
        if let Selection::Pending(pending) = state.session.select_card(card_id) {
            let generation = state.generation;
            state.resolution = Some(self.spawn_resolution(generation, pending));
        }
        state.session.view()
    }

    /// Return to the start screen after a completed game.
    pub fn reset(&self) -> Result<SessionView, SessionError> {
        let mut state = self.shared.lock();
        let fresh = state.session.reset()?;
        let generation = state.replace_session(fresh);

        tracing::info!(generation, "Game reset");
        Ok(state.session.view())
    }

    /// Abort all timers without touching the session.
    pub fn shutdown(&self) {
        self.shared.lock().cancel_timers();
    }

    fn spawn_resolution(&self, generation: u64, pending: PendingResolution) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            tokio::time::sleep(shared.timing.resolution_delay).await;
            shared.apply_resolution(generation, pending);
        })
    }

    fn spawn_ticker(&self, generation: u64) -> JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(shared.timing.tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick fires immediately
            interval.tick().await;

            loop {
                interval.tick().await;
                let mut state = shared.lock();
                if state.generation != generation || state.session.status() != GameStatus::Playing {
                    break;
                }
                let now = shared.clock.now();
                state.session.tick(now);
            }
        })
    }
}
