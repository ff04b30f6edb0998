//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext wiring a game host to the router
//! - Helpers for finding matching cards on the table

pub mod fixtures;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum_test::TestServer;
use memory_core::Glossary;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::Value;
use tokio::sync::broadcast::Receiver;

use memory_game_server::models::CompletionEvent;
use memory_game_server::services::host::{GameHost, HostTiming};
use memory_game_server::services::notifier::{BroadcastChannel, HostNotifier, MailboxChannel};
use memory_game_server::{build_router, AppState};

/// Reveal delay used by integration tests.
pub const RESOLUTION_DELAY: Duration = Duration::from_millis(20);

/// Test context holding the router and the parent-context receiver.
pub struct TestContext {
    app: Router,
    pub parent_rx: Receiver<CompletionEvent>,
}

impl TestContext {
    /// Create a new test context with the built-in glossary and short timers.
    pub fn new() -> Self {
        let mailbox = MailboxChannel::new();
        let parent = BroadcastChannel::new(8);
        let parent_rx = parent.subscribe();
        let notifier = HostNotifier::new(Box::new(mailbox.clone()), Box::new(parent));

        let host = GameHost::new(
            Glossary::builtin(),
            notifier,
            ChaCha8Rng::seed_from_u64(2024),
            HostTiming {
                resolution_delay: RESOLUTION_DELAY,
                tick_interval: Duration::from_millis(100),
            },
        );

        let state = AppState {
            host: Arc::new(host),
            mailbox,
        };

        Self {
            app: build_router(state),
            parent_rx,
        }
    }

    /// Build a test server over the router.
    pub fn server(&self) -> TestServer {
        TestServer::new(self.app.clone()).unwrap()
    }
}

/// Wait until any pending resolution has been applied.
pub async fn wait_for_resolution() {
    tokio::time::sleep(RESOLUTION_DELAY * 5).await;
}

/// Card id pairs `(term, definition)` on the table of a session view.
pub fn matching_pairs(view: &Value) -> Vec<(u64, u64)> {
    let glossary = Glossary::builtin();
    let cards = view["cards"].as_array().expect("cards array");

    let id_of = |content: &str| {
        cards
            .iter()
            .find(|c| c["content"] == content)
            .and_then(|c| c["id"].as_u64())
    };

    glossary
        .pairs()
        .iter()
        .filter_map(|pair| Some((id_of(&pair.term)?, id_of(&pair.definition)?)))
        .collect()
}
