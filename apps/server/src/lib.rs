pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::host::GameHost;
use crate::services::notifier::{HostNotifier, LineChannel, MailboxChannel};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub host: Arc<GameHost>,
    /// Self-context receiver of completion events.
    pub mailbox: MailboxChannel,
}

/// Build the HTTP router used by the presentation layer.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/difficulties", get(routes::difficulties::list))
        .route("/api/game", get(routes::game::current))
        .route("/api/game/start", post(routes::game::start))
        .route("/api/game/select", post(routes::game::select))
        .route("/api/game/reset", post(routes::game::reset))
        .route("/api/game/completion", get(routes::game::completion))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // Stdout carries completion events for the parent process
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let glossary = config.load_glossary()?;
    tracing::info!(
        pairs = glossary.pairs().len(),
        source = ?config.glossary_path,
        "Glossary loaded"
    );

    let rng = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };

    let mailbox = MailboxChannel::new();
    let notifier = HostNotifier::new(Box::new(mailbox.clone()), Box::new(LineChannel::stdout()));
    let host = Arc::new(GameHost::new(glossary, notifier, rng, config.timing()));

    let state = AppState {
        host: host.clone(),
        mailbox,
    };
    let app = build_router(state);

    let addr = config.addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    host.shutdown();
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn health_check() -> &'static str {
    "OK"
}
