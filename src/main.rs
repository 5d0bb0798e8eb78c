use std::sync::Arc;

use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use serpent_arena_server::config::SimulationConfig;
use serpent_arena_server::metrics::{self, Metrics};
use serpent_arena_server::net::game_session::{start_simulation, EventReceiver};
use serpent_arena_server::net::protocol::GameEvent;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    info!("Serpent Arena Server v{}", env!("CARGO_PKG_VERSION"));

    let config = SimulationConfig::load_or_default();
    config.validate()?;
    info!(
        "Configuration loaded: arena {}x{}, tick {:?}, grace {:?}, seed {:?}",
        config.arena_width, config.arena_height, config.tick_interval, config.death_grace, config.seed
    );

    let metrics = Arc::new(Metrics::new());

    let metrics_clone = metrics.clone();
    let metrics_port = config.metrics_port;
    tokio::spawn(async move {
        if let Err(e) = metrics::start_metrics_server(metrics_clone, metrics_port).await {
            error!("Metrics server error: {}", e);
        }
    });

    let (session, events) = start_simulation(&config, metrics);
    let ledger = tokio::spawn(log_ledger(events));

    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Shutdown signal received");

    session.shutdown().await;
    // The event sender is gone once the clock stops, so the ledger drains and exits
    if let Err(e) = ledger.await {
        error!("Ledger task failed: {}", e);
    }

    info!("Server stopped");
    Ok(())
}

/// Stand-in ledger: writes every session summary as one JSON line
async fn log_ledger(mut events: EventReceiver) {
    while let Some(event) = events.recv().await {
        match event {
            GameEvent::Summary(summary) => match serde_json::to_string(&summary) {
                Ok(line) => info!(target: "ledger", "{}", line),
                Err(e) => error!("Failed to serialize summary: {}", e),
            },
            GameEvent::SnakeDied { victim, killer, score, .. } => {
                debug!("{} was eaten by {} ({} points)", victim, killer, score);
            }
        }
    }
}
