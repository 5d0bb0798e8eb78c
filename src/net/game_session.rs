//! Simulation clock - owns the game loop, ticks it at a fixed period and
//! publishes snapshots and events

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::game::constants::clock::STATUS_LOG_INTERVAL_SECS;
use crate::game::game_loop::{GameLoop, GameLoopConfig};
use crate::game::input_buffer::IntentSender;
use crate::game::state::Timestamp;
use crate::metrics::Metrics;
use crate::net::protocol::{GameEvent, GameSnapshot};

/// Shared snapshot, cloned cheaply to every observer
pub type SharedSnapshot = Arc<GameSnapshot>;

/// Receiving end for the ledger collaborator
pub type EventReceiver = mpsc::UnboundedReceiver<GameEvent>;

/// Handle to a running simulation
pub struct SessionHandle {
    intents: IntentSender,
    snapshots: broadcast::Sender<SharedSnapshot>,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// New handle for submitting intents
    pub fn intent_sender(&self) -> IntentSender {
        self.intents.clone()
    }

    /// Subscribe to per-tick snapshots, starting with the next tick
    pub fn subscribe(&self) -> broadcast::Receiver<SharedSnapshot> {
        self.snapshots.subscribe()
    }

    /// Stop the clock after its current tick and wait for it to finish
    pub async fn shutdown(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Err(e) = (&mut self.task).await {
            warn!("Simulation task ended abnormally: {}", e);
        }
    }
}

/// Build a game loop from `config` and start ticking it
pub fn start_simulation(config: &SimulationConfig, metrics: Arc<Metrics>) -> (SessionHandle, EventReceiver) {
    let game_loop = GameLoop::new(GameLoopConfig::from(config));
    spawn_session(game_loop, config.tick_interval, config.snapshot_capacity, metrics)
}

/// Start the clock task for an existing game loop
pub fn spawn_session(
    game_loop: GameLoop,
    tick_interval: Duration,
    snapshot_capacity: usize,
    metrics: Arc<Metrics>,
) -> (SessionHandle, EventReceiver) {
    let intents = game_loop.intent_sender();
    let (snapshots, _) = broadcast::channel(snapshot_capacity.max(1));
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let task = tokio::spawn(run_clock(
        game_loop,
        tick_interval,
        snapshots.clone(),
        events_tx,
        metrics,
        shutdown_rx,
    ));

    let handle = SessionHandle {
        intents,
        snapshots,
        shutdown: Some(shutdown_tx),
        task,
    };
    (handle, events_rx)
}

async fn run_clock(
    mut game_loop: GameLoop,
    tick_interval: Duration,
    snapshots: broadcast::Sender<SharedSnapshot>,
    events: mpsc::UnboundedSender<GameEvent>,
    metrics: Arc<Metrics>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut ticker = interval(tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let status_every = (STATUS_LOG_INTERVAL_SECS * 1000 / tick_interval.as_millis().max(1) as u64).max(1);
    let mut ledger_closed = false;

    info!("Simulation clock started, tick every {:?}", tick_interval);

    loop {
        tokio::select! {
            biased;
            // Fires on an explicit stop or when the handle is dropped
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        let started = Instant::now();
        let output = game_loop.tick(now_ms());
        let elapsed = started.elapsed();

        let state = game_loop.state();
        metrics.record_tick_time(elapsed);
        metrics.record_tick(&output.stats, state.snakes.len(), output.snapshot.player_count, state.orbs.len());
        if elapsed > tick_interval {
            metrics.record_overrun();
            warn!(
                "Tick {} took {:?}, over the {:?} period",
                output.snapshot.tick, elapsed, tick_interval
            );
        }

        let tick = output.snapshot.tick;
        // No subscribers is fine; observers come and go
        let _ = snapshots.send(Arc::new(output.snapshot));

        for event in output.events {
            if events.send(event).is_err() && !ledger_closed {
                ledger_closed = true;
                debug!("Event receiver closed; dropping summaries from now on");
            }
        }

        if tick % status_every == 0 {
            info!(
                "Tick {}: {} snakes alive, {} orbs, {} removals pending, last tick {:?}",
                tick,
                game_loop.state().alive_count(),
                game_loop.state().orbs.len(),
                game_loop.pending_removals(),
                elapsed
            );
        }
    }

    info!("Simulation clock stopped at tick {}", game_loop.state().tick);
}

/// Wall-clock milliseconds since the Unix epoch
pub fn now_ms() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as Timestamp)
        .unwrap_or(0)
}
