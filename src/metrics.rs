//! Prometheus-compatible metrics endpoint
//!
//! Exposes simulation metrics in Prometheus format.
//! Default endpoint: http://localhost:9090/metrics

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::game::game_loop::TickStats;

/// Samples kept for percentile calculation
const TICK_HISTORY_LEN: usize = 1000;

/// Metrics registry for the simulation
#[derive(Debug)]
pub struct Metrics {
    // Entity counts
    pub snakes_total: AtomicU64,
    pub snakes_alive: AtomicU64,
    pub orbs_live: AtomicU64,

    // Tick timing (microseconds)
    pub tick_time_us: AtomicU64,
    pub tick_time_p95_us: AtomicU64,
    pub tick_time_p99_us: AtomicU64,
    pub tick_time_max_us: AtomicU64,

    // Tick counters
    pub tick_count: AtomicU64,
    pub tick_overruns: AtomicU64,

    // Gameplay counters
    pub kills_total: AtomicU64,
    pub orbs_collected_total: AtomicU64,
    pub summaries_emitted: AtomicU64,

    start_time: Instant,

    // Rolling tick times for percentile calculation (VecDeque for O(1) pop_front)
    tick_history: RwLock<VecDeque<u64>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            snakes_total: AtomicU64::new(0),
            snakes_alive: AtomicU64::new(0),
            orbs_live: AtomicU64::new(0),
            tick_time_us: AtomicU64::new(0),
            tick_time_p95_us: AtomicU64::new(0),
            tick_time_p99_us: AtomicU64::new(0),
            tick_time_max_us: AtomicU64::new(0),
            tick_count: AtomicU64::new(0),
            tick_overruns: AtomicU64::new(0),
            kills_total: AtomicU64::new(0),
            orbs_collected_total: AtomicU64::new(0),
            summaries_emitted: AtomicU64::new(0),
            start_time: Instant::now(),
            tick_history: RwLock::new(VecDeque::with_capacity(TICK_HISTORY_LEN)),
        }
    }

    /// Record a tick time and update percentiles
    pub fn record_tick_time(&self, duration: Duration) {
        let us = duration.as_micros() as u64;
        self.tick_time_us.store(us, Ordering::Relaxed);
        self.tick_count.fetch_add(1, Ordering::Relaxed);

        let mut history = self.tick_history.write();
        history.push_back(us);
        while history.len() > TICK_HISTORY_LEN {
            history.pop_front();
        }

        if history.len() >= 10 {
            let mut sorted: Vec<u64> = history.iter().copied().collect();
            sorted.sort_unstable();

            let last = sorted.len() - 1;
            let p95_idx = (sorted.len() as f32 * 0.95) as usize;
            let p99_idx = (sorted.len() as f32 * 0.99) as usize;

            self.tick_time_p95_us.store(sorted[p95_idx.min(last)], Ordering::Relaxed);
            self.tick_time_p99_us.store(sorted[p99_idx.min(last)], Ordering::Relaxed);
            self.tick_time_max_us.store(sorted[last], Ordering::Relaxed);
        }
    }

    /// Record the outcome of one tick
    pub fn record_tick(&self, stats: &TickStats, snakes_total: usize, snakes_alive: usize, orbs_live: usize) {
        self.snakes_total.store(snakes_total as u64, Ordering::Relaxed);
        self.snakes_alive.store(snakes_alive as u64, Ordering::Relaxed);
        self.orbs_live.store(orbs_live as u64, Ordering::Relaxed);
        self.kills_total.fetch_add(stats.deaths as u64, Ordering::Relaxed);
        self.orbs_collected_total
            .fetch_add(stats.orbs_collected as u64, Ordering::Relaxed);
        self.summaries_emitted
            .fetch_add(stats.summaries as u64, Ordering::Relaxed);
    }

    pub fn record_overrun(&self) {
        self.tick_overruns.fetch_add(1, Ordering::Relaxed);
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Generate Prometheus-format metrics output
    pub fn to_prometheus(&self) -> String {
        let mut output = String::with_capacity(2048);

        macro_rules! metric {
            ($name:expr, $help:expr, $type:expr, $value:expr) => {
                output.push_str(&format!(
                    "# HELP {} {}\n# TYPE {} {}\n{} {}\n",
                    $name, $help, $name, $type, $name, $value
                ));
            };
        }

        metric!("serpent_arena_snakes_total", "Snakes in the store, including dead ones in grace", "gauge",
            self.snakes_total.load(Ordering::Relaxed));
        metric!("serpent_arena_snakes_alive", "Number of alive snakes", "gauge",
            self.snakes_alive.load(Ordering::Relaxed));
        metric!("serpent_arena_orbs", "Number of live orbs", "gauge",
            self.orbs_live.load(Ordering::Relaxed));

        metric!("serpent_arena_tick_time_microseconds", "Last tick time in microseconds", "gauge",
            self.tick_time_us.load(Ordering::Relaxed));
        metric!("serpent_arena_tick_time_p95_microseconds", "95th percentile tick time", "gauge",
            self.tick_time_p95_us.load(Ordering::Relaxed));
        metric!("serpent_arena_tick_time_p99_microseconds", "99th percentile tick time", "gauge",
            self.tick_time_p99_us.load(Ordering::Relaxed));
        metric!("serpent_arena_tick_time_max_microseconds", "Maximum tick time", "gauge",
            self.tick_time_max_us.load(Ordering::Relaxed));
        metric!("serpent_arena_tick_count", "Total ticks processed", "counter",
            self.tick_count.load(Ordering::Relaxed));
        metric!("serpent_arena_tick_overruns_total", "Ticks that exceeded the tick period", "counter",
            self.tick_overruns.load(Ordering::Relaxed));

        metric!("serpent_arena_kills_total", "Resolved snake-vs-snake collisions", "counter",
            self.kills_total.load(Ordering::Relaxed));
        metric!("serpent_arena_orbs_collected_total", "Orbs picked up", "counter",
            self.orbs_collected_total.load(Ordering::Relaxed));
        metric!("serpent_arena_summaries_emitted_total", "Session summaries handed to the ledger", "counter",
            self.summaries_emitted.load(Ordering::Relaxed));
        metric!("serpent_arena_uptime_seconds", "Server uptime in seconds", "counter",
            self.uptime_seconds());

        output
    }

    /// JSON format metrics (alternative for direct API access)
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "entities": {
                "snakes_total": self.snakes_total.load(Ordering::Relaxed),
                "snakes_alive": self.snakes_alive.load(Ordering::Relaxed),
                "orbs": self.orbs_live.load(Ordering::Relaxed),
            },
            "performance": {
                "tick_time_us": self.tick_time_us.load(Ordering::Relaxed),
                "tick_time_p95_us": self.tick_time_p95_us.load(Ordering::Relaxed),
                "tick_time_p99_us": self.tick_time_p99_us.load(Ordering::Relaxed),
                "tick_time_max_us": self.tick_time_max_us.load(Ordering::Relaxed),
                "tick_count": self.tick_count.load(Ordering::Relaxed),
                "tick_overruns": self.tick_overruns.load(Ordering::Relaxed),
            },
            "game": {
                "kills_total": self.kills_total.load(Ordering::Relaxed),
                "orbs_collected_total": self.orbs_collected_total.load(Ordering::Relaxed),
                "summaries_emitted": self.summaries_emitted.load(Ordering::Relaxed),
                "uptime_seconds": self.uptime_seconds(),
            },
        })
        .to_string()
    }

    /// Build the full HTTP response for a raw request
    fn respond(&self, request: &str) -> String {
        let path = request
            .lines()
            .next()
            .and_then(|line| line.strip_prefix("GET "))
            .and_then(|rest| rest.split_whitespace().next());

        let (content_type, body) = match path {
            Some("/metrics/json") | Some("/json") => ("application/json", self.to_json()),
            Some("/metrics") => ("text/plain; version=0.0.4", self.to_prometheus()),
            Some("/health") | Some("/") => ("text/plain", "OK".to_string()),
            _ => return "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
        };

        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            content_type,
            body.len(),
            body
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Start the metrics HTTP server
pub async fn start_metrics_server(metrics: Arc<Metrics>, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;

    info!("Metrics server listening on http://{}/metrics", addr);

    loop {
        let (mut socket, peer) = listener.accept().await?;
        let metrics = metrics.clone();

        tokio::spawn(async move {
            let mut buffer = [0u8; 1024];

            match socket.read(&mut buffer).await {
                Ok(n) if n > 0 => {
                    let request = String::from_utf8_lossy(&buffer[..n]);
                    let response = metrics.respond(&request);

                    if let Err(e) = socket.write_all(response.as_bytes()).await {
                        debug!("Failed to write metrics response to {}: {}", peer, e);
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    debug!("Failed to read from metrics socket {}: {}", peer, e);
                }
            }
        });
    }
}
