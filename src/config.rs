use std::str::FromStr;
use std::time::Duration;

use crate::game::constants::{clock, lifecycle};

/// Simulation configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Arena size, fixed for the session lifetime
    pub arena_width: f32,
    pub arena_height: f32,
    /// Fixed tick period
    pub tick_interval: Duration,
    /// RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
    /// How long a dead snake with a score stays visible
    pub death_grace: Duration,
    /// Intent queue capacity (intents buffered between ticks)
    pub intent_capacity: usize,
    /// Snapshot backlog per observer before it starts lagging
    pub snapshot_capacity: usize,
    /// Port for the Prometheus endpoint
    pub metrics_port: u16,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            arena_width: 1000.0,
            arena_height: 1000.0,
            tick_interval: Duration::from_millis(clock::TICK_INTERVAL_MS),
            seed: None,
            death_grace: Duration::from_millis(lifecycle::DEATH_GRACE_MS),
            intent_capacity: 1000,
            snapshot_capacity: 16,
            metrics_port: 9090,
        }
    }
}

impl SimulationConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        Self::load_from(|key| std::env::var(key).ok())
    }

    /// Load config from an arbitrary variable source.
    /// Unparsable or out-of-range values fall back to the default with a warning.
    pub fn load_from(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(width) = parse_var(&lookup, "ARENA_WIDTH", |v: &f32| v.is_finite() && *v >= 1.0) {
            config.arena_width = width;
        }
        if let Some(height) = parse_var(&lookup, "ARENA_HEIGHT", |v: &f32| v.is_finite() && *v >= 1.0) {
            config.arena_height = height;
        }
        if let Some(ms) = parse_var(&lookup, "TICK_INTERVAL_MS", |v: &u64| *v > 0 && *v <= 10_000) {
            config.tick_interval = Duration::from_millis(ms);
        }
        if let Some(seed) = parse_var(&lookup, "SIM_SEED", |_: &u64| true) {
            config.seed = Some(seed);
        }
        if let Some(ms) = parse_var(&lookup, "DEATH_GRACE_MS", |v: &u64| *v <= 600_000) {
            config.death_grace = Duration::from_millis(ms);
        }
        if let Some(capacity) = parse_var(&lookup, "INTENT_CAPACITY", |v: &usize| *v > 0 && *v <= 1_000_000) {
            config.intent_capacity = capacity;
        }
        if let Some(capacity) = parse_var(&lookup, "SNAPSHOT_CAPACITY", |v: &usize| *v > 0 && *v <= 10_000) {
            config.snapshot_capacity = capacity;
        }
        if let Some(port) = parse_var(&lookup, "METRICS_PORT", |v: &u16| *v > 0) {
            config.metrics_port = port;
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.arena_width.is_finite() && self.arena_width > 0.0)
            || !(self.arena_height.is_finite() && self.arena_height > 0.0)
        {
            return Err(ConfigError::InvalidArena {
                width: self.arena_width,
                height: self.arena_height,
            });
        }
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.intent_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("intent_capacity"));
        }
        if self.snapshot_capacity == 0 {
            return Err(ConfigError::ZeroCapacity("snapshot_capacity"));
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &impl Fn(&str) -> Option<String>, key: &str, valid: F) -> Option<T>
where
    T: FromStr,
    F: Fn(&T) -> bool,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) if valid(&value) => Some(value),
        Ok(_) => {
            tracing::warn!("{} '{}' out of range, using default", key, raw);
            None
        }
        Err(_) => {
            tracing::warn!("Invalid {} '{}', using default", key, raw);
            None
        }
    }
}

/// Configuration rejected by `validate`
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("arena dimensions must be positive and finite, got {width}x{height}")]
    InvalidArena { width: f32, height: f32 },
    #[error("tick interval cannot be zero")]
    ZeroTickInterval,
    #[error("{0} must be at least 1")]
    ZeroCapacity(&'static str),
}
