//! Fixed-order simulation pipeline
//!
//! One call to [`GameLoop::tick`] is one atomic simulation step:
//! grace removals, queued intents, movement, collision, death
//! finalization, economy, leaderboard, snapshot. Nothing outside the loop
//! observes state between those stages.

use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::config::SimulationConfig;
use crate::game::input_buffer::{InputBuffer, IntentSender};
use crate::game::lifecycle::SessionLifecycle;
use crate::game::state::{Arena, GameState, Timestamp};
use crate::game::systems::{collision, economy, leaderboard, movement};
use crate::net::protocol::{GameEvent, GameSnapshot, Intent};

/// Game loop configuration
#[derive(Debug, Clone)]
pub struct GameLoopConfig {
    pub arena: Arena,
    /// `None` seeds the RNG from entropy
    pub seed: Option<u64>,
    pub death_grace: Duration,
    pub intent_capacity: usize,
}

impl Default for GameLoopConfig {
    fn default() -> Self {
        Self::from(&SimulationConfig::default())
    }
}

impl From<&SimulationConfig> for GameLoopConfig {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            arena: Arena::new(config.arena_width, config.arena_height),
            seed: config.seed,
            death_grace: config.death_grace,
            intent_capacity: config.intent_capacity,
        }
    }
}

/// Per-tick counters for logging and metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub intents_applied: usize,
    pub orbs_collected: u32,
    pub deaths: usize,
    pub burst_orbs: usize,
    pub topped_up: usize,
    pub removed: usize,
    pub summaries: usize,
}

/// Everything one tick publishes
#[derive(Debug, Clone)]
pub struct TickOutput {
    pub snapshot: GameSnapshot,
    /// Death notifications followed by the tick's session summaries
    pub events: Vec<GameEvent>,
    pub stats: TickStats,
}

pub struct GameLoop {
    state: GameState,
    rng: ChaCha8Rng,
    lifecycle: SessionLifecycle,
    input_buffer: InputBuffer,
}

impl GameLoop {
    /// Build the loop and seed the arena with its initial orbs
    pub fn new(config: GameLoopConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let mut game_loop = Self {
            state: GameState::new(config.arena),
            rng,
            lifecycle: SessionLifecycle::new(config.death_grace),
            input_buffer: InputBuffer::new(config.intent_capacity),
        };

        let seeded = economy::spawn_initial(&mut game_loop.state, &mut game_loop.rng);
        info!(
            "Game loop ready: arena {}x{}, {} initial orbs",
            config.arena.width, config.arena.height, seeded
        );

        game_loop
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// New handle for submitting intents from outside the loop
    pub fn intent_sender(&self) -> IntentSender {
        self.input_buffer.sender()
    }

    pub fn pending_removals(&self) -> usize {
        self.lifecycle.pending_removals()
    }

    /// Apply one intent immediately. Returns false if it was a no-op.
    pub fn apply_intent(&mut self, intent: Intent, now: Timestamp) -> bool {
        match intent {
            Intent::Join {
                player_id,
                nickname,
                identity,
            } => {
                self.lifecycle
                    .join(&mut self.state, &mut self.rng, player_id, nickname, identity, now);
                true
            }
            Intent::Leave { player_id } => self.lifecycle.leave(&mut self.state, player_id),
            Intent::Direction { player_id, angle } => movement::apply_direction(&mut self.state, player_id, angle),
            Intent::Boost { player_id, boosting } => movement::apply_boost(&mut self.state, player_id, boosting),
        }
    }

    /// Run one full simulation step at wall-clock time `now` (epoch ms)
    pub fn tick(&mut self, now: Timestamp) -> TickOutput {
        let mut stats = TickStats {
            removed: self.lifecycle.remove_expired(&mut self.state, now),
            ..TickStats::default()
        };

        for intent in self.input_buffer.drain() {
            if self.apply_intent(intent, now) {
                stats.intents_applied += 1;
            }
        }

        movement::update(&mut self.state);

        let collisions = collision::update(&mut self.state, &mut self.rng, now);
        stats.orbs_collected = collisions.orbs_collected;
        stats.deaths = collisions.deaths.len();

        let summaries = self.lifecycle.finalize(&mut self.state, &collisions.deaths, now);
        stats.summaries = summaries.len();

        let economy = economy::update(&mut self.state, &mut self.rng, &collisions.deaths);
        stats.burst_orbs = economy.burst_orbs;
        stats.topped_up = economy.topped_up;

        let board = leaderboard::project(&self.state);

        self.state.tick += 1;
        let snapshot = GameSnapshot::from_game_state(&self.state, board);

        let mut events = Vec::with_capacity(collisions.deaths.len() + summaries.len());
        events.extend(collisions.deaths.iter().map(|death| GameEvent::SnakeDied {
            victim: death.victim,
            killer: death.killer,
            position: death.position,
            score: death.victim_score,
        }));
        events.extend(summaries.into_iter().map(GameEvent::Summary));

        if stats.deaths > 0 {
            debug!(
                "Tick {}: {} deaths, {} burst orbs, {} summaries",
                self.state.tick, stats.deaths, stats.burst_orbs, stats.summaries
            );
        }

        TickOutput {
            snapshot,
            events,
            stats,
        }
    }
}
