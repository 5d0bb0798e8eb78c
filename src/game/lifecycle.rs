//! Session lifecycle
//!
//! Joins create a fresh snake (replacing any previous one for the id),
//! leaves drop the player outright, and deaths are finalized into ledger
//! summaries. Dead snakes with a score stay visible for a grace period so
//! clients can present the death, then get removed.

use std::time::Duration;

use rand::Rng;
use rustc_hash::FxHashMap;
use tracing::{debug, info};

use crate::game::constants::lifecycle::DEATH_GRACE_MS;
use crate::game::constants::spawn::{COLOR_LIGHTNESS, COLOR_SATURATION};
use crate::game::state::{GameState, PlayerId, Snake, Timestamp};
use crate::game::summary::SessionSummary;
use crate::game::systems::collision::Death;
use crate::util::vec2::Vec2;

/// Removal scheduled for a dead snake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRemoval {
    /// Death timestamp the removal belongs to; a rejoin changes it
    died_at: Timestamp,
    remove_at: Timestamp,
}

#[derive(Debug)]
pub struct SessionLifecycle {
    death_grace_ms: u64,
    /// OPTIMIZATION: FxHashMap for the small uuid-keyed removal table
    pending: FxHashMap<PlayerId, PendingRemoval>,
}

impl Default for SessionLifecycle {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEATH_GRACE_MS))
    }
}

impl SessionLifecycle {
    pub fn new(death_grace: Duration) -> Self {
        Self {
            death_grace_ms: death_grace.as_millis() as u64,
            pending: FxHashMap::default(),
        }
    }

    /// Spawn a brand-new snake for `player_id` at a random position and
    /// heading. An existing snake for the id is replaced, alive or dead.
    /// Returns true if a previous snake was replaced.
    pub fn join<R: Rng + ?Sized>(
        &mut self,
        state: &mut GameState,
        rng: &mut R,
        player_id: PlayerId,
        nickname: String,
        identity_ref: Option<String>,
        now: Timestamp,
    ) -> bool {
        let head = Vec2::new(
            rng.gen_range(0.0..state.arena.width),
            rng.gen_range(0.0..state.arena.height),
        );
        let direction = rng.gen_range(0.0..std::f32::consts::TAU);
        let hue: u16 = rng.gen_range(0..360);
        let color = format!("hsl({}, {}%, {}%)", hue, COLOR_SATURATION, COLOR_LIGHTNESS);
        let spawn_seq = state.next_spawn_seq();

        let snake = Snake::new(player_id, head, direction, color, spawn_seq, now, &state.arena);
        let replaced = state.insert_snake(snake).is_some();
        self.pending.remove(&player_id);

        if nickname.trim().is_empty() {
            state.nicknames.remove(&player_id);
        } else {
            state.nicknames.insert(player_id, nickname);
        }
        match identity_ref {
            Some(identity) => state.identities.insert(player_id, identity),
            None => state.identities.remove(&player_id),
        };

        info!(
            "Player {} ({}) joined{}",
            state.display_name(player_id),
            player_id,
            if replaced { ", replacing previous snake" } else { "" }
        );

        replaced
    }

    /// Drop the player's snake and registrations. No burst, no summary.
    /// Returns false if the player was unknown.
    pub fn leave(&mut self, state: &mut GameState, player_id: PlayerId) -> bool {
        let removed = state.remove_snake(player_id).is_some();
        state.nicknames.remove(&player_id);
        state.identities.remove(&player_id);
        self.pending.remove(&player_id);

        if removed {
            info!("Player {} left", player_id);
        }
        removed
    }

    /// Turn the tick's deaths into summaries and schedule removals.
    ///
    /// Zero-score victims are removed right away; the rest stay visible
    /// until `now + grace`. Each death yields a victim summary followed by a
    /// kill summary for the winner.
    pub fn finalize(&mut self, state: &mut GameState, deaths: &[Death], now: Timestamp) -> Vec<SessionSummary> {
        let mut summaries = Vec::with_capacity(deaths.len() * 2);

        for death in deaths {
            if let Some(victim) = state.get_snake(death.victim) {
                summaries.push(SessionSummary::death(
                    victim,
                    state.display_name(victim.id),
                    state.identities.get(&victim.id).cloned(),
                    now,
                ));

                let died_at = victim.died_at.unwrap_or(now);
                if victim.score == 0 {
                    state.remove_snake(death.victim);
                    debug!("Removed zero-score snake {}", death.victim);
                } else {
                    self.pending.insert(
                        death.victim,
                        PendingRemoval {
                            died_at,
                            remove_at: died_at.saturating_add(self.death_grace_ms),
                        },
                    );
                }
            }

            if let Some(killer) = state.get_snake(death.killer) {
                summaries.push(SessionSummary::kill(
                    killer,
                    state.display_name(killer.id),
                    state.identities.get(&killer.id).cloned(),
                    now,
                ));
            }

            debug!(
                "{} killed {} ({} points)",
                death.killer, death.victim, death.victim_score
            );
        }

        summaries
    }

    /// Remove dead snakes whose grace period is over. A removal whose snake
    /// was replaced by a rejoin in the meantime is discarded.
    pub fn remove_expired(&mut self, state: &mut GameState, now: Timestamp) -> usize {
        let mut removed = 0;

        self.pending.retain(|id, pending| {
            if pending.remove_at > now {
                return true;
            }
            let still_dead = state
                .get_snake(*id)
                .is_some_and(|s| !s.alive && s.died_at == Some(pending.died_at));
            if still_dead {
                state.remove_snake(*id);
                removed += 1;
                debug!("Removed dead snake {} after grace period", id);
            }
            false
        });

        removed
    }

    pub fn pending_removals(&self) -> usize {
        self.pending.len()
    }
}
