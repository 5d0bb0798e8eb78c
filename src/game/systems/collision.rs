//! Collision detection and resolution
//!
//! Runs after movement against the fresh head positions. Attackers are
//! scanned in snake creation order:
//! - Orb pickup: every orb within the value-dependent radius of the head is
//!   consumed by that snake; later attackers no longer see it.
//! - Snake vs snake: the head is tested against each other alive snake's
//!   body (head excluded). A hit is resolved by score, lower score dies, and
//!   a tie is settled by a coin flip from the injected RNG.
//!
//! A snake that dies during the pass is never evaluated as an attacker again
//! in that tick, and an attacker that dies stops scanning immediately.

use std::cmp::Ordering;

use rand::Rng;
use smallvec::SmallVec;

use crate::game::constants::collision::BODY_HIT_RADIUS;
use crate::game::state::{GameState, PlayerId, Points, Timestamp};
use crate::util::vec2::Vec2;

/// A resolved snake-vs-snake collision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Death {
    pub victim: PlayerId,
    pub killer: PlayerId,
    /// Contact point (the attacker's head)
    pub position: Vec2,
    /// Victim's score at the moment of death
    pub victim_score: Points,
}

/// Everything the collision pass changed, for the later pipeline stages
#[derive(Debug, Default)]
pub struct CollisionReport {
    /// OPTIMIZATION: SmallVec avoids a heap allocation on the common 0-4 deaths per tick
    pub deaths: SmallVec<[Death; 4]>,
    pub orbs_collected: u32,
}

/// Run orb pickups and snake-vs-snake resolution for one tick
pub fn update<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R, now: Timestamp) -> CollisionReport {
    let mut report = CollisionReport::default();
    let order = state.alive_ids_in_spawn_order();

    for &attacker_id in &order {
        let head = match state.get_snake(attacker_id) {
            Some(snake) if snake.alive => snake.head(),
            _ => continue,
        };

        report.orbs_collected += collect_orbs(state, attacker_id, head);

        for &opponent_id in &order {
            if opponent_id == attacker_id {
                continue;
            }

            let hit = match state.get_snake(opponent_id) {
                Some(opponent) if opponent.alive => {
                    opponent.body().any(|segment| head.within(*segment, BODY_HIT_RADIUS))
                }
                _ => false,
            };
            if !hit {
                continue;
            }

            if let Some(death) = resolve_hit(state, attacker_id, opponent_id, head, rng, now) {
                report.deaths.push(death);
                if death.victim == attacker_id {
                    break;
                }
            }
        }
    }

    report
}

/// Consume every orb within pickup range of `head`. Returns the number collected.
fn collect_orbs(state: &mut GameState, snake_id: PlayerId, head: Vec2) -> u32 {
    let mut values: SmallVec<[Points; 4]> = SmallVec::new();

    state.orbs.retain(|orb| {
        if head.within(orb.position, orb.pickup_radius()) {
            values.push(orb.value);
            false
        } else {
            true
        }
    });

    if let Some(snake) = state.get_snake_mut(snake_id) {
        for value in &values {
            snake.collect_orb(*value);
        }
    }

    values.len() as u32
}

/// Decide who dies in a head-to-body hit and apply the score transfer.
///
/// Returns `None` if either participant vanished or is already dead.
pub fn resolve_hit<R: Rng + ?Sized>(
    state: &mut GameState,
    attacker_id: PlayerId,
    opponent_id: PlayerId,
    contact: Vec2,
    rng: &mut R,
    now: Timestamp,
) -> Option<Death> {
    let attacker_score = state.get_snake(attacker_id).filter(|s| s.alive)?.score;
    let opponent_score = state.get_snake(opponent_id).filter(|s| s.alive)?.score;

    let attacker_loses = match attacker_score.cmp(&opponent_score) {
        Ordering::Less => true,
        Ordering::Greater => false,
        Ordering::Equal => rng.gen_bool(0.5),
    };

    let (victim, killer, victim_score) = if attacker_loses {
        (attacker_id, opponent_id, attacker_score)
    } else {
        (opponent_id, attacker_id, opponent_score)
    };

    state.get_snake_mut(victim)?.mark_dead(now);
    state.get_snake_mut(killer)?.credit_kill(victim_score);

    Some(Death {
        victim,
        killer,
        position: contact,
        victim_score,
    })
}
