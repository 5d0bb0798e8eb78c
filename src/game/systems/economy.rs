//! Orb economy
//! Seeds the arena at startup, tops the orb population back up to its
//! area-proportional floor every tick, and scatters death-burst orbs around
//! the point where a snake died.

use rand::Rng;

use crate::game::constants::economy::{
    initial_orb_count, target_orb_count, BURST_EDGE_INSET, BURST_MAX_DISTANCE, BURST_MAX_ORBS,
    BURST_MIN_DISTANCE, BURST_MIN_ORBS, BURST_SCORE_DIVISOR, TEAM_ORB_CHANCE, TEAM_ORB_COLOR,
    TEAM_ORB_VALUE,
};
use crate::game::roles;
use crate::game::state::{Arena, GameState, OrbId, Points, RoleDescriptor};
use crate::game::systems::collision::Death;
use crate::util::vec2::Vec2;

/// Orbs added by one economy pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EconomyReport {
    pub burst_orbs: usize,
    pub topped_up: usize,
}

/// Spawn the startup population
/// Called once when the session is created
pub fn spawn_initial<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> usize {
    let count = initial_orb_count(state.arena.width, state.arena.height);
    for _ in 0..count {
        create_orb(state, rng);
    }

    tracing::debug!("Spawned initial orbs: {} total", state.orbs.len());
    count
}

/// Economy stage of a tick: death bursts first, then top-up to the floor
pub fn update<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R, deaths: &[Death]) -> EconomyReport {
    let mut burst_orbs = 0;
    for death in deaths {
        burst_orbs += spawn_burst(state, rng, death.position, death.victim_score);
    }

    EconomyReport {
        burst_orbs,
        topped_up: top_up(state, rng),
    }
}

/// Add orbs until the live count reaches the population floor.
/// Never removes orbs for being over the floor.
pub fn top_up<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> usize {
    let target = target_orb_count(state.arena.width, state.arena.height);
    let mut added = 0;
    while state.orbs.len() < target {
        create_orb(state, rng);
        added += 1;
    }
    added
}

/// Generate one orb at a uniformly random position: a team orb with
/// probability `TEAM_ORB_CHANCE`, otherwise a weighted catalog role
pub fn create_orb<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R) -> OrbId {
    let position = random_position(&state.arena, rng);

    if rng.gen_bool(TEAM_ORB_CHANCE) {
        let member = roles::pick_team_member(rng);
        let role = RoleDescriptor {
            name: member.name.to_string(),
            color: TEAM_ORB_COLOR.to_string(),
            stars: None,
        };
        return state.spawn_orb(position, TEAM_ORB_VALUE, role, Some(member.image.to_string()));
    }

    let role = roles::pick_weighted(rng);
    state.spawn_orb(position, role.points, role.into(), None)
}

/// Orb count and per-orb value for a death burst, or `None` for a zero score.
///
/// Count is `clamp(score / 5, 3, 10)`, capped at the score itself so no orb
/// is worth zero. Value is `score / count`; the remainder is dropped, so the
/// burst never carries more than the victim had.
pub fn burst_layout(score: Points) -> Option<(u64, Points)> {
    if score == 0 {
        return None;
    }
    let count = (score / BURST_SCORE_DIVISOR)
        .clamp(BURST_MIN_ORBS, BURST_MAX_ORBS)
        .min(score);
    Some((count, score / count))
}

/// Scatter a dead snake's score around its death point. Returns orbs spawned.
pub fn spawn_burst<R: Rng + ?Sized>(
    state: &mut GameState,
    rng: &mut R,
    position: Vec2,
    score: Points,
) -> usize {
    let Some((count, value)) = burst_layout(score) else {
        return 0;
    };

    let role = roles::role_for_value(value);
    let arena = state.arena;

    for i in 0..count {
        let angle = std::f32::consts::TAU * i as f32 / count as f32;
        let distance = rng.gen_range(BURST_MIN_DISTANCE..BURST_MAX_DISTANCE);
        let spot = (position + Vec2::from_angle(angle) * distance).clamp_inset(
            arena.width,
            arena.height,
            BURST_EDGE_INSET,
        );
        state.spawn_orb(spot, value, role.into(), None);
    }

    tracing::debug!(
        "Death burst: {} orbs x {} points at ({:.0}, {:.0}), {} points dropped",
        count,
        value,
        position.x,
        position.y,
        score - count * value
    );

    count as usize
}

fn random_position<R: Rng + ?Sized>(arena: &Arena, rng: &mut R) -> Vec2 {
    Vec2::new(rng.gen_range(0.0..arena.width), rng.gen_range(0.0..arena.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use uuid::Uuid;

    fn reference_state() -> GameState {
        GameState::new(Arena::new(1000.0, 1000.0))
    }

    #[test]
    fn test_top_up_reaches_target() {
        let mut state = reference_state();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let added = top_up(&mut state, &mut rng);

        assert_eq!(added, 50);
        assert_eq!(state.orbs.len(), 50);
    }

    #[test]
    fn test_top_up_never_removes() {
        let mut state = reference_state();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..70 {
            create_orb(&mut state, &mut rng);
        }

        assert_eq!(top_up(&mut state, &mut rng), 0);
        assert_eq!(state.orbs.len(), 70);
    }

    #[test]
    fn test_spawn_initial_count() {
        let mut state = reference_state();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert_eq!(spawn_initial(&mut state, &mut rng), 33);
        assert_eq!(state.orbs.len(), 33);
    }

    #[test]
    fn test_orbs_within_arena_and_ids_unique() {
        let mut state = reference_state();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..500 {
            create_orb(&mut state, &mut rng);
        }

        let mut ids: Vec<OrbId> = state.orbs.iter().map(|o| o.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 500);

        for orb in &state.orbs {
            assert!(orb.position.x >= 0.0 && orb.position.x < 1000.0);
            assert!(orb.position.y >= 0.0 && orb.position.y < 1000.0);
        }
    }

    #[test]
    fn test_team_orbs_are_flat_value_with_image() {
        let mut state = reference_state();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..1_000 {
            create_orb(&mut state, &mut rng);
        }

        let team: Vec<_> = state.orbs.iter().filter(|o| o.is_team()).collect();
        // ~10% expected
        assert!(team.len() > 50 && team.len() < 160, "team orbs: {}", team.len());
        for orb in team {
            assert_eq!(orb.value, TEAM_ORB_VALUE);
            assert_eq!(orb.role.color, TEAM_ORB_COLOR);
        }
        for orb in state.orbs.iter().filter(|o| !o.is_team()) {
            assert!(roles::ROLES.iter().any(|r| r.points == orb.value && r.name == orb.role.name));
        }
    }

    #[test]
    fn test_burst_layout_reference() {
        // 17 points -> clamp(3, 3, 10) = 3 orbs of 5 points, 2 dropped
        assert_eq!(burst_layout(17), Some((3, 5)));
        assert_eq!(burst_layout(100), Some((10, 10)));
        assert_eq!(burst_layout(1_000), Some((10, 100)));
        assert_eq!(burst_layout(40), Some((8, 5)));
    }

    #[test]
    fn test_burst_layout_small_scores() {
        assert_eq!(burst_layout(0), None);
        assert_eq!(burst_layout(1), Some((1, 1)));
        assert_eq!(burst_layout(2), Some((2, 1)));
        assert_eq!(burst_layout(3), Some((3, 1)));
    }

    #[test]
    fn test_burst_value_never_exceeds_score() {
        for score in 0..500u64 {
            if let Some((count, value)) = burst_layout(score) {
                assert!(count * value <= score, "score {}", score);
                assert!(value >= 1);
            }
        }
    }

    #[test]
    fn test_spawn_burst_placement() {
        let mut state = reference_state();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let death = Vec2::new(500.0, 500.0);

        let spawned = spawn_burst(&mut state, &mut rng, death, 17);

        assert_eq!(spawned, 3);
        assert_eq!(state.orbs.len(), 3);
        for orb in &state.orbs {
            assert_eq!(orb.value, 5);
            assert_eq!(orb.role.name, "Nad OG");
            let d = orb.position.distance_to(death);
            assert!(d >= 50.0 - 1e-3 && d < BURST_MAX_DISTANCE + 1e-3, "distance {}", d);
        }
    }

    #[test]
    fn test_spawn_burst_clamped_inside_edges() {
        let mut state = reference_state();
        let mut rng = ChaCha8Rng::seed_from_u64(6);

        spawn_burst(&mut state, &mut rng, Vec2::new(5.0, 995.0), 200);

        assert_eq!(state.orbs.len(), 10);
        for orb in &state.orbs {
            assert!(orb.position.x >= BURST_EDGE_INSET && orb.position.x <= 1000.0 - BURST_EDGE_INSET);
            assert!(orb.position.y >= BURST_EDGE_INSET && orb.position.y <= 1000.0 - BURST_EDGE_INSET);
        }
    }

    #[test]
    fn test_spawn_burst_zero_score() {
        let mut state = reference_state();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(spawn_burst(&mut state, &mut rng, Vec2::new(500.0, 500.0), 0), 0);
        assert!(state.orbs.is_empty());
    }

    #[test]
    fn test_update_bursts_then_tops_up() {
        let mut state = reference_state();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let deaths = [Death {
            victim: Uuid::new_v4(),
            killer: Uuid::new_v4(),
            position: Vec2::new(400.0, 400.0),
            victim_score: 30,
        }];

        let report = update(&mut state, &mut rng, &deaths);

        assert_eq!(report.burst_orbs, 6);
        assert_eq!(report.topped_up, 44);
        assert_eq!(state.orbs.len(), 50);
    }
}
