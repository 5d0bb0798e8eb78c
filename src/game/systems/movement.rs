use rayon::prelude::*;

use crate::game::constants::movement::{BASE_SPEED, BOOST_SPEED, SEGMENT_SMOOTHING};
use crate::game::state::{Arena, GameState, PlayerId, Snake};
use crate::util::vec2::Vec2;

/// Advance every alive snake by one step.
/// Snakes move independently, so the pass runs in parallel with rayon.
pub fn update(state: &mut GameState) {
    let arena = state.arena;

    state.snakes.par_values_mut().for_each(|snake| {
        if !snake.alive {
            return;
        }
        step(snake, &arena);
    });
}

/// Move one snake: new head along its heading, trim the tail to the target
/// length, then pull each body segment toward its predecessor.
pub fn step(snake: &mut Snake, arena: &Arena) {
    let speed = if snake.boosting { BOOST_SPEED } else { BASE_SPEED };
    let new_head = arena.wrap(snake.head() + Vec2::from_angle(snake.direction) * speed);

    snake.segments.push_front(new_head);
    snake.segments.truncate(snake.target_length.max(1));

    for i in 1..snake.segments.len() {
        let previous = snake.segments[i - 1];
        let current = snake.segments[i];
        snake.segments[i] = arena.wrap(current.lerp(previous, SEGMENT_SMOOTHING));
    }
}

/// Apply a heading change. Unknown, dead, or non-finite input is ignored.
pub fn apply_direction(state: &mut GameState, player_id: PlayerId, angle: f32) -> bool {
    if !angle.is_finite() {
        return false;
    }
    match state.alive_snake_mut(player_id) {
        Some(snake) => {
            snake.direction = angle;
            true
        }
        None => false,
    }
}

/// Apply a boost toggle. Unknown or dead snakes are ignored.
pub fn apply_boost(state: &mut GameState, player_id: PlayerId, boosting: bool) -> bool {
    match state.alive_snake_mut(player_id) {
        Some(snake) => {
            snake.boosting = boosting;
            true
        }
        None => false,
    }
}
