use serde::{Deserialize, Serialize};

use crate::game::constants::leaderboard::TOP_N;
use crate::game::state::{GameState, PlayerId, Points};

/// One ranked row, rebuilt from scratch every tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: PlayerId,
    pub nickname: String,
    pub score: Points,
    pub color: String,
}

/// Rank alive snakes by score, highest first, and keep the top entries.
/// Equal scores keep creation order so the ranking is stable between ticks.
pub fn project(state: &GameState) -> Vec<LeaderboardEntry> {
    let mut ranked: Vec<_> = state.alive_snakes().collect();
    ranked.sort_unstable_by(|a, b| b.score.cmp(&a.score).then(a.spawn_seq.cmp(&b.spawn_seq)));

    ranked
        .into_iter()
        .take(TOP_N)
        .map(|snake| LeaderboardEntry {
            id: snake.id,
            nickname: state.display_name(snake.id),
            score: snake.score,
            color: snake.color.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{Arena, Snake};
    use crate::util::vec2::Vec2;
    use uuid::Uuid;

    fn add_snake(state: &mut GameState, score: Points, alive: bool) -> PlayerId {
        let id = Uuid::new_v4();
        let seq = state.next_spawn_seq();
        let mut snake = Snake::new(
            id,
            Vec2::new(100.0, 100.0),
            0.0,
            format!("hsl({}, 80%, 50%)", seq),
            seq,
            0,
            &state.arena,
        );
        snake.score = score;
        snake.alive = alive;
        state.insert_snake(snake);
        id
    }

    #[test]
    fn test_sorted_by_score_descending() {
        let mut state = GameState::new(Arena::default());
        let low = add_snake(&mut state, 3, true);
        let high = add_snake(&mut state, 40, true);
        let mid = add_snake(&mut state, 12, true);

        let board = project(&state);
        let ids: Vec<_> = board.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![high, mid, low]);
        assert_eq!(board[0].score, 40);
    }

    #[test]
    fn test_excludes_dead_snakes() {
        let mut state = GameState::new(Arena::default());
        add_snake(&mut state, 100, false);
        let alive = add_snake(&mut state, 1, true);

        let board = project(&state);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].id, alive);
    }

    #[test]
    fn test_truncates_to_top_n() {
        let mut state = GameState::new(Arena::default());
        for score in 0..15 {
            add_snake(&mut state, score, true);
        }

        let board = project(&state);
        assert_eq!(board.len(), TOP_N);
        assert_eq!(board[0].score, 14);
        assert_eq!(board[TOP_N - 1].score, 5);
    }

    #[test]
    fn test_ties_keep_creation_order() {
        let mut state = GameState::new(Arena::default());
        let first = add_snake(&mut state, 7, true);
        let second = add_snake(&mut state, 7, true);

        let board = project(&state);
        assert_eq!(board[0].id, first);
        assert_eq!(board[1].id, second);
    }

    #[test]
    fn test_nickname_and_fallback() {
        let mut state = GameState::new(Arena::default());
        let named = add_snake(&mut state, 2, true);
        let anonymous = add_snake(&mut state, 1, true);
        state.nicknames.insert(named, "viper".to_string());

        let board = project(&state);
        assert_eq!(board[0].nickname, "viper");
        assert_eq!(board[1].nickname, format!("Player{}", &anonymous.to_string()[..4]));
        assert_eq!(board[1].color, "hsl(1, 80%, 50%)");
    }

    #[test]
    fn test_empty_state() {
        let state = GameState::new(Arena::default());
        assert!(project(&state).is_empty());
    }
}
