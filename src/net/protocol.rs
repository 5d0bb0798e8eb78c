use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::game::state::{GameState, Orb, PlayerId, Points, Snake};
use crate::game::summary::SessionSummary;
use crate::game::systems::leaderboard::LeaderboardEntry;
use crate::util::vec2::Vec2;

/// Inbound player intents, delivered by the transport collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// Spawn (or respawn) a snake for the player
    Join {
        player_id: PlayerId,
        nickname: String,
        /// External identity reference such as a wallet address
        identity: Option<String>,
    },
    /// Remove the player's snake without a summary
    Leave { player_id: PlayerId },
    /// New heading in radians
    Direction { player_id: PlayerId, angle: f32 },
    Boost { player_id: PlayerId, boosting: bool },
}

impl Intent {
    pub fn player_id(&self) -> PlayerId {
        match self {
            Intent::Join { player_id, .. }
            | Intent::Leave { player_id }
            | Intent::Direction { player_id, .. }
            | Intent::Boost { player_id, .. } => *player_id,
        }
    }
}

/// Messages from the simulation to observers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ServerMessage {
    /// Full per-tick state
    Snapshot(GameSnapshot),
    /// Death notification or ledger record
    Event(GameEvent),
}

/// Snake as seen by observers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnakeView {
    pub segments: Vec<Vec2>,
    pub direction: f32,
    pub boosting: bool,
    pub alive: bool,
    pub score: Points,
    pub kills: u32,
    pub color: String,
}

impl SnakeView {
    pub fn from_snake(snake: &Snake) -> Self {
        Self {
            segments: snake.segments.iter().copied().collect(),
            direction: snake.direction,
            boosting: snake.boosting,
            alive: snake.alive,
            score: snake.score,
            kills: snake.kills,
            color: snake.color.clone(),
        }
    }
}

/// The one consistent view published after each tick
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub tick: u64,
    /// Alive snakes and dead ones still inside their grace period
    pub snakes: HashMap<PlayerId, SnakeView>,
    pub orbs: Vec<Orb>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub nicknames: HashMap<PlayerId, String>,
    /// Alive snakes only
    pub player_count: usize,
}

impl GameSnapshot {
    pub fn from_game_state(state: &GameState, leaderboard: Vec<LeaderboardEntry>) -> Self {
        Self {
            tick: state.tick,
            snakes: state
                .snakes
                .iter()
                .map(|(id, snake)| (*id, SnakeView::from_snake(snake)))
                .collect(),
            orbs: state.orbs.clone(),
            leaderboard,
            nicknames: state.nicknames.clone(),
            player_count: state.alive_count(),
        }
    }
}

/// Events emitted alongside a tick's snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEvent {
    /// A collision was resolved
    SnakeDied {
        victim: PlayerId,
        killer: PlayerId,
        /// Contact point
        position: Vec2,
        /// Victim's score at death
        score: Points,
    },
    /// Ledger record for a victim or a killer
    Summary(SessionSummary),
}

/// Encode a message using bincode
/// Uses legacy config for fixed-size integers
pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, EncodeError> {
    bincode::serde::encode_to_vec(message, bincode::config::legacy())
        .map_err(|e| EncodeError(e.to_string()))
}

/// Decode a message using bincode
/// Uses legacy config for fixed-size integers
pub fn decode<T: for<'de> Deserialize<'de>>(data: &[u8]) -> Result<T, DecodeError> {
    bincode::serde::decode_from_slice(data, bincode::config::legacy())
        .map(|(msg, _)| msg)
        .map_err(|e| DecodeError(e.to_string()))
}

#[derive(Debug, thiserror::Error)]
#[error("Encode error: {0}")]
pub struct EncodeError(String);

#[derive(Debug, thiserror::Error)]
#[error("Decode error: {0}")]
pub struct DecodeError(String);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{Arena, RoleDescriptor};
    use crate::game::summary::SummaryKind;
    use uuid::Uuid;

    fn populated_state() -> (GameState, PlayerId) {
        let mut state = GameState::new(Arena::default());
        let id = Uuid::new_v4();
        let mut snake = Snake::new(
            id,
            Vec2::new(100.0, 200.0),
            0.5,
            "hsl(200, 80%, 50%)".to_string(),
            0,
            0,
            &state.arena,
        );
        snake.score = 12;
        state.insert_snake(snake);
        state.nicknames.insert(id, "boa".to_string());
        state.spawn_orb(
            Vec2::new(10.0, 10.0),
            6,
            RoleDescriptor {
                name: "MON 1".to_string(),
                color: "#800080".to_string(),
                stars: Some(1),
            },
            None,
        );
        state.tick = 77;
        (state, id)
    }

    #[test]
    fn test_intent_roundtrip() {
        let player_id = Uuid::new_v4();
        let intent = Intent::Join {
            player_id,
            nickname: "sidewinder".to_string(),
            identity: Some("0x1234".to_string()),
        };
        let decoded: Intent = decode(&encode(&intent).unwrap()).unwrap();
        assert_eq!(decoded, intent);
        assert_eq!(decoded.player_id(), player_id);
    }

    #[test]
    fn test_snapshot_from_state() {
        let (state, id) = populated_state();
        let snapshot = GameSnapshot::from_game_state(&state, Vec::new());

        assert_eq!(snapshot.tick, 77);
        assert_eq!(snapshot.player_count, 1);
        assert_eq!(snapshot.orbs.len(), 1);
        let view = &snapshot.snakes[&id];
        assert_eq!(view.score, 12);
        assert_eq!(view.segments.len(), state.snakes[&id].segment_count());
        assert_eq!(snapshot.nicknames.get(&id).map(String::as_str), Some("boa"));
    }

    #[test]
    fn test_player_count_excludes_dead() {
        let (mut state, id) = populated_state();
        state.get_snake_mut(id).unwrap().mark_dead(5);

        let snapshot = GameSnapshot::from_game_state(&state, Vec::new());
        assert_eq!(snapshot.player_count, 0);
        assert_eq!(snapshot.snakes.len(), 1);
    }

    #[test]
    fn test_server_message_snapshot_serialization() {
        let (state, id) = populated_state();
        let msg = ServerMessage::Snapshot(GameSnapshot::from_game_state(&state, Vec::new()));

        let decoded: ServerMessage = decode(&encode(&msg).unwrap()).unwrap();
        match decoded {
            ServerMessage::Snapshot(snapshot) => {
                assert_eq!(snapshot.tick, 77);
                assert_eq!(snapshot.orbs[0].role.stars, Some(1));
                assert_eq!(snapshot.snakes[&id].color, "hsl(200, 80%, 50%)");
            }
            _ => panic!("Wrong message type"),
        }
    }

    #[test]
    fn test_summary_event_serialization() {
        let summary = SessionSummary {
            player_id: Uuid::new_v4(),
            nickname: "taipan".to_string(),
            identity_ref: None,
            score: 35,
            duration_secs: 12,
            orbs_collected: 4,
            snake_length: 18,
            kind: SummaryKind::Kill { kills: 1 },
        };
        let msg = ServerMessage::Event(GameEvent::Summary(summary.clone()));

        let decoded: ServerMessage = decode(&encode(&msg).unwrap()).unwrap();
        match decoded {
            ServerMessage::Event(GameEvent::Summary(s)) => assert_eq!(s, summary),
            _ => panic!("Wrong message type"),
        }
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result: Result<ServerMessage, _> = decode(&[0xff, 0xff, 0xff, 0xff, 0x01]);
        assert!(result.is_err());
    }
}
