//! Session summaries handed to the ledger collaborator
//!
//! One record is emitted for the victim of every resolved collision, and a
//! second, kill-type record for the snake that won it.

use serde::{Deserialize, Serialize};

use crate::game::state::{PlayerId, Points, Snake, Timestamp};

/// Why a summary was emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryKind {
    /// The snake's session ended
    Death,
    /// Running update for a snake that just won a collision
    Kill { kills: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub player_id: PlayerId,
    pub nickname: String,
    /// External identity reference (e.g. a wallet address), if one was registered
    pub identity_ref: Option<String>,
    pub score: Points,
    /// Whole seconds since the snake spawned
    pub duration_secs: u64,
    pub orbs_collected: u32,
    pub snake_length: usize,
    pub kind: SummaryKind,
}

impl SessionSummary {
    /// Victim record, duration measured up to the death timestamp
    pub fn death(snake: &Snake, nickname: String, identity_ref: Option<String>, now: Timestamp) -> Self {
        let ended = snake.died_at.unwrap_or(now);
        Self {
            player_id: snake.id,
            nickname,
            identity_ref,
            score: snake.score,
            duration_secs: snake.session_secs(ended),
            orbs_collected: snake.orbs_collected,
            snake_length: snake.segment_count(),
            kind: SummaryKind::Death,
        }
    }

    /// Killer record with its running totals
    pub fn kill(snake: &Snake, nickname: String, identity_ref: Option<String>, now: Timestamp) -> Self {
        Self {
            player_id: snake.id,
            nickname,
            identity_ref,
            score: snake.score,
            duration_secs: snake.session_secs(now),
            orbs_collected: snake.orbs_collected,
            snake_length: snake.segment_count(),
            kind: SummaryKind::Kill { kills: snake.kills },
        }
    }

    pub fn is_kill(&self) -> bool {
        matches!(self.kind, SummaryKind::Kill { .. })
    }
}
