//! Simulation state definitions
//!
//! Owns the live sets of snakes and orbs together with the per-player
//! bookkeeping (nicknames, identity references) scoped to the session.

use std::collections::VecDeque;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::constants::{collision, spawn};
use crate::game::roles::Role;
use crate::util::vec2::Vec2;

/// Unique player identifier (also the id of that player's snake)
pub type PlayerId = Uuid;

/// Orb identifier, allocated monotonically and never reused
pub type OrbId = u64;

/// Score and orb values; unsigned so a negative score cannot exist
pub type Points = u64;

/// Wall-clock timestamp in milliseconds since the Unix epoch
pub type Timestamp = u64;

/// Toroidal play surface, fixed for the session lifetime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Wrap a point onto the torus
    #[inline]
    pub fn wrap(&self, position: Vec2) -> Vec2 {
        position.wrapped(self.width, self.height)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(1000.0, 1000.0)
    }
}

/// Player-controlled snake
///
/// Fields are ordered hot-to-cold: movement touches the first group every
/// tick, collision touches the second, the rest is read for summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snake {
    // === HOT FIELDS (movement, every tick) ===
    /// Body positions, head first
    pub segments: VecDeque<Vec2>,
    /// Heading in radians
    pub direction: f32,
    pub boosting: bool,
    pub alive: bool,
    /// Segment count the body grows toward
    pub target_length: usize,

    // === WARM FIELDS (collision and scoring) ===
    pub score: Points,
    pub kills: u32,
    pub orbs_collected: u32,
    /// Creation order; collision scans attackers in this order
    pub spawn_seq: u64,

    // === COLD FIELDS ===
    pub id: PlayerId,
    /// CSS color string, e.g. `hsl(120, 80%, 50%)`
    pub color: String,
    pub started_at: Timestamp,
    pub died_at: Option<Timestamp>,
}

impl Snake {
    /// Build a fresh snake with its initial body laid out behind `head`
    /// along `direction`, wrapped onto the arena.
    pub fn new(
        id: PlayerId,
        head: Vec2,
        direction: f32,
        color: String,
        spawn_seq: u64,
        now: Timestamp,
        arena: &Arena,
    ) -> Self {
        let back = Vec2::from_angle(direction) * spawn::INITIAL_SEGMENT_SPACING;
        let segments = (0..spawn::INITIAL_LENGTH)
            .map(|i| arena.wrap(head - back * i as f32))
            .collect();

        Self {
            segments,
            direction,
            boosting: false,
            alive: true,
            target_length: spawn::INITIAL_LENGTH,
            score: 0,
            kills: 0,
            orbs_collected: 0,
            spawn_seq,
            id,
            color,
            started_at: now,
            died_at: None,
        }
    }

    /// Current head position. Every snake has at least one segment.
    #[inline]
    pub fn head(&self) -> Vec2 {
        self.segments.front().copied().unwrap_or(Vec2::ZERO)
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Body segments, i.e. everything behind the head
    pub fn body(&self) -> impl Iterator<Item = &Vec2> {
        self.segments.iter().skip(1)
    }

    /// Credit a collected orb
    pub fn collect_orb(&mut self, value: Points) {
        self.score = self.score.saturating_add(value);
        self.target_length += collision::GROWTH_PER_ORB;
        self.orbs_collected += 1;
    }

    /// Credit a kill: the victim's whole score moves to this snake
    pub fn credit_kill(&mut self, victim_score: Points) {
        self.score = self.score.saturating_add(victim_score);
        self.kills += 1;
    }

    pub fn mark_dead(&mut self, now: Timestamp) {
        self.alive = false;
        self.died_at = Some(now);
    }

    /// Whole seconds between spawn and `until`
    pub fn session_secs(&self, until: Timestamp) -> u64 {
        until.saturating_sub(self.started_at) / 1000
    }
}

/// Role information carried by an orb for display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleDescriptor {
    pub name: String,
    pub color: String,
    pub stars: Option<u8>,
}

impl From<&Role> for RoleDescriptor {
    fn from(role: &Role) -> Self {
        Self {
            name: role.name.to_string(),
            color: role.color.to_string(),
            stars: role.stars,
        }
    }
}

/// Static pickup. Immutable once spawned; destroyed only when collected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Orb {
    pub id: OrbId,
    pub position: Vec2,
    pub value: Points,
    pub role: RoleDescriptor,
    /// External image reference, present only on team orbs
    pub team_image: Option<String>,
}

impl Orb {
    pub fn is_team(&self) -> bool {
        self.team_image.is_some()
    }

    pub fn pickup_radius(&self) -> f32 {
        collision::pickup_radius(self.value)
    }
}

/// Complete simulation state (the entity store)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GameState {
    pub tick: u64,
    pub arena: Arena,
    pub snakes: HashMap<PlayerId, Snake>,
    pub orbs: Vec<Orb>,
    pub nicknames: HashMap<PlayerId, String>,
    /// Identity references (e.g. wallet addresses) handed to the ledger
    pub identities: HashMap<PlayerId, String>,
    next_orb_id: OrbId,
    next_spawn_seq: u64,
}

impl GameState {
    pub fn new(arena: Arena) -> Self {
        Self {
            arena,
            next_orb_id: 1,
            ..Self::default()
        }
    }

    /// Allocate a new orb id - never reused within the session
    pub fn next_orb_id(&mut self) -> OrbId {
        let id = self.next_orb_id;
        self.next_orb_id += 1;
        id
    }

    /// Allocate the creation sequence number for a new snake
    pub fn next_spawn_seq(&mut self) -> u64 {
        let seq = self.next_spawn_seq;
        self.next_spawn_seq += 1;
        seq
    }

    pub fn get_snake(&self, id: PlayerId) -> Option<&Snake> {
        self.snakes.get(&id)
    }

    pub fn get_snake_mut(&mut self, id: PlayerId) -> Option<&mut Snake> {
        self.snakes.get_mut(&id)
    }

    /// Alive snake by id; dead or unknown ids yield `None`
    pub fn alive_snake_mut(&mut self, id: PlayerId) -> Option<&mut Snake> {
        self.snakes.get_mut(&id).filter(|s| s.alive)
    }

    pub fn alive_snakes(&self) -> impl Iterator<Item = &Snake> {
        self.snakes.values().filter(|s| s.alive)
    }

    pub fn alive_count(&self) -> usize {
        self.snakes.values().filter(|s| s.alive).count()
    }

    /// Insert a snake, replacing any previous snake for the same player
    pub fn insert_snake(&mut self, snake: Snake) -> Option<Snake> {
        self.snakes.insert(snake.id, snake)
    }

    pub fn remove_snake(&mut self, id: PlayerId) -> Option<Snake> {
        self.snakes.remove(&id)
    }

    /// Ids of alive snakes in creation order
    pub fn alive_ids_in_spawn_order(&self) -> Vec<PlayerId> {
        let mut alive: Vec<(u64, PlayerId)> = self
            .snakes
            .values()
            .filter(|s| s.alive)
            .map(|s| (s.spawn_seq, s.id))
            .collect();
        alive.sort_unstable_by_key(|(seq, _)| *seq);
        alive.into_iter().map(|(_, id)| id).collect()
    }

    /// Add an orb and return its id
    pub fn spawn_orb(
        &mut self,
        position: Vec2,
        value: Points,
        role: RoleDescriptor,
        team_image: Option<String>,
    ) -> OrbId {
        let id = self.next_orb_id();
        self.orbs.push(Orb {
            id,
            position,
            value,
            role,
            team_image,
        });
        id
    }

    /// Registered nickname, or `Player` plus the first characters of the id
    pub fn display_name(&self, id: PlayerId) -> String {
        use crate::game::constants::leaderboard::{FALLBACK_ID_CHARS, FALLBACK_PREFIX};

        match self.nicknames.get(&id) {
            Some(name) => name.clone(),
            None => {
                let short: String = id.to_string().chars().take(FALLBACK_ID_CHARS).collect();
                format!("{}{}", FALLBACK_PREFIX, short)
            }
        }
    }
}
