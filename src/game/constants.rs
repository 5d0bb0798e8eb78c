/// Movement constants
pub mod movement {
    /// Head displacement per tick when not boosting
    pub const BASE_SPEED: f32 = 3.0;
    /// Head displacement per tick while boosting (2x base)
    pub const BOOST_SPEED: f32 = 6.0;
    /// Fraction of the gap to its predecessor each body segment closes per tick
    pub const SEGMENT_SMOOTHING: f32 = 0.3;
}

/// Spawn constants for freshly joined snakes
pub mod spawn {
    /// Segment count (and target length) of a new snake
    pub const INITIAL_LENGTH: usize = 10;
    /// Distance between initial segments, laid out behind the head
    pub const INITIAL_SEGMENT_SPACING: f32 = 3.0;
    /// Saturation/lightness of the random snake hue
    pub const COLOR_SATURATION: u8 = 80;
    pub const COLOR_LIGHTNESS: u8 = 50;
}

/// Collision constants
pub mod collision {
    /// Pickup radius for orbs at or above `HIGH_VALUE_THRESHOLD`
    pub const HIGH_VALUE_PICKUP_RADIUS: f32 = 25.0;
    /// Pickup radius for all other orbs
    pub const PICKUP_RADIUS: f32 = 22.0;
    /// Orb value from which the larger pickup radius applies
    pub const HIGH_VALUE_THRESHOLD: u64 = 6;
    /// Head-to-body proximity that counts as a snake-vs-snake hit
    pub const BODY_HIT_RADIUS: f32 = 15.0;
    /// Target length gained per orb collected
    pub const GROWTH_PER_ORB: usize = 2;

    /// Pickup radius for an orb of the given value
    #[inline]
    pub fn pickup_radius(value: u64) -> f32 {
        if value >= HIGH_VALUE_THRESHOLD {
            HIGH_VALUE_PICKUP_RADIUS
        } else {
            PICKUP_RADIUS
        }
    }
}

/// Orb economy constants
pub mod economy {
    /// Population floor never drops below this
    pub const MIN_ORBS: usize = 25;
    /// Arena area per orb used for the population floor
    pub const AREA_PER_ORB: f32 = 20_000.0;
    /// Startup population never drops below this
    pub const MIN_INITIAL_ORBS: usize = 15;
    /// Arena area per orb for the startup population
    pub const INITIAL_AREA_PER_ORB: f32 = 30_000.0;

    /// Probability that a freshly generated orb is a team orb
    pub const TEAM_ORB_CHANCE: f64 = 0.1;
    /// Flat value of every team orb
    pub const TEAM_ORB_VALUE: u64 = 15;
    /// Color of every team orb
    pub const TEAM_ORB_COLOR: &str = "#FFD700";

    /// Score divided by this gives the death-burst orb count (before clamping)
    pub const BURST_SCORE_DIVISOR: u64 = 5;
    pub const BURST_MIN_ORBS: u64 = 3;
    pub const BURST_MAX_ORBS: u64 = 10;
    /// Burst orbs land between these distances from the death point
    pub const BURST_MIN_DISTANCE: f32 = 50.0;
    pub const BURST_MAX_DISTANCE: f32 = 150.0;
    /// Burst orbs are kept at least this far from every arena edge
    pub const BURST_EDGE_INSET: f32 = 50.0;

    /// Population floor for an arena: `max(MIN_ORBS, floor(area / AREA_PER_ORB))`
    pub fn target_orb_count(width: f32, height: f32) -> usize {
        MIN_ORBS.max(((width * height) / AREA_PER_ORB).floor() as usize)
    }

    /// Startup population: `max(MIN_INITIAL_ORBS, floor(area / INITIAL_AREA_PER_ORB))`
    pub fn initial_orb_count(width: f32, height: f32) -> usize {
        MIN_INITIAL_ORBS.max(((width * height) / INITIAL_AREA_PER_ORB).floor() as usize)
    }
}

/// Leaderboard constants
pub mod leaderboard {
    /// Number of entries in the ranked view
    pub const TOP_N: usize = 10;
    /// Characters of the player id used for the fallback nickname
    pub const FALLBACK_ID_CHARS: usize = 4;
    pub const FALLBACK_PREFIX: &str = "Player";
}

/// Session lifecycle constants
pub mod lifecycle {
    /// How long a dead snake with a non-zero score stays visible (ms)
    pub const DEATH_GRACE_MS: u64 = 3_000;
}

/// Simulation clock constants
pub mod clock {
    /// Fixed tick period in milliseconds
    pub const TICK_INTERVAL_MS: u64 = 100;
    /// Seconds between periodic status log lines
    pub const STATUS_LOG_INTERVAL_SECS: u64 = 30;
}
