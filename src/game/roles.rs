//! Static orb role catalog
//!
//! Roles are read-only configuration: each one fixes an orb's point value,
//! color and spawn rarity. Team orbs are a separate flat-value tier drawn
//! from a fixed roster of members, each with an external image reference.

use rand::seq::SliceRandom;
use rand::Rng;

/// A point tier an orb can be drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Role {
    pub name: &'static str,
    pub points: u64,
    pub color: &'static str,
    /// Star rank shown next to the role, if any
    pub stars: Option<u8>,
    /// Relative spawn weight; decreases with rank so rarer roles spawn less
    pub weight: u32,
}

/// Catalog ordered by rank. Weight of index `i` is `max(1, 10 - i)`.
pub const ROLES: &[Role] = &[
    Role { name: "Newbie", points: 1, color: "#40E0D0", stars: None, weight: 10 },
    Role { name: "Full Access", points: 2, color: "#FFFFFF", stars: None, weight: 9 },
    Role { name: "Nads", points: 3, color: "#800020", stars: None, weight: 8 },
    Role { name: "Running Hot", points: 4, color: "#FF8C00", stars: None, weight: 7 },
    Role { name: "Nad OG", points: 5, color: "#FFC0CB", stars: None, weight: 6 },
    Role { name: "MON 1", points: 6, color: "#800080", stars: Some(1), weight: 5 },
    Role { name: "MON 2", points: 7, color: "#800080", stars: Some(2), weight: 4 },
    Role { name: "Community Team", points: 8, color: "#E6E6FA", stars: None, weight: 3 },
    Role { name: "Admin", points: 10, color: "#E6E6FA", stars: None, weight: 2 },
];

/// Member of the team roster shown on team orbs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamMember {
    pub name: &'static str,
    pub image: &'static str,
}

pub const TEAM_ROSTER: &[TeamMember] = &[
    TeamMember { name: "Bill Monday", image: "billMonday.jpg" },
    TeamMember { name: "Keone", image: "keone.jpg" },
    TeamMember { name: "Eunice", image: "eunice.jpg" },
    TeamMember { name: "Baboli", image: "baboli.jpg" },
    TeamMember { name: "Tina", image: "tina.jpg" },
    TeamMember { name: "Berzan", image: "berzan.jpeg" },
    TeamMember { name: "Port", image: "port.png" },
];

/// Draw a role with probability proportional to its weight
pub fn pick_weighted<R: Rng + ?Sized>(rng: &mut R) -> &'static Role {
    ROLES
        .choose_weighted(rng, |role| role.weight)
        .unwrap_or(&ROLES[0])
}

/// Draw a team member uniformly
pub fn pick_team_member<R: Rng + ?Sized>(rng: &mut R) -> &'static TeamMember {
    TEAM_ROSTER.choose(rng).unwrap_or(&TEAM_ROSTER[0])
}

/// Highest-ranked role whose points do not exceed `value`.
///
/// Falls back to the lowest role for values below every tier.
pub fn role_for_value(value: u64) -> &'static Role {
    ROLES
        .iter()
        .filter(|role| role.points <= value)
        .max_by_key(|role| role.points)
        .unwrap_or(&ROLES[0])
}
