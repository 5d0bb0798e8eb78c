//! Serpent Arena Server Library
//!
//! Authoritative simulation core for a real-time snake arena: a fixed-rate
//! tick pipeline (movement, collision, orb economy, leaderboard) driven by a
//! clock actor that owns all simulation state.
//!
//! Intents enter through [`game::input_buffer::IntentSender`], snapshots
//! leave through the broadcast channel of [`net::game_session::SessionHandle`],
//! and session summaries go to the ledger over an unbounded event channel.

pub mod config;
pub mod util;
pub mod game;
pub mod net;
pub mod metrics;
