pub mod protocol;
pub mod game_session;
