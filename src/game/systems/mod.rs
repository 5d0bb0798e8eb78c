pub mod movement;
pub mod collision;
pub mod economy;
pub mod leaderboard;
