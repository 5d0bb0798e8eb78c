pub mod constants;
pub mod roles;
pub mod state;
pub mod systems;
pub mod lifecycle;
pub mod summary;
pub mod input_buffer;
pub mod game_loop;
