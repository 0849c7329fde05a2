pub mod assets;
pub mod clock;
pub mod collision;
pub mod game_loop;
pub mod level;
