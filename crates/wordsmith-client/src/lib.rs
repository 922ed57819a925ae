pub mod error;
pub mod game_loop;
pub mod hud;
pub mod input;
pub mod render;
pub mod scene;
pub mod terminal;
pub mod theme;

pub use error::ClientError;
pub use game_loop::{Client, FrameSink, HostEvent, LoopExit, run_game_loop};
