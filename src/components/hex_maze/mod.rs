mod agent;
mod component;
mod config;
mod graph;
mod mount;
mod render;
mod state;

pub use component::HexMazeCanvas;
pub use config::MazeConfig;
pub use mount::{HexMaze, MountOptions};
