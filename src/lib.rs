//! Terminal snake with a menu screen and a persistent high-score table.
//!
//! The `snake` and `game` modules hold the simulation and have no I/O;
//! everything else is the terminal front-end around them.

pub mod app;
pub mod config;
pub mod game;
pub mod input;
pub mod render;
pub mod scene;
pub mod scores;
pub mod snake;
pub mod term;

pub type GridInt = i32;
pub type Cell = (GridInt, GridInt);

pub use config::{ConfigError, GameConfig, TickPolicy};
pub use game::{Collision, Ending, Game, GameState, Status};
pub use scores::HighScores;
pub use snake::{opposite, Axis, Direction, Snake};
