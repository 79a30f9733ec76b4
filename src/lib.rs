//! Movement core of a grid maze-chase game: tile grid, collision, stepping,
//! BFS steering and per-tick pursuer strategy.

pub mod agent;
pub mod collision;
pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod grid;
pub mod layout;
pub mod maze;
pub mod motion;
pub mod pathfinder;
pub mod strategy;

/// Edge length of one tile in world units.
pub const BLOCK_SIZE: f32 = 20.0;

pub use agent::Dir;
pub use error::{GridError, LayoutError};
pub use game::{Command, Game, GameEvent, GameState, Outcome};
pub use grid::{Cell, Grid, Tile};
pub use layout::Layout;
