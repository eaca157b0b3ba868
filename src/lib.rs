//! Tile-based maze chase: a player collects pickups while pursuers hunt it
//! across a scattered grid, with a power-up that turns the chase around.

pub mod components;
pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod ghost;
pub mod grid;
pub mod level;
pub mod pathing;
pub mod player;

pub use error::{Error, Result};
