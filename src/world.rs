//! The tile map the game is played on.

mod map;
mod tile;

pub use map::{CellRng, Map, Paddock, TILE_SIZE};
pub use tile::Tile;
