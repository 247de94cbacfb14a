// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Pasture: a top-down pixel-art sheep pasture.
//!
//! The crate has three layers:
//! - a procedural map generator that lays out streams, walls, a paddock,
//!   grass, trees and sheep over a Delaunay triangulation of random points
//! - a software renderer with a depth buffer, sprite and font atlases
//! - a simulation of the player, a flocking herd of sheep, birds and bugs
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Simulation (player, critters)     │
//! ├──────────────────┬──────────────────┤
//! │   Map generator  │     Renderer     │
//! ├──────────────────┴──────────────────┤
//! │      Map / Tile, geometry helpers   │
//! └─────────────────────────────────────┘
//! ```
//!
//! A frame is `Simulation::update`, `Simulation::draw` into a `Renderer`,
//! then `Renderer::update` to hand the pixels to a `FrameSink`.

pub mod error;
pub mod geom;
pub mod mapgen;
pub mod render;
pub mod sim;
pub mod world;

pub use error::AssetError;
pub use mapgen::{GeneratorConfig, generate_map, generate_seeded};
pub use render::{Color, FontAtlas, FrameSink, Palette, Renderer, SpriteAtlas};
pub use sim::{MoveInput, SimConfig, Simulation};
pub use world::{Map, TILE_SIZE, Tile};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_then_draw_one_frame() {
        let map = generate_seeded(48, 48, &GeneratorConfig::default(), 0xC0FFEE).unwrap();
        let mut sim = Simulation::new(map, SimConfig::default(), 1);
        let mut renderer = Renderer::new(64, 48);
        sim.update(1.0 / 60.0, MoveInput::NONE, glam::UVec2::new(64, 48));
        renderer.clear();
        sim.draw(&mut renderer).unwrap();
        assert_eq!(renderer.pixels().len(), 64 * 48 * 4);
    }
}
