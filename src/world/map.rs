//! Map grid with per-cell seeds.

// Grid math converts between i32 coordinates and usize indices
#![allow(clippy::cast_sign_loss, clippy::cast_precision_loss)]

use glam::{IVec2, Vec2};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::warn;

use crate::geom::{line, wrap};
use crate::world::Tile;

/// Width and height of one tile in world units (pixels).
pub const TILE_SIZE: i32 = 8;

/// Deterministic generator handed out per cell by [`Map::get_random`].
pub type CellRng = SmallRng;

/// A walled rectangle around the start point, in inclusive tile coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Paddock {
    /// Top-left corner (inclusive).
    pub min: IVec2,
    /// Bottom-right corner (inclusive).
    pub max: IVec2,
}

impl Paddock {
    /// Whether a tile lies on or inside the paddock rectangle.
    #[must_use]
    pub const fn contains(&self, p: IVec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Whether a tile lies on the rectangle's outline.
    #[must_use]
    pub const fn on_perimeter(&self, p: IVec2) -> bool {
        self.contains(p)
            && (p.x == self.min.x || p.x == self.max.x || p.y == self.min.y || p.y == self.max.y)
    }
}

/// The game map.
///
/// Owns a fixed-size row-major tile grid plus one random seed per cell. The
/// seeds are assigned once at construction so that anything drawn from
/// [`Map::get_random`] looks the same every frame.
#[derive(Debug, Clone)]
pub struct Map {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
    seeds: Vec<f32>,
    /// Player start in world coordinates.
    pub start: Vec2,
    /// The paddock built around the start, if any.
    pub paddock: Option<Paddock>,
    /// Sheep spawn points in world coordinates.
    pub sheep_spawns: Vec<Vec2>,
}

impl Map {
    /// Create a map of `Ground` seeded from the thread-local RNG.
    ///
    /// Returns `None` if either dimension is not positive.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Option<Self> {
        Self::with_rng(width, height, &mut rand::thread_rng())
    }

    /// Create a map of `Ground` whose cell seeds are drawn from `rng`.
    ///
    /// Returns `None` if either dimension is not positive.
    #[must_use]
    pub fn with_rng(width: i32, height: i32, rng: &mut impl Rng) -> Option<Self> {
        if width <= 0 || height <= 0 {
            return None;
        }

        let size = width as usize * height as usize;
        let seeds = (0..size).map(|_| rng.gen_range(0.0f32..1.0)).collect();

        Some(Self {
            width,
            height,
            tiles: vec![Tile::Ground; size],
            seeds,
            start: Vec2::new(
                (width / 2 * TILE_SIZE) as f32,
                (height / 2 * TILE_SIZE) as f32,
            ),
            paddock: None,
            sheep_spawns: Vec::new(),
        })
    }

    /// Width in tiles.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height in tiles.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Size of the whole map in world units.
    #[must_use]
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(
            (self.width * TILE_SIZE) as f32,
            (self.height * TILE_SIZE) as f32,
        )
    }

    /// Raw tiles in row-major order.
    #[must_use]
    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Check if a tile coordinate is inside the grid.
    #[must_use]
    #[inline]
    pub const fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Tile at a grid coordinate. Out-of-bounds reads return `Ground`.
    #[must_use]
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Tile {
        self.index(x, y).map_or(Tile::Ground, |i| self.tiles[i])
    }

    /// Set the tile at a grid coordinate.
    ///
    /// Out-of-bounds writes leave the map untouched, log a warning and return
    /// `false`.
    pub fn set(&mut self, x: i32, y: i32, tile: Tile) -> bool {
        if let Some(i) = self.index(x, y) {
            self.tiles[i] = tile;
            true
        } else {
            warn!(x, y, ?tile, "tile write out of bounds");
            false
        }
    }

    /// Set every cell of the Bresenham line from `from` to `to` (inclusive).
    pub fn set_line(&mut self, from: IVec2, to: IVec2, tile: Tile) {
        for p in line(from, to) {
            self.set(p.x, p.y, tile);
        }
    }

    /// Tile under a world-space point.
    ///
    /// Tile coordinates wrap around both edges, so lookups past the map
    /// read from the opposite side instead of returning `Ground`.
    #[must_use]
    pub fn get_world(&self, x: f32, y: f32) -> Tile {
        let t = Self::world_to_tile(Vec2::new(x, y));
        self.get(wrap(t.x, self.width), wrap(t.y, self.height))
    }

    /// Convert a world-space point to the tile containing it.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn world_to_tile(p: Vec2) -> IVec2 {
        let size = TILE_SIZE as f32;
        IVec2::new((p.x / size).floor() as i32, (p.y / size).floor() as i32)
    }

    /// World-space center of a tile.
    #[must_use]
    pub fn tile_center(t: IVec2) -> Vec2 {
        let half = TILE_SIZE as f32 / 2.0;
        Vec2::new(
            (t.x * TILE_SIZE) as f32 + half,
            (t.y * TILE_SIZE) as f32 + half,
        )
    }

    /// The stored seed for a cell.
    #[must_use]
    pub fn seed(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|i| self.seeds[i])
    }

    /// A stable identity for a cell, usable as a key for per-cell state.
    #[must_use]
    pub fn cell_key(&self, x: i32, y: i32) -> Option<u64> {
        self.index(x, y).map(|i| i as u64)
    }

    /// A fresh generator seeded from this cell's seed.
    ///
    /// Two calls for the same cell yield identical sequences.
    #[must_use]
    pub fn get_random(&self, x: i32, y: i32) -> Option<CellRng> {
        self.seed(x, y)
            .map(|seed| SmallRng::seed_from_u64(u64::from(seed.to_bits())))
    }

    /// Iterate over every cell with its coordinate.
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, Tile)> + '_ {
        let width = self.width as usize;
        self.tiles.iter().enumerate().map(move |(i, &tile)| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let p = IVec2::new((i % width) as i32, (i / width) as i32);
            (p, tile)
        })
    }

    /// Number of cells holding `tile`.
    #[must_use]
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// Per-kind tile counts, indexed by [`Tile::index`].
    #[must_use]
    pub fn tile_counts(&self) -> [usize; Tile::ALL.len()] {
        let mut counts = [0; Tile::ALL.len()];
        for tile in &self.tiles {
            counts[tile.index()] += 1;
        }
        counts
    }

    /// Dump the grid as one glyph per tile, one line per row.
    #[must_use]
    pub fn render_ascii(&self) -> String {
        let width = self.width as usize;
        let mut out = String::with_capacity(self.tiles.len() + self.height as usize);
        for row in self.tiles.chunks(width) {
            out.extend(row.iter().map(|t| t.glyph()));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    #[test]
    fn test_map_zero_size() {
        assert!(Map::new(0, 10).is_none());
        assert!(Map::new(10, 0).is_none());
        assert!(Map::new(-3, 4).is_none());
    }

    #[test]
    fn test_map_starts_as_ground() {
        let map = Map::new(6, 4).unwrap();
        assert_eq!(map.count(Tile::Ground), 24);
        assert_eq!(map.tiles().len(), 24);
    }

    #[test]
    fn test_get_set() {
        let mut map = Map::new(10, 10).unwrap();
        assert!(map.set(3, 4, Tile::Wall));
        assert_eq!(map.get(3, 4), Tile::Wall);
        assert_eq!(map.get(4, 3), Tile::Ground);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut map = Map::new(10, 10).unwrap();
        for &(x, y) in &[(-1, 0), (0, -1), (10, 0), (0, 10), (i32::MIN, i32::MAX)] {
            assert_eq!(map.get(x, y), Tile::Ground);
            assert!(!map.set(x, y, Tile::Water));
        }
        assert_eq!(map.count(Tile::Water), 0);
    }

    #[test]
    fn test_set_line_inclusive() {
        let mut map = Map::new(10, 10).unwrap();
        map.set_line(IVec2::new(1, 1), IVec2::new(5, 1), Tile::Wall);
        assert_eq!(map.count(Tile::Wall), 5);
        assert_eq!(map.get(1, 1), Tile::Wall);
        assert_eq!(map.get(5, 1), Tile::Wall);
    }

    #[test]
    fn test_set_line_clips_out_of_bounds() {
        let mut map = Map::new(4, 4).unwrap();
        map.set_line(IVec2::new(-2, 0), IVec2::new(6, 0), Tile::Water);
        assert_eq!(map.count(Tile::Water), 4);
    }

    #[test]
    fn test_get_world_wraps() {
        let mut map = Map::new(4, 4).unwrap();
        map.set(3, 0, Tile::Tree);
        // World x = -1 lies in tile -1, which wraps to tile 3.
        assert_eq!(map.get_world(-1.0, 0.5), Tile::Tree);
        assert_eq!(map.get_world(31.9, 7.9), Tile::Tree);
        assert_eq!(map.get_world(32.0 + 24.0, 0.0), Tile::Tree);
        assert_eq!(map.get_world(23.9, 0.0), Tile::Ground);
    }

    #[test]
    fn test_get_random_deterministic() {
        let map = Map::new(8, 8).unwrap();
        let mut a = map.get_random(2, 5).unwrap();
        let mut b = map.get_random(2, 5).unwrap();
        for _ in 0..32 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_get_random_differs_between_cells() {
        let map = Map::new(8, 8).unwrap();
        let mut a = map.get_random(0, 0).unwrap();
        let mut b = map.get_random(1, 0).unwrap();
        let sa: Vec<u64> = (0..4).map(|_| a.next_u64()).collect();
        let sb: Vec<u64> = (0..4).map(|_| b.next_u64()).collect();
        assert_ne!(sa, sb);
    }

    #[test]
    fn test_get_random_out_of_bounds() {
        let map = Map::new(8, 8).unwrap();
        assert!(map.get_random(8, 0).is_none());
        assert!(map.seed(-1, 0).is_none());
    }

    #[test]
    fn test_seeds_stable_across_clone() {
        let map = Map::new(5, 5).unwrap();
        let copy = map.clone();
        for y in 0..5 {
            for x in 0..5 {
                assert_eq!(map.seed(x, y).map(f32::to_bits), copy.seed(x, y).map(f32::to_bits));
            }
        }
    }

    #[test]
    fn test_world_tile_conversion() {
        assert_eq!(Map::world_to_tile(Vec2::new(-0.5, 15.9)), IVec2::new(-1, 1));
        assert_eq!(Map::tile_center(IVec2::new(2, 3)), Vec2::new(20.0, 28.0));
    }

    #[test]
    fn test_paddock_perimeter() {
        let paddock = Paddock {
            min: IVec2::new(2, 2),
            max: IVec2::new(6, 5),
        };
        assert!(paddock.on_perimeter(IVec2::new(2, 3)));
        assert!(paddock.on_perimeter(IVec2::new(4, 5)));
        assert!(!paddock.on_perimeter(IVec2::new(4, 4)));
        assert!(!paddock.contains(IVec2::new(7, 4)));
    }

    #[test]
    fn test_render_ascii() {
        let mut map = Map::new(3, 2).unwrap();
        map.set(1, 0, Tile::Water);
        map.set(2, 1, Tile::Wall);
        assert_eq!(map.render_ascii(), ".~.\n..#\n");
    }
}
