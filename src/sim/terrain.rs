//! Terrain drawing for the visible part of the map.
//!
//! Grass, ground tufts and trees are scattered with each cell's own
//! generator from [`Map::get_random`], so they look the same every frame.
//! The cell generator is consumed identically whether or not a stalk is
//! trampled, which keeps the rest of the cell from jumping around.

// Positions are snapped to pixels
#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use glam::{IVec2, UVec2, Vec2};
use rand::Rng;

use crate::error::AssetError;
use crate::render::{Color, Palette, Renderer};
use crate::sim::grass_state::GrassState;
use crate::world::{Map, TILE_SIZE, Tile};

/// Stalks drawn on every grass tile.
pub const GRASS_STALKS: u16 = 7;
/// Tallest a grass stalk grows.
const STALK_HEIGHT: f32 = 12.0;
/// Ground tufts per unit area, scaled by the cell's roll.
const TUFT_DENSITY: f32 = 0.018;
/// Depth of ground tufts: above flat tiles, below everything standing.
const TUFT_DEPTH: f32 = -1001.0;
/// Squared distance at which a walker flattens a stalk.
const TRAMPLE_RADIUS_SQ: f32 = 16.0;

/// Inclusive tile bounds around a camera view, padded on each side and
/// clipped to the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileWindow {
    /// Top-left tile.
    pub min: IVec2,
    /// Bottom-right tile.
    pub max: IVec2,
}

impl TileWindow {
    /// Tiles under a view of `size` pixels whose top-left is `offset`.
    ///
    /// `pad` is `[left, right, top, bottom]` in tiles.
    #[must_use]
    pub fn around(map: &Map, offset: IVec2, size: UVec2, pad: [i32; 4]) -> Self {
        let size = size.as_ivec2();
        let ceil_div = |n: i32| -(-n).div_euclid(TILE_SIZE);
        Self {
            min: IVec2::new(
                (offset.x.div_euclid(TILE_SIZE) - pad[0]).max(0),
                (offset.y.div_euclid(TILE_SIZE) - pad[2]).max(0),
            ),
            max: IVec2::new(
                (ceil_div(offset.x + size.x) + pad[1]).min(map.width() - 1),
                (ceil_div(offset.y + size.y) + pad[3]).min(map.height() - 1),
            ),
        }
    }

    /// Every tile in the window, column by column.
    pub fn tiles(self) -> impl Iterator<Item = IVec2> {
        (self.min.x..=self.max.x)
            .flat_map(move |x| (self.min.y..=self.max.y).map(move |y| IVec2::new(x, y)))
    }
}

/// Everything terrain drawing reads besides the grass cache.
#[derive(Debug, Clone, Copy)]
pub struct TerrainScene<'a> {
    /// The map.
    pub map: &'a Map,
    /// Colors.
    pub palette: &'a Palette,
    /// Wind strength in `[-1, 1]`; bends stalks sideways.
    pub wind: f32,
    /// Player position.
    pub player: Vec2,
    /// Positions of the sheep on screen.
    pub sheep: &'a [Vec2],
}

impl TerrainScene<'_> {
    fn player_near(&self, p: Vec2) -> bool {
        self.player.distance_squared(p) <= TRAMPLE_RADIUS_SQ
    }

    fn sheep_near(&self, p: Vec2) -> bool {
        self.sheep
            .iter()
            .any(|s| s.distance_squared(p) <= TRAMPLE_RADIUS_SQ)
    }
}

/// Solid color of a tile kind.
#[must_use]
pub const fn tile_color(tile: Tile, palette: &Palette) -> Color {
    match tile {
        Tile::Ground => palette.timberwolf,
        Tile::Grass => palette.asparagus,
        Tile::Path => palette.gray,
        Tile::Wall => palette.black,
        Tile::Tree => palette.chestnut,
        Tile::Water => palette.wild_blue_yonder,
        Tile::Crossing => palette.aquamarine,
    }
}

fn unit(rng: &mut impl Rng) -> f32 {
    rng.gen_range(0.0..1.0)
}

/// Draw every tile in view. Walkers near a stalk trample it.
///
/// # Errors
///
/// Returns an error if a sprite atlas is attached but lacks the wall sprite.
pub fn draw_terrain(
    renderer: &mut Renderer,
    scene: &TerrainScene<'_>,
    grass: &mut GrassState,
    rng: &mut impl Rng,
) -> Result<(), AssetError> {
    let size = UVec2::new(renderer.width(), renderer.height());
    let window = TileWindow::around(scene.map, renderer.camera_offset(), size, [2, 1, 1, 4]);
    for tile in window.tiles() {
        draw_tile(renderer, scene, grass, rng, tile)?;
    }
    Ok(())
}

fn draw_tile(
    renderer: &mut Renderer,
    scene: &TerrainScene<'_>,
    grass: &mut GrassState,
    rng: &mut impl Rng,
    tile: IVec2,
) -> Result<(), AssetError> {
    let map = scene.map;
    let kind = map.get(tile.x, tile.y);
    let Some(mut cell) = map.get_random(tile.x, tile.y) else {
        return Ok(());
    };
    let origin = (tile * TILE_SIZE).as_vec2();

    match kind {
        Tile::Grass => draw_grass(renderer, scene, grass, rng, tile, origin, &mut cell),
        Tile::Ground => draw_ground(renderer, scene, grass, rng, tile, origin, &mut cell),
        Tile::Tree => draw_tree(renderer, scene.palette, origin, &mut cell),
        Tile::Wall => {
            let below = map.get(tile.x, tile.y + 1);
            let depth = origin.y + 8.0;
            if renderer.sprites().is_some() {
                let frame = usize::from(below == Tile::Wall);
                renderer.spr("wall", origin.x, origin.y, frame, false, depth)?;
            } else {
                renderer.rectfill(origin.x, origin.y, 8, 8, scene.palette.black, depth);
            }
        }
        Tile::Path | Tile::Water | Tile::Crossing => {
            let color = tile_color(kind, scene.palette);
            renderer.rectfill(origin.x, origin.y, 8, 8, color, f32::NEG_INFINITY);
        }
    }
    Ok(())
}

fn draw_grass(
    renderer: &mut Renderer,
    scene: &TerrainScene<'_>,
    grass: &mut GrassState,
    rng: &mut impl Rng,
    tile: IVec2,
    origin: Vec2,
    cell: &mut impl Rng,
) {
    let palette = scene.palette;
    for stalk in 0..GRASS_STALKS {
        let sx = origin.x + unit(cell) * 8.0;
        let sy = origin.y + unit(cell) * 8.0;
        let foot = Vec2::new(sx, sy);
        if scene.player_near(foot) || scene.sheep_near(foot) {
            grass.trample(tile, stalk, rng.gen_range(2.0..6.0));
        }

        let tall = unit(cell) * STALK_HEIGHT;
        let h = if grass.is_trampled(tile, stalk) { 1.0 } else { tall };
        let shade = unit(cell);
        let color = if shade < 0.5 {
            palette.forest_green
        } else if shade < 0.75 {
            palette.pine_green
        } else {
            palette.outer_space
        };
        let bend = scene.wind * unit(cell);

        renderer.line(sx, sy, sx + bend, sy - h, color, sy);
        if unit(cell) < 0.1 {
            renderer.set(
                (sx + bend) as i32,
                (sy - h - 1.0) as i32,
                palette.tumbleweed,
                sy,
            );
        }
    }
}

fn draw_ground(
    renderer: &mut Renderer,
    scene: &TerrainScene<'_>,
    grass: &mut GrassState,
    rng: &mut impl Rng,
    tile: IVec2,
    origin: Vec2,
    cell: &mut impl Rng,
) {
    #[allow(clippy::cast_sign_loss)]
    let tufts = (64.0 * unit(cell) * TUFT_DENSITY).floor() as u16;
    for tuft in 0..tufts {
        let sx = origin.x + unit(cell) * 8.0;
        let sy = origin.y + unit(cell) * 8.0;
        let foot = Vec2::new(sx, sy);
        if scene.player_near(foot) {
            grass.trample(tile, tuft, rng.gen_range(1.0..3.0));
        }
        if scene.sheep_near(foot) {
            grass.trample(tile, tuft, rng.gen_range(2.0..6.0));
        }

        let tall = unit(cell) * 3.0 + 1.0;
        let h = if grass.is_trampled(tile, tuft) { 1.0 } else { tall };
        let bend = unit(cell) * scene.wind;
        renderer.line(sx, sy, sx + bend, sy - h, scene.palette.asparagus, TUFT_DEPTH);
    }
}

fn draw_tree(renderer: &mut Renderer, palette: &Palette, origin: Vec2, cell: &mut impl Rng) {
    let trunk = unit(cell) * 32.0 + 8.0;
    let height = unit(cell) * 32.0 + 8.0;
    let width = unit(cell) * 48.0 + 8.0;
    let Vec2 { x, y } = origin;
    let depth = y + 8.0;

    let trunk_px = trunk as i32;
    renderer.rectfill(x + 2.0, depth - trunk_px as f32, 4, trunk_px, palette.beaver, depth);

    let top = depth - trunk - height;
    let mut yy = depth - trunk + 1.0;
    let mut alt = false;
    while yy > top {
        let xx = (unit(cell) - 0.5) * width + x + 4.0;
        let r = unit(cell) * 4.0 + 4.0;
        let color = if alt { palette.forest_green } else { palette.outer_space };
        alt = !alt;
        renderer.circfill(xx, yy, r, color, depth);
        yy -= 1.0;
    }
}
