//! The running game: player, animals, grass and the camera.
//!
//! A [`Simulation`] owns the map and everything living on it. Each frame the
//! driver calls [`Simulation::update`] with the elapsed time, the movement
//! input and the viewport size, then [`Simulation::draw`] into a
//! [`Renderer`] of that size.
//!
//! Animals share one arena of [`Critter`] values. Expired birds and bugs are
//! dropped in one compaction pass after they update, and the on-screen sheep
//! are tracked as indices into the arena rebuilt after that pass.

// World sizes and camera offsets move between i32 pixels and f32 units
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap
)]

pub mod bird;
pub mod bug;
pub mod collision;
pub mod footsteps;
pub mod grass_state;
pub mod input;
pub mod player;
pub mod sheep;
pub mod terrain;

use glam::{IVec2, UVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AssetError;
use crate::render::{Palette, Renderer};
use crate::world::{Map, TILE_SIZE, Tile};

pub use bird::{Bird, BirdState};
pub use bug::Bug;
pub use collision::Aabb;
pub use grass_state::{GRASS_CACHE_CAPACITY, GrassState, MUNCH_SECONDS};
pub use input::{DragStick, MoveInput};
pub use player::Player;
pub use sheep::{SHEEP_NAMES, Sheep, SheepState};
pub use terrain::{TerrainScene, TileWindow, draw_terrain, tile_color};

/// Tunables for a [`Simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Player speed in px/s.
    pub player_speed: f32,
    /// Extra pixels around the view within which sheep keep updating.
    pub onscreen_margin: f32,
    /// Chance per second of kicking up bugs while walking on grass.
    pub bug_spawn_rate: f32,
    /// Show a sheep's name when the player stands next to it.
    pub show_names: bool,
    /// How close the player must be to read a name.
    pub name_radius: f32,
    /// One bird per this many map tiles.
    pub tiles_per_bird: u32,
    /// Trample and munch cache size.
    pub grass_capacity: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            player_speed: 64.0,
            onscreen_margin: 32.0,
            bug_spawn_rate: 0.25,
            show_names: true,
            name_radius: 16.0,
            tiles_per_bird: 256,
            grass_capacity: GRASS_CACHE_CAPACITY,
        }
    }
}

/// Anything besides the player that lives on the map.
#[derive(Debug, Clone)]
pub enum Critter {
    /// A sheep.
    Sheep(Sheep),
    /// A bird.
    Bird(Bird),
    /// A bug.
    Bug(Bug),
}

impl Critter {
    /// Ground position.
    #[must_use]
    pub const fn pos(&self) -> Vec2 {
        match self {
            Critter::Sheep(s) => s.pos,
            Critter::Bird(b) => b.pos,
            Critter::Bug(b) => b.pos,
        }
    }

    /// Whether this critter is gone and should be dropped. Sheep stay forever.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        match self {
            Critter::Sheep(_) => false,
            Critter::Bird(b) => b.is_expired(),
            Critter::Bug(b) => b.is_expired(),
        }
    }
}

/// The whole game state.
#[derive(Debug, Clone)]
pub struct Simulation {
    map: Map,
    config: SimConfig,
    palette: Palette,
    player: Player,
    critters: Vec<Critter>,
    onscreen: Vec<usize>,
    grass: GrassState,
    rng: ChaCha8Rng,
    elapsed: f32,
    wind: f32,
    camera: Vec2,
    viewport: UVec2,
}

impl Simulation {
    /// Populate `map`: the player at the start, sheep at the spawn points and
    /// birds scattered at random.
    #[must_use]
    pub fn new(map: Map, config: SimConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let palette = Palette::default();
        let player = Player::new(map.start, config.player_speed, &palette);

        let mut critters: Vec<Critter> = map
            .sheep_spawns
            .iter()
            .map(|&pos| Critter::Sheep(Sheep::new(pos, &palette, &mut rng)))
            .collect();

        let tiles = map.width() as u32 * map.height() as u32;
        let birds = tiles / config.tiles_per_bird.max(1);
        let size = map.world_size();
        for _ in 0..birds {
            let pos = Vec2::new(rng.gen_range(0.0..size.x), rng.gen_range(0.0..size.y));
            critters.push(Critter::Bird(Bird::new(pos, &mut rng)));
        }
        debug!(
            sheep = map.sheep_spawns.len(),
            birds, "simulation populated"
        );

        Self {
            camera: map.start,
            map,
            config,
            palette,
            player,
            critters,
            onscreen: Vec::new(),
            grass: GrassState::with_capacity(config.grass_capacity),
            rng,
            elapsed: 0.0,
            wind: 0.0,
            viewport: UVec2::ZERO,
        }
    }

    /// Advance one frame of `dt` seconds.
    pub fn update(&mut self, dt: f32, input: MoveInput, viewport: UVec2) {
        self.viewport = viewport;
        self.elapsed += dt;
        self.wind = (self.elapsed / 2.0).sin();
        self.grass.update(dt);

        self.player.update(dt, input);

        let player = self.player.pos;
        for critter in &mut self.critters {
            match critter {
                Critter::Bug(bug) => bug.update(dt, &mut self.rng),
                Critter::Bird(bird) => bird.update(dt, player, &mut self.rng),
                Critter::Sheep(_) => {}
            }
        }
        self.critters.retain(|c| !c.is_expired());
        self.spawn_bugs(dt);

        self.camera = self.follow_player();
        self.refresh_onscreen();
        self.collide();
        self.update_sheep(dt);
    }

    fn spawn_bugs(&mut self, dt: f32) {
        let p = self.player.pos;
        if !self.player.is_moving() || self.map.get_world(p.x, p.y) != Tile::Grass {
            return;
        }
        if self.rng.gen_range(0.0..1.0) < dt * self.config.bug_spawn_rate {
            let count = self.rng.gen_range(1..=5);
            self.critters
                .extend((0..count).map(|_| Critter::Bug(Bug::new(p))));
        }
    }

    fn follow_player(&self) -> Vec2 {
        let half = self.viewport.as_vec2() / 2.0;
        let world = self.map.world_size();
        let p = self.player.pos;
        Vec2::new(
            p.x.max(half.x).min(world.x - half.x),
            p.y.max(half.y).min(world.y - half.y),
        )
        .round()
    }

    /// Top-left world pixel of the view, matching [`Renderer::camera`].
    #[must_use]
    pub fn view_offset(&self) -> IVec2 {
        IVec2::new(
            self.camera.x as i32 - (self.viewport.x / 2) as i32,
            self.camera.y as i32 - (self.viewport.y / 2) as i32,
        )
    }

    fn refresh_onscreen(&mut self) {
        let margin = self.config.onscreen_margin;
        let min = self.view_offset().as_vec2() - margin;
        let max = min + self.viewport.as_vec2() + 2.0 * margin;
        self.onscreen = self
            .critters
            .iter()
            .enumerate()
            .filter_map(|(i, c)| match c {
                Critter::Sheep(s)
                    if s.pos.x > min.x && s.pos.x < max.x && s.pos.y > min.y && s.pos.y < max.y =>
                {
                    Some(i)
                }
                _ => None,
            })
            .collect();
    }

    fn collide(&mut self) {
        let window = TileWindow::around(&self.map, self.view_offset(), self.viewport, [1; 4]);
        for tile in window.tiles() {
            let corner = (tile * TILE_SIZE).as_vec2();
            match self.map.get(tile.x, tile.y) {
                Tile::Wall | Tile::Water => {
                    let block = Aabb::new(corner.x, corner.y, 8.0, 8.0);
                    self.player.collide(&block);
                    for &i in &self.onscreen {
                        if let Some(Critter::Sheep(sheep)) = self.critters.get_mut(i) {
                            sheep.collide(&block);
                        }
                    }
                }
                Tile::Tree => {
                    let trunk = Aabb::new(corner.x + 2.0, corner.y + 4.0, 4.0, 4.0);
                    self.player.collide(&trunk);
                }
                _ => {}
            }
        }
    }

    fn update_sheep(&mut self, dt: f32) {
        let player = self.player.pos;
        for &i in &self.onscreen {
            let flock: Vec<Vec2> = self
                .onscreen
                .iter()
                .filter(|&&j| j != i)
                .filter_map(|&j| match self.critters.get(j) {
                    Some(Critter::Sheep(s)) if s.state == SheepState::Running => Some(s.pos),
                    _ => None,
                })
                .collect();
            if let Some(Critter::Sheep(sheep)) = self.critters.get_mut(i) {
                sheep.update(dt, player, &flock, &self.map, &mut self.grass, &mut self.rng);
            }
        }
    }

    /// Draw the frame: animals, the player, then terrain.
    ///
    /// Drawing tramples grass under walkers, so it needs `&mut self`. The
    /// renderer should match the viewport passed to the last update.
    ///
    /// # Errors
    ///
    /// Returns an error if a sprite atlas is attached but lacks a sprite or
    /// frame the game draws.
    pub fn draw(&mut self, renderer: &mut Renderer) -> Result<(), AssetError> {
        let palette = self.palette_for(renderer);
        renderer.camera(self.camera.x, self.camera.y);

        for critter in &self.critters {
            match critter {
                Critter::Bug(bug) => bug.draw(renderer, &palette),
                Critter::Bird(bird) => bird.draw(renderer, &palette)?,
                Critter::Sheep(_) => {}
            }
        }

        let near = self.config.name_radius * self.config.name_radius;
        for sheep in self.onscreen_sheep() {
            sheep.draw(renderer, &palette)?;
            if self.config.show_names && sheep.pos.distance_squared(self.player.pos) < near {
                sheep.draw_name(renderer, &palette, self.elapsed);
            }
        }
        self.player.draw(renderer, &palette)?;

        let sheep: Vec<Vec2> = self.onscreen_sheep().map(|s| s.pos).collect();
        let scene = TerrainScene {
            map: &self.map,
            palette: &palette,
            wind: self.wind,
            player: self.player.pos,
            sheep: &sheep,
        };
        draw_terrain(renderer, &scene, &mut self.grass, &mut self.rng)
    }

    /// The atlas palette when one is attached, otherwise the built-in one.
    #[must_use]
    pub fn palette_for(&self, renderer: &Renderer) -> Palette {
        renderer
            .sprites()
            .and_then(|atlas| atlas.palette())
            .copied()
            .unwrap_or(self.palette)
    }

    /// The map.
    #[must_use]
    pub const fn map(&self) -> &Map {
        &self.map
    }

    /// Settings in use.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Turn sheep name labels on or off.
    pub fn set_show_names(&mut self, show: bool) {
        self.config.show_names = show;
    }

    /// The player.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Every critter, alive or not yet compacted.
    #[must_use]
    pub fn critters(&self) -> &[Critter] {
        &self.critters
    }

    /// All sheep.
    pub fn sheep(&self) -> impl Iterator<Item = &Sheep> + '_ {
        self.critters.iter().filter_map(|c| match c {
            Critter::Sheep(s) => Some(s),
            _ => None,
        })
    }

    /// Sheep near enough to the view to be updated and drawn.
    pub fn onscreen_sheep(&self) -> impl Iterator<Item = &Sheep> + '_ {
        self.onscreen.iter().filter_map(|&i| match self.critters.get(i) {
            Some(Critter::Sheep(s)) => Some(s),
            _ => None,
        })
    }

    /// All birds.
    pub fn birds(&self) -> impl Iterator<Item = &Bird> + '_ {
        self.critters.iter().filter_map(|c| match c {
            Critter::Bird(b) => Some(b),
            _ => None,
        })
    }

    /// All bugs.
    pub fn bugs(&self) -> impl Iterator<Item = &Bug> + '_ {
        self.critters.iter().filter_map(|c| match c {
            Critter::Bug(b) => Some(b),
            _ => None,
        })
    }

    /// Trample and munch state.
    #[must_use]
    pub const fn grass(&self) -> &GrassState {
        &self.grass
    }

    /// Seconds since the simulation started.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Current wind in `[-1, 1]`.
    #[must_use]
    pub const fn wind(&self) -> f32 {
        self.wind
    }

    /// World point at the center of the view.
    #[must_use]
    pub const fn camera(&self) -> Vec2 {
        self.camera
    }
}
