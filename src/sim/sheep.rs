//! Sheep: graze, wander toward fresh grass, and flock away from the player.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use std::f32::consts::TAU;

use glam::{IVec2, Vec2};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::AssetError;
use crate::geom::{dist_sq, dist_sq_i};
use crate::render::{Palette, Renderer, TextAlign, TextStyle};
use crate::sim::collision::{Aabb, resolve};
use crate::sim::footsteps::{FootstepTrail, TrailStyle};
use crate::sim::grass_state::GrassState;
use crate::world::{Map, Tile};

/// Names handed out to sheep at random.
pub const SHEEP_NAMES: &[&str] = &[
    "Agnes", "Baa-bara", "Barnaby", "Bramble", "Bun", "Clover", "Cotton", "Daisy", "Dolly",
    "Dumpling", "Fern", "Fleece", "Flossie", "Fluff", "Gus", "Hazel", "Heather", "Juniper",
    "Lamb Chop", "Larry", "Lola", "Mabel", "Marshmallow", "Meadow", "Mildred", "Muffin",
    "Nettle", "Nugget", "Oats", "Pebble", "Pippin", "Poppy", "Puddle", "Rosie", "Rufus",
    "Shaun", "Sorrel", "Sprout", "Teasel", "Thistle", "Wooly", "Yarn",
];

/// Player distance that makes a sheep bolt.
const SPOOK_RADIUS: f32 = 32.0;
/// Player distance at which a running sheep calms down.
const CALM_RADIUS: f32 = 96.0;
/// Flocking neighborhood.
const FLOCK_RADIUS: f32 = 96.0;
/// How far the flee urge reaches.
const FLEE_REACH: f32 = 128.0;
/// Squared distance below which neighbors push apart.
const PERSONAL_SPACE_SQ: f32 = 256.0;
const COHESION: f32 = 64.0;
const RUN_SPEED: f32 = 40.0;
const WALK_SPEED: f32 = 32.0;
/// Tile radius searched for grass to walk to.
const GRASS_SEARCH_RADIUS: i32 = 6;
/// Seconds between facing changes.
const TURN_COOLDOWN: f32 = 0.5;
/// Seconds of grazing before a tile is eaten bare.
pub const GRAZE_SECONDS: f32 = 3.0;

/// What a sheep is doing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SheepState {
    /// Standing still, grazing if on grass.
    Idle,
    /// Walking in a straight line.
    Walking {
        /// Heading in radians.
        direction: f32,
        /// Seconds left.
        timer: f32,
    },
    /// Fleeing the player with the flock.
    Running,
}

/// A sheep.
#[derive(Debug, Clone)]
pub struct Sheep {
    /// Feet position in world units.
    pub pos: Vec2,
    /// Current behavior.
    pub state: SheepState,
    /// Facing right.
    pub reverse: bool,
    name: &'static str,
    anim_timer: f32,
    moving: bool,
    turn_cooldown: f32,
    graze_timer: f32,
    on_grass: bool,
    footsteps: FootstepTrail,
}

impl Sheep {
    /// An idle sheep with a random name.
    #[must_use]
    pub fn new(pos: Vec2, palette: &Palette, rng: &mut impl Rng) -> Self {
        Self {
            pos,
            state: SheepState::Idle,
            reverse: false,
            name: SHEEP_NAMES.choose(rng).copied().unwrap_or("Sheep"),
            anim_timer: 0.0,
            moving: false,
            turn_cooldown: 0.0,
            graze_timer: 0.0,
            on_grass: false,
            footsteps: FootstepTrail::new(TrailStyle::sheep(palette.manatee)),
        }
    }

    /// The sheep's name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the sheep moved during the last update.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        self.moving
    }

    /// Whether the sheep stood on uneaten grass at the end of the last update.
    #[must_use]
    pub const fn is_on_grass(&self) -> bool {
        self.on_grass
    }

    /// Advance one frame. `flock` holds the positions of the other running
    /// sheep nearby.
    pub fn update(
        &mut self,
        dt: f32,
        player: Vec2,
        flock: &[Vec2],
        map: &Map,
        grass: &mut GrassState,
        rng: &mut impl Rng,
    ) {
        if self.state != SheepState::Running
            && dist_sq(self.pos, player) < SPOOK_RADIUS * SPOOK_RADIUS
        {
            self.state = SheepState::Running;
        }

        let before = self.pos;
        self.on_grass = standing_on_grass(self.pos, map, grass);
        match self.state {
            SheepState::Idle => self.idle(dt, map, grass, rng),
            SheepState::Walking { direction, timer } => self.walk(dt, direction, timer),
            SheepState::Running => self.run(dt, player, flock),
        }

        self.turn_cooldown -= dt;
        if self.pos == before {
            self.moving = false;
        } else {
            if self.turn_cooldown <= 0.0 {
                if self.pos.x < before.x {
                    self.reverse = false;
                    self.turn_cooldown = TURN_COOLDOWN;
                } else if self.pos.x > before.x {
                    self.reverse = true;
                    self.turn_cooldown = TURN_COOLDOWN;
                }
            }
            self.moving = true;
            self.anim_timer += dt;
        }

        self.footsteps.step(before, self.pos);
        self.on_grass = standing_on_grass(self.pos, map, grass);
    }

    fn idle(&mut self, dt: f32, map: &Map, grass: &mut GrassState, rng: &mut impl Rng) {
        self.anim_timer = 0.0;
        if self.on_grass {
            self.graze_timer += dt;
            if self.graze_timer >= GRAZE_SECONDS {
                grass.munch(self.pos);
                self.graze_timer = 0.0;
            }
        } else if rng.gen_range(0.0..1.0) < dt * 4.0 {
            self.start_walking(map, grass, rng);
        }
    }

    fn walk(&mut self, dt: f32, direction: f32, timer: f32) {
        self.pos += Vec2::from_angle(direction) * WALK_SPEED * dt;
        let timer = timer - dt;
        self.state = if timer <= 0.0 {
            SheepState::Idle
        } else {
            SheepState::Walking { direction, timer }
        };
    }

    fn run(&mut self, dt: f32, player: Vec2, flock: &[Vec2]) {
        if dist_sq(self.pos, player) > CALM_RADIUS * CALM_RADIUS {
            self.state = SheepState::Idle;
        }

        let mut steering = Vec2::ZERO;

        let from_player = self.pos - player;
        let d = from_player.length();
        if d > 0.0 {
            steering += from_player / d * (FLEE_REACH - d).max(0.0);
        }

        let mut center = Vec2::ZERO;
        let mut neighbors = 0u16;
        for &other in flock {
            if dist_sq(other, self.pos) > FLOCK_RADIUS * FLOCK_RADIUS {
                continue;
            }
            let away = self.pos - other;
            steering += away.normalize_or_zero() * (PERSONAL_SPACE_SQ - away.length_squared()).max(0.0) * 2.0;
            center += other;
            neighbors += 1;
        }
        if neighbors > 0 {
            center /= f32::from(neighbors);
            steering += (center - self.pos).normalize_or_zero() * COHESION;
        }

        self.pos += steering.normalize_or_zero() * RUN_SPEED * dt;
    }

    fn start_walking(&mut self, map: &Map, grass: &GrassState, rng: &mut impl Rng) {
        self.state = match find_grass_nearby(self.pos, map, grass, rng) {
            Some(tile) => {
                let target = Map::tile_center(tile);
                let to = target - self.pos;
                SheepState::Walking {
                    direction: to.y.atan2(to.x),
                    timer: to.length() / WALK_SPEED,
                }
            }
            None => SheepState::Walking {
                direction: rng.gen_range(0.0..TAU),
                timer: 2.0,
            },
        };
    }

    /// The collision box around the feet.
    #[must_use]
    pub const fn feet(&self) -> Aabb {
        Aabb::feet(self.pos)
    }

    /// Push the sheep out of `obstacle`. A sheep that bumps into something
    /// stops and goes idle.
    pub fn collide(&mut self, obstacle: &Aabb) -> bool {
        match resolve(&self.feet(), obstacle) {
            Some(push) => {
                self.pos += push;
                self.state = SheepState::Idle;
                true
            }
            None => false,
        }
    }

    /// Sprite frame: four walk frames, or standing/grazing.
    #[must_use]
    pub fn frame(&self) -> usize {
        if self.moving {
            2 + (self.anim_timer * 8.0).floor() as usize % 4
        } else {
            usize::from(self.on_grass)
        }
    }

    /// Draw the sprite and trail.
    ///
    /// # Errors
    ///
    /// Returns an error if the atlas lacks the sheep frame.
    pub fn draw(&self, renderer: &mut Renderer, palette: &Palette) -> Result<(), AssetError> {
        let Vec2 { x, y } = self.pos;
        if renderer.sprites().is_some() {
            renderer.spr("sheep", x - 8.0, y - 16.0, self.frame(), self.reverse, y)?;
        } else {
            renderer.circfill(x, y - 4.0, 3.0, palette.timberwolf, y);
            let head = if self.reverse { x + 3.0 } else { x - 3.0 };
            renderer.set(head as i32, (y - 5.0) as i32, palette.black, y);
        }
        self.footsteps.draw(renderer);
        Ok(())
    }

    /// Draw the floating name tag, bobbing with `elapsed`.
    pub fn draw_name(&self, renderer: &mut Renderer, palette: &Palette, elapsed: f32) {
        let style = TextStyle {
            align: TextAlign::Center,
            color: palette.black,
            shadow: Some(palette.timberwolf),
        };
        let bob = (elapsed * 3.0).sin();
        renderer.text(self.name, self.pos.x, self.pos.y - 20.0 + bob, style);
    }
}

/// Whether `pos` is on a grass tile that has not been eaten.
#[must_use]
pub fn standing_on_grass(pos: Vec2, map: &Map, grass: &GrassState) -> bool {
    map.get_world(pos.x, pos.y) == Tile::Grass && !grass.is_munched(pos)
}

/// Nearest uneaten grass tile within six tiles of `pos`. Ties are broken at
/// random.
pub fn find_grass_nearby(
    pos: Vec2,
    map: &Map,
    grass: &GrassState,
    rng: &mut impl Rng,
) -> Option<IVec2> {
    let r = GRASS_SEARCH_RADIUS;
    let here = Map::world_to_tile(pos);
    let mut best = i64::from(r * r);
    let mut closest = Vec::new();

    for x in here.x - r..here.x + r {
        for y in here.y - r..here.y + r {
            let t = IVec2::new(x, y);
            let d2 = dist_sq_i(here, t);
            if d2 > best || map.get(x, y) != Tile::Grass || grass.is_tile_munched(t) {
                continue;
            }
            if d2 < best {
                best = d2;
                closest.clear();
            } else if closest.is_empty() {
                // d2 equals the exclusive search bound
                continue;
            }
            closest.push(t);
        }
    }

    closest.choose(rng).copied()
}
