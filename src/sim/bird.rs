//! Birds that hop about and take off when the player comes close.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use glam::Vec2;
use rand::Rng;

use crate::error::AssetError;
use crate::geom::dist_sq;
use crate::render::{Palette, Renderer};

/// Player distance at which a bird takes off.
const SCARE_RADIUS: f32 = 48.0;
/// Flight speed, px/s.
const FLIGHT_SPEED: f32 = 96.0;
/// Distance covered by one hop.
const HOP_LENGTH: f32 = 4.0;
/// Seconds a bird keeps flying before it is removed.
const FLIGHT_TIME: f32 = 20.0;

/// What a bird is doing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BirdState {
    /// Idle on the ground.
    Standing,
    /// Hopping sideways.
    Hopping {
        /// Number of hops, 1 to 3.
        hops: u8,
        /// `x` when the hopping started.
        start_x: f32,
        /// Seconds left.
        timer: f32,
    },
    /// Gone for good, heading off-screen.
    Flying,
}

/// A small bird.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bird {
    /// Ground position.
    pub pos: Vec2,
    /// Height above the ground.
    pub z: f32,
    /// Current behavior.
    pub state: BirdState,
    /// Facing right.
    pub reverse: bool,
    flight_direction: f32,
    anim_timer: f32,
    life: f32,
}

impl Bird {
    /// A standing bird with a random take-off heading between straight up-left
    /// and straight up-right.
    #[must_use]
    pub fn new(pos: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            pos,
            z: 0.0,
            state: BirdState::Standing,
            reverse: false,
            flight_direction: rng.gen_range(0.0..1.0) * FRAC_PI_2 + FRAC_PI_4,
            anim_timer: 0.0,
            life: FLIGHT_TIME,
        }
    }

    /// Advance one frame.
    pub fn update(&mut self, dt: f32, player: Vec2, rng: &mut impl Rng) {
        if self.state != BirdState::Flying && dist_sq(self.pos, player) < SCARE_RADIUS * SCARE_RADIUS
        {
            self.state = BirdState::Flying;
            self.reverse = self.flight_direction < FRAC_PI_2;
        }

        if self.state == BirdState::Standing && rng.gen_range(0.0..1.0) < dt / 4.0 {
            self.reverse = rng.gen_bool(0.5);
            let hops = rng.gen_range(1..=3u8);
            self.state = BirdState::Hopping {
                hops,
                start_x: self.pos.x,
                timer: f32::from(hops) / 4.0,
            };
        }

        match &mut self.state {
            BirdState::Standing => {}
            BirdState::Flying => {
                self.pos.x += self.flight_direction.cos() * FLIGHT_SPEED * dt;
                self.z += self.flight_direction.sin() * FLIGHT_SPEED * dt;
                self.anim_timer += dt;
                self.life -= dt;
            }
            BirdState::Hopping {
                hops,
                start_x,
                timer,
            } => {
                *timer -= dt;
                let hops = f32::from(*hops);
                let dir = if self.reverse { 1.0 } else { -1.0 };
                let span = hops * HOP_LENGTH * dir;
                if *timer <= 0.0 {
                    self.pos.x = *start_x + span;
                    self.z = 0.0;
                    self.state = BirdState::Standing;
                } else {
                    let t = *timer;
                    self.pos.x = *start_x + (1.0 - t / (hops / 4.0)) * span;
                    self.z = (t * 4.0 * PI).sin().max(((t * 4.0 + 1.0) * PI).sin()) * 2.0;
                }
            }
        }
    }

    /// Whether the bird has flown far enough to be removed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.life <= 0.0
    }

    /// Sprite frame: a still frame on the ground, three wing frames in flight.
    #[must_use]
    pub fn frame(&self) -> usize {
        if self.state == BirdState::Flying {
            (self.anim_timer * 8.0).floor() as usize % 3 + 1
        } else {
            0
        }
    }

    /// Draw the bird.
    ///
    /// # Errors
    ///
    /// Returns an error if the atlas lacks the bird frame.
    pub fn draw(&self, renderer: &mut Renderer, palette: &Palette) -> Result<(), AssetError> {
        let (x, y) = (self.pos.x - 1.0, self.pos.y - self.z - 3.0);
        if renderer.sprites().is_some() {
            renderer.spr("birb", x, y, self.frame(), self.reverse, self.pos.y)?;
        } else {
            renderer.rectfill(x, y, 2, 2, palette.outer_space, self.pos.y);
        }
        Ok(())
    }
}
