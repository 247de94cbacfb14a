//! The player character.

// Animation frames come from truncated timers
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use glam::Vec2;

use crate::error::AssetError;
use crate::render::{Palette, Renderer};
use crate::sim::collision::{Aabb, resolve};
use crate::sim::footsteps::{FootstepTrail, TrailStyle};
use crate::sim::input::MoveInput;

/// The player: moves with the input at a fixed speed and leaves footprints.
#[derive(Debug, Clone)]
pub struct Player {
    /// Feet position in world units.
    pub pos: Vec2,
    /// Velocity this frame, px/s.
    pub vel: Vec2,
    /// Facing left.
    pub reverse: bool,
    speed: f32,
    anim_timer: f32,
    footsteps: FootstepTrail,
}

impl Player {
    /// Player standing at `pos`.
    #[must_use]
    pub fn new(pos: Vec2, speed: f32, palette: &Palette) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            reverse: false,
            speed,
            anim_timer: 0.0,
            footsteps: FootstepTrail::new(TrailStyle::player(palette.gray)),
        }
    }

    /// Move one frame along `input`.
    pub fn update(&mut self, dt: f32, input: MoveInput) {
        self.anim_timer += dt;

        let dir = input.direction();
        if dir.x < 0.0 {
            self.reverse = true;
        } else if dir.x > 0.0 {
            self.reverse = false;
        }

        self.vel = dir * self.speed;
        let from = self.pos;
        self.pos += self.vel * dt;
        self.footsteps.step(from, self.pos);
    }

    /// Whether the player moved this frame.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.vel != Vec2::ZERO
    }

    /// The collision box around the feet.
    #[must_use]
    pub const fn feet(&self) -> Aabb {
        Aabb::feet(self.pos)
    }

    /// Push the player out of `obstacle`. Returns whether they overlapped.
    pub fn collide(&mut self, obstacle: &Aabb) -> bool {
        match resolve(&self.feet(), obstacle) {
            Some(push) => {
                self.pos += push;
                true
            }
            None => false,
        }
    }

    /// Sprite frame: two walk frames per facing, one idle frame per facing.
    #[must_use]
    pub fn frame(&self) -> usize {
        if self.is_moving() {
            let step = (self.anim_timer * 6.0).floor() as usize % 2;
            if self.reverse { 4 + step } else { 1 + step }
        } else if self.reverse {
            3
        } else {
            0
        }
    }

    /// Draw the sprite and the trail.
    ///
    /// # Errors
    ///
    /// Returns an error if the atlas lacks the player frame.
    pub fn draw(&self, renderer: &mut Renderer, palette: &Palette) -> Result<(), AssetError> {
        let (x, y) = (self.pos.x.floor(), self.pos.y.floor());
        if renderer.sprites().is_some() {
            renderer.spr("player", x - 8.0, y - 16.0, self.frame(), false, self.pos.y)?;
        } else {
            renderer.rectfill(x - 3.0, y - 10.0, 6, 10, palette.chestnut, self.pos.y);
        }
        self.footsteps.draw(renderer);
        Ok(())
    }
}
