//! Bugs: single-pixel gnats kicked up from the grass.

#![allow(clippy::cast_possible_truncation)]

use glam::Vec2;
use rand::Rng;

use crate::render::{Palette, Renderer};

/// How long a bug lives, in seconds.
pub const BUG_LIFESPAN: f32 = 20.0;

/// Highest a bug flies above the ground.
const MAX_HEIGHT: f32 = 16.0;

/// Jitter speed in px/s on each axis.
const JITTER: f32 = 100.0;

/// A gnat that drifts randomly and sinks back down near the end of its life.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bug {
    /// Ground position.
    pub pos: Vec2,
    /// Height above the ground.
    pub z: f32,
    life: f32,
}

impl Bug {
    /// Bug resting on the ground at `pos`.
    #[must_use]
    pub const fn new(pos: Vec2) -> Self {
        Self {
            pos,
            z: 0.0,
            life: BUG_LIFESPAN,
        }
    }

    /// Drift for one frame.
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        self.pos.x += rng.gen_range(-1.0..1.0) * dt * JITTER;
        self.pos.y += rng.gen_range(-1.0..1.0) * dt * JITTER;
        let sink = if self.life < 3.0 { 0.75 } else { 0.25 };
        self.z = ((rng.gen_range(0.0..1.0) - sink) * dt * JITTER + self.z).clamp(0.0, MAX_HEIGHT);
        self.life -= dt;
    }

    /// Whether the bug has died and should be removed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.life <= 0.0
    }

    /// Seconds left to live.
    #[must_use]
    pub const fn life(&self) -> f32 {
        self.life
    }

    /// One pixel, lifted by its height.
    pub fn draw(&self, renderer: &mut Renderer, palette: &Palette) {
        renderer.set(
            self.pos.x as i32,
            (self.pos.y - self.z) as i32,
            palette.violet_purple,
            self.pos.y,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_height_stays_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut bug = Bug::new(Vec2::new(50.0, 50.0));
        for _ in 0..600 {
            bug.update(1.0 / 30.0, &mut rng);
            assert!((0.0..=MAX_HEIGHT).contains(&bug.z));
        }
    }

    #[test]
    fn test_jitter_is_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut bug = Bug::new(Vec2::ZERO);
        bug.update(0.1, &mut rng);
        assert!(bug.pos.x.abs() <= 10.0 && bug.pos.y.abs() <= 10.0);
    }

    #[test]
    fn test_expires_after_lifespan() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut bug = Bug::new(Vec2::ZERO);
        for _ in 0..19 {
            bug.update(1.0, &mut rng);
        }
        assert!(!bug.is_expired());
        bug.update(1.0, &mut rng);
        assert!(bug.is_expired());
    }

    #[test]
    fn test_draws_one_pixel() {
        let palette = Palette::default();
        let bug = Bug::new(Vec2::new(3.5, 2.9));
        let mut r = Renderer::new(8, 8);
        bug.draw(&mut r, &palette);
        assert_eq!(r.pixel(3, 2), Some(palette.violet_purple));
    }
}
