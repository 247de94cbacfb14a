//! Footprint trails left behind by walkers.

// Footprints are snapped to pixels
#![allow(clippy::cast_possible_truncation)]

use std::collections::VecDeque;

use glam::Vec2;

use crate::render::{Color, Renderer};

/// Tuning for a trail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailStyle {
    /// Distance between the left and right prints.
    pub width: f32,
    /// Distance walked between prints.
    pub stride: f32,
    /// Prints kept before the oldest is dropped.
    pub max_prints: usize,
    /// Print color.
    pub color: Color,
}

impl TrailStyle {
    /// The player's trail.
    #[must_use]
    pub const fn player(color: Color) -> Self {
        Self {
            width: 4.0,
            stride: 4.0,
            max_prints: 128,
            color,
        }
    }

    /// The narrower, shorter-stepped sheep trail.
    #[must_use]
    pub const fn sheep(color: Color) -> Self {
        Self {
            width: 3.0,
            stride: 3.0,
            max_prints: 128,
            color,
        }
    }
}

/// Alternating left/right prints along a walker's path.
#[derive(Debug, Clone)]
pub struct FootstepTrail {
    style: TrailStyle,
    prints: VecDeque<Vec2>,
    to_next: f32,
    left: bool,
}

impl FootstepTrail {
    /// Empty trail. The first print lands after one full stride.
    #[must_use]
    pub fn new(style: TrailStyle) -> Self {
        Self {
            style,
            prints: VecDeque::with_capacity(style.max_prints),
            to_next: style.stride,
            left: false,
        }
    }

    /// Record a move from `from` to `to`.
    pub fn step(&mut self, from: Vec2, to: Vec2) {
        let delta = to - from;
        let dist = delta.length();
        if dist <= 0.0 {
            return;
        }

        self.to_next -= dist;
        if self.to_next > 0.0 {
            return;
        }

        let v = delta / dist;
        let side = if self.left {
            Vec2::new(v.y, -v.x)
        } else {
            Vec2::new(-v.y, v.x)
        };
        self.left = !self.left;

        let half = self.style.width * 0.5;
        self.prints
            .push_back(Vec2::new(from.x + side.x * half, from.y - 1.0 + side.y * half));
        while self.prints.len() > self.style.max_prints {
            self.prints.pop_front();
        }
        self.to_next = self.style.stride;
    }

    /// Print positions, oldest first.
    pub fn prints(&self) -> impl ExactSizeIterator<Item = Vec2> + '_ {
        self.prints.iter().copied()
    }

    /// Draw every print at its own depth.
    pub fn draw(&self, renderer: &mut Renderer) {
        for p in &self.prints {
            renderer.set(p.x as i32, p.y as i32, self.style.color, p.y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(trail: &mut FootstepTrail, steps: usize, dx: f32) {
        let mut pos = Vec2::ZERO;
        for _ in 0..steps {
            let next = pos + Vec2::new(dx, 0.0);
            trail.step(pos, next);
            pos = next;
        }
    }

    #[test]
    fn test_no_print_before_stride() {
        let mut trail = FootstepTrail::new(TrailStyle::player(Color::BLACK));
        walk(&mut trail, 3, 1.0);
        assert_eq!(trail.prints().len(), 0);
        walk(&mut trail, 1, 1.0);
        assert_eq!(trail.prints().len(), 1);
    }

    #[test]
    fn test_prints_alternate_sides() {
        let mut trail = FootstepTrail::new(TrailStyle::player(Color::BLACK));
        walk(&mut trail, 16, 1.0);
        let ys: Vec<f32> = trail.prints().map(|p| p.y).collect();
        assert_eq!(ys.len(), 4);
        // Walking along +x the sides sit at y - 1 ± 2
        assert!((ys[0] - 1.0).abs() < 1e-5);
        assert!((ys[1] + 3.0).abs() < 1e-5);
        assert!((ys[2] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_trail_is_capped() {
        let mut trail = FootstepTrail::new(TrailStyle::sheep(Color::BLACK));
        walk(&mut trail, 2000, 3.0);
        assert_eq!(trail.prints().len(), 128);
    }

    #[test]
    fn test_standing_still_leaves_nothing() {
        let mut trail = FootstepTrail::new(TrailStyle::player(Color::BLACK));
        for _ in 0..10 {
            trail.step(Vec2::ONE, Vec2::ONE);
        }
        assert_eq!(trail.prints().len(), 0);
    }

    #[test]
    fn test_draw_writes_pixels() {
        let red = Color::rgb(255, 0, 0);
        let mut trail = FootstepTrail::new(TrailStyle::player(red));
        trail.step(Vec2::new(2.0, 3.0), Vec2::new(6.0, 3.0));
        let mut r = Renderer::new(8, 8);
        trail.draw(&mut r);
        // From (2, 3) heading +x: first print is at (2, 4)
        assert_eq!(r.pixel(2, 4), Some(red));
    }
}
