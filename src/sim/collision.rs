//! Axis-aligned box overlap resolution.

use glam::Vec2;

/// An axis-aligned box: top-left corner and size, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Top-left corner.
    pub min: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl Aabb {
    /// Box from corner and size components.
    #[must_use]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// The 8×4 feet box of a mover standing at `pos`.
    #[must_use]
    pub const fn feet(pos: Vec2) -> Self {
        Self::new(pos.x - 4.0, pos.y - 4.0, 8.0, 4.0)
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// Overlap depth on each axis. Non-positive on an axis means apart.
    #[must_use]
    pub fn penetration(&self, other: &Aabb) -> Vec2 {
        (self.size + other.size) / 2.0 - (self.center() - other.center()).abs()
    }
}

/// Translation that pushes `mover` out of `obstacle` along the axis of least
/// penetration, or `None` if they do not overlap.
///
/// Ties go to the vertical axis. A mover centered exactly on the obstacle is
/// pushed in the positive direction.
#[must_use]
pub fn resolve(mover: &Aabb, obstacle: &Aabb) -> Option<Vec2> {
    let depth = mover.penetration(obstacle);
    if depth.x <= 0.0 || depth.y <= 0.0 {
        return None;
    }

    let delta = mover.center() - obstacle.center();
    let away = |d: f32| if d < 0.0 { -1.0 } else { 1.0 };
    if depth.x < depth.y {
        Some(Vec2::new(depth.x * away(delta.x), 0.0))
    } else {
        Some(Vec2::new(0.0, depth.y * away(delta.y)))
    }
}
