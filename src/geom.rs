//! Small geometry helpers shared by the generator, the renderer and the simulation.
//!
//! Vector math uses `glam`. Rasterization is exposed as a finite iterator
//! ([`Line`]) and as a per-pixel visitor ([`fill_circle`]), so callers can either
//! collect points or write them straight into a buffer.

use glam::{IVec2, Vec2};

/// Euclidean modulo: the result is always in `0..m` for positive `m`.
#[must_use]
#[inline]
pub const fn wrap(n: i32, m: i32) -> i32 {
    n.rem_euclid(m)
}

/// Squared distance between two points.
#[must_use]
#[inline]
pub fn dist_sq(a: Vec2, b: Vec2) -> f32 {
    a.distance_squared(b)
}

/// Squared distance between two integer points, widened to avoid overflow.
#[must_use]
#[inline]
pub fn dist_sq_i(a: IVec2, b: IVec2) -> i64 {
    let dx = i64::from(a.x) - i64::from(b.x);
    let dy = i64::from(a.y) - i64::from(b.y);
    dx * dx + dy * dy
}

/// Create a Bresenham line from `from` to `to`.
#[must_use]
pub fn line(from: IVec2, to: IVec2) -> Line {
    Line::new(from, to)
}

/// Clip the segment `from → to` to the inclusive box `min..=max`
/// (Liang–Barsky).
///
/// A segment already inside the box is returned untouched, so short lines
/// rasterize exactly as given. `None` when the segment misses the box.
#[must_use]
// Clipped endpoints lie inside the box, which fits in i32
#[allow(clippy::cast_possible_truncation)]
pub fn clip_segment(from: IVec2, to: IVec2, min: IVec2, max: IVec2) -> Option<(IVec2, IVec2)> {
    let inside = |p: IVec2| p.cmpge(min).all() && p.cmple(max).all();
    if inside(from) && inside(to) {
        return Some((from, to));
    }

    let (x0, y0) = (f64::from(from.x), f64::from(from.y));
    let (dx, dy) = (f64::from(to.x) - x0, f64::from(to.y) - y0);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [
        (-dx, x0 - f64::from(min.x)),
        (dx, f64::from(max.x) - x0),
        (-dy, y0 - f64::from(min.y)),
        (dy, f64::from(max.y) - y0),
    ] {
        if p.abs() < f64::EPSILON {
            // Parallel to this edge: inside or out for the whole segment
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    let at = |t: f64| {
        IVec2::new((x0 + t * dx).round() as i32, (y0 + t * dy).round() as i32).clamp(min, max)
    };
    Some((at(t0), at(t1)))
}

/// Integer Bresenham rasterization of a segment.
///
/// Yields every cell from the start point to the end point inclusive. Each
/// step moves by at most one cell on each axis, so the sequence is
/// 8-connected. Equal endpoints yield a single point. The iterator is `Clone`,
/// so a line can be replayed without recomputing its setup.
#[derive(Debug, Clone)]
#[allow(missing_copy_implementations)] // clippy::copy_iterator forbids Copy here
pub struct Line {
    x: i32,
    y: i32,
    end_x: i32,
    end_y: i32,
    dx: i64,
    dy: i64,
    sx: i32,
    sy: i32,
    err: i64,
    done: bool,
}

impl Line {
    /// Create a line iterator between two inclusive endpoints.
    #[must_use]
    pub fn new(from: IVec2, to: IVec2) -> Self {
        // Widened so endpoints at opposite ends of the i32 range still work
        let dx = (i64::from(to.x) - i64::from(from.x)).abs();
        let dy = (i64::from(to.y) - i64::from(from.y)).abs();
        Self {
            x: from.x,
            y: from.y,
            end_x: to.x,
            end_y: to.y,
            dx,
            dy,
            sx: if from.x < to.x { 1 } else { -1 },
            sy: if from.y < to.y { 1 } else { -1 },
            err: dx - dy,
            done: false,
        }
    }
}

impl Iterator for Line {
    type Item = IVec2;

    fn next(&mut self) -> Option<IVec2> {
        if self.done {
            return None;
        }

        let point = IVec2::new(self.x, self.y);
        if self.x == self.end_x && self.y == self.end_y {
            self.done = true;
            return Some(point);
        }

        let e2 = self.err * 2;
        if e2 > -self.dy {
            self.err -= self.dy;
            self.x += self.sx;
        }
        if e2 < self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }

        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        // Chebyshev distance to the end, plus the current point.
        let remaining = (i64::from(self.end_x) - i64::from(self.x))
            .abs()
            .max((i64::from(self.end_y) - i64::from(self.y)).abs());
        let remaining = usize::try_from(remaining).unwrap_or(0) + 1;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Line {}

/// Visit every cell of a filled circle using the midpoint circle algorithm.
///
/// Cells are visited as horizontal spans mirrored across both axes; some cells
/// near the diagonals are visited more than once. A radius of zero visits only
/// the center. Negative radii visit nothing.
pub fn fill_circle(cx: i32, cy: i32, r: i32, mut visit: impl FnMut(i32, i32)) {
    if r < 0 {
        return;
    }

    let mut x = r;
    let mut y = 0;
    let mut f = 1 - r;
    let mut ddf_x = -2 * r;
    let mut ddf_y = 1;

    visit(cx, cy + r);
    visit(cx, cy - r);
    for rx in -r..=r {
        visit(cx + rx, cy);
    }

    while y < x {
        if f >= 0 {
            x -= 1;
            ddf_x += 2;
            f += ddf_x;
        }

        y += 1;
        ddf_y += 2;
        f += ddf_y;

        for rx in -x..=x {
            visit(cx + rx, cy + y);
            visit(cx + rx, cy - y);
        }
        for rx in -y..=y {
            visit(cx + rx, cy + x);
            visit(cx + rx, cy - x);
        }
    }
}

/// Normalize `v`, returning zero for a zero-length vector instead of NaN.
#[must_use]
#[inline]
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}
