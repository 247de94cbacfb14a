//! Poisson-disc point sampling by dart throwing.

use glam::IVec2;
use rand::Rng;

use crate::geom::dist_sq_i;

/// Throw `candidates` uniform darts at a `width`×`height` grid and keep those
/// at least `min_spacing` tiles away from every point already kept.
///
/// The check is a naive scan over accepted points. Empty grids yield nothing.
pub fn sample_points(
    width: i32,
    height: i32,
    candidates: usize,
    min_spacing: i32,
    rng: &mut impl Rng,
) -> Vec<IVec2> {
    if width <= 0 || height <= 0 {
        return Vec::new();
    }

    let min_sq = i64::from(min_spacing) * i64::from(min_spacing);
    let mut points: Vec<IVec2> = Vec::new();
    for _ in 0..candidates {
        let p = IVec2::new(rng.gen_range(0..width), rng.gen_range(0..height));
        if points.iter().all(|&q| dist_sq_i(p, q) >= min_sq) {
            points.push(p);
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_points_respect_spacing() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let points = sample_points(96, 64, 1000, 4, &mut rng);
        assert!(!points.is_empty());
        for (i, a) in points.iter().enumerate() {
            assert!(a.x >= 0 && a.x < 96 && a.y >= 0 && a.y < 64);
            for b in &points[i + 1..] {
                assert!(dist_sq_i(*a, *b) >= 16, "{a} too close to {b}");
            }
        }
    }

    #[test]
    fn test_empty_grid() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(sample_points(0, 10, 100, 4, &mut rng).is_empty());
    }

    #[test]
    fn test_single_cell_grid_accepts_one() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let points = sample_points(1, 1, 50, 4, &mut rng);
        assert_eq!(points, vec![IVec2::ZERO]);
    }

    #[test]
    fn test_same_seed_same_points() {
        let a = sample_points(40, 40, 200, 4, &mut ChaCha8Rng::seed_from_u64(3));
        let b = sample_points(40, 40, 200, 4, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
