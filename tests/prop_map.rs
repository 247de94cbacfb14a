//! Property-based tests for the map grid, line rasterizer and triangulation.
//!
//! Run with: cargo test --release prop_map

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::cast_sign_loss)]

use glam::IVec2;
use proptest::prelude::*;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use pasture::geom::line;
use pasture::mapgen::{Triangulation, grow_grass};
use pasture::{Map, Tile};

fn cross(a: IVec2, b: IVec2, c: IVec2) -> i64 {
    let (ax, ay) = (i64::from(a.x), i64::from(a.y));
    (i64::from(b.x) - ax) * (i64::from(c.y) - ay) - (i64::from(b.y) - ay) * (i64::from(c.x) - ax)
}

/// Strictly inside the circumcircle of counter-clockwise `abc`.
fn in_circle(a: IVec2, b: IVec2, c: IVec2, p: IVec2) -> bool {
    let row = |q: IVec2| {
        let dx = i128::from(q.x) - i128::from(p.x);
        let dy = i128::from(q.y) - i128::from(p.y);
        (dx, dy, dx * dx + dy * dy)
    };
    let (ax, ay, a2) = row(a);
    let (bx, by, b2) = row(b);
    let (cx, cy, c2) = row(c);
    ax * (by * c2 - b2 * cy) - ay * (bx * c2 - b2 * cx) + a2 * (bx * cy - by * cx) > 0
}

fn point_set() -> impl Strategy<Value = Vec<IVec2>> {
    prop::collection::vec((-40i32..40, -40i32..40), 0..40)
        .prop_map(|raw| raw.into_iter().map(|(x, y)| IVec2::new(x, y)).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Reads outside the grid give Ground and writes change nothing.
    #[test]
    fn prop_out_of_bounds_is_inert(
        w in 1i32..24,
        h in 1i32..24,
        x in -100i32..100,
        y in -100i32..100,
    ) {
        let mut map = Map::new(w, h).unwrap();
        prop_assume!(!map.in_bounds(x, y));
        let before = map.tiles().to_vec();
        prop_assert_eq!(map.get(x, y), Tile::Ground);
        prop_assert!(!map.set(x, y, Tile::Wall));
        prop_assert_eq!(map.tiles(), &before[..]);
    }

    /// Every cell hands out the same sequence each time it is asked.
    #[test]
    fn prop_cell_rng_is_deterministic(seed in any::<u64>(), x in 0i32..16, y in 0i32..16) {
        let map = Map::with_rng(16, 16, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
        let mut a = map.get_random(x, y).unwrap();
        let mut b = map.get_random(x, y).unwrap();
        for _ in 0..8 {
            prop_assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    /// Lines are 8-connected and include both endpoints.
    #[test]
    fn prop_line_connected(x0 in -50i32..50, y0 in -50i32..50, x1 in -50i32..50, y1 in -50i32..50) {
        let from = IVec2::new(x0, y0);
        let to = IVec2::new(x1, y1);
        let points: Vec<IVec2> = line(from, to).collect();

        prop_assert_eq!(points.first().copied(), Some(from));
        prop_assert_eq!(points.last().copied(), Some(to));
        let steps = (to - from).abs().max_element();
        prop_assert_eq!(points.len(), steps as usize + 1);
        for pair in points.windows(2) {
            let d = (pair[1] - pair[0]).abs();
            prop_assert_eq!(d.max_element(), 1);
        }
    }

    /// Triangles are counter-clockwise and no input point lies strictly
    /// inside any circumcircle.
    #[test]
    fn prop_triangulation_is_delaunay(points in point_set()) {
        let tri = Triangulation::new(&points);
        let p = tri.points();
        for t in tri.triangles().chunks_exact(3) {
            let (a, b, c) = (p[t[0]], p[t[1]], p[t[2]]);
            prop_assert!(cross(a, b, c) > 0);
            for &q in p {
                prop_assert!(!in_circle(a, b, c, q));
            }
        }
    }

    /// The hull turns left at every vertex and no point lies outside it.
    #[test]
    fn prop_hull_is_convex(points in point_set()) {
        let tri = Triangulation::new(&points);
        prop_assume!(tri.triangle_count() > 0);

        let hull = tri.hull();
        let p = tri.points();
        prop_assert!(hull.len() >= 3);
        for i in 0..hull.len() {
            let a = p[hull[i]];
            let b = p[hull[(i + 1) % hull.len()]];
            let c = p[hull[(i + 2) % hull.len()]];
            prop_assert!(cross(a, b, c) > 0);
            for &q in p {
                prop_assert!(cross(a, b, q) >= 0);
            }
        }
    }

    /// Adjacency agrees with the half-edge structure in both directions.
    #[test]
    fn prop_neighbors_symmetric(points in point_set()) {
        let tri = Triangulation::new(&points);
        for (a, b) in tri.edges() {
            prop_assert!(tri.neighbors(a).contains(&b));
            prop_assert!(tri.neighbors(b).contains(&a));
        }
        for (e, twin) in tri.halfedges().iter().enumerate() {
            if let Some(twin) = *twin {
                prop_assert_eq!(tri.halfedges()[twin], Some(e));
            }
        }
    }

    /// A round of grass growth never turns grass back into ground.
    #[test]
    fn prop_grass_growth_monotonic(seed in any::<u64>(), seeds in prop::collection::vec((0i32..24, 0i32..24), 1..6)) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut map = Map::with_rng(24, 24, &mut rng).unwrap();
        for (x, y) in seeds {
            map.set(x, y, Tile::Grass);
        }
        map.set(12, 0, Tile::Wall);

        for _ in 0..4 {
            let before = map.clone();
            grow_grass(&mut map, 1, &mut rng);
            for ((pos, was), (_, now)) in before.iter().zip(map.iter()) {
                if was == Tile::Grass {
                    prop_assert_eq!(now, Tile::Grass, "grass reverted at {}", pos);
                }
                if was == Tile::Wall {
                    prop_assert_eq!(now, Tile::Wall);
                }
            }
        }
    }
}
