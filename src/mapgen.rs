//! Procedural pasture generation.
//!
//! A map is laid out over a scatter of Poisson-disc points:
//!
//! 1. sample points and triangulate them, plus the half nearest the center
//! 2. wall off the interior hull
//! 3. route a stream across the full hull
//! 4. rasterize interior walls along random triangulation edges
//! 5. bridge the stream where it passes free interior points
//! 6. build the start paddock
//! 7. seed and grow grass, plant trees, optionally trample footpaths
//! 8. pick sheep spawns from what is left
//!
//! Generation never fails. Unlucky point sets just give a sparser map.

pub mod delaunay;
mod grass;
mod paddock;
pub mod poisson;
pub mod route;

use std::collections::{HashMap, HashSet};

use glam::IVec2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geom::{dist_sq_i, line};
use crate::world::{Map, Tile};

pub use delaunay::Triangulation;
pub use grass::{grass_neighbors, grow as grow_grass};
pub use paddock::{HALF_HEIGHT as PADDOCK_HALF_HEIGHT, HALF_WIDTH as PADDOCK_HALF_WIDTH};
pub use route::{COST_SCALE, EdgeCost, shortest_path};

/// Tuning knobs for [`generate_map`].
///
/// `(lo, hi)` pairs are ranges a value is drawn uniformly from once per map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Dart throws for Poisson sampling.
    pub candidate_points: usize,
    /// Minimum distance between sampled points, in tiles.
    pub min_spacing: i32,
    /// Chance that the map gets a stream at all.
    pub stream_chance: f64,
    /// Side of the square brush the stream is stamped with.
    pub stream_width: i32,
    /// Edge weighting for the stream route.
    pub stream_cost: EdgeCost,
    /// Per-edge chance of an interior wall.
    pub wall_density: (f64, f64),
    /// Upper bound for the per-wall chance of skipping a cell.
    pub gap_chance_max: f64,
    /// Chebyshev radius of Water turned into Crossing around free stream points.
    pub crossing_radius: i32,
    /// Whether to wall a paddock around the start.
    pub paddock: bool,
    /// Radius of the gap knocked into the paddock wall.
    pub opening_radius: i32,
    /// Chance a free interior point starts a grass patch.
    pub grass_density: (f64, f64),
    /// Cellular automaton rounds for grass.
    pub grass_iterations: usize,
    /// Chance a free interior point on Ground grows a tree.
    pub tree_chance: f64,
    /// Number of footpaths trodden out from the start.
    pub footpaths: usize,
    /// Edge weighting for footpaths.
    pub footpath_cost: EdgeCost,
    /// Maximum number of sheep spawns.
    pub sheep_count: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            candidate_points: 1000,
            min_spacing: 4,
            stream_chance: 0.75,
            stream_width: 2,
            stream_cost: EdgeCost::Euclidean,
            wall_density: (0.1, 0.2),
            gap_chance_max: 0.3,
            crossing_radius: 2,
            paddock: true,
            opening_radius: 5,
            grass_density: (0.05, 0.15),
            grass_iterations: 6,
            tree_chance: 0.04,
            footpaths: 0,
            footpath_cost: EdgeCost::AvoidWater { penalty: 100 },
            sheep_count: 8,
        }
    }
}

/// Generate a map from a seed. The same seed and config always give the same map.
///
/// Returns `None` if either dimension is not positive.
#[must_use]
pub fn generate_seeded(width: i32, height: i32, config: &GeneratorConfig, seed: u64) -> Option<Map> {
    generate_map(width, height, config, &mut ChaCha8Rng::seed_from_u64(seed))
}

/// Generate a fully populated map.
///
/// Returns `None` if either dimension is not positive. Any other input
/// produces a map.
pub fn generate_map(
    width: i32,
    height: i32,
    config: &GeneratorConfig,
    rng: &mut impl Rng,
) -> Option<Map> {
    let mut map = Map::with_rng(width, height, rng)?;

    let points = poisson::sample_points(
        width,
        height,
        config.candidate_points,
        config.min_spacing,
        rng,
    );
    let mut sites = Sites::new(points, IVec2::new(width / 2, height / 2));

    border_walls(&mut map, &sites.interior);
    let stream = stream(&mut map, &sites.full, config, rng);
    interior_walls(&mut map, &mut sites, &stream, config, rng);
    crossings(&mut map, &mut sites, &stream, config);
    start_and_paddock(&mut map, &mut sites, config, rng);
    seed_grass(&mut map, &sites, config, rng);
    grass::grow(&mut map, config.grass_iterations, rng);
    plant_trees(&mut map, &mut sites, config, rng);
    footpaths(&mut map, &sites, config, rng);
    place_sheep(&mut map, &sites, config, rng);

    debug!(
        width,
        height,
        points = sites.full.points().len(),
        triangles = sites.full.triangle_count(),
        interior_triangles = sites.interior.triangle_count(),
        stream_vertices = stream.len(),
        walls = map.count(Tile::Wall),
        water = map.count(Tile::Water),
        grass = map.count(Tile::Grass),
        sheep = map.sheep_spawns.len(),
        "generated map"
    );

    Some(map)
}

/// Sampled points, both triangulations and which interior points are taken.
struct Sites {
    full: Triangulation,
    interior: Triangulation,
    lookup: HashMap<IVec2, usize>,
    used: Vec<bool>,
}

impl Sites {
    fn new(points: Vec<IVec2>, center: IVec2) -> Self {
        let mut by_distance = points.clone();
        by_distance.sort_by_key(|&p| dist_sq_i(p, center));
        by_distance.truncate(points.len() / 2);

        let interior = Triangulation::new(&by_distance);
        let lookup = by_distance
            .iter()
            .enumerate()
            .map(|(i, &p)| (p, i))
            .collect();
        Self {
            full: Triangulation::new(&points),
            used: vec![false; by_distance.len()],
            interior,
            lookup,
        }
    }

    fn interior_point(&self, i: usize) -> IVec2 {
        self.interior.points()[i]
    }

    /// Interior indices not yet claimed by a feature, in point order.
    fn free(&self) -> Vec<usize> {
        (0..self.used.len()).filter(|&i| !self.used[i]).collect()
    }
}

/// A uniform draw from `(lo, hi)` clamped to `[0, 1]`, or `lo` when the
/// range is empty.
fn pick(rng: &mut impl Rng, (lo, hi): (f64, f64)) -> f64 {
    let (lo, hi) = (lo.clamp(0.0, 1.0), hi.clamp(0.0, 1.0));
    if hi > lo { rng.gen_range(lo..=hi) } else { lo }
}

/// A Bernoulli trial that tolerates probabilities outside `[0, 1]`.
fn chance(rng: &mut impl Rng, p: f64) -> bool {
    if p.is_nan() || p <= 0.0 {
        return false;
    }
    rng.gen_bool(p.min(1.0))
}

fn border_walls(map: &mut Map, interior: &Triangulation) {
    let hull = interior.hull();
    let points = interior.points();
    for (k, &a) in hull.iter().enumerate() {
        let b = hull[(k + 1) % hull.len()];
        map.set_line(points[a], points[b], Tile::Wall);
    }
}

/// Route and stamp the stream. Returns the path's vertices in order.
fn stream(
    map: &mut Map,
    full: &Triangulation,
    config: &GeneratorConfig,
    rng: &mut impl Rng,
) -> Vec<IVec2> {
    let hull = full.hull();
    let len = hull.len();
    if len < 2 || !chance(rng, config.stream_chance) {
        return Vec::new();
    }

    let i = rng.gen_range(0..len);
    let eighth = len / 8;
    let offset = len / 2 + len - eighth + rng.gen_range(0..=2 * eighth);
    let j = (i + offset) % len;

    let path: Vec<IVec2> = shortest_path(full, hull[i], hull[j], config.stream_cost, map)
        .into_iter()
        .map(|v| full.points()[v])
        .collect();

    let brush = config.stream_width.max(1);
    for pair in path.windows(2) {
        for p in line(pair[0], pair[1]) {
            stamp_water(map, p, brush);
        }
    }
    path
}

/// Flood a `brush`×`brush` square anchored at `p`. Overwrites any tile,
/// border walls included, and clips at the grid edge.
fn stamp_water(map: &mut Map, p: IVec2, brush: i32) {
    for by in 0..brush {
        for bx in 0..brush {
            if map.in_bounds(p.x + bx, p.y + by) {
                map.set(p.x + bx, p.y + by, Tile::Water);
            }
        }
    }
}

fn interior_walls(
    map: &mut Map,
    sites: &mut Sites,
    stream: &[IVec2],
    config: &GeneratorConfig,
    rng: &mut impl Rng,
) {
    let wet: HashSet<IVec2> = stream.iter().copied().collect();
    let density = pick(rng, config.wall_density);
    let edges: Vec<(usize, usize)> = sites.interior.edges().collect();

    for (a, b) in edges {
        if !chance(rng, density) {
            continue;
        }
        let (pa, pb) = (sites.interior_point(a), sites.interior_point(b));
        if wet.contains(&pa) && wet.contains(&pb) {
            continue;
        }

        let gap = pick(rng, (0.0, config.gap_chance_max));
        for p in line(pa, pb) {
            if map.get(p.x, p.y) == Tile::Water || chance(rng, gap) {
                continue;
            }
            map.set(p.x, p.y, Tile::Wall);
        }
        sites.used[a] = true;
        sites.used[b] = true;
    }
}

fn crossings(map: &mut Map, sites: &mut Sites, stream: &[IVec2], config: &GeneratorConfig) {
    let r = config.crossing_radius;
    for p in stream {
        let Some(&i) = sites.lookup.get(p) else {
            continue;
        };
        if sites.used[i] {
            continue;
        }
        for dy in -r..=r {
            for dx in -r..=r {
                if map.get(p.x + dx, p.y + dy) == Tile::Water {
                    map.set(p.x + dx, p.y + dy, Tile::Crossing);
                }
            }
        }
        sites.used[i] = true;
    }
}

fn start_and_paddock(
    map: &mut Map,
    sites: &mut Sites,
    config: &GeneratorConfig,
    rng: &mut impl Rng,
) {
    let Some(&start) = sites.free().choose(rng) else {
        return;
    };
    let tile = sites.interior_point(start);
    map.start = Map::tile_center(tile);
    sites.used[start] = true;

    if !config.paddock {
        return;
    }
    let rect = paddock::build(map, tile, config.opening_radius, rng);
    for i in 0..sites.used.len() {
        if rect.contains(sites.interior_point(i)) {
            sites.used[i] = true;
        }
    }
    map.paddock = Some(rect);
}

fn seed_grass(map: &mut Map, sites: &Sites, config: &GeneratorConfig, rng: &mut impl Rng) {
    let density = pick(rng, config.grass_density);
    for i in sites.free() {
        let p = sites.interior_point(i);
        if map.get(p.x, p.y) == Tile::Ground && chance(rng, density) {
            map.set(p.x, p.y, Tile::Grass);
        }
    }
}

fn plant_trees(map: &mut Map, sites: &mut Sites, config: &GeneratorConfig, rng: &mut impl Rng) {
    for i in sites.free() {
        let p = sites.interior_point(i);
        if map.get(p.x, p.y) == Tile::Ground && chance(rng, config.tree_chance) {
            map.set(p.x, p.y, Tile::Tree);
            sites.used[i] = true;
        }
    }
}

/// Tread paths from the start to random interior points, bridging water.
fn footpaths(map: &mut Map, sites: &Sites, config: &GeneratorConfig, rng: &mut impl Rng) {
    if config.footpaths == 0 || sites.used.is_empty() {
        return;
    }
    let points = sites.full.points();
    let home = Map::world_to_tile(map.start);
    let Some(from) = (0..points.len()).min_by_key(|&i| dist_sq_i(points[i], home)) else {
        return;
    };

    for _ in 0..config.footpaths {
        let target = sites.interior_point(rng.gen_range(0..sites.used.len()));
        let Some(to) = points.iter().position(|&p| p == target) else {
            continue;
        };
        let route = shortest_path(&sites.full, from, to, config.footpath_cost, map);
        for pair in route.windows(2) {
            for p in line(points[pair[0]], points[pair[1]]) {
                let trodden = match map.get(p.x, p.y) {
                    Tile::Water | Tile::Crossing => Tile::Crossing,
                    _ => Tile::Path,
                };
                map.set(p.x, p.y, trodden);
            }
        }
    }
}

fn place_sheep(map: &mut Map, sites: &Sites, config: &GeneratorConfig, rng: &mut impl Rng) {
    let mut open: Vec<IVec2> = sites
        .free()
        .into_iter()
        .map(|i| sites.interior_point(i))
        .filter(|p| {
            let tile = map.get(p.x, p.y);
            !tile.is_solid() && tile != Tile::Tree
        })
        .collect();
    open.shuffle(rng);
    map.sheep_spawns = open
        .into_iter()
        .take(config.sheep_count)
        .map(Map::tile_center)
        .collect();
}
