//! Shortest paths over a triangulation graph.

// Edge lengths are non-negative and rounded into fixed point
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use glam::IVec2;
use pathfinding::prelude::dijkstra;
use serde::{Deserialize, Serialize};

use crate::geom::line;
use crate::mapgen::delaunay::Triangulation;
use crate::world::{Map, Tile};

/// Fixed-point cost units per tile of edge length.
pub const COST_SCALE: u64 = 1000;

/// How an edge between two triangulation vertices is weighed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgeCost {
    /// Straight-line length.
    #[default]
    Euclidean,
    /// Length plus `penalty` tiles for every Water cell the edge crosses.
    AvoidWater {
        /// Extra length charged per Water cell.
        penalty: u32,
    },
}

impl EdgeCost {
    /// Cost of walking the straight segment `from → to` on `map`.
    #[must_use]
    pub fn cost(self, from: IVec2, to: IVec2, map: &Map) -> u64 {
        let length = (to - from).as_vec2().length();
        let base = (length * COST_SCALE as f32).round() as u64;
        match self {
            EdgeCost::Euclidean => base,
            EdgeCost::AvoidWater { penalty } => {
                let wet = line(from, to)
                    .filter(|p| map.get(p.x, p.y) == Tile::Water)
                    .count() as u64;
                base + wet * u64::from(penalty) * COST_SCALE
            }
        }
    }
}

/// Cheapest vertex sequence from `start` to `goal` along triangulation edges.
///
/// The path includes both endpoints. Out-of-range or unreachable vertices
/// give an empty path; `start == goal` gives `[start]`.
#[must_use]
pub fn shortest_path(
    tri: &Triangulation,
    start: usize,
    goal: usize,
    cost: EdgeCost,
    map: &Map,
) -> Vec<usize> {
    let points = tri.points();
    if start >= points.len() || goal >= points.len() {
        return Vec::new();
    }

    dijkstra(
        &start,
        |&from| {
            tri.neighbors(from)
                .iter()
                .map(move |&to| (to, cost.cost(points[from], points[to], map)))
        },
        |&n| n == goal,
    )
    .map(|(path, _)| path)
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> (Triangulation, Map) {
        // A 3×3 lattice of vertices, 4 tiles apart
        let points: Vec<IVec2> = (0..3)
            .flat_map(|y| (0..3).map(move |x| IVec2::new(x * 4, y * 4)))
            .collect();
        (Triangulation::new(&points), Map::new(12, 12).unwrap())
    }

    #[test]
    fn test_euclidean_cost() {
        let map = Map::new(8, 8).unwrap();
        let c = EdgeCost::Euclidean.cost(IVec2::ZERO, IVec2::new(3, 4), &map);
        assert_eq!(c, 5 * COST_SCALE);
    }

    #[test]
    fn test_avoid_water_charges_wet_cells() {
        let mut map = Map::new(8, 8).unwrap();
        map.set(2, 0, Tile::Water);
        map.set(3, 0, Tile::Water);
        let cost = EdgeCost::AvoidWater { penalty: 100 };
        let c = cost.cost(IVec2::ZERO, IVec2::new(5, 0), &map);
        assert_eq!(c, 5 * COST_SCALE + 2 * 100 * COST_SCALE);
    }

    #[test]
    fn test_path_endpoints_and_adjacency() {
        let (tri, map) = grid();
        let path = shortest_path(&tri, 0, 8, EdgeCost::Euclidean, &map);
        assert_eq!(path.first(), Some(&0));
        assert_eq!(path.last(), Some(&8));
        for pair in path.windows(2) {
            assert!(tri.neighbors(pair[0]).contains(&pair[1]));
        }
    }

    #[test]
    fn test_same_start_and_goal() {
        let (tri, map) = grid();
        assert_eq!(shortest_path(&tri, 4, 4, EdgeCost::Euclidean, &map), vec![4]);
    }

    #[test]
    fn test_out_of_range_is_empty() {
        let (tri, map) = grid();
        assert!(shortest_path(&tri, 0, 99, EdgeCost::Euclidean, &map).is_empty());
    }

    #[test]
    fn test_unreachable_is_empty() {
        let points = vec![IVec2::new(0, 0), IVec2::new(1, 0), IVec2::new(2, 0)];
        let tri = Triangulation::new(&points);
        let map = Map::new(4, 4).unwrap();
        assert!(shortest_path(&tri, 0, 2, EdgeCost::Euclidean, &map).is_empty());
    }

    #[test]
    fn test_water_penalty_detours() {
        // Square with a center; wet cells on the direct route through the center
        let points = vec![
            IVec2::new(0, 0),
            IVec2::new(8, 0),
            IVec2::new(8, 8),
            IVec2::new(0, 8),
            IVec2::new(4, 4),
        ];
        let tri = Triangulation::new(&points);
        let mut map = Map::new(10, 10).unwrap();
        for i in 1..8 {
            map.set(i, i, Tile::Water);
        }
        let dry = shortest_path(&tri, 0, 2, EdgeCost::AvoidWater { penalty: 100 }, &map);
        assert!(!dry.contains(&4), "route {dry:?} crosses water");
        assert_eq!(dry.len(), 3);
    }

    #[test]
    fn test_edge_cost_serde() {
        let json = serde_json::to_string(&EdgeCost::AvoidWater { penalty: 7 }).unwrap();
        assert_eq!(json, r#"{"kind":"avoid_water","penalty":7}"#);
        let back: EdgeCost = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EdgeCost::AvoidWater { penalty: 7 });
    }
}
