//! Grass spreading cellular automaton.

// Neighbor counts are at most 8
#![allow(clippy::cast_precision_loss)]

use glam::IVec2;
use rand::Rng;

use crate::world::{Map, Tile};

/// Chance per grassy neighbor that a Ground cell turns to Grass in one round.
pub(crate) const SPREAD_PER_NEIGHBOR: f64 = 0.5;

/// Number of in-bounds 8-connected neighbors of `(x, y)` that are Grass.
#[must_use]
pub fn grass_neighbors(map: &Map, x: i32, y: i32) -> usize {
    let mut n = 0;
    for dy in -1..=1 {
        for dx in -1..=1 {
            if (dx, dy) != (0, 0) && map.get(x + dx, y + dy) == Tile::Grass {
                n += 1;
            }
        }
    }
    n
}

/// Run `rounds` of growth. Each round decides every cell against the map as
/// it was when the round started, then applies all conversions together.
///
/// Only Ground converts, and Grass never reverts.
pub fn grow(map: &mut Map, rounds: usize, rng: &mut impl Rng) {
    for _ in 0..rounds {
        let mut grown: Vec<IVec2> = Vec::new();
        for y in 0..map.height() {
            for x in 0..map.width() {
                if map.get(x, y) != Tile::Ground {
                    continue;
                }
                let n = grass_neighbors(map, x, y);
                if n > 0 && rng.gen_bool((n as f64 * SPREAD_PER_NEIGHBOR).min(1.0)) {
                    grown.push(IVec2::new(x, y));
                }
            }
        }

        if grown.is_empty() {
            break;
        }
        for p in grown {
            map.set(p.x, p.y, Tile::Grass);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_neighbors_out_of_bounds_ignored() {
        let mut map = Map::new(3, 3).unwrap();
        map.set(1, 0, Tile::Grass);
        map.set(0, 1, Tile::Grass);
        map.set(1, 1, Tile::Grass);
        assert_eq!(grass_neighbors(&map, 0, 0), 3);
        // The center cell itself is not counted
        assert_eq!(grass_neighbors(&map, 1, 1), 2);
    }

    #[test]
    fn test_no_seed_no_growth() {
        let mut map = Map::new(10, 10).unwrap();
        grow(&mut map, 6, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(map.count(Tile::Grass), 0);
    }

    #[test]
    fn test_growth_is_monotonic_and_ground_only() {
        let mut map = Map::new(16, 16).unwrap();
        map.set(8, 8, Tile::Grass);
        map.set_line(IVec2::new(0, 5), IVec2::new(15, 5), Tile::Wall);
        let walls = map.count(Tile::Wall);

        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut last = map.count(Tile::Grass);
        for _ in 0..4 {
            grow(&mut map, 1, &mut rng);
            let now = map.count(Tile::Grass);
            assert!(now >= last);
            last = now;
        }
        assert_eq!(map.get(8, 8), Tile::Grass);
        assert_eq!(map.count(Tile::Wall), walls);
        assert!(last > 1);
    }

    #[test]
    fn test_one_round_reaches_only_direct_neighbors() {
        let mut map = Map::new(9, 9).unwrap();
        map.set(4, 4, Tile::Grass);
        grow(&mut map, 1, &mut ChaCha8Rng::seed_from_u64(5));
        for (p, tile) in map.iter() {
            if tile == Tile::Grass {
                assert!((p - IVec2::new(4, 4)).abs().max_element() <= 1);
            }
        }
    }
}
