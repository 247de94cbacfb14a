//! The walled paddock around the player start.

use std::ops::RangeInclusive;

use glam::IVec2;
use rand::Rng;

use crate::geom::dist_sq_i;
use crate::world::{Map, Paddock, Tile};

/// Half-width range of the paddock, in tiles.
pub const HALF_WIDTH: RangeInclusive<i32> = 8..=12;

/// Half-height range of the paddock, in tiles.
pub const HALF_HEIGHT: RangeInclusive<i32> = 5..=8;

/// Build a paddock centered on `center` and return its rectangle.
///
/// Interior cells become Grass and the outline becomes Wall. A point picked
/// uniformly on the outline then knocks out every outline cell within
/// `opening_radius` of it, back to Ground. The rectangle is clipped to the
/// grid, and `center` is clamped into it first.
pub(crate) fn build(map: &mut Map, center: IVec2, opening_radius: i32, rng: &mut impl Rng) -> Paddock {
    let limit = IVec2::new(map.width() - 1, map.height() - 1);
    let center = center.clamp(IVec2::ZERO, limit);
    let half = IVec2::new(rng.gen_range(HALF_WIDTH), rng.gen_range(HALF_HEIGHT));

    let paddock = Paddock {
        min: (center - half).max(IVec2::ZERO),
        max: (center + half).min(limit),
    };

    let mut outline = Vec::new();
    for y in paddock.min.y..=paddock.max.y {
        for x in paddock.min.x..=paddock.max.x {
            let p = IVec2::new(x, y);
            if paddock.on_perimeter(p) {
                map.set(x, y, Tile::Wall);
                outline.push(p);
            } else {
                map.set(x, y, Tile::Grass);
            }
        }
    }

    let door = outline[rng.gen_range(0..outline.len())];
    let r_sq = i64::from(opening_radius) * i64::from(opening_radius);
    for p in outline {
        if dist_sq_i(p, door) <= r_sq {
            map.set(p.x, p.y, Tile::Ground);
        }
    }

    paddock
}
