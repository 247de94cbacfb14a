//! Terrain kinds.

use serde::{Deserialize, Serialize};

/// Terrain occupying one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Tile {
    /// Bare ground. Also what every out-of-bounds read returns.
    #[default]
    Ground = 0,
    /// Pasture grass that sheep graze on.
    Grass = 1,
    /// Trodden footpath.
    Path = 2,
    /// Dry-stone wall. Blocks everything.
    Wall = 3,
    /// A tree. Only its trunk blocks the player.
    Tree = 4,
    /// Stream water. Blocks everything.
    Water = 5,
    /// A bridge or stepping stones over water.
    Crossing = 6,
}

impl Tile {
    /// Every tile kind, in discriminant order.
    pub const ALL: [Tile; 7] = [
        Tile::Ground,
        Tile::Grass,
        Tile::Path,
        Tile::Wall,
        Tile::Tree,
        Tile::Water,
        Tile::Crossing,
    ];

    /// Whether movers are pushed out of this tile's full 8×8 box.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        matches!(self, Tile::Wall | Tile::Water)
    }

    /// Index into per-kind tables such as [`Tile::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Single-character glyph used by the ASCII dump.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Tile::Ground => '.',
            Tile::Grass => '"',
            Tile::Path => ':',
            Tile::Wall => '#',
            Tile::Tree => 'T',
            Tile::Water => '~',
            Tile::Crossing => '=',
        }
    }

    /// Lower-case name, matching the serde representation.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Tile::Ground => "ground",
            Tile::Grass => "grass",
            Tile::Path => "path",
            Tile::Wall => "wall",
            Tile::Tree => "tree",
            Tile::Water => "water",
            Tile::Crossing => "crossing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_tiles() {
        assert!(Tile::Wall.is_solid());
        assert!(Tile::Water.is_solid());
        assert!(!Tile::Crossing.is_solid());
        assert!(!Tile::Tree.is_solid());
        assert!(!Tile::Grass.is_solid());
    }

    #[test]
    fn test_index_matches_all() {
        for (i, tile) in Tile::ALL.iter().enumerate() {
            assert_eq!(tile.index(), i);
        }
    }

    #[test]
    fn test_default_is_ground() {
        assert_eq!(Tile::default(), Tile::Ground);
    }
}
