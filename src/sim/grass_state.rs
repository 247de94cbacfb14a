//! Short-lived per-tile grass state: trampled stalks and munched tiles.
//!
//! Entries are keyed by a stable spatial key and count down to zero. The
//! cache has a hard size cap. Inserting into a full cache evicts the entry
//! closest to expiring.

use std::collections::HashMap;

use glam::{IVec2, Vec2};

use crate::world::Map;

/// Maximum number of live entries.
pub const GRASS_CACHE_CAPACITY: usize = 4096;

/// How long a munched tile stays bare, in seconds.
pub const MUNCH_SECONDS: f32 = 30.0;

/// Stalk slot reserved for whole-tile entries.
const TILE_SLOT: u16 = u16::MAX;

/// Pack a tile coordinate and stalk slot into one key.
///
/// The low 24 bits of each coordinate are kept, which is plenty for any map
/// that fits in memory.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub const fn spatial_key(tile: IVec2, stalk: u16) -> u64 {
    let x = (tile.x as u32 & 0x00FF_FFFF) as u64;
    let y = (tile.y as u32 & 0x00FF_FFFF) as u64;
    (x << 40) | (y << 16) | stalk as u64
}

/// Expiring trample and munch timers.
#[derive(Debug, Clone)]
pub struct GrassState {
    timers: HashMap<u64, f32>,
    capacity: usize,
}

impl Default for GrassState {
    fn default() -> Self {
        Self::with_capacity(GRASS_CACHE_CAPACITY)
    }
}

impl GrassState {
    /// Empty cache holding at most `capacity` entries (at least one).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            timers: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Count every timer down by `dt` and drop the expired ones.
    pub fn update(&mut self, dt: f32) {
        self.timers.retain(|_, left| {
            *left -= dt;
            *left > 0.0
        });
    }

    fn insert(&mut self, key: u64, seconds: f32) {
        if seconds <= 0.0 {
            return;
        }
        if self.timers.len() >= self.capacity && !self.timers.contains_key(&key) {
            let soonest = self
                .timers
                .iter()
                // Ties go to the lowest key so eviction is reproducible
                .min_by(|a, b| a.1.total_cmp(b.1).then(a.0.cmp(b.0)))
                .map(|(k, _)| *k);
            if let Some(k) = soonest {
                self.timers.remove(&k);
            }
        }
        self.timers.insert(key, seconds);
    }

    /// Flatten one stalk of a tile for `seconds`.
    pub fn trample(&mut self, tile: IVec2, stalk: u16, seconds: f32) {
        self.insert(spatial_key(tile, stalk), seconds);
    }

    /// Whether a stalk is currently flattened.
    #[must_use]
    pub fn is_trampled(&self, tile: IVec2, stalk: u16) -> bool {
        self.timers.contains_key(&spatial_key(tile, stalk))
    }

    /// Mark the tile under a world position as eaten.
    pub fn munch(&mut self, pos: Vec2) {
        self.insert(spatial_key(Map::world_to_tile(pos), TILE_SLOT), MUNCH_SECONDS);
    }

    /// Whether the tile under a world position has been eaten recently.
    #[must_use]
    pub fn is_munched(&self, pos: Vec2) -> bool {
        self.is_tile_munched(Map::world_to_tile(pos))
    }

    /// Whether a tile has been eaten recently.
    #[must_use]
    pub fn is_tile_munched(&self, tile: IVec2) -> bool {
        self.timers.contains_key(&spatial_key(tile, TILE_SLOT))
    }

    /// Number of live entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Whether nothing is trampled or munched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Maximum number of live entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_distinguish_neighbors_and_slots() {
        let a = spatial_key(IVec2::new(3, 4), 0);
        assert_ne!(a, spatial_key(IVec2::new(4, 3), 0));
        assert_ne!(a, spatial_key(IVec2::new(3, 4), 1));
        assert_ne!(a, spatial_key(IVec2::new(3, 4), TILE_SLOT));
    }

    #[test]
    fn test_trample_expires() {
        let mut grass = GrassState::default();
        let tile = IVec2::new(1, 1);
        grass.trample(tile, 2, 1.5);
        assert!(grass.is_trampled(tile, 2));
        assert!(!grass.is_trampled(tile, 3));
        grass.update(1.0);
        assert!(grass.is_trampled(tile, 2));
        grass.update(1.0);
        assert!(!grass.is_trampled(tile, 2));
        assert!(grass.is_empty());
    }

    #[test]
    fn test_munch_by_world_position() {
        let mut grass = GrassState::default();
        grass.munch(Vec2::new(17.0, 9.5));
        assert!(grass.is_tile_munched(IVec2::new(2, 1)));
        assert!(grass.is_munched(Vec2::new(23.9, 15.9)));
        assert!(!grass.is_munched(Vec2::new(24.0, 9.0)));
        grass.update(MUNCH_SECONDS);
        assert!(!grass.is_tile_munched(IVec2::new(2, 1)));
    }

    #[test]
    fn test_capacity_evicts_soonest() {
        let mut grass = GrassState::with_capacity(3);
        let tile = IVec2::ZERO;
        grass.trample(tile, 0, 5.0);
        grass.trample(tile, 1, 1.0);
        grass.trample(tile, 2, 3.0);
        grass.trample(tile, 3, 4.0);
        assert_eq!(grass.len(), 3);
        assert!(!grass.is_trampled(tile, 1));
        assert!(grass.is_trampled(tile, 0));
        assert!(grass.is_trampled(tile, 3));
    }

    #[test]
    fn test_eviction_ties_break_on_key() {
        // Same timer everywhere: the lowest key always goes first
        for order in [[0, 1, 2], [2, 1, 0], [1, 2, 0]] {
            let mut grass = GrassState::with_capacity(3);
            for x in order {
                grass.trample(IVec2::new(x, 0), 0, 2.0);
            }
            grass.trample(IVec2::new(9, 0), 0, 2.0);
            assert!(!grass.is_trampled(IVec2::new(0, 0), 0), "order {order:?}");
            assert!(grass.is_trampled(IVec2::new(1, 0), 0));
            assert!(grass.is_trampled(IVec2::new(2, 0), 0));
            assert!(grass.is_trampled(IVec2::new(9, 0), 0));
        }
    }

    #[test]
    fn test_refresh_does_not_evict() {
        let mut grass = GrassState::with_capacity(2);
        let tile = IVec2::ZERO;
        grass.trample(tile, 0, 1.0);
        grass.trample(tile, 1, 1.0);
        grass.trample(tile, 0, 9.0);
        assert!(grass.is_trampled(tile, 1));
        assert_eq!(grass.len(), 2);
    }
}
