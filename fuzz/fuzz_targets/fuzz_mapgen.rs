#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pasture::{GeneratorConfig, Tile, generate_seeded};

/// Structured input for generator fuzzing.
#[derive(Arbitrary, Debug)]
struct MapInput {
    /// Map width (capped).
    width: u8,
    /// Map height (capped).
    height: u8,
    /// RNG seed.
    seed: u64,
    /// Stream chance, any value including NaN.
    stream_chance: f64,
    /// Wall density bounds, in any order.
    wall_density: (f64, f64),
    /// Footpaths to tread (capped).
    footpaths: u8,
    /// Whether to build the paddock.
    paddock: bool,
}

fuzz_target!(|input: MapInput| {
    let config = GeneratorConfig {
        candidate_points: 200,
        stream_chance: input.stream_chance,
        wall_density: input.wall_density,
        footpaths: usize::from(input.footpaths % 4),
        paddock: input.paddock,
        ..GeneratorConfig::default()
    };
    let (w, h) = (i32::from(input.width % 96), i32::from(input.height % 96));

    let Some(map) = generate_seeded(w, h, &config, input.seed) else {
        assert!(w == 0 || h == 0);
        return;
    };
    let world = map.world_size();
    assert!(map.start.x >= 0.0 && map.start.x < world.x);
    assert!(map.start.y >= 0.0 && map.start.y < world.y);
    assert!(map.sheep_spawns.len() <= config.sheep_count);
    for spawn in &map.sheep_spawns {
        let t = pasture::Map::world_to_tile(*spawn);
        assert_ne!(map.get(t.x, t.y), Tile::Wall);
    }
});
