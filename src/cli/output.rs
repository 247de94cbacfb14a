//! Output formatting utilities for CLI.

// Averages over map counts
#![allow(clippy::cast_precision_loss)]

use std::collections::BTreeMap;
use std::fmt::Write as _;

use pasture::{Map, Tile};
use serde::Serialize;

/// JSON-serializable generated map.
#[derive(Debug, Serialize)]
pub(super) struct JsonMap {
    /// Random seed used.
    pub(super) seed: u64,
    /// Width in tiles.
    pub(super) width: i32,
    /// Height in tiles.
    pub(super) height: i32,
    /// Player start in world units.
    pub(super) start: [f32; 2],
    /// Paddock corners in tiles, inclusive (null if none).
    pub(super) paddock: Option<[[i32; 2]; 2]>,
    /// Sheep spawn points in world units.
    pub(super) sheep: Vec<[f32; 2]>,
    /// Number of tiles of each kind.
    pub(super) tiles: BTreeMap<&'static str, usize>,
    /// One string per row, one character per tile.
    pub(super) rows: Vec<String>,
}

impl JsonMap {
    /// Create from a generated map.
    pub(super) fn from_map(map: &Map, seed: u64) -> Self {
        Self {
            seed,
            width: map.width(),
            height: map.height(),
            start: map.start.to_array(),
            paddock: map
                .paddock
                .map(|p| [p.min.to_array(), p.max.to_array()]),
            sheep: map.sheep_spawns.iter().map(|s| s.to_array()).collect(),
            tiles: tile_counts(map),
            rows: map.render_ascii().lines().map(str::to_string).collect(),
        }
    }
}

fn tile_counts(map: &Map) -> BTreeMap<&'static str, usize> {
    let counts = map.tile_counts();
    Tile::ALL
        .iter()
        .map(|t| (t.name(), counts[t.index()]))
        .collect()
}

/// Format a map summary as human-readable text.
pub(super) fn format_map_text(map: &Map, seed: u64) -> String {
    let mut output = String::new();
    let total = map.tiles().len().max(1) as f64;

    let _ = writeln!(output, "Map {}x{} (seed: {seed})", map.width(), map.height());
    let _ = writeln!(output, "  Start: ({:.0}, {:.0})", map.start.x, map.start.y);
    match map.paddock {
        Some(p) => {
            let _ = writeln!(
                output,
                "  Paddock: ({}, {}) to ({}, {})",
                p.min.x, p.min.y, p.max.x, p.max.y
            );
        }
        None => output.push_str("  Paddock: none\n"),
    }
    let _ = writeln!(output, "  Sheep: {}", map.sheep_spawns.len());
    output.push_str("  Tiles:\n");
    for (name, count) in tile_counts(map) {
        let _ = writeln!(
            output,
            "    {name:<9} {count:>6} ({:.1}%)",
            count as f64 / total * 100.0
        );
    }
    output
}

/// Aggregated statistics over many generated maps.
#[derive(Debug, Default, Clone)]
pub(super) struct SurveyStats {
    /// Maps generated.
    pub(super) maps: u64,
    /// Tiles of each kind, summed over all maps.
    tiles: [u64; Tile::ALL.len()],
    /// Total tiles over all maps.
    total_tiles: u64,
    /// Sheep spawns over all maps.
    sheep: u64,
    /// Maps with any water.
    streams: u64,
    /// Maps with a paddock.
    paddocks: u64,
    /// Smallest and largest grass share seen.
    grass_range: Option<(f64, f64)>,
}

impl SurveyStats {
    /// Add one map to the stats.
    pub(super) fn add_map(&mut self, map: &Map) {
        let counts = map.tile_counts();
        let total = map.tiles().len() as u64;
        self.maps += 1;
        self.total_tiles += total;
        for (sum, &n) in self.tiles.iter_mut().zip(&counts) {
            *sum += n as u64;
        }
        self.sheep += map.sheep_spawns.len() as u64;
        if counts[Tile::Water.index()] > 0 {
            self.streams += 1;
        }
        if map.paddock.is_some() {
            self.paddocks += 1;
        }

        let grass = counts[Tile::Grass.index()] as f64 / total.max(1) as f64;
        self.grass_range = Some(match self.grass_range {
            Some((lo, hi)) => (lo.min(grass), hi.max(grass)),
            None => (grass, grass),
        });
    }

    /// Merge another set of stats into this one.
    pub(super) fn merge(&mut self, other: &SurveyStats) {
        self.maps += other.maps;
        self.total_tiles += other.total_tiles;
        for (a, b) in self.tiles.iter_mut().zip(&other.tiles) {
            *a += b;
        }
        self.sheep += other.sheep;
        self.streams += other.streams;
        self.paddocks += other.paddocks;
        self.grass_range = match (self.grass_range, other.grass_range) {
            (Some((a, b)), Some((c, d))) => Some((a.min(c), b.max(d))),
            (a, b) => a.or(b),
        };
    }

    /// Share of all tiles that are of `tile` (0.0-1.0).
    pub(super) fn tile_share(&self, tile: Tile) -> f64 {
        if self.total_tiles == 0 {
            return 0.0;
        }
        self.tiles[tile.index()] as f64 / self.total_tiles as f64
    }

    /// Fraction of maps matching a count (0.0-1.0).
    fn rate(&self, n: u64) -> f64 {
        if self.maps == 0 {
            return 0.0;
        }
        n as f64 / self.maps as f64
    }

    /// Average sheep per map.
    pub(super) fn avg_sheep(&self) -> f64 {
        self.rate(self.sheep)
    }
}

/// JSON-serializable survey result.
#[derive(Debug, Serialize)]
pub(super) struct JsonSurvey {
    /// Maps generated.
    maps: u64,
    /// Share of tiles per kind.
    tile_share: BTreeMap<&'static str, f64>,
    /// Average sheep per map.
    avg_sheep: f64,
    /// Fraction of maps with a stream.
    stream_rate: f64,
    /// Fraction of maps with a paddock.
    paddock_rate: f64,
    /// Smallest grass share seen.
    min_grass: f64,
    /// Largest grass share seen.
    max_grass: f64,
}

impl JsonSurvey {
    /// Create from stats.
    pub(super) fn from_stats(stats: &SurveyStats) -> Self {
        let (min_grass, max_grass) = stats.grass_range.unwrap_or_default();
        Self {
            maps: stats.maps,
            tile_share: Tile::ALL
                .iter()
                .map(|&t| (t.name(), stats.tile_share(t)))
                .collect(),
            avg_sheep: stats.avg_sheep(),
            stream_rate: stats.rate(stats.streams),
            paddock_rate: stats.rate(stats.paddocks),
            min_grass,
            max_grass,
        }
    }
}

/// Format survey stats as human-readable text.
pub(super) fn format_survey_text(stats: &SurveyStats) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Survey Results ({} maps)", stats.maps);
    output.push_str("========================================\n\n");

    output.push_str("Tile Share:\n");
    for &tile in &Tile::ALL {
        let _ = writeln!(output, "  {:<9} {:5.1}%", tile.name(), stats.tile_share(tile) * 100.0);
    }

    let (lo, hi) = stats.grass_range.unwrap_or_default();
    let _ = writeln!(
        output,
        "\nGrass per map: {:.1}% to {:.1}%",
        lo * 100.0,
        hi * 100.0
    );
    let _ = writeln!(output, "Maps with a stream: {:.1}%", stats.rate(stats.streams) * 100.0);
    let _ = writeln!(output, "Maps with a paddock: {:.1}%", stats.rate(stats.paddocks) * 100.0);
    let _ = writeln!(output, "Average sheep: {:.1}", stats.avg_sheep());

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pasture::{GeneratorConfig, generate_seeded};

    fn map(seed: u64) -> Map {
        generate_seeded(40, 40, &GeneratorConfig::default(), seed).unwrap()
    }

    #[test]
    fn test_json_map_shape() {
        let m = map(1);
        let json = JsonMap::from_map(&m, 1);
        assert_eq!(json.rows.len(), 40);
        assert!(json.rows.iter().all(|r| r.chars().count() == 40));
        assert_eq!(json.tiles.values().sum::<usize>(), 1600);
        let text = serde_json::to_string(&json).unwrap();
        assert!(text.contains("\"seed\":1"));
    }

    #[test]
    fn test_merge_matches_sequential() {
        let maps: Vec<Map> = (0..4).map(map).collect();
        let mut all = SurveyStats::default();
        for m in &maps {
            all.add_map(m);
        }

        let mut left = SurveyStats::default();
        let mut right = SurveyStats::default();
        left.add_map(&maps[0]);
        left.add_map(&maps[1]);
        right.add_map(&maps[2]);
        right.add_map(&maps[3]);
        left.merge(&right);

        assert_eq!(left.maps, 4);
        assert_eq!(left.tiles, all.tiles);
        assert_eq!(left.sheep, all.sheep);
        assert_eq!(left.grass_range, all.grass_range);
        let shares: f64 = Tile::ALL.iter().map(|&t| left.tile_share(t)).sum();
        assert!((shares - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_stats() {
        let stats = SurveyStats::default();
        assert!(stats.avg_sheep().abs() < f64::EPSILON);
        let text = format_survey_text(&stats);
        assert!(text.contains("0 maps"));
    }

    #[test]
    fn test_text_summary() {
        let text = format_map_text(&map(2), 2);
        assert!(text.contains("seed: 2"));
        assert!(text.contains("grass"));
    }
}
