//! CLI command implementations for Pasture.

pub(crate) mod generate;
pub(crate) mod render;
pub(crate) mod survey;
pub(crate) mod watch;

mod output;

use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use clap::ValueEnum;
use pasture::mapgen::EdgeCost;
use pasture::render::{FontAtlas, Renderer, SpriteAtlas};
use pasture::{AssetError, GeneratorConfig, Map, generate_seeded};
use tracing::info;

/// Output format for the `generate` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum MapFormat {
    /// Summary followed by the ASCII map.
    Text,
    /// Machine-readable JSON output.
    Json,
    /// Just the ASCII map.
    Ascii,
}

/// Output format for the `survey` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SurveyFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Options shared by every command that generates a map.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct MapOptions {
    /// Map width in tiles
    #[arg(long, default_value = "128")]
    pub(crate) width: i32,

    /// Map height in tiles
    #[arg(long, default_value = "128")]
    pub(crate) height: i32,

    /// Random seed (default: random)
    #[arg(short, long)]
    pub(crate) seed: Option<u64>,

    /// Number of footpaths trodden out from the start
    #[arg(long, default_value = "0")]
    pub(crate) footpaths: usize,

    /// Route the stream around existing water
    #[arg(long)]
    pub(crate) avoid_water: bool,

    /// Load generator settings from a JSON file; flags override it
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
}

impl MapOptions {
    /// Generator settings with the command-line overrides applied.
    pub(crate) fn generator_config(&self) -> Result<GeneratorConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|e| {
                    CliError::new(format!("Failed to read {}: {e}", path.display()))
                })?;
                serde_json::from_str(&text)?
            }
            None => GeneratorConfig::default(),
        };
        if self.footpaths > 0 {
            config.footpaths = self.footpaths;
        }
        if self.avoid_water {
            config.stream_cost = EdgeCost::AvoidWater { penalty: 100 };
        }
        Ok(config)
    }

    /// Generate the map, returning it with the seed that produced it.
    pub(crate) fn generate(&self) -> Result<(Map, u64), CliError> {
        let seed = resolve_seed(self.seed);
        let config = self.generator_config()?;
        let map = generate_seeded(self.width, self.height, &config, seed).ok_or_else(|| {
            CliError::new(format!(
                "Invalid map size {}x{}: both sides must be positive",
                self.width, self.height
            ))
        })?;
        info!(seed, width = self.width, height = self.height, "generated map");
        Ok((map, seed))
    }
}

/// Sprite and font atlas files.
#[derive(Debug, Clone, Default, clap::Args)]
pub(crate) struct AssetOptions {
    /// Sprite sheet PNG
    #[arg(long)]
    pub(crate) sprites: Option<PathBuf>,

    /// Sprite metadata JSON (default: next to the PNG)
    #[arg(long)]
    pub(crate) sprites_meta: Option<PathBuf>,

    /// Font sheet PNG
    #[arg(long)]
    pub(crate) font: Option<PathBuf>,

    /// Font metadata JSON (default: next to the PNG)
    #[arg(long)]
    pub(crate) font_meta: Option<PathBuf>,
}

impl AssetOptions {
    /// Load whichever atlases were given and attach them to `renderer`.
    pub(crate) fn attach(&self, renderer: &mut Renderer) -> Result<(), CliError> {
        if let Some(png) = &self.sprites {
            let meta = self
                .sprites_meta
                .clone()
                .unwrap_or_else(|| png.with_extension("json"));
            let atlas = SpriteAtlas::load(png, &meta)?;
            renderer.set_sprites(Some(Arc::new(atlas)));
        }
        if let Some(png) = &self.font {
            let meta = self
                .font_meta
                .clone()
                .unwrap_or_else(|| png.with_extension("json"));
            let font = FontAtlas::load(png, &meta)?;
            renderer.set_font(Some(Arc::new(font)));
        }
        Ok(())
    }
}

/// Parse a `WIDTHxHEIGHT` view size.
pub(crate) fn parse_view(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("bad height: {e}"))?;
    if w == 0 || h == 0 {
        return Err("view sides must be positive".to_string());
    }
    Ok((w, h))
}

/// The given seed, or one taken from the clock.
pub(crate) fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_nanos() & u128::from(u64::MAX)).unwrap_or(42))
            .unwrap_or(42)
    })
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<AssetError> for CliError {
    fn from(e: AssetError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<image::ImageError> for CliError {
    fn from(e: image::ImageError) -> Self {
        Self::new(format!("Failed to write image: {e}"))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON error: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_view() {
        assert_eq!(parse_view("256x192"), Ok((256, 192)));
        assert_eq!(parse_view("64X48"), Ok((64, 48)));
        assert!(parse_view("256").is_err());
        assert!(parse_view("0x10").is_err());
        assert!(parse_view("ax10").is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let opts = MapOptions {
            width: 32,
            height: 32,
            seed: Some(1),
            footpaths: 2,
            avoid_water: true,
            config: None,
        };
        let config = opts.generator_config().unwrap();
        assert_eq!(config.footpaths, 2);
        assert_eq!(config.stream_cost, EdgeCost::AvoidWater { penalty: 100 });
    }

    #[test]
    fn test_rejects_empty_map() {
        let opts = MapOptions {
            width: 0,
            height: 32,
            seed: Some(1),
            footpaths: 0,
            avoid_water: false,
            config: None,
        };
        assert!(opts.generate().is_err());
    }
}
