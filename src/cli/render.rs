//! Render command implementation: run the simulation headless and save the
//! last frame as a PNG.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use glam::UVec2;
use image::ImageError;
use pasture::{FrameSink, MoveInput, Renderer, SimConfig, Simulation};
use tracing::{debug, info};

use super::{AssetOptions, CliError, MapOptions};

/// Fixed simulation step.
const FRAME_DT: f32 = 1.0 / 60.0;

/// A direction the player holds while rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Heading {
    /// Hold left.
    Left,
    /// Hold right.
    Right,
    /// Hold up.
    Up,
    /// Hold down.
    Down,
}

/// Movement input for a set of held directions.
fn held_input(walk: &[Heading]) -> MoveInput {
    let held = |h| walk.contains(&h);
    MoveInput::from_keys(
        held(Heading::Left),
        held(Heading::Right),
        held(Heading::Up),
        held(Heading::Down),
    )
}

/// Writes each presented frame to a PNG file.
#[derive(Debug)]
pub(crate) struct PngSink {
    path: PathBuf,
}

impl PngSink {
    pub(crate) fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl FrameSink for PngSink {
    type Error = ImageError;

    fn present(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<(), ImageError> {
        image::save_buffer(&self.path, rgba, width, height, image::ColorType::Rgba8)
    }
}

/// Execute the render command.
///
/// # Errors
///
/// Returns an error if the map cannot be generated, an atlas fails to load,
/// a sprite is missing from the atlas, or the PNG cannot be written.
pub(crate) fn execute(
    map: &MapOptions,
    assets: &AssetOptions,
    frames: u32,
    view: (u32, u32),
    walk: &[Heading],
    output: &Path,
) -> Result<(), CliError> {
    let (map, seed) = map.generate()?;
    let mut sim = Simulation::new(map, SimConfig::default(), seed);

    let (width, height) = view;
    let mut renderer = Renderer::new(width, height);
    assets.attach(&mut renderer)?;
    renderer.set_clear_color(sim.palette_for(&renderer).timberwolf);

    let input = held_input(walk);
    let viewport = UVec2::new(width, height);
    for _ in 0..frames {
        sim.update(FRAME_DT, input, viewport);
    }
    debug!(
        frames,
        player_x = sim.player().pos.x,
        player_y = sim.player().pos.y,
        "simulation advanced"
    );

    renderer.clear();
    sim.draw(&mut renderer)?;
    renderer.update(&mut PngSink::new(output))?;
    info!(path = %output.display(), width, height, "frame saved");

    Ok(())
}
