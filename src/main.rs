//! Pasture CLI - generate maps, render frames and walk the pasture.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Pasture - a top-down pixel-art sheep pasture
#[derive(Parser, Debug)]
#[command(name = "pasture")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a map and print it
    Generate {
        #[command(flatten)]
        map: cli::MapOptions,

        /// Output format: text, json, or ascii
        #[arg(short, long, default_value = "text")]
        format: cli::MapFormat,
    },

    /// Run the simulation headless and save a frame as PNG
    Render {
        #[command(flatten)]
        map: cli::MapOptions,

        #[command(flatten)]
        assets: cli::AssetOptions,

        /// Frames to simulate before saving (60 per second)
        #[arg(long, default_value = "60")]
        frames: u32,

        /// Frame size in pixels
        #[arg(long, default_value = "256x192", value_parser = cli::parse_view)]
        view: (u32, u32),

        /// Directions to hold while simulating
        #[arg(long, value_delimiter = ',')]
        walk: Vec<cli::render::Heading>,

        /// Output PNG file
        #[arg(short, long, default_value = "pasture.png")]
        output: PathBuf,
    },

    /// Interactive TUI to walk the pasture
    Watch {
        #[command(flatten)]
        map: cli::MapOptions,

        #[command(flatten)]
        assets: cli::AssetOptions,

        /// Frame size in pixels (default: fit the terminal)
        #[arg(long, value_parser = cli::parse_view)]
        view: Option<(u32, u32)>,

        /// Target frames per second
        #[arg(long, default_value = "30")]
        fps: u32,
    },

    /// Generate many maps in parallel and aggregate statistics
    Survey {
        /// Number of maps to generate
        #[arg(short = 'n', long, default_value = "1000")]
        maps: u64,

        /// Starting seed (increments for each map)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Parallel threads (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::SurveyFormat,

        /// Map width in tiles
        #[arg(long, default_value = "128")]
        width: i32,

        /// Map height in tiles
        #[arg(long, default_value = "128")]
        height: i32,
    },
}

/// Log to stderr so stdout stays clean for map and survey output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    let result = match args.command {
        Commands::Generate { map, format } => cli::generate::execute(&map, format),

        Commands::Render {
            map,
            assets,
            frames,
            view,
            walk,
            output,
        } => cli::render::execute(&map, &assets, frames, view, &walk, &output),

        Commands::Watch {
            map,
            assets,
            view,
            fps,
        } => cli::watch::execute(&map, &assets, view, fps),

        Commands::Survey {
            maps,
            seed,
            threads,
            progress,
            format,
            width,
            height,
        } => cli::survey::execute(maps, seed, threads, progress, format, width, height),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_render_args() {
        let args = Args::try_parse_from([
            "pasture", "render", "--seed", "5", "--view", "64x48", "--walk", "left,up",
        ])
        .unwrap();
        let Commands::Render { map, view, walk, .. } = args.command else {
            panic!("expected render");
        };
        assert_eq!(map.seed, Some(5));
        assert_eq!(view, (64, 48));
        assert_eq!(walk, [cli::render::Heading::Left, cli::render::Heading::Up]);
    }
}
