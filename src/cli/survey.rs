//! Survey command implementation: generate many maps in parallel and
//! aggregate what they contain.

// Maps per second
#![allow(clippy::cast_precision_loss)]

use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use pasture::{GeneratorConfig, generate_seeded};
use rayon::prelude::*;
use tracing::{info, warn};

use super::output::{JsonSurvey, SurveyStats, format_survey_text};
use super::{CliError, SurveyFormat, resolve_seed};

/// Execute the survey command.
///
/// # Errors
///
/// Returns an error if the map size is not positive or the output cannot be
/// serialized.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    maps: u64,
    seed: Option<u64>,
    threads: Option<usize>,
    progress: bool,
    format: SurveyFormat,
    width: i32,
    height: i32,
) -> Result<(), CliError> {
    if width <= 0 || height <= 0 {
        return Err(CliError::new(format!(
            "Invalid map size {width}x{height}: both sides must be positive"
        )));
    }

    // Set thread pool size if specified
    if let Some(num_threads) = threads {
        if rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .is_err()
        {
            warn!("thread pool already initialized");
        }
    }

    let base_seed = resolve_seed(seed);
    let config = GeneratorConfig::default();

    let pb = if progress {
        let pb = ProgressBar::new(maps);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} maps ({per_sec})")
                .map_err(|e| CliError::new(format!("Bad progress template: {e}")))?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();

    // Each thread folds into its own stats; merged once at the end
    let stats = (0..maps)
        .into_par_iter()
        .fold(SurveyStats::default, |mut local, i| {
            if let Some(map) = generate_seeded(width, height, &config, base_seed.wrapping_add(i)) {
                local.add_map(&map);
            }
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            local
        })
        .reduce(SurveyStats::default, |mut a, b| {
            a.merge(&b);
            a
        });

    if let Some(pb) = pb {
        pb.finish_with_message("done");
    }

    let duration = start.elapsed();
    let maps_per_sec = if duration.as_secs_f64() > 0.0 {
        stats.maps as f64 / duration.as_secs_f64()
    } else {
        0.0
    };
    info!(
        maps = stats.maps,
        base_seed,
        secs = duration.as_secs_f64(),
        "survey finished"
    );

    match format {
        SurveyFormat::Text => {
            print!("{}", format_survey_text(&stats));
            println!();
            println!(
                "Duration: {:.2}s ({maps_per_sec:.0} maps/sec)",
                duration.as_secs_f64()
            );
        }
        SurveyFormat::Json => {
            let json = JsonSurvey::from_stats(&stats);
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_map() {
        assert!(execute(1, Some(1), None, false, SurveyFormat::Json, 0, 10).is_err());
    }

    #[test]
    fn test_small_survey_runs() {
        assert!(execute(3, Some(7), None, false, SurveyFormat::Json, 24, 24).is_ok());
    }
}
