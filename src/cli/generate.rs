//! Generate command implementation.

use super::output::{JsonMap, format_map_text};
use super::{CliError, MapFormat, MapOptions};

/// Execute the generate command.
///
/// # Errors
///
/// Returns an error if the settings file cannot be read or the map size is
/// not positive.
pub(crate) fn execute(map: &MapOptions, format: MapFormat) -> Result<(), CliError> {
    let (map, seed) = map.generate()?;

    match format {
        MapFormat::Text => {
            print!("{}", format_map_text(&map, seed));
            println!();
            print!("{}", map.render_ascii());
        }
        MapFormat::Json => {
            let json = JsonMap::from_map(&map, seed);
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        MapFormat::Ascii => {
            print!("{}", map.render_ascii());
        }
    }

    Ok(())
}
