// TOML presets; any field left out keeps its default

use std::path::{Path, PathBuf};
use thiserror::Error;

use super::params::StadiumParams;

#[derive(Error, Debug)]
pub enum PresetError {
    #[error("could not read preset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid preset: {0}")]
    Parse(#[from] toml::de::Error),
}

pub fn parse_preset(text: &str) -> Result<StadiumParams, PresetError> {
    Ok(toml::from_str(text)?)
}

pub fn load_preset(path: impl AsRef<Path>) -> Result<StadiumParams, PresetError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| PresetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_preset(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::stadium::params::{RoofMode, Sport, TimeOfDay};

    #[test]
    fn partial_preset_keeps_defaults() {
        let params = parse_preset(
            r#"
            sport = "cricket"

            [stands]
            num_tiers = 2
            color = [200, 10, 10]

            [roof]
            mode = "overall"

            [floodlights]
            time_of_day = "night"
            "#,
        )
        .unwrap();

        let defaults = StadiumParams::default();
        assert_eq!(params.sport, Sport::Cricket);
        assert_eq!(params.stands.num_tiers, 2);
        assert_eq!(params.stands.color, [200, 10, 10]);
        assert_eq!(params.stands.tiers, defaults.stands.tiers);
        assert_eq!(params.roof.mode, RoofMode::Overall);
        assert_eq!(params.floodlights.time_of_day, TimeOfDay::Night);
        assert_eq!(params.pitch, defaults.pitch);
    }

    #[test]
    fn empty_preset_is_the_default() {
        assert_eq!(parse_preset("").unwrap(), StadiumParams::default());
    }

    #[test]
    fn bad_values_are_parse_errors() {
        assert!(matches!(parse_preset("sport = \"hockey\""), Err(PresetError::Parse(_))));
        assert!(matches!(parse_preset("[pitch]\nlength = \"long\""), Err(PresetError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_preset("no/such/preset.toml").unwrap_err();
        assert!(matches!(err, PresetError::Io { .. }));
        assert!(err.to_string().contains("no/such/preset.toml"));
    }
}
