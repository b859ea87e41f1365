use crate::error::HazeError;
use crate::standards::parse_standard_str;
use crate::standards::schema::IndexStandard;

const AQI_EPA_JSON: &str = include_str!("../../../../standards/aqi-epa.json");

/// Available predefined standards.
pub const PRESETS: &[&str] = &["aqi_epa"];

/// Preset used when neither a preset nor a standard file is given.
pub const DEFAULT_PRESET: &str = "aqi_epa";

/// Load a predefined standard by name.
pub fn load_preset(name: &str) -> Result<IndexStandard, HazeError> {
    match name {
        "aqi_epa" => parse_standard_str(AQI_EPA_JSON),
        _ => Err(HazeError::StandardInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pollutant;

    #[test]
    fn test_load_epa_preset() {
        let standard = load_preset("aqi_epa").unwrap();
        assert_eq!(standard.version, "2012");
        for p in Pollutant::ALL {
            assert!(standard.pollutant(p).is_some(), "missing {p}");
        }
    }

    #[test]
    fn test_every_preset_loads() {
        for name in PRESETS {
            assert!(load_preset(name).is_ok(), "preset {name} failed");
        }
        assert!(PRESETS.contains(&DEFAULT_PRESET));
    }

    #[test]
    fn test_unknown_preset() {
        assert!(load_preset("psi_2099").is_err());
    }
}
