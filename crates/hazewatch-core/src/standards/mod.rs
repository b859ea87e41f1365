pub mod builtin;
pub mod schema;

use crate::error::HazeError;
use rust_decimal::Decimal;
use schema::IndexStandard;
use std::collections::HashSet;
use std::path::Path;

/// Load an index standard from a JSON file.
pub fn load_standard(path: &Path) -> Result<IndexStandard, HazeError> {
    let content = std::fs::read_to_string(path).map_err(|e| HazeError::StandardLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_standard(&content, path)
}

/// Parse an index standard from a JSON string.
pub fn parse_standard(json: &str, source: &Path) -> Result<IndexStandard, HazeError> {
    let standard: IndexStandard =
        serde_json::from_str(json).map_err(|e| HazeError::StandardLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_standard(&standard)?;
    Ok(standard)
}

/// Parse an index standard from a JSON string (no file path context).
pub fn parse_standard_str(json: &str) -> Result<IndexStandard, HazeError> {
    let standard: IndexStandard = serde_json::from_str(json).map_err(HazeError::Json)?;
    validate_standard(&standard)?;
    Ok(standard)
}

/// Validate that a standard is well-formed.
///
/// Breakpoint tables must start at zero, be strictly ascending without overlap and
/// never map a higher concentration onto a lower index.
pub fn validate_standard(standard: &IndexStandard) -> Result<(), HazeError> {
    if standard.pollutants.is_empty() {
        return Err(HazeError::StandardInvalid(
            "pollutants must not be empty".into(),
        ));
    }

    let mut seen = HashSet::new();
    for ps in &standard.pollutants {
        let key = ps.pollutant;
        if !seen.insert(key) {
            return Err(HazeError::StandardInvalid(format!(
                "pollutant '{}' is defined more than once",
                key
            )));
        }

        if ps.conversion.factor <= Decimal::ZERO {
            return Err(HazeError::StandardInvalid(format!(
                "pollutant '{}' has non-positive conversion factor {}",
                key, ps.conversion.factor
            )));
        }

        if let Some(precision) = ps.precision {
            if precision > 28 {
                return Err(HazeError::StandardInvalid(format!(
                    "pollutant '{}' has precision {} (max 28)",
                    key, precision
                )));
            }
        }

        let first = ps.breakpoints.first().ok_or_else(|| {
            HazeError::StandardInvalid(format!("pollutant '{}' has no breakpoints", key))
        })?;
        if !first.lo.is_zero() {
            return Err(HazeError::StandardInvalid(format!(
                "pollutant '{}' breakpoints start at {} instead of 0",
                key, first.lo
            )));
        }

        for bp in &ps.breakpoints {
            if bp.lo >= bp.hi {
                return Err(HazeError::StandardInvalid(format!(
                    "pollutant '{}' has empty breakpoint range {}-{}",
                    key, bp.lo, bp.hi
                )));
            }
            if bp.index_lo > bp.index_hi {
                return Err(HazeError::StandardInvalid(format!(
                    "pollutant '{}' breakpoint {}-{} has descending index {}-{}",
                    key, bp.lo, bp.hi, bp.index_lo, bp.index_hi
                )));
            }
        }

        for pair in ps.breakpoints.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.lo <= prev.hi {
                return Err(HazeError::StandardInvalid(format!(
                    "pollutant '{}' breakpoints {}-{} and {}-{} overlap or are out of order",
                    key, prev.lo, prev.hi, next.lo, next.hi
                )));
            }
            if next.index_lo < prev.index_hi {
                return Err(HazeError::StandardInvalid(format!(
                    "pollutant '{}' index decreases from {} to {} at {}",
                    key, prev.index_hi, next.index_lo, next.lo
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Pollutant;
    use std::io::Write;

    #[test]
    fn test_parse_valid_standard() {
        let json = r#"{
            "name": "Test",
            "version": "1.0",
            "pollutants": [
                {
                    "pollutant": "pm2_5_24h",
                    "unit": "µg/m³",
                    "breakpoints": [
                        { "lo": "0", "hi": "50", "index_lo": 0, "index_hi": 50 },
                        { "lo": "51", "hi": "100", "index_lo": 51, "index_hi": 100 }
                    ]
                }
            ]
        }"#;
        let standard = parse_standard_str(json).unwrap();
        assert_eq!(standard.name, "Test");
        let pm = standard.pollutant(Pollutant::Pm25Daily).unwrap();
        assert_eq!(pm.breakpoints.len(), 2);
        assert_eq!(pm.conversion.factor, Decimal::ONE);
        assert!(standard.pollutant(Pollutant::So2Daily).is_none());
    }

    #[test]
    fn test_empty_pollutants_rejected() {
        let json = r#"{ "name": "Bad", "version": "1.0", "pollutants": [] }"#;
        assert!(parse_standard_str(json).is_err());
    }

    #[test]
    fn test_unknown_pollutant_rejected() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "pollutants": [
                { "pollutant": "pm1_1h", "unit": "x",
                  "breakpoints": [{ "lo": "0", "hi": "1", "index_lo": 0, "index_hi": 1 }] }
            ]
        }"#;
        assert!(parse_standard_str(json).is_err());
    }

    #[test]
    fn test_duplicate_pollutant_rejected() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "pollutants": [
                { "pollutant": "co_8h", "unit": "ppm",
                  "breakpoints": [{ "lo": "0", "hi": "1", "index_lo": 0, "index_hi": 1 }] },
                { "pollutant": "co_8h", "unit": "ppm",
                  "breakpoints": [{ "lo": "0", "hi": "1", "index_lo": 0, "index_hi": 1 }] }
            ]
        }"#;
        assert!(matches!(
            parse_standard_str(json),
            Err(HazeError::StandardInvalid(_))
        ));
    }

    #[test]
    fn test_overlapping_breakpoints_rejected() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "pollutants": [
                { "pollutant": "co_8h", "unit": "ppm",
                  "breakpoints": [
                    { "lo": "0", "hi": "5", "index_lo": 0, "index_hi": 50 },
                    { "lo": "5", "hi": "9", "index_lo": 51, "index_hi": 100 }
                  ] }
            ]
        }"#;
        assert!(matches!(
            parse_standard_str(json),
            Err(HazeError::StandardInvalid(_))
        ));
    }

    #[test]
    fn test_breakpoints_must_start_at_zero() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "pollutants": [
                { "pollutant": "co_8h", "unit": "ppm",
                  "breakpoints": [{ "lo": "1", "hi": "5", "index_lo": 0, "index_hi": 50 }] }
            ]
        }"#;
        assert!(parse_standard_str(json).is_err());
    }

    #[test]
    fn test_decreasing_index_rejected() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "pollutants": [
                { "pollutant": "co_8h", "unit": "ppm",
                  "breakpoints": [
                    { "lo": "0", "hi": "5", "index_lo": 0, "index_hi": 50 },
                    { "lo": "6", "hi": "9", "index_lo": 40, "index_hi": 100 }
                  ] }
            ]
        }"#;
        assert!(parse_standard_str(json).is_err());
    }

    #[test]
    fn test_zero_factor_rejected() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "pollutants": [
                { "pollutant": "co_8h", "unit": "ppm", "conversion": { "factor": "0" },
                  "breakpoints": [{ "lo": "0", "hi": "5", "index_lo": 0, "index_hi": 50 }] }
            ]
        }"#;
        assert!(parse_standard_str(json).is_err());
    }

    #[test]
    fn test_load_standard_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        match load_standard(file.path()) {
            Err(HazeError::StandardLoad { path, .. }) => assert_eq!(path, file.path()),
            other => panic!("expected StandardLoad, got {other:?}"),
        }
    }
}
