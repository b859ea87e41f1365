use crate::model::Pollutant;
use crate::standards::schema::{Conversion, IndexStandard};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::trace;

/// Convert reported concentrations into the units each of the standard's tables expects.
///
/// Pollutants the standard has no table for are dropped.
pub fn convert(
    concentrations: &BTreeMap<Pollutant, Decimal>,
    standard: &IndexStandard,
) -> BTreeMap<Pollutant, Decimal> {
    concentrations
        .iter()
        .filter_map(|(&pollutant, &value)| match standard.pollutant(pollutant) {
            Some(ps) => Some((pollutant, convert_one(&ps.conversion, value))),
            None => {
                trace!(%pollutant, standard = %standard.name, "no table, not converted");
                None
            }
        })
        .collect()
}

/// Apply a single linear conversion, saturating instead of overflowing.
pub fn convert_one(conversion: &Conversion, value: Decimal) -> Decimal {
    value
        .checked_mul(conversion.factor)
        .and_then(|v| v.checked_add(conversion.offset))
        .unwrap_or(Decimal::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standards::builtin::load_preset;
    use crate::standards::schema::{Breakpoint, PollutantStandard};
    use rust_decimal_macros::dec;

    fn factor(pollutant: Pollutant) -> Conversion {
        let epa = load_preset("aqi_epa").unwrap();
        epa.pollutant(pollutant).unwrap().conversion.clone()
    }

    fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "{actual} not within {tolerance} of {expected}"
        );
    }

    #[test]
    fn test_so2_reference_equivalence() {
        // 365 µg/m³ is the 24-hour SO2 limit commonly quoted as 0.14 ppm.
        let ppm = convert_one(&factor(Pollutant::So2Daily), dec!(365));
        assert_close(ppm, dec!(0.14), dec!(0.001));
        // 1 ppm SO2 is about 2620 µg/m³.
        let ppm = convert_one(&factor(Pollutant::So2Daily), dec!(2620));
        assert_close(ppm, dec!(1.0), dec!(0.001));
    }

    #[test]
    fn test_co_reference_equivalence() {
        // 10 mg/m³ CO over 8 hours is the 9 ppm standard.
        let ppm = convert_one(&factor(Pollutant::CoEightHour), dec!(10));
        assert_close(ppm, dec!(8.73), dec!(0.01));
    }

    #[test]
    fn test_o3_reference_equivalence() {
        // 157 µg/m³ is the 0.08 ppm 8-hour ozone limit.
        let ppm = convert_one(&factor(Pollutant::O3EightHour), dec!(157));
        assert_close(ppm, dec!(0.08), dec!(0.0005));
    }

    #[test]
    fn test_no2_reference_equivalence() {
        // 1 ppb NO2 is about 1.88 µg/m³.
        let ppb = convert_one(&factor(Pollutant::No2Hourly), dec!(188));
        assert_close(ppb, dec!(100), dec!(0.2));
    }

    #[test]
    fn test_particulates_pass_through() {
        assert_eq!(convert_one(&factor(Pollutant::Pm25Daily), dec!(41)), dec!(41));
        assert_eq!(convert_one(&factor(Pollutant::Pm10Daily), dec!(60)), dec!(60));
    }

    #[test]
    fn test_offset_applied() {
        let conversion = Conversion {
            factor: dec!(2),
            offset: dec!(1.5),
            from_unit: None,
            note: None,
        };
        assert_eq!(convert_one(&conversion, dec!(3)), dec!(7.5));
    }

    #[test]
    fn test_convert_drops_uncovered_pollutants() {
        let standard = IndexStandard {
            name: "Only PM".into(),
            description: None,
            version: "1".into(),
            pollutants: vec![PollutantStandard {
                pollutant: Pollutant::Pm25Daily,
                unit: "µg/m³".into(),
                precision: None,
                conversion: Conversion::default(),
                breakpoints: vec![Breakpoint::new(dec!(0), dec!(10), 0, 50)],
            }],
        };
        let input = BTreeMap::from([
            (Pollutant::Pm25Daily, dec!(5)),
            (Pollutant::So2Daily, dec!(12)),
        ]);
        let out = convert(&input, &standard);
        assert_eq!(out.len(), 1);
        assert_eq!(out[&Pollutant::Pm25Daily], dec!(5));
    }
}
