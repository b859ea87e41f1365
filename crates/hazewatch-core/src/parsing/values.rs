use crate::error::HazeError;
use crate::model::CompoundCell;
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

static COMPOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\d.]+)\((\d+|-)\)").expect("compound cell pattern should be valid")
});

/// Parse a concentrations-table cell into a concentration and optional sub-index.
///
/// Handles formats like:
/// - "12.3(45)" -> 12.3 with sub-index 45
/// - "5.1(-)" -> 5.1 without sub-index
/// - "41 (82)" is rejected: the value and bracket must be adjacent
pub fn parse_compound(cell: &str) -> Result<CompoundCell, HazeError> {
    let caps = COMPOUND.captures(cell).ok_or_else(|| {
        HazeError::ParseFailure(format!(
            "cell '{}' is not of the form value(subindex) or value(-)",
            cell.trim()
        ))
    })?;

    let concentration = parse_decimal(&caps[1])?;
    let sub_index = match &caps[2] {
        "-" => None,
        digits => Some(digits.parse::<u32>().map_err(|e| {
            HazeError::ParseFailure(format!("invalid sub-index '{}': {}", digits, e))
        })?),
    };

    Ok(CompoundCell {
        concentration,
        sub_index,
    })
}

/// Parse a plain numeric cell from a series table.
pub fn parse_number(cell: &str) -> Result<Decimal, HazeError> {
    let value = parse_decimal(cell)?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(HazeError::ParseFailure(format!(
            "negative reading '{}'",
            cell.trim()
        )));
    }
    Ok(value)
}

fn parse_decimal(s: &str) -> Result<Decimal, HazeError> {
    let s = s.trim();
    Decimal::from_str(s)
        .map_err(|e| HazeError::ParseFailure(format!("invalid number '{}': {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compound_with_sub_index() {
        let cell = parse_compound("12.3(45)").unwrap();
        assert_eq!(cell.concentration, dec!(12.3));
        assert_eq!(cell.sub_index, Some(45));
    }

    #[test]
    fn test_compound_without_sub_index() {
        let cell = parse_compound("5.1(-)").unwrap();
        assert_eq!(cell.concentration, dec!(5.1));
        assert_eq!(cell.sub_index, None);
    }

    #[test]
    fn test_compound_small_value() {
        let cell = parse_compound("0.02(10)").unwrap();
        assert_eq!(cell.concentration, dec!(0.02));
        assert_eq!(cell.sub_index, Some(10));
    }

    #[test]
    fn test_compound_with_surrounding_whitespace() {
        let cell = parse_compound("  41(82) ").unwrap();
        assert_eq!(cell.concentration, dec!(41));
    }

    #[test]
    fn test_compound_rejects_plain_number() {
        assert!(matches!(
            parse_compound("41"),
            Err(HazeError::ParseFailure(_))
        ));
    }

    #[test]
    fn test_compound_rejects_detached_bracket() {
        assert!(parse_compound("41 (82)").is_err());
    }

    #[test]
    fn test_compound_rejects_malformed_number() {
        assert!(parse_compound("1.2.3(4)").is_err());
    }

    #[test]
    fn test_number() {
        assert_eq!(parse_number(" 57 ").unwrap(), dec!(57));
        assert_eq!(parse_number("12.0").unwrap(), dec!(12));
    }

    #[test]
    fn test_number_rejects_text_and_negatives() {
        assert!(parse_number("n/a").is_err());
        assert!(parse_number("-4").is_err());
    }
}
