use crate::error::HazeError;
use crate::model::TimedTable;
use crate::parsing::values::parse_number;
use chrono::{DateTime, Duration, FixedOffset};
use rust_decimal::Decimal;
use tracing::trace;

/// Latest value of `label`'s series, provided the series reaches exactly `anchor`.
///
/// A series of `n` readings starting at the table's header date covers up to
/// `header + n * granularity`. Anything short of (or past) the anchor means the
/// last cell is not the reading for the anchor hour.
pub fn latest_value(
    table: &TimedTable,
    label: &str,
    anchor: DateTime<FixedOffset>,
    granularity: Duration,
) -> Result<Decimal, HazeError> {
    let row = table.table.row(label).unwrap_or_default();
    let found = reach(table.header, row.len(), granularity);

    if found != Some(anchor) {
        return Err(HazeError::DataIncomplete {
            label: label.to_string(),
            expected: anchor,
            found: found.unwrap_or(table.header),
        });
    }

    let last = row.last().ok_or_else(|| HazeError::DataIncomplete {
        label: label.to_string(),
        expected: anchor,
        found: table.header,
    })?;

    trace!(label, cells = row.len(), "series complete");
    parse_number(last)
}

fn reach(
    header: DateTime<FixedOffset>,
    len: usize,
    granularity: Duration,
) -> Option<DateTime<FixedOffset>> {
    let steps = i32::try_from(len).ok()?;
    header.checked_add_signed(granularity.checked_mul(steps)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawTable;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn sgt() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).unwrap()
    }

    fn series(label: &str, cells: &[&str]) -> TimedTable {
        TimedTable {
            header: sgt().with_ymd_and_hms(2014, 6, 19, 0, 0, 0).unwrap(),
            table: RawTable::from_iter([(
                label,
                cells.iter().map(|c| c.to_string()).collect::<Vec<_>>(),
            )]),
        }
    }

    fn at(hour: u32) -> DateTime<FixedOffset> {
        sgt().with_ymd_and_hms(2014, 6, 19, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_complete_series_returns_last() {
        let table = series("north", &["20", "21", "22"]);
        let v = latest_value(&table, "north", at(3), Duration::hours(1)).unwrap();
        assert_eq!(v, dec!(22));
    }

    #[test]
    fn test_short_series_is_incomplete() {
        let table = series("north", &["20", "21"]);
        match latest_value(&table, "north", at(3), Duration::hours(1)) {
            Err(HazeError::DataIncomplete {
                label,
                expected,
                found,
            }) => {
                assert_eq!(label, "north");
                assert_eq!(expected, at(3));
                assert_eq!(found, at(2));
            }
            other => panic!("expected DataIncomplete, got {other:?}"),
        }
    }

    #[test]
    fn test_dropped_sentinel_shortens_series() {
        // Four hours published, one of them as "-": the series only reaches 03:00.
        let table = series("north", &["12.3(45)", "5.1(-)", "0.02(10)"]);
        assert!(matches!(
            latest_value(&table, "north", at(4), Duration::hours(1)),
            Err(HazeError::DataIncomplete { .. })
        ));
    }

    #[test]
    fn test_long_series_is_incomplete() {
        let table = series("north", &["20", "21", "22", "23"]);
        assert!(latest_value(&table, "north", at(3), Duration::hours(1)).is_err());
    }

    #[test]
    fn test_missing_row_is_incomplete() {
        let table = series("north", &["20"]);
        assert!(matches!(
            latest_value(&table, "south", at(1), Duration::hours(1)),
            Err(HazeError::DataIncomplete { .. })
        ));
    }

    #[test]
    fn test_empty_row_matching_midnight_is_incomplete() {
        let table = series("north", &[]);
        assert!(matches!(
            latest_value(&table, "north", at(0), Duration::hours(1)),
            Err(HazeError::DataIncomplete { .. })
        ));
    }

    #[test]
    fn test_coarser_granularity() {
        let table = series("3-hr psi", &["50", "52", "57"]);
        let v = latest_value(&table, "3-hr psi", at(9), Duration::hours(3)).unwrap();
        assert_eq!(v, dec!(57));
    }

    #[test]
    fn test_non_numeric_last_cell() {
        let table = series("north", &["20", "n/a"]);
        assert!(matches!(
            latest_value(&table, "north", at(2), Duration::hours(1)),
            Err(HazeError::ParseFailure(_))
        ));
    }

    #[test]
    fn test_series_across_midnight() {
        let cells: Vec<String> = (0..25).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = cells.iter().map(String::as_str).collect();
        let table = series("north", &refs);
        let next_day = sgt().with_ymd_and_hms(2014, 6, 20, 1, 0, 0).unwrap();
        let v = latest_value(&table, "north", next_day, Duration::hours(1)).unwrap();
        assert_eq!(v, dec!(24));
    }
}
