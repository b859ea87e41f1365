use crate::completeness::latest_value;
use crate::config::SourceConfig;
use crate::error::HazeError;
use crate::index::{convert, overall_index};
use crate::model::{
    OverallSummary, Pollutant, PrimaryPage, Reading, ReadingsDocument, SecondaryPage, TimedTable,
};
use crate::parsing::values::parse_compound;
use crate::standards::schema::IndexStandard;
use chrono::{DateTime, Duration, FixedOffset};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};

/// Keys the document itself uses; a region with one of these labels would overwrite them.
const RESERVED_LABELS: &[&str] = &["time", "overall"];

/// Format of the document's `time` field, e.g. "2014-06-19T13:00+0800".
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M%z";

/// Merge the parsed pages into one readings document.
///
/// Every series used is checked against the primary page's anchor first; any
/// failure aborts the whole document.
pub fn aggregate(
    primary: &PrimaryPage,
    secondary: Option<&SecondaryPage>,
    config: &SourceConfig,
    standard: &IndexStandard,
) -> Result<ReadingsDocument, HazeError> {
    let anchor = primary.anchor()?;
    let granularity = config.granularity();

    let concentrations = table_at(primary, config.concentration_table, "concentration")?;
    if concentrations.table.is_empty() {
        return Err(HazeError::ParseFailure(
            "concentration table has no regions".into(),
        ));
    }

    let series = primary.tables.get(config.pm2_5_table);
    let mut regions = BTreeMap::new();
    let mut breakdown = BTreeMap::new();

    for (label, cells) in concentrations.table.iter() {
        if RESERVED_LABELS.contains(&label) {
            return Err(HazeError::ParseFailure(format!(
                "region label '{}' is reserved",
                label
            )));
        }

        let mut reading = build_reading(label, cells, &config.pollutant_order)?;

        let converted = convert(&reading.concentrations, standard);
        if let Some(mut result) = overall_index(&converted, standard) {
            result.uncovered.extend(
                reading
                    .concentrations
                    .keys()
                    .filter(|p| !converted.contains_key(p)),
            );
            reading.aqi = Some(result.index);
            breakdown.insert(label.to_string(), result);
        } else {
            warn!(region = label, standard = %standard.name, "no pollutant covered, aqi omitted");
        }

        reading.pm2_5_1h = hourly_pm2_5(label, series, secondary, anchor, granularity)?;

        debug!(
            region = label,
            psi_24h = ?reading.psi_24h,
            aqi = ?reading.aqi,
            "region aggregated"
        );
        regions.insert(label.to_string(), reading);
    }

    if let Some(table) = series {
        for label in unknown_regions(table, &regions) {
            warn!(region = label, "primary 1-hour series for unknown region ignored");
        }
    }
    if let Some(page) = secondary {
        for label in unknown_regions(&page.table, &regions) {
            warn!(region = label, "secondary series for unknown region ignored");
        }
    }

    let psi_table = table_at(primary, config.psi_3h_table, "3-hour index")?;
    let psi_label = config.psi_3h_label.trim().to_lowercase();
    if psi_table.table.row(&psi_label).is_none() {
        return Err(HazeError::ParseFailure(format!(
            "row '{}' not found in table {}",
            psi_label, config.psi_3h_table
        )));
    }
    let psi_3h = latest_value(psi_table, &psi_label, anchor, granularity)?;

    let overall = OverallSummary {
        pm2_5_1h: range(regions.values().filter_map(|r| r.pm2_5_1h.map(|v| v.normalize()))),
        psi_24h: range(regions.values().filter_map(|r| r.psi_24h)),
        psi_3h,
    };

    let time = anchor.format(TIME_FORMAT).to_string();
    info!(
        %time,
        regions = regions.len(),
        psi_3h = %overall.psi_3h,
        "readings aggregated"
    );

    Ok(ReadingsDocument {
        time,
        regions,
        overall,
        breakdown,
    })
}

/// Concentrations and published sub-indices of one region, cells in `order`.
pub fn build_reading(
    region: &str,
    cells: &[String],
    order: &[Pollutant],
) -> Result<Reading, HazeError> {
    if cells.len() != order.len() {
        return Err(HazeError::ParseFailure(format!(
            "region '{}' has {} readings, expected {}",
            region,
            cells.len(),
            order.len()
        )));
    }

    let mut reading = Reading::default();
    for (&pollutant, cell) in order.iter().zip(cells) {
        let compound = parse_compound(cell)
            .map_err(|e| HazeError::ParseFailure(format!("region '{}', {}: {}", region, pollutant, e)))?;
        reading.concentrations.insert(pollutant, compound.concentration);
        if let Some(sub_index) = compound.sub_index {
            reading.psi_sub_index.insert(pollutant, sub_index);
        }
    }
    reading.psi_24h = reading.psi_sub_index.values().copied().max();

    Ok(reading)
}

/// The region's latest 1-hour PM2.5, from the primary series or else the secondary page.
fn hourly_pm2_5(
    region: &str,
    primary: Option<&TimedTable>,
    secondary: Option<&SecondaryPage>,
    anchor: DateTime<FixedOffset>,
    granularity: Duration,
) -> Result<Option<Decimal>, HazeError> {
    if let Some(table) = primary.filter(|t| t.table.row(region).is_some()) {
        return latest_value(table, region, anchor, granularity).map(Some);
    }
    if let Some(page) = secondary.filter(|p| p.table.table.row(region).is_some()) {
        return latest_value(&page.table, region, anchor, granularity).map(Some);
    }
    Ok(None)
}

/// Series labels with no matching region in the concentrations table.
fn unknown_regions<'a>(
    table: &'a TimedTable,
    regions: &BTreeMap<String, Reading>,
) -> Vec<&'a str> {
    table
        .table
        .labels()
        .filter(|label| !regions.contains_key(*label))
        .collect()
}

fn table_at<'a>(
    page: &'a PrimaryPage,
    position: usize,
    what: &str,
) -> Result<&'a TimedTable, HazeError> {
    page.tables.get(position).ok_or_else(|| {
        HazeError::ParseFailure(format!(
            "{} table {} not found, page has {}",
            what,
            position,
            page.tables.len()
        ))
    })
}

/// "min-max" over the values, `None` when there are none.
fn range<T: Copy + Ord + fmt::Display>(values: impl Iterator<Item = T>) -> Option<String> {
    let mut bounds: Option<(T, T)> = None;
    for v in values {
        bounds = Some(match bounds {
            None => (v, v),
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
        });
    }
    bounds.map(|(lo, hi)| format!("{}-{}", lo, hi))
}
