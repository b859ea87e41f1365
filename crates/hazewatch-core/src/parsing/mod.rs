pub mod header;
pub mod table;
pub mod values;

use crate::config::SourceConfig;
use crate::error::HazeError;
use crate::model::{PrimaryPage, SecondaryPage, TimedTable};
use chrono::{DateTime, FixedOffset};
use header::{as_of_value, parse_as_of_hour, parse_header_date};
use scraper::{ElementRef, Html, Selector};
use table::{cell_text, parse_table};
use tracing::{debug, warn};

/// Parse the multi-table pollutant page.
///
/// The i-th header belongs to the i-th table. Tables without a header are
/// dropped with a warning; headers beyond the last table are ignored, dated or
/// not. A kept table whose header carries no date fails the page.
pub fn parse_primary_page(html: &str, config: &SourceConfig) -> Result<PrimaryPage, HazeError> {
    let layout = &config.layout;
    let offset = config.offset()?;
    let doc = Html::parse_document(html);

    let headers = selector(&layout.primary_header)?;
    let dates: Vec<(String, Option<DateTime<FixedOffset>>)> = doc
        .select(&headers)
        .map(|h| {
            let text = cell_text(&h);
            let date = parse_header_date(&text, offset).ok();
            (text, date)
        })
        .collect();
    if dates.iter().all(|(_, date)| date.is_none()) {
        return Err(HazeError::ParseFailure(
            "primary page has no dated headers".into(),
        ));
    }

    let control_sel = selector(&layout.as_of_hour)?;
    let control = doc.select(&control_sel).next().ok_or_else(|| {
        HazeError::ParseFailure(format!("as-of control '{}' not found", layout.as_of_hour))
    })?;
    let value = as_of_value(control)
        .ok_or_else(|| HazeError::ParseFailure("as-of control has no value".into()))?;
    let as_of_hour = parse_as_of_hour(&value)?;

    let table_sel = selector(&layout.primary_table)?;
    let row_sel = selector(&layout.primary_row)?;
    let elements: Vec<ElementRef<'_>> = doc.select(&table_sel).collect();
    if elements.is_empty() {
        return Err(HazeError::ParseFailure("primary page has no tables".into()));
    }
    if elements.len() > dates.len() {
        warn!(
            tables = elements.len(),
            headers = dates.len(),
            "tables without a header dropped"
        );
    } else if dates.len() > elements.len() {
        debug!(
            ignored = dates.len() - elements.len(),
            "headers after the last table ignored"
        );
    }

    let tables = elements
        .into_iter()
        .zip(dates)
        .enumerate()
        .map(|(position, (el, (text, date)))| {
            let header = date.ok_or_else(|| {
                HazeError::ParseFailure(format!(
                    "table {} header '{}' carries no date",
                    position, text
                ))
            })?;
            Ok(TimedTable {
                header,
                table: parse_table(el, &row_sel, &layout.header_labels),
            })
        })
        .collect::<Result<Vec<_>, HazeError>>()?;

    debug!(as_of_hour, tables = tables.len(), "parsed primary page");
    Ok(PrimaryPage { as_of_hour, tables })
}

/// Parse the single-table 1-hour PM2.5 page.
pub fn parse_secondary_page(
    html: &str,
    config: &SourceConfig,
) -> Result<SecondaryPage, HazeError> {
    let layout = &config.layout;
    let doc = Html::parse_document(html);

    let header_sel = selector(&layout.secondary_header)?;
    let header_el = doc.select(&header_sel).next().ok_or_else(|| {
        HazeError::ParseFailure(format!(
            "secondary header '{}' not found",
            layout.secondary_header
        ))
    })?;
    let header = parse_header_date(&cell_text(&header_el), config.offset()?)?;

    let table_sel = selector(&layout.secondary_table)?;
    let row_sel = selector(&layout.secondary_row)?;
    let el = doc.select(&table_sel).next().ok_or_else(|| {
        HazeError::ParseFailure(format!(
            "secondary table '{}' not found",
            layout.secondary_table
        ))
    })?;
    let table = parse_table(el, &row_sel, &layout.header_labels);

    debug!(regions = table.len(), "parsed secondary page");
    Ok(SecondaryPage {
        table: TimedTable { header, table },
    })
}

fn selector(css: &str) -> Result<Selector, HazeError> {
    Selector::parse(css)
        .map_err(|e| HazeError::ParseFailure(format!("invalid selector '{}': {:?}", css, e)))
}
