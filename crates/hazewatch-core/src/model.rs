use crate::error::HazeError;
use crate::index::outcome::IndexResult;
use chrono::{DateTime, Duration, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Pollutant and averaging window, as reported in the concentrations table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pollutant {
    #[serde(rename = "so2_24h")]
    So2Daily,
    #[serde(rename = "pm10_24h")]
    Pm10Daily,
    #[serde(rename = "no2_1h")]
    No2Hourly,
    #[serde(rename = "o3_8h")]
    O3EightHour,
    #[serde(rename = "co_8h")]
    CoEightHour,
    #[serde(rename = "pm2_5_24h")]
    Pm25Daily,
}

impl Pollutant {
    /// Column order of the published concentrations table.
    pub const ALL: [Pollutant; 6] = [
        Pollutant::So2Daily,
        Pollutant::Pm10Daily,
        Pollutant::No2Hourly,
        Pollutant::O3EightHour,
        Pollutant::CoEightHour,
        Pollutant::Pm25Daily,
    ];

    /// Key used in the readings document and in configuration files.
    pub fn key(&self) -> &'static str {
        match self {
            Pollutant::So2Daily => "so2_24h",
            Pollutant::Pm10Daily => "pm10_24h",
            Pollutant::No2Hourly => "no2_1h",
            Pollutant::O3EightHour => "o3_8h",
            Pollutant::CoEightHour => "co_8h",
            Pollutant::Pm25Daily => "pm2_5_24h",
        }
    }

    pub fn from_key(s: &str) -> Option<Pollutant> {
        let lower = s.trim().to_lowercase();
        Pollutant::ALL.into_iter().find(|p| p.key() == lower)
    }

    /// Human-readable label, e.g. "PM2.5 (24h)".
    pub fn label(&self) -> &'static str {
        match self {
            Pollutant::So2Daily => "SO2 (24h)",
            Pollutant::Pm10Daily => "PM10 (24h)",
            Pollutant::No2Hourly => "NO2 (1h)",
            Pollutant::O3EightHour => "O3 (8h)",
            Pollutant::CoEightHour => "CO (8h)",
            Pollutant::Pm25Daily => "PM2.5 (24h)",
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A `value(subindex)` cell from the concentrations table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundCell {
    pub concentration: Decimal,
    /// Sub-index published next to the concentration; `None` for `value(-)`.
    pub sub_index: Option<u32>,
}

/// Row label -> cell texts in time order, with "no data" cells removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    rows: BTreeMap<String, Vec<String>>,
}

impl RawTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a row label so it exists even when all of its cells were dropped.
    pub(crate) fn ensure_row(&mut self, label: &str) {
        self.rows.entry(label.to_string()).or_default();
    }

    pub(crate) fn push_cell(&mut self, label: &str, cell: String) {
        self.rows.entry(label.to_string()).or_default().push(cell);
    }

    pub fn row(&self, label: &str) -> Option<&[String]> {
        self.rows.get(label).map(|r| r.as_slice())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of rows (labels).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<L: Into<String>> FromIterator<(L, Vec<String>)> for RawTable {
    fn from_iter<T: IntoIterator<Item = (L, Vec<String>)>>(iter: T) -> Self {
        RawTable {
            rows: iter.into_iter().map(|(l, v)| (l.into(), v)).collect(),
        }
    }
}

/// A table together with the date printed in its own page header (midnight, source offset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedTable {
    pub header: DateTime<FixedOffset>,
    pub table: RawTable,
}

/// The multi-table pollutant page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryPage {
    /// Hour selected in the page's "as of" control.
    pub as_of_hour: u32,
    pub tables: Vec<TimedTable>,
}

impl PrimaryPage {
    /// The latest hour every accepted table must reach: first table's date plus the as-of hour.
    pub fn anchor(&self) -> Result<DateTime<FixedOffset>, HazeError> {
        let first = self
            .tables
            .first()
            .ok_or_else(|| HazeError::ParseFailure("primary page has no tables".into()))?;
        Ok(first.header + Duration::hours(i64::from(self.as_of_hour)))
    }
}

/// The single-table 1-hour PM2.5 page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryPage {
    pub table: TimedTable,
}

/// Structured values for one region.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    #[serde(flatten)]
    pub concentrations: BTreeMap<Pollutant, Decimal>,
    /// Sub-indices published by the source, only for pollutants that had one.
    #[serde(rename = "psiSubIndex")]
    pub psi_sub_index: BTreeMap<Pollutant, u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psi_24h: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aqi: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm2_5_1h: Option<Decimal>,
}

/// Cross-region rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pm2_5_1h: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psi_24h: Option<String>,
    pub psi_3h: Decimal,
}

/// The document handed to downstream collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingsDocument {
    pub time: String,
    #[serde(flatten)]
    pub regions: BTreeMap<String, Reading>,
    pub overall: OverallSummary,
    /// Per-region index breakdown, kept out of the published document.
    #[serde(skip)]
    pub breakdown: BTreeMap<String, IndexResult>,
}
