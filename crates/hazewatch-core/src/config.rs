use crate::error::HazeError;
use crate::model::Pollutant;
use chrono::{Duration, FixedOffset};
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

pub const DEFAULT_PRIMARY_URL: &str = "http://www.nea.gov.sg/anti-pollution-radiation-protection/air-pollution-control/psi/pollutant-concentrations";
pub const DEFAULT_SECONDARY_URL: &str =
    "http://www.nea.gov.sg/anti-pollution-radiation-protection/air-pollution-control/psi/1-hr-pm2-5-readings";

const MAX_GRANULARITY_HOURS: i64 = 168;

/// Where the pages live and how to read them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub primary_url: String,
    /// Page with 1-hour PM2.5 series; not fetched when absent.
    pub secondary_url: Option<String>,
    /// Column order of the concentrations table.
    pub pollutant_order: Vec<Pollutant>,
    /// Fixed UTC offset of the publishing source.
    pub utc_offset_hours: i32,
    /// Time covered by one cell of a series table.
    pub granularity_hours: i64,
    /// Position of the concentrations table on the primary page.
    pub concentration_table: usize,
    /// Position of the 1-hour PM2.5 series table on the primary page.
    pub pm2_5_table: usize,
    /// Position of the table holding the 3-hour index row.
    pub psi_3h_table: usize,
    pub psi_3h_label: String,
    pub layout: PageLayout,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            primary_url: DEFAULT_PRIMARY_URL.to_string(),
            secondary_url: Some(DEFAULT_SECONDARY_URL.to_string()),
            pollutant_order: Pollutant::ALL.to_vec(),
            utc_offset_hours: 8,
            granularity_hours: 1,
            concentration_table: 0,
            pm2_5_table: 1,
            psi_3h_table: 2,
            psi_3h_label: "3-hr psi".to_string(),
            layout: PageLayout::default(),
        }
    }
}

impl SourceConfig {
    pub fn offset(&self) -> Result<FixedOffset, HazeError> {
        let seconds = self.utc_offset_hours.checked_mul(3600);
        seconds.and_then(FixedOffset::east_opt).ok_or_else(|| {
            HazeError::ConfigInvalid(format!(
                "utc_offset_hours {} is out of range",
                self.utc_offset_hours
            ))
        })
    }

    pub fn granularity(&self) -> Duration {
        Duration::hours(self.granularity_hours.clamp(1, MAX_GRANULARITY_HOURS))
    }
}

/// CSS selectors locating headers, controls and tables on both pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    /// Headers carrying each primary table's date, in table order.
    pub primary_header: String,
    /// Control whose value is the as-of hour, e.g. "1300".
    pub as_of_hour: String,
    pub primary_table: String,
    pub primary_row: String,
    pub secondary_header: String,
    pub secondary_table: String,
    pub secondary_row: String,
    /// Row labels that mark header rows rather than data.
    pub header_labels: Vec<String>,
}

impl Default for PageLayout {
    fn default() -> Self {
        PageLayout {
            primary_header: ".c1 h1:not(.title)".to_string(),
            as_of_hour: "#ContentPlaceHolderTitle_C001_DDLTime".to_string(),
            primary_table: ".c1 table".to_string(),
            primary_row: "tr".to_string(),
            secondary_header: ".c1 h1#pollutant".to_string(),
            secondary_table: ".c1 table.noalter".to_string(),
            secondary_row: "tr:not(.even)".to_string(),
            header_labels: vec!["time".to_string()],
        }
    }
}

/// Load a source config from a JSON file. Missing fields take their defaults.
pub fn load_config(path: &Path) -> Result<SourceConfig, HazeError> {
    let content = std::fs::read_to_string(path).map_err(|e| HazeError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: SourceConfig =
        serde_json::from_str(&content).map_err(|e| HazeError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a source config from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<SourceConfig, HazeError> {
    let config: SourceConfig = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &SourceConfig) -> Result<(), HazeError> {
    if config.pollutant_order.is_empty() {
        return Err(HazeError::ConfigInvalid(
            "pollutant_order must not be empty".into(),
        ));
    }

    let mut seen = HashSet::new();
    for p in &config.pollutant_order {
        if !seen.insert(p) {
            return Err(HazeError::ConfigInvalid(format!(
                "pollutant '{}' appears twice in pollutant_order",
                p
            )));
        }
    }

    if !(1..=MAX_GRANULARITY_HOURS).contains(&config.granularity_hours) {
        return Err(HazeError::ConfigInvalid(format!(
            "granularity_hours must be between 1 and {MAX_GRANULARITY_HOURS}, got {}",
            config.granularity_hours
        )));
    }

    if config.utc_offset_hours.unsigned_abs() > 23 {
        return Err(HazeError::ConfigInvalid(format!(
            "utc_offset_hours {} is out of range",
            config.utc_offset_hours
        )));
    }

    if config.psi_3h_label.trim().is_empty() {
        return Err(HazeError::ConfigInvalid(
            "psi_3h_label must not be empty".into(),
        ));
    }

    let layout = &config.layout;
    for (field, css) in [
        ("primary_header", &layout.primary_header),
        ("as_of_hour", &layout.as_of_hour),
        ("primary_table", &layout.primary_table),
        ("primary_row", &layout.primary_row),
        ("secondary_header", &layout.secondary_header),
        ("secondary_table", &layout.secondary_table),
        ("secondary_row", &layout.secondary_row),
    ] {
        if Selector::parse(css).is_err() {
            return Err(HazeError::ConfigInvalid(format!(
                "layout.{} is not a valid CSS selector: '{}'",
                field, css
            )));
        }
    }

    Ok(())
}
