use crate::model::Pollutant;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An index standard: how to convert reported concentrations and map them onto an index scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStandard {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub pollutants: Vec<PollutantStandard>,
}

impl IndexStandard {
    pub fn pollutant(&self, pollutant: Pollutant) -> Option<&PollutantStandard> {
        self.pollutants.iter().find(|p| p.pollutant == pollutant)
    }
}

/// Conversion and breakpoints for a single pollutant within a standard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollutantStandard {
    pub pollutant: Pollutant,
    /// Unit the breakpoints are expressed in (after conversion).
    pub unit: String,
    /// Decimal places the converted concentration is truncated to before lookup.
    #[serde(default)]
    pub precision: Option<u32>,
    #[serde(default)]
    pub conversion: Conversion,
    pub breakpoints: Vec<Breakpoint>,
}

/// Linear conversion from the source unit: `target = source * factor + offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub factor: Decimal,
    #[serde(default)]
    pub offset: Decimal,
    #[serde(default)]
    pub from_unit: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl Default for Conversion {
    fn default() -> Self {
        Conversion {
            factor: Decimal::ONE,
            offset: Decimal::ZERO,
            from_unit: None,
            note: None,
        }
    }
}

/// One segment of a breakpoint table: `[lo, hi]` maps linearly onto `[index_lo, index_hi]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub lo: Decimal,
    pub hi: Decimal,
    pub index_lo: u32,
    pub index_hi: u32,
}

impl Breakpoint {
    pub fn new(lo: Decimal, hi: Decimal, index_lo: u32, index_hi: u32) -> Self {
        Breakpoint {
            lo,
            hi,
            index_lo,
            index_hi,
        }
    }
}
