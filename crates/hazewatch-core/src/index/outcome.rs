use crate::model::Pollutant;
use crate::standards::schema::Breakpoint;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sub-index of a single pollutant under a standard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubIndexResult {
    pub pollutant: Pollutant,
    /// Concentration actually looked up (converted and truncated).
    pub concentration: Decimal,
    /// Unit of `concentration`.
    pub unit: String,
    pub sub_index: u32,
    /// Breakpoint segment the value was interpolated on.
    pub segment: Breakpoint,
    /// True if the concentration lies above the table's ceiling.
    pub extrapolated: bool,
    /// Human-readable explanation of the lookup.
    pub reason: String,
}

/// Overall index for one region: the maximum of its sub-indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexResult {
    pub standard_name: String,
    pub index: u32,
    /// Pollutant(s) whose sub-index equals the overall index.
    pub determining_pollutants: Vec<Pollutant>,
    pub reason: String,
    pub sub_indices: Vec<SubIndexResult>,
    /// Pollutants present in the input that the standard has no table for.
    pub uncovered: Vec<Pollutant>,
}
