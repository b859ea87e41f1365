use crate::index::outcome::{IndexResult, SubIndexResult};
use crate::model::Pollutant;
use crate::standards::schema::{Breakpoint, IndexStandard, PollutantStandard};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;

/// Interpolate a concentration over a breakpoint table.
///
/// Tuples are tried in ascending order and the first one whose upper bound is not
/// below the concentration is used. Values under that tuple's lower bound (below the
/// table floor, or in a gap between tuples) are clamped to it. Values above the
/// ceiling use the last tuple's slope. Returns `None` for an empty table.
pub fn interpolate(
    breakpoints: &[Breakpoint],
    concentration: Decimal,
) -> Option<(u32, Breakpoint)> {
    let last = breakpoints.last()?;
    let segment = breakpoints
        .iter()
        .find(|bp| concentration <= bp.hi)
        .unwrap_or(last);
    let c = concentration.max(segment.lo);

    let index_span = Decimal::from(segment.index_hi.saturating_sub(segment.index_lo));
    let index_lo = Decimal::from(segment.index_lo);
    // Multiply before dividing so exact segments stay exact.
    let value = index_span
        .checked_mul(c - segment.lo)
        .and_then(|v| v.checked_div(segment.hi - segment.lo))
        .and_then(|v| v.checked_add(index_lo));

    let index = match value {
        Some(v) => v
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .unwrap_or(u32::MAX),
        None => u32::MAX,
    };
    Some((index, *segment))
}

/// Sub-index of one pollutant, given a concentration already in the standard's unit.
pub fn sub_index(standard: &PollutantStandard, concentration: Decimal) -> Option<SubIndexResult> {
    let looked_up = match standard.precision {
        Some(dp) => concentration.round_dp_with_strategy(dp, RoundingStrategy::ToZero),
        None => concentration,
    };
    let (index, segment) = interpolate(&standard.breakpoints, looked_up)?;
    let extrapolated = standard
        .breakpoints
        .last()
        .map(|bp| looked_up > bp.hi)
        .unwrap_or(false);

    let reason = if extrapolated {
        format!(
            "{}: {} {} above ceiling {}, extrapolated on {}-{} -> {}",
            standard.pollutant,
            looked_up,
            standard.unit,
            segment.hi,
            segment.index_lo,
            segment.index_hi,
            index
        )
    } else {
        format!(
            "{}: {} {} in {}-{} ({}-{}) -> {}",
            standard.pollutant,
            looked_up,
            standard.unit,
            segment.lo,
            segment.hi,
            segment.index_lo,
            segment.index_hi,
            index
        )
    };

    Some(SubIndexResult {
        pollutant: standard.pollutant,
        concentration: looked_up,
        unit: standard.unit.clone(),
        sub_index: index,
        segment,
        extrapolated,
        reason,
    })
}

/// Overall index of a set of converted concentrations: the maximum sub-index.
///
/// Pollutants without a table in the standard are left out of the maximum, never
/// counted as zero. Returns `None` if no pollutant is covered.
pub fn overall_index(
    concentrations: &BTreeMap<Pollutant, Decimal>,
    standard: &IndexStandard,
) -> Option<IndexResult> {
    let mut sub_indices = Vec::new();
    let mut uncovered = Vec::new();

    for (&pollutant, &value) in concentrations {
        match standard.pollutant(pollutant).and_then(|ps| sub_index(ps, value)) {
            Some(result) => sub_indices.push(result),
            None => uncovered.push(pollutant),
        }
    }

    let index = sub_indices.iter().map(|r| r.sub_index).max()?;
    let determining: Vec<Pollutant> = sub_indices
        .iter()
        .filter(|r| r.sub_index == index)
        .map(|r| r.pollutant)
        .collect();

    let reason = if determining.len() == 1 {
        format!("Determined by {} ({})", determining[0], index)
    } else {
        format!(
            "Determined by {} pollutants at {}",
            determining.len(),
            index
        )
    };

    Some(IndexResult {
        standard_name: standard.name.clone(),
        index,
        determining_pollutants: determining,
        reason,
        sub_indices,
        uncovered,
    })
}
