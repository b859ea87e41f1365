use hazewatch_core::error::HazeError;
use hazewatch_core::model::Pollutant;
use hazewatch_core::standards::builtin;
use hazewatch_core::standards::schema::IndexStandard;
use std::path::Path;

pub fn list() -> Result<(), HazeError> {
    println!("Available predefined index standards:\n");
    for name in builtin::PRESETS {
        let standard = builtin::load_preset(name)?;
        let default_marker = if *name == builtin::DEFAULT_PRESET {
            " [default]"
        } else {
            ""
        };
        println!(
            "  {:<8} {} (v{}){}",
            name, standard.name, standard.version, default_marker
        );
        if let Some(ref desc) = standard.description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn explain(preset: &str) -> Result<(), HazeError> {
    let standard = builtin::load_preset(preset)?;

    println!("{} (version {})\n", standard.name, standard.version);
    if let Some(ref desc) = standard.description {
        println!("{}\n", desc);
    }

    println!("Each pollutant's concentration is converted into the table's unit,");
    println!("truncated to the table's precision and interpolated linearly within");
    println!("the first band whose upper bound it does not exceed. The index is the");
    println!("highest sub-index over all pollutants the standard covers.\n");

    for ps in &standard.pollutants {
        println!("{} [{}]", ps.pollutant.label(), ps.pollutant);
        let conversion = &ps.conversion;
        let from = conversion.from_unit.as_deref().unwrap_or("reported unit");
        if conversion.offset.is_zero() {
            println!("  {} -> {}: x {}", from, ps.unit, conversion.factor);
        } else {
            println!(
                "  {} -> {}: x {} + {}",
                from, ps.unit, conversion.factor, conversion.offset
            );
        }
        if let Some(ref note) = conversion.note {
            println!("  ({})", note);
        }
        if let Some(dp) = ps.precision {
            println!("  truncated to {} decimal place(s)", dp);
        }
        println!();

        println!("  {:<22}  {}", format!("Concentration ({})", ps.unit), "Index");
        println!("  {}", "-".repeat(34));
        for bp in &ps.breakpoints {
            println!(
                "  {:<22}  {}-{}",
                format!("{} - {}", bp.lo, bp.hi),
                bp.index_lo,
                bp.index_hi
            );
        }
        println!();
    }

    let uncovered = uncovered(&standard);
    if !uncovered.is_empty() {
        println!(
            "Not covered (excluded from the index): {}\n",
            uncovered.join(", ")
        );
    }

    Ok(())
}

pub fn validate(file: &Path) -> Result<(), HazeError> {
    let standard = hazewatch_core::standards::load_standard(file)?;

    println!(
        "Index standard '{}' (v{}) is valid.",
        standard.name, standard.version
    );
    println!("  Pollutants: {}", standard.pollutants.len());

    // Not errors, but worth knowing about
    let mut warnings = Vec::new();
    for ps in &standard.pollutants {
        for pair in ps.breakpoints.windows(2) {
            if pair[1].index_lo > pair[0].index_hi.saturating_add(1) {
                warnings.push(format!(
                    "{}: index jumps from {} to {} between bands",
                    ps.pollutant, pair[0].index_hi, pair[1].index_lo
                ));
            }
        }
    }
    for p in uncovered(&standard) {
        warnings.push(format!("{} is not covered and will not affect the index", p));
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}

fn uncovered(standard: &IndexStandard) -> Vec<&'static str> {
    Pollutant::ALL
        .into_iter()
        .filter(|p| standard.pollutant(*p).is_none())
        .map(|p| p.key())
        .collect()
}
