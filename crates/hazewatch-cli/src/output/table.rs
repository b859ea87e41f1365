use hazewatch_core::model::{Pollutant, Reading, ReadingsDocument};

pub fn print(document: &ReadingsDocument, verbose: bool) {
    print!("{}", format_document(document, verbose));
}

/// Render a readings document as a per-region table.
pub fn format_document(document: &ReadingsDocument, verbose: bool) -> String {
    let mut out = String::new();

    out.push_str(&format!("Readings as of {}\n\n", document.time));

    let width = document
        .regions
        .keys()
        .map(|r| r.len())
        .max()
        .unwrap_or(6)
        .max("Region".len());

    out.push_str(&format!(
        "  {:<width$}  {:>7}  {:>5}  {:>9}\n",
        "Region",
        "PSI 24h",
        "AQI",
        "PM2.5 1h",
        width = width
    ));
    out.push_str(&format!("  {}\n", "-".repeat(width + 29)));

    for (region, reading) in &document.regions {
        out.push_str(&format!(
            "  {:<width$}  {:>7}  {:>5}  {:>9}\n",
            region,
            opt(reading.psi_24h),
            opt(reading.aqi),
            opt(reading.pm2_5_1h.map(|v| v.normalize())),
            width = width
        ));
    }
    out.push('\n');

    let overall = &document.overall;
    out.push_str(&format!("  3-hr PSI:        {}\n", overall.psi_3h.normalize()));
    out.push_str(&format!(
        "  24-hr PSI range: {}\n",
        overall.psi_24h.as_deref().unwrap_or("-")
    ));
    out.push_str(&format!(
        "  1-hr PM2.5:      {}\n",
        overall
            .pm2_5_1h
            .as_deref()
            .map(|r| format!("{} µg/m³", r))
            .unwrap_or_else(|| "-".to_string())
    ));

    if verbose {
        for (region, reading) in &document.regions {
            out.push('\n');
            out.push_str(&format_region(region, reading, document));
        }
    }

    out
}

fn format_region(region: &str, reading: &Reading, document: &ReadingsDocument) -> String {
    let mut out = format!("=== {} ===\n", region);

    for pollutant in Pollutant::ALL {
        let Some(value) = reading.concentrations.get(&pollutant) else {
            continue;
        };
        let published = reading
            .psi_sub_index
            .get(&pollutant)
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "  {:<12} {:>8}  PSI sub-index {}\n",
            pollutant.label(),
            value.normalize(),
            published
        ));
    }

    match document.breakdown.get(region) {
        Some(result) => {
            out.push_str(&format!(
                "\n  {}: {} ({})\n",
                result.standard_name, result.index, result.reason
            ));
            for sub in &result.sub_indices {
                out.push_str(&format!("    {}\n", sub.reason));
            }
            if !result.uncovered.is_empty() {
                let names: Vec<&str> = result.uncovered.iter().map(|p| p.key()).collect();
                out.push_str(&format!("    not covered: {}\n", names.join(", ")));
            }
        }
        None => out.push_str("\n  No pollutant covered by the index standard\n"),
    }

    out
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hazewatch_core::config::SourceConfig;
    use hazewatch_core::standards::builtin::load_preset;

    const PRIMARY: &str =
        include_str!("../../../hazewatch-core/tests/fixtures/pollutant-concentrations.html");

    fn document() -> ReadingsDocument {
        let epa = load_preset("aqi_epa").unwrap();
        hazewatch_core::compute(PRIMARY, None, &SourceConfig::default(), &epa).unwrap()
    }

    #[test]
    fn test_summary_table() {
        let text = format_document(&document(), false);
        assert!(text.starts_with("Readings as of 2014-06-19T13:00+0800"));
        assert!(text.contains("3-hr PSI:        57"));
        assert!(text.contains("24-hr PSI range: 52-82"));
        assert!(!text.contains("=== south ==="));
    }

    #[test]
    fn test_verbose_explains_index() {
        let text = format_document(&document(), true);
        assert!(text.contains("=== south ==="));
        assert!(text.contains("Determined by pm2_5_24h (115)"));
        assert!(text.contains("PM2.5 (24h)"));
    }
}
