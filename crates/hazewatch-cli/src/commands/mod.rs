pub mod compute;
pub mod config;
pub mod scrape;
pub mod standards;

use crate::output;
use crate::{OutputArgs, SourceArgs};
use chrono::DateTime;
use hazewatch_core::config::{load_config, validate_config, SourceConfig};
use hazewatch_core::error::HazeError;
use hazewatch_core::model::ReadingsDocument;
use hazewatch_core::standards::builtin;
use hazewatch_core::standards::schema::IndexStandard;
use std::path::{Path, PathBuf};
use tracing::info;

/// Resolve the configuration and index standard from the command line.
pub fn load_setup(args: &SourceArgs) -> Result<(SourceConfig, IndexStandard), HazeError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SourceConfig::default(),
    };
    if let Some(url) = &args.primary_url {
        config.primary_url = url.clone();
    }
    if let Some(url) = &args.secondary_url {
        config.secondary_url = Some(url.clone());
    }
    validate_config(&config)?;

    let standard = match (&args.standard, &args.preset) {
        (Some(path), _) => hazewatch_core::standards::load_standard(path)?,
        (None, Some(name)) => builtin::load_preset(name)?,
        (None, None) => builtin::load_preset(builtin::DEFAULT_PRESET)?,
    };

    Ok((config, standard))
}

/// Print, save and archive a finished document as requested.
pub fn emit(document: &ReadingsDocument, args: &OutputArgs) -> Result<(), HazeError> {
    match args.output.as_str() {
        "json" => output::json::print(document)?,
        _ => output::table::print(document, args.verbose),
    }

    if let Some(path) = &args.out {
        let json = serde_json::to_string_pretty(document)?;
        std::fs::write(path, json)?;
        eprintln!(
            "Readings for {} region(s) written to {}",
            document.regions.len(),
            path.display()
        );
    }

    if let Some(dir) = &args.archive {
        let path = archive(document, dir)?;
        info!(path = %path.display(), "document archived");
    }

    Ok(())
}

/// Store the document at `dir/YYYY/MM/DD/HHMM.json`, keyed by its own time.
pub fn archive(document: &ReadingsDocument, dir: &Path) -> Result<PathBuf, HazeError> {
    let path = dir.join(archive_path(&document.time)?);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, serde_json::to_string_pretty(document)?)?;
    Ok(path)
}

fn archive_path(time: &str) -> Result<PathBuf, HazeError> {
    let at = DateTime::parse_from_str(time, hazewatch_core::aggregate::TIME_FORMAT).map_err(|e| {
        HazeError::ParseFailure(format!("document time '{}' is not a timestamp: {}", time, e))
    })?;
    Ok(PathBuf::from(at.format("%Y/%m/%d/%H%M.json").to_string()))
}
