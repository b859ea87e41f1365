use hazewatch_core::config::{load_config, SourceConfig};
use hazewatch_core::error::HazeError;
use std::path::Path;

pub fn show(file: Option<&Path>) -> Result<(), HazeError> {
    let config = match file {
        Some(path) => load_config(path)?,
        None => SourceConfig::default(),
    };
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
