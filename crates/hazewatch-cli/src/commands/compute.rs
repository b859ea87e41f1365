use hazewatch_core::error::HazeError;
use std::path::PathBuf;

use super::{emit, load_setup};
use crate::{OutputArgs, SourceArgs};

pub fn run(
    primary_html: PathBuf,
    secondary_html: Option<PathBuf>,
    source: &SourceArgs,
    output: &OutputArgs,
) -> Result<(), HazeError> {
    let (config, standard) = load_setup(source)?;

    let primary = std::fs::read_to_string(&primary_html)?;
    let secondary = secondary_html
        .map(std::fs::read_to_string)
        .transpose()?;

    let document =
        hazewatch_core::compute(&primary, secondary.as_deref(), &config, &standard)?;
    emit(&document, output)
}
