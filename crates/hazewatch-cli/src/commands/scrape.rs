use hazewatch_core::error::HazeError;
use hazewatch_core::fetch::HttpSource;
use std::time::Duration;

use super::{emit, load_setup};
use crate::{OutputArgs, SourceArgs};

pub async fn run(source: &SourceArgs, output: &OutputArgs, timeout: u64) -> Result<(), HazeError> {
    let (config, standard) = load_setup(source)?;
    let http = HttpSource::new(Duration::from_secs(timeout))?;

    let document = hazewatch_core::scrape(&http, &config, &standard).await?;
    emit(&document, output)
}
