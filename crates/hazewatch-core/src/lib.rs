pub mod aggregate;
pub mod completeness;
pub mod config;
pub mod error;
pub mod fetch;
pub mod index;
pub mod model;
pub mod parsing;
pub mod standards;

use config::{validate_config, SourceConfig};
use error::HazeError;
use fetch::PageSource;
use model::{ReadingsDocument, SecondaryPage};
use standards::schema::IndexStandard;
use tracing::{debug, info};

/// Main API entry point: fetch both pages and build the readings document.
///
/// The config is validated before anything is fetched. The primary page is
/// fetched and parsed first; the secondary page is only requested when one is
/// configured. Any failure aborts the cycle.
pub async fn scrape(
    source: &dyn PageSource,
    config: &SourceConfig,
    standard: &IndexStandard,
) -> Result<ReadingsDocument, HazeError> {
    validate_config(config)?;

    info!(backend = source.backend_name(), url = %config.primary_url, "fetching primary page");
    let primary_html = source.fetch_page(&config.primary_url).await?;
    let primary = parsing::parse_primary_page(&primary_html, config)?;
    debug!(anchor = %primary.anchor()?, "primary page anchored");

    let secondary = match &config.secondary_url {
        Some(url) => {
            info!(backend = source.backend_name(), %url, "fetching secondary page");
            let html = source.fetch_page(url).await?;
            Some(parsing::parse_secondary_page(&html, config)?)
        }
        None => None,
    };

    aggregate::aggregate(&primary, secondary.as_ref(), config, standard)
}

/// Build the readings document from pages that were already fetched.
pub fn compute(
    primary_html: &str,
    secondary_html: Option<&str>,
    config: &SourceConfig,
    standard: &IndexStandard,
) -> Result<ReadingsDocument, HazeError> {
    validate_config(config)?;

    let primary = parsing::parse_primary_page(primary_html, config)?;
    let secondary: Option<SecondaryPage> = secondary_html
        .map(|html| parsing::parse_secondary_page(html, config))
        .transpose()?;

    aggregate::aggregate(&primary, secondary.as_ref(), config, standard)
}
