pub mod http;

use crate::error::HazeError;
use async_trait::async_trait;

pub use http::HttpSource;

/// Something that can return the HTML body behind a URL.
///
/// The scraper only ever asks for whole pages; retries and caching are the
/// implementor's business.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String, HazeError>;

    /// Short name for logs, e.g. "http".
    fn backend_name(&self) -> &str;
}
