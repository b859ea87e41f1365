use super::PageSource;
use crate::error::HazeError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::debug;

pub const USER_AGENT: &str = concat!("hazewatch/", env!("CARGO_PKG_VERSION"));

/// `PageSource` over plain HTTP(S).
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<Self, HazeError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| HazeError::FetchFailure {
                url: String::new(),
                reason: format!("could not build HTTP client: {}", e),
            })?;
        Ok(Self::with_client(client))
    }

    /// Use an already configured client, e.g. one with a proxy or extra headers.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn fetch_page(&self, url: &str) -> Result<String, HazeError> {
        let failure = |reason: String| HazeError::FetchFailure {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| failure(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(failure(format!("unexpected status {}", status)));
        }

        let body = response.text().await.map_err(|e| failure(e.to_string()))?;
        debug!(url, bytes = body.len(), "page fetched");
        Ok(body)
    }

    fn backend_name(&self) -> &str {
        "http"
    }
}
