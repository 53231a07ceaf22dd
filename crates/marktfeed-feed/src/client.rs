//! HTTP client for the upstream product feed.

use std::time::Duration;

use reqwest::Client;

use crate::error::FeedError;

/// HTTP client fetching the upstream feed document.
///
/// One GET per call with a bounded timeout and a custom `User-Agent`.
/// Non-success statuses become typed errors. There are no automatic
/// retries: a failed fetch fails the request it belongs to and nothing
/// else.
#[derive(Clone)]
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    /// Creates a `FeedClient` with the configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches the feed document at `url` and returns its body as text.
    ///
    /// # Errors
    ///
    /// - [`FeedError::UpstreamStatus`] — any non-2xx response.
    /// - [`FeedError::Http`] — network failure or exceeded timeout.
    pub async fn fetch(&self, url: &str) -> Result<String, FeedError> {
        tracing::debug!(url, "fetching upstream feed");
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FeedError::UpstreamStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }
}
