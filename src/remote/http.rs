//! HttpFeed - fetches the feed body over HTTP with reqwest.

use std::time::Duration;

use reqwest::Client;

use super::RemoteFeed;
use crate::config::TrackerConfig;
use crate::error::FeedError;

pub struct HttpFeed {
    client: Client,
    url: String,
    user_agent: String,
    timeout: Option<Duration>,
}

impl HttpFeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            user_agent: TrackerConfig::default().user_agent,
            timeout: None,
        }
    }

    pub fn from_config(config: &TrackerConfig) -> Self {
        Self {
            client: Client::new(),
            url: config.feed_url.clone(),
            user_agent: config.user_agent.clone(),
            timeout: config.feed_timeout(),
        }
    }

    /// Bound the whole request. Without one a hung request waits indefinitely.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RemoteFeed for HttpFeed {
    async fn fetch_text(&self) -> Result<String, FeedError> {
        let mut request = self
            .client
            .get(&self.url)
            .header("User-Agent", &self.user_agent);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FeedError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FeedError::Body(e.to_string()))?;
        tracing::debug!(url = %self.url, bytes = body.len(), "fetched remote feed");
        Ok(body)
    }
}
