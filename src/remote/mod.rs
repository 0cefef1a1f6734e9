//! Remote feed - read-only tab-separated title metadata.
//!
//! The body is one header line (discarded) followed by one line per title:
//! `id<TAB>name<TAB>author<TAB>channels`.

#[cfg(feature = "http")]
mod http;

use std::future::Future;

use crate::error::FeedError;

#[cfg(feature = "http")]
pub use http::HttpFeed;

/// One data line of the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRow {
    pub id: String,
    pub name: String,
    pub author: String,
    pub channels: Option<String>,
}

/// Source of the feed body.
pub trait RemoteFeed: Send + Sync {
    /// Fetch the raw feed text.
    fn fetch_text(&self) -> impl Future<Output = Result<String, FeedError>> + Send;

    /// Fetch and parse the feed.
    fn fetch_rows(&self) -> impl Future<Output = Result<Vec<FeedRow>, FeedError>> + Send {
        async move { Ok(parse_feed(&self.fetch_text().await?)) }
    }
}

/// Parse a feed body. Blank lines and lines without name and author are skipped.
pub fn parse_feed(text: &str) -> Vec<FeedRow> {
    text.lines()
        .skip(1)
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let row = match (fields.next(), fields.next(), fields.next()) {
                (Some(id), Some(name), Some(author)) if !id.is_empty() => FeedRow {
                    id: id.to_string(),
                    name: name.to_string(),
                    author: author.to_string(),
                    channels: fields.next().map(str::to_string),
                },
                _ => {
                    tracing::debug!(line, "skipping malformed feed line");
                    return None;
                }
            };
            Some(row)
        })
        .collect()
}

/// A feed with a fixed outcome. Serves offline runs and tests.
#[derive(Debug, Clone)]
pub struct StaticFeed {
    outcome: Result<String, FeedError>,
}

impl StaticFeed {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            outcome: Ok(text.into()),
        }
    }

    /// A feed that always fails, leaving callers with local data only.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            outcome: Err(FeedError::Unavailable(reason.into())),
        }
    }
}

impl RemoteFeed for StaticFeed {
    async fn fetch_text(&self) -> Result<String, FeedError> {
        self.outcome.clone()
    }
}
