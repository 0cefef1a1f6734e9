//! Tracker configuration.
//!
//! Defaults match the hosted feed. Every field can be overridden through
//! `READING_PROGRESS_*` environment variables, or deserialized from any serde
//! source.

use std::env;
use std::time::Duration;

use serde::Deserialize;

use crate::storage::DEFAULT_SESSION_KEY;

pub const DEFAULT_FEED_URL: &str = "https://atkg.cafe24.com/23gekr_files/titles.tsv";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Where the tab-separated title feed is fetched from.
    pub feed_url: String,
    /// Session-cache key holding the collection snapshot.
    pub session_key: String,
    /// Optional bound on the feed request. `None` waits as long as the request does.
    pub feed_timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.to_string(),
            session_key: DEFAULT_SESSION_KEY.to_string(),
            feed_timeout_secs: None,
            user_agent: concat!("reading_progress/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl TrackerConfig {
    /// Defaults overridden by whichever `READING_PROGRESS_*` variables are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("READING_PROGRESS_FEED_URL") {
            config.feed_url = url;
        }
        if let Some(key) = lookup("READING_PROGRESS_SESSION_KEY") {
            config.session_key = key;
        }
        if let Some(secs) = lookup("READING_PROGRESS_FEED_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(secs) => config.feed_timeout_secs = Some(secs),
                Err(_) => tracing::warn!(value = %secs, "ignoring unparsable feed timeout"),
            }
        }
        if let Some(agent) = lookup("READING_PROGRESS_USER_AGENT") {
            config.user_agent = agent;
        }
        config
    }

    pub fn feed_timeout(&self) -> Option<Duration> {
        self.feed_timeout_secs.map(Duration::from_secs)
    }
}
