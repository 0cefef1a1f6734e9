//! Reconciliation with the remote feed, and the top-level entry point.

use super::TitleList;
use crate::error::{StoreError, TrackerError};
use crate::notice::Notices;
use crate::remote::{FeedRow, RemoteFeed};
use crate::storage::{KeyValueStore, Stores};

/// Shown to the user when the durable store cannot be read.
pub const LOCAL_FAILURE_NOTICE: &str =
    "Could not read saved titles. Restart the browser and try again.";

impl TitleList {
    /// Build from the durable store and refresh title metadata from the feed.
    ///
    /// The feed fetch and the local build both run to completion before
    /// anything is decided:
    /// - local build failed: fatal notice, empty collection
    /// - feed failed: local collection as-is
    /// - both succeeded: matching titles take the feed's name, author and
    ///   channels, and are re-persisted when any of them changed
    pub async fn from_local_and_sync<L, S, F>(
        stores: &Stores<L, S>,
        feed: &F,
        notices: &Notices,
    ) -> Result<Self, TrackerError>
    where
        L: KeyValueStore,
        S: KeyValueStore,
        F: RemoteFeed,
    {
        let (remote, local) = tokio::join!(feed.fetch_rows(), async {
            TitleList::from_local(stores)
        });

        let mut titles = match local {
            Ok(titles) => titles,
            Err(error) => {
                tracing::error!(%error, "failed to build title list from durable store");
                notices.fatal(LOCAL_FAILURE_NOTICE);
                return Ok(TitleList::new());
            }
        };

        let rows = match remote {
            Ok(rows) => rows,
            Err(error) => {
                tracing::warn!(%error, "remote feed unavailable; using local titles only");
                return Ok(titles);
            }
        };

        let updated = titles.apply_feed(&rows, stores)?;
        tracing::info!(rows = rows.len(), updated, "synced titles with remote feed");
        Ok(titles)
    }

    /// Copy feed metadata onto matching titles. Rows for unknown ids are ignored.
    ///
    /// Returns how many titles changed (and were re-persisted).
    pub fn apply_feed<L: KeyValueStore, S: KeyValueStore>(
        &mut self,
        rows: &[FeedRow],
        stores: &Stores<L, S>,
    ) -> Result<usize, StoreError> {
        let mut updated = 0;
        for row in rows {
            let Some(title) = self.get_mut(&row.id) else {
                continue;
            };
            if title.name == row.name && title.author == row.author && title.channels == row.channels {
                continue;
            }
            title.name = row.name.clone();
            title.author = row.author.clone();
            title.channels = row.channels.clone();
            title.save_to_local(stores)?;
            updated += 1;
        }
        Ok(updated)
    }

    /// The collection the UI should render.
    ///
    /// Returns the session snapshot when one exists. Otherwise runs
    /// [`TitleList::from_local_and_sync`] and caches its result.
    pub async fn init<L, S, F>(
        stores: &Stores<L, S>,
        feed: &F,
        notices: &Notices,
    ) -> Result<Self, TrackerError>
    where
        L: KeyValueStore,
        S: KeyValueStore,
        F: RemoteFeed,
    {
        if let Some(titles) = Self::from_session(stores)? {
            tracing::debug!("using cached title list");
            return Ok(titles);
        }
        let titles = Self::from_local_and_sync(stores, feed, notices).await?;
        titles.save_to_session(stores)?;
        Ok(titles)
    }
}
