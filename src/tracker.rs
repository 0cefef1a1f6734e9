//! Tracker - the surface the UI layer drives.
//!
//! Bundles the store handles, the remote feed and the notice channel, and
//! exposes the handful of operations a page needs: obtain the collection
//! once, then add or remove titles and chapters as the user acts.
//!
//! ## Example
//!
//! ```ignore
//! use reading_progress::{InMemoryStore, JsonFileStore, StaticFeed, Stores, Tracker};
//!
//! let stores = Stores::new(JsonFileStore::open("progress.json")?, InMemoryStore::new());
//! let tracker = Tracker::new(stores, StaticFeed::unavailable("offline"));
//! let mut titles = tracker.init().await?;
//! for title in titles.to_sorted_arr() {
//!     println!("{} ({})", title.name, title.chapters().len());
//! }
//! ```

use crate::chapter::Chapter;
use crate::error::TrackerError;
use crate::notice::Notices;
use crate::remote::RemoteFeed;
use crate::storage::{KeyValueStore, Stores};
use crate::title::Title;
use crate::title_list::TitleList;

pub struct Tracker<L, S, F> {
    stores: Stores<L, S>,
    feed: F,
    notices: Notices,
}

impl<L, S, F> Tracker<L, S, F>
where
    L: KeyValueStore,
    S: KeyValueStore,
    F: RemoteFeed,
{
    pub fn new(stores: Stores<L, S>, feed: F) -> Self {
        Self {
            stores,
            feed,
            notices: Notices::new(),
        }
    }

    pub fn with_notices(mut self, notices: Notices) -> Self {
        self.notices = notices;
        self
    }

    pub fn stores(&self) -> &Stores<L, S> {
        &self.stores
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    /// See [`TitleList::init`].
    pub async fn init(&self) -> Result<TitleList, TrackerError> {
        TitleList::init(&self.stores, &self.feed, &self.notices).await
    }

    /// Persist a new (or edited) title and register it in the session snapshot.
    pub fn add_title(&self, titles: &mut TitleList, title: Title) -> Result<(), TrackerError> {
        title.save_to_local(&self.stores)?;
        title.save_to_session(&self.stores)?;
        titles.insert(title);
        Ok(())
    }

    /// Add a chapter to its title. Returns false when the title is unknown.
    pub fn add_chapter(&self, titles: &mut TitleList, chapter: Chapter) -> Result<bool, TrackerError> {
        let Some(title) = titles.get_mut(&chapter.title_id) else {
            tracing::debug!(title_id = %chapter.title_id, "cannot add chapter to unknown title");
            return Ok(false);
        };
        title.add_single_chapter(chapter, &self.stores)?;
        Ok(true)
    }

    /// Remove a chapter everywhere. Returns false when it is not in `titles`.
    pub fn remove_chapter(
        &self,
        titles: &mut TitleList,
        title_id: &str,
        code: &str,
    ) -> Result<bool, TrackerError> {
        let Some(chapter) = titles
            .get_mut(title_id)
            .and_then(|title| title.remove_chapter(code))
        else {
            return Ok(false);
        };
        chapter.remove_from_local_and_session(&self.stores)?;
        Ok(true)
    }

    /// Delete a title, optionally with its chapter records. Returns false when unknown.
    pub fn delete_title(
        &self,
        titles: &mut TitleList,
        id: &str,
        with_chapters: bool,
    ) -> Result<bool, TrackerError> {
        let Some(title) = titles.remove(id) else {
            return Ok(false);
        };
        if with_chapters {
            title.delete_with_chapters(&self.stores)?;
        } else {
            title.delete(&self.stores)?;
        }
        Ok(true)
    }
}
