use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::chapter::{newest_first, Chapter};
use crate::error::{StoreError, TrackerError, ValidationError};
use crate::keys::{title_id_problem, StoreKey};
use crate::record::{Entity, Record};
use crate::storage::{KeyValueStore, StoreExt, Stores};
use crate::title_list::TitleList;

/// Fields written to the durable store. Chapters persist as their own records.
const LOCAL_FIELDS: &[&str] = &["name", "author", "touched", "channels"];

/// Fields written to the session snapshot.
const SESSION_FIELDS: &[&str] = &["id", "name", "author", "touched", "channels", "chapters"];

/// A tracked work: metadata plus an owned chapter list.
///
/// The chapter list is only reachable read-only; every mutation goes through
/// a method that keeps the sortedness flag honest, and the readers that need
/// canonical order ([`Title::last_chapter`], [`Title::sorted_chapters`])
/// restore it lazily.
#[derive(Debug, Clone)]
pub struct Title {
    pub id: String,
    pub name: String,
    pub author: String,
    /// Recency marker, used for display order only. Never bumped by this crate.
    pub touched: i64,
    /// Display-only channel list, as delivered by the remote feed.
    pub channels: Option<String>,
    chapters: Vec<Chapter>,
    sorted: bool,
}

impl PartialEq for Title {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.author == other.author
            && self.touched == other.touched
            && self.channels == other.channels
            && self.chapters == other.chapters
    }
}

impl Eq for Title {}

impl Entity for Title {
    const NAME: &'static str = "Title";
    const REQUIRED: &'static [&'static str] = &["id", "name", "author", "touched", "chapters"];

    fn from_record(record: Record) -> Result<Self, ValidationError> {
        let record = record.merge_defaults(
            Record::new()
                .with("name", "")
                .with("author", "")
                .with("touched", 0)
                .with("chapters", Value::Array(Vec::new())),
        );
        record.required(Self::NAME, Self::REQUIRED)?;

        let id = record.text(Self::NAME, "id")?;
        if let Some(reason) = title_id_problem(&id) {
            return Err(ValidationError::invalid(Self::NAME, "id", reason));
        }

        let chapters = record
            .array(Self::NAME, "chapters")?
            .into_iter()
            .map(|value| {
                let chapter = Record::from_value(value)?
                    .merge_defaults(Record::new().with("titleId", id.as_str()));
                Chapter::from_record(chapter)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: record.text(Self::NAME, "name")?,
            author: record.text(Self::NAME, "author")?,
            touched: record.number(Self::NAME, "touched")?,
            channels: record.optional_text(Self::NAME, "channels")?,
            id,
            chapters,
            sorted: false,
        })
    }

    fn to_record(&self) -> Record {
        let mut record = Record::new()
            .with("id", self.id.as_str())
            .with("name", self.name.as_str())
            .with("author", self.author.as_str())
            .with("touched", self.touched);
        if let Some(channels) = &self.channels {
            record.insert("channels", channels.as_str());
        }
        let chapters = self
            .chapters
            .iter()
            .map(|chapter| chapter.compact(&["code", "no", "name"]).into_value())
            .collect::<Vec<_>>();
        record.with("chapters", chapters)
    }
}

impl Title {
    /// A title with default metadata and no chapters.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id: String = id.into();
        Self::from_record(Record::new().with("id", id))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_touched(mut self, touched: i64) -> Self {
        self.touched = touched;
        self
    }

    pub fn with_channels(mut self, channels: impl Into<String>) -> Self {
        self.channels = Some(channels.into());
        self
    }

    pub fn key(&self) -> StoreKey {
        StoreKey::title(self.id.as_str())
    }

    /// Chapters in their current order, which is canonical only if [`Title::is_sorted`].
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Write the metadata record to the durable store.
    pub fn save_to_local<L: KeyValueStore, S: KeyValueStore>(
        &self,
        stores: &Stores<L, S>,
    ) -> Result<&Self, StoreError> {
        stores
            .local
            .set(&self.key().encode(), &self.compact(LOCAL_FIELDS))?;
        Ok(self)
    }

    /// Insert or overwrite this title in the session snapshot.
    ///
    /// Does nothing when no snapshot is cached yet. Returns true if it wrote.
    pub fn save_to_session<L: KeyValueStore, S: KeyValueStore>(
        &self,
        stores: &Stores<L, S>,
    ) -> Result<bool, TrackerError> {
        let Some(mut titles) = TitleList::from_session(stores)? else {
            tracing::debug!(id = %self.id, "no session cache; skipping session update");
            return Ok(false);
        };
        titles.insert(self.clone());
        titles.save_to_session(stores)?;
        Ok(true)
    }

    /// Remove the metadata record and the session entry.
    ///
    /// Chapter records stay in the durable store; see [`Title::delete_with_chapters`].
    pub fn delete<L: KeyValueStore, S: KeyValueStore>(
        &self,
        stores: &Stores<L, S>,
    ) -> Result<(), TrackerError> {
        stores.local.remove(&self.key().encode())?;
        if let Some(mut titles) = TitleList::from_session(stores)? {
            titles.remove(&self.id);
            titles.save_to_session(stores)?;
        }
        Ok(())
    }

    /// [`Title::delete`], plus every chapter record stored under this title.
    ///
    /// Returns how many chapter records were removed.
    pub fn delete_with_chapters<L: KeyValueStore, S: KeyValueStore>(
        &self,
        stores: &Stores<L, S>,
    ) -> Result<usize, TrackerError> {
        let mut removed = 0;
        for raw in stores.local.keys()? {
            if let StoreKey::Chapter { title_id, .. } = StoreKey::parse(&raw) {
                if title_id == self.id && stores.local.remove(&raw)? {
                    removed += 1;
                }
            }
        }
        self.delete(stores)?;
        tracing::debug!(id = %self.id, chapters = removed, "deleted title with chapters");
        Ok(removed)
    }

    /// Append without persisting or re-sorting. Use for batches followed by one
    /// [`Title::sort_chapters`].
    pub fn add_chapter_without_update(&mut self, chapter: Chapter) -> &mut Self {
        self.chapters.push(chapter);
        self.sorted = false;
        self
    }

    /// Persist the chapter, append it, re-sort, and refresh the session snapshot.
    pub fn add_single_chapter<L: KeyValueStore, S: KeyValueStore>(
        &mut self,
        chapter: Chapter,
        stores: &Stores<L, S>,
    ) -> Result<&mut Self, TrackerError> {
        chapter.save_to_local(stores)?;
        self.add_chapter_without_update(chapter).sort_chapters();
        self.save_to_session(stores)?;
        Ok(self)
    }

    /// Sort chapters into canonical order (descending `no`, compared as text).
    pub fn sort_chapters(&mut self) -> &mut Self {
        self.chapters.sort_by(newest_first);
        self.sorted = true;
        self
    }

    /// Chapters in canonical order, sorting first if needed.
    pub fn sorted_chapters(&mut self) -> &[Chapter] {
        if !self.sorted {
            self.sort_chapters();
        }
        &self.chapters
    }

    /// The chapter with the greatest `no`, if any.
    pub fn last_chapter(&mut self) -> Option<&Chapter> {
        self.sorted_chapters().first()
    }

    /// Drop the first chapter with `code`. Order of the rest is unchanged.
    pub(crate) fn remove_chapter(&mut self, code: &str) -> Option<Chapter> {
        let index = self.chapters.iter().position(|c| c.code == code)?;
        Some(self.chapters.remove(index))
    }

    /// Load the metadata record stored under `id`. Chapters are not loaded.
    pub fn from_local<L: KeyValueStore, S: KeyValueStore>(
        stores: &Stores<L, S>,
        id: &str,
    ) -> Result<Option<Self>, TrackerError> {
        let Some(value) = stores.local.get(&StoreKey::title(id).encode())? else {
            return Ok(None);
        };
        Ok(Some(Self::from_keyed(id, value)?))
    }

    /// Build from a value stored under `id`. The key is the title's id.
    pub(crate) fn from_keyed(id: &str, value: Value) -> Result<Self, ValidationError> {
        let mut record = Record::from_value(value)?;
        record.insert("id", id);
        Self::from_record(record)
    }
}

impl Serialize for Title {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        self.compact(SESSION_FIELDS).serialize(serializer)
    }
}
