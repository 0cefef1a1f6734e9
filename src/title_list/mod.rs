//! TitleList - the keyed collection of titles, and the ways to build it.
//!
//! - [`TitleList::from_local`] scans the durable store (titles first, then chapters)
//! - [`TitleList::from_session`] reads the cached snapshot verbatim
//! - [`TitleList::from_local_and_sync`] and [`TitleList::init`] live in `sync`

mod sync;

pub use sync::LOCAL_FAILURE_NOTICE;

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::chapter::Chapter;
use crate::error::{StoreError, TrackerError, ValidationError};
use crate::keys::StoreKey;
use crate::record::{Collection, Entity, Record};
use crate::storage::{KeyValueStore, StoreExt, Stores};
use crate::title::Title;

/// Titles keyed by id. Every key equals its title's `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleList {
    titles: BTreeMap<String, Title>,
}

impl Collection for TitleList {
    fn size(&self) -> usize {
        self.titles.len()
    }
}

impl TitleList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_titles(titles: impl IntoIterator<Item = Title>) -> Self {
        titles.into_iter().collect()
    }

    /// Build from a JSON object of `id -> raw title`. The key is the title's id.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        let Value::Object(entries) = value else {
            return Err(ValidationError::invalid(
                "TitleList",
                "<root>",
                "expected an object keyed by title id",
            ));
        };
        let mut titles = Self::new();
        for (id, raw) in entries {
            let mut record = Record::from_value(raw)?;
            record.insert("id", id);
            titles.insert(Title::from_record(record)?);
        }
        Ok(titles)
    }

    /// Insert or overwrite by id. Returns the title previously stored there.
    pub fn insert(&mut self, title: Title) -> Option<Title> {
        self.titles.insert(title.id.clone(), title)
    }

    pub fn remove(&mut self, id: &str) -> Option<Title> {
        self.titles.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Title> {
        self.titles.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Title> {
        self.titles.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.titles.contains_key(id)
    }

    /// Titles in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Title> {
        self.titles.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Title> {
        self.titles.values_mut()
    }

    /// Display order: most recently touched first. Ties keep id order.
    pub fn to_sorted_arr(&self) -> Vec<&Title> {
        let mut sorted: Vec<&Title> = self.titles.values().collect();
        sorted.sort_by(|a, b| b.touched.cmp(&a.touched));
        sorted
    }

    /// Replace the session snapshot with this collection.
    pub fn save_to_session<L: KeyValueStore, S: KeyValueStore>(
        &self,
        stores: &Stores<L, S>,
    ) -> Result<(), StoreError> {
        stores.session.set(stores.session_key(), self)
    }

    /// The cached snapshot, or `None` when nothing is cached.
    pub fn from_session<L: KeyValueStore, S: KeyValueStore>(
        stores: &Stores<L, S>,
    ) -> Result<Option<Self>, TrackerError> {
        match stores.session.get(stores.session_key())? {
            Some(value) => Ok(Some(Self::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Build the collection from a full scan of the durable store.
    ///
    /// Title records are read before any chapter record, so chapter order in
    /// the raw key listing never matters. Chapters whose title record is
    /// missing are dropped. Reserved keys are skipped. Every title ends up
    /// sorted.
    pub fn from_local<L: KeyValueStore, S: KeyValueStore>(
        stores: &Stores<L, S>,
    ) -> Result<Self, TrackerError> {
        let mut raw_keys = stores.local.keys()?;
        raw_keys.sort();

        let mut titles = Self::new();
        let mut chapter_keys = Vec::new();
        for raw in &raw_keys {
            match StoreKey::parse(raw) {
                StoreKey::Title(id) => {
                    if let Some(value) = stores.local.get(raw)? {
                        titles.insert(Title::from_keyed(&id, value)?);
                    }
                }
                StoreKey::Chapter { title_id, code } => chapter_keys.push((raw, title_id, code)),
                StoreKey::Reserved(_) => {}
            }
        }

        for (raw, title_id, code) in chapter_keys {
            let Some(title) = titles.get_mut(&title_id) else {
                tracing::debug!(key = %raw, "skipping chapter without a title record");
                continue;
            };
            if let Some(value) = stores.local.get(raw)? {
                title.add_chapter_without_update(Chapter::from_stored(&title_id, &code, value)?);
            }
        }

        for title in titles.iter_mut() {
            title.sort_chapters();
        }

        tracing::debug!(titles = titles.size(), "built title list from durable store");
        Ok(titles)
    }
}

impl FromIterator<Title> for TitleList {
    fn from_iter<I: IntoIterator<Item = Title>>(iter: I) -> Self {
        let mut titles = Self::new();
        for title in iter {
            titles.insert(title);
        }
        titles
    }
}

impl Serialize for TitleList {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut map = serializer.serialize_map(Some(self.titles.len()))?;
        for (id, title) in &self.titles {
            map.serialize_entry(id, title)?;
        }
        map.end()
    }
}
