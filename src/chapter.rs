use std::cmp::Ordering;

use serde::{Serialize, Serializer};

use crate::error::{StoreError, TrackerError, ValidationError};
use crate::keys::{title_id_problem, StoreKey};
use crate::record::{Entity, Record};
use crate::storage::{KeyValueStore, StoreExt, Stores};
use crate::title_list::TitleList;

/// One unit of content within a title, identified by `(title_id, code)`.
///
/// Relation to the owning [`crate::Title`] is by key only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub title_id: String,
    pub code: String,
    /// Ordering key. Compared as text, not as a number.
    pub no: String,
    pub name: String,
}

impl Entity for Chapter {
    const NAME: &'static str = "Chapter";
    const REQUIRED: &'static [&'static str] = &["titleId", "code", "no", "name"];

    fn from_record(record: Record) -> Result<Self, ValidationError> {
        record.required(Self::NAME, Self::REQUIRED)?;
        let title_id = record.text(Self::NAME, "titleId")?;
        if let Some(reason) = title_id_problem(&title_id) {
            return Err(ValidationError::invalid(Self::NAME, "titleId", reason));
        }
        Ok(Self {
            title_id,
            code: record.text(Self::NAME, "code")?,
            no: record.text(Self::NAME, "no")?,
            name: record.text(Self::NAME, "name")?,
        })
    }

    fn to_record(&self) -> Record {
        Record::new()
            .with("titleId", self.title_id.as_str())
            .with("code", self.code.as_str())
            .with("no", self.no.as_str())
            .with("name", self.name.as_str())
    }
}

impl Chapter {
    pub fn new(
        title_id: impl Into<String>,
        code: impl Into<String>,
        no: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let (title_id, code, no, name): (String, String, String, String) =
            (title_id.into(), code.into(), no.into(), name.into());
        Self::from_record(
            Record::new()
                .with("titleId", title_id)
                .with("code", code)
                .with("no", no)
                .with("name", name),
        )
    }

    /// Durable-store key of this chapter.
    pub fn key(&self) -> StoreKey {
        StoreKey::chapter(self.title_id.as_str(), self.code.as_str())
    }

    /// Write `{no, name}` to the durable store. Last write wins.
    pub fn save_to_local<L: KeyValueStore, S: KeyValueStore>(
        &self,
        stores: &Stores<L, S>,
    ) -> Result<&Self, StoreError> {
        stores
            .local
            .set(&self.key().encode(), &self.compact(&["no", "name"]))?;
        Ok(self)
    }

    /// Delete the durable record and drop this chapter from the session
    /// snapshot of its title, if one is cached.
    ///
    /// Returns true if the session snapshot was changed.
    pub fn remove_from_local_and_session<L: KeyValueStore, S: KeyValueStore>(
        &self,
        stores: &Stores<L, S>,
    ) -> Result<bool, TrackerError> {
        stores.local.remove(&self.key().encode())?;

        let Some(mut titles) = TitleList::from_session(stores)? else {
            return Ok(false);
        };
        let removed = titles
            .get_mut(&self.title_id)
            .and_then(|title| title.remove_chapter(&self.code));
        if removed.is_none() {
            tracing::debug!(
                title_id = %self.title_id,
                code = %self.code,
                "chapter not in session cache; nothing to update",
            );
            return Ok(false);
        }
        titles.save_to_session(stores)?;
        Ok(true)
    }

    /// Load the chapter stored at `(title_id, code)`, if any.
    pub fn from_local<L: KeyValueStore, S: KeyValueStore>(
        stores: &Stores<L, S>,
        title_id: &str,
        code: &str,
    ) -> Result<Option<Self>, TrackerError> {
        let key = StoreKey::chapter(title_id, code).encode();
        let Some(value) = stores.local.get(&key)? else {
            return Ok(None);
        };
        Ok(Some(Self::from_stored(title_id, code, value)?))
    }

    /// Rebuild a chapter from its stored `{no, name}` value plus its key parts.
    pub(crate) fn from_stored(
        title_id: &str,
        code: &str,
        value: serde_json::Value,
    ) -> Result<Self, ValidationError> {
        let stored = Record::from_value(value)?;
        let record = Record::new()
            .with("titleId", title_id)
            .with("code", code)
            .merge_defaults(stored);
        Self::from_record(record)
    }
}

/// Canonical chapter order: descending by `no`, compared as text.
///
/// The comparison is plain byte order with no locale collation, so "9" sorts
/// ahead of "10" and lowercase sorts ahead of uppercase ("a" before "B").
pub fn newest_first(a: &Chapter, b: &Chapter) -> Ordering {
    b.no.cmp(&a.no)
}

impl Serialize for Chapter {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        self.compact(&["code", "no", "name"]).serialize(serializer)
    }
}
