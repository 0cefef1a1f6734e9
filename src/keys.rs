//! Durable-store key scheme.
//!
//! - `<titleId>` holds a title's metadata record
//! - `<titleId>|<code>` holds one chapter record
//! - `_<anything>` is reserved for internal metadata and skipped by scans

use std::fmt;

pub const CHAPTER_SEPARATOR: char = '|';
pub const RESERVED_PREFIX: char = '_';

/// A durable-store key, classified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Title(String),
    Chapter { title_id: String, code: String },
    Reserved(String),
}

impl StoreKey {
    pub fn title(id: impl Into<String>) -> Self {
        StoreKey::Title(id.into())
    }

    pub fn chapter(title_id: impl Into<String>, code: impl Into<String>) -> Self {
        StoreKey::Chapter {
            title_id: title_id.into(),
            code: code.into(),
        }
    }

    /// Classify a raw key. Chapter keys split at the first separator, so codes
    /// may themselves contain it.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with(RESERVED_PREFIX) {
            return StoreKey::Reserved(raw.to_string());
        }
        match raw.split_once(CHAPTER_SEPARATOR) {
            Some((title_id, code)) => StoreKey::chapter(title_id, code),
            None => StoreKey::Title(raw.to_string()),
        }
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn is_reserved(&self) -> bool {
        matches!(self, StoreKey::Reserved(_))
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKey::Title(id) => f.write_str(id),
            StoreKey::Chapter { title_id, code } => {
                write!(f, "{}{}{}", title_id, CHAPTER_SEPARATOR, code)
            }
            StoreKey::Reserved(raw) => f.write_str(raw),
        }
    }
}

/// Why `id` cannot be used as a title id, if it can't.
pub(crate) fn title_id_problem(id: &str) -> Option<&'static str> {
    if id.is_empty() {
        Some("must not be empty")
    } else if id.starts_with(RESERVED_PREFIX) {
        Some("must not start with the reserved prefix '_'")
    } else if id.contains(CHAPTER_SEPARATOR) {
        Some("must not contain the chapter separator '|'")
    } else {
        None
    }
}
