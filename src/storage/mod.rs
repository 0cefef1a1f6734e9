//! Storage - flat string-keyed stores behind the durable and session layers.
//!
//! `KeyValueStore` is the raw contract (strings in, strings out). `StoreExt`
//! layers the typed helpers on top: JSON-looking values decode on `get`,
//! non-string values encode on `set`.
//!
//! ## Example
//!
//! ```ignore
//! use reading_progress::{InMemoryStore, StoreExt};
//!
//! let store = InMemoryStore::new();
//! store.set("book", &serde_json::json!({ "name": "Dune" }))?;
//! let value = store.get("book")?; // Some(json!({ "name": "Dune" }))
//! let visits = store.get_or("_visits", || 0)?; // Some("0") as a raw string
//! ```

mod file;
mod in_memory;

use std::future::Future;

use serde::Serialize;
use serde_json::Value;

use crate::error::StoreError;

pub use file::JsonFileStore;
pub use in_memory::InMemoryStore;

/// Session cache key used when none is configured.
pub const DEFAULT_SESSION_KEY: &str = "titles";

/// Abstract string-keyed storage.
///
/// Implementations use interior mutability; every call runs to completion
/// before the next one starts on the same store.
pub trait KeyValueStore: Send + Sync {
    /// Raw value stored at `key`, if any.
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` at `key`, overwriting.
    fn set_raw(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Delete `key`. Returns true if it existed.
    fn remove(&self, key: &str) -> Result<bool, StoreError>;

    /// Every key currently stored, in no particular order.
    fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// Delete every key.
    fn clear(&self) -> Result<(), StoreError>;

    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get_raw(key)?.is_some())
    }
}

/// Decode a raw stored string: `{…}` and `[…]` parse as JSON, anything else stays a string.
pub fn decode(key: &str, raw: String) -> Result<Value, StoreError> {
    if raw.starts_with('{') || raw.starts_with('[') {
        serde_json::from_str(&raw).map_err(|e| StoreError::Decode {
            key: key.to_string(),
            message: e.to_string(),
        })
    } else {
        Ok(Value::String(raw))
    }
}

/// Encode a value for storage: strings verbatim, objects and arrays as JSON,
/// other scalars through their display form.
pub fn encode<T: Serialize + ?Sized>(key: &str, data: &T) -> Result<String, StoreError> {
    let value = serde_json::to_value(data).map_err(|e| StoreError::Encode {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}

/// Typed helpers available on every [`KeyValueStore`].
pub trait StoreExt: KeyValueStore {
    /// Value at `key`, decoded.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        match self.get_raw(key)? {
            Some(raw) => decode(key, raw).map(Some),
            None => Ok(None),
        }
    }

    fn set<T: Serialize + ?Sized>(&self, key: &str, data: &T) -> Result<(), StoreError> {
        let raw = encode(key, data)?;
        self.set_raw(key, raw)
    }

    /// Fetch `key`, or store `init()` there first. The result is always read
    /// back through the store so it has the stored shape.
    fn get_or<T, F>(&self, key: &str, init: F) -> Result<Option<Value>, StoreError>
    where
        T: Serialize,
        F: FnOnce() -> T,
    {
        if !self.contains(key)? {
            self.set(key, &init())?;
        }
        self.get(key)
    }

    /// Async variant of [`StoreExt::get_or`]: `init` is only awaited on a miss.
    #[allow(async_fn_in_trait)]
    async fn get_or_init_async<T, Fut>(&self, key: &str, init: Fut) -> Result<Option<Value>, StoreError>
    where
        T: Serialize,
        Fut: Future<Output = T>,
    {
        if !self.contains(key)? {
            let data = init.await;
            self.set(key, &data)?;
        }
        self.get(key)
    }
}

impl<S: KeyValueStore + ?Sized> StoreExt for S {}

/// Handles to the two stores every entity operation works against.
///
/// `local` survives across sessions; `session` holds the denormalized
/// snapshot of the whole collection under `session_key`.
#[derive(Clone)]
pub struct Stores<L, S> {
    pub local: L,
    pub session: S,
    session_key: String,
}

impl<L: KeyValueStore, S: KeyValueStore> Stores<L, S> {
    pub fn new(local: L, session: S) -> Self {
        Self::with_session_key(local, session, DEFAULT_SESSION_KEY)
    }

    pub fn with_session_key(local: L, session: S, session_key: impl Into<String>) -> Self {
        Self {
            local,
            session,
            session_key: session_key.into(),
        }
    }

    pub fn session_key(&self) -> &str {
        &self.session_key
    }
}
