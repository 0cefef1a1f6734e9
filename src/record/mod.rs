//! Record - field-carrying base for every persisted entity.
//!
//! A `Record` is an insertion-ordered JSON object. Entities are built from a
//! record (so required-field validation happens in one place) and projected
//! back into one when they are persisted or serialized.
//!
//! ## Example
//!
//! ```ignore
//! use reading_progress::Record;
//! use serde_json::json;
//!
//! let record = Record::from_value(json!({ "b": 2, "a": 1, "c": 3 }))?;
//! record.required("Thing", &["a", "b"])?;
//! let subset = record.compact(&["c", "a"]); // {"c": 3, "a": 1}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ValidationError;

/// Insertion-ordered field map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON value. Anything other than an object is rejected.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ValidationError::invalid(
                "Record",
                "<root>",
                format!("expected an object, got {}", type_name(&other)),
            )),
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Fill in every default the record does not already carry.
    pub fn merge_defaults(mut self, defaults: Record) -> Self {
        for (key, value) in defaults.0 {
            self.0.entry(key).or_insert(value);
        }
        self
    }

    /// Fails on the first key in `keys` the record lacks.
    pub fn required(&self, entity: &'static str, keys: &[&str]) -> Result<(), ValidationError> {
        match keys.iter().find(|key| !self.0.contains_key(**key)) {
            Some(key) => Err(ValidationError::missing(entity, *key)),
            None => Ok(()),
        }
    }

    /// Project onto exactly `keys`, in the order given.
    ///
    /// Keys the record does not carry are left out rather than written as null.
    pub fn compact(&self, keys: &[&str]) -> Record {
        let mut out = Map::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = self.0.get(*key) {
                out.insert((*key).to_string(), value.clone());
            }
        }
        Record(out)
    }

    /// Read a field as text. Numbers and booleans are rendered to their display form.
    pub fn text(&self, entity: &'static str, key: &str) -> Result<String, ValidationError> {
        match self.0.get(key) {
            None => Err(ValidationError::missing(entity, key)),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::Bool(b)) => Ok(b.to_string()),
            Some(other) => Err(ValidationError::invalid(
                entity,
                key,
                format!("expected text, got {}", type_name(other)),
            )),
        }
    }

    /// Like [`Record::text`], but absent and null fields read as `None`.
    pub fn optional_text(
        &self,
        entity: &'static str,
        key: &str,
    ) -> Result<Option<String>, ValidationError> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.text(entity, key).map(Some),
        }
    }

    /// Read a field as an integer. Floats truncate; numeric strings parse; empty strings read as 0.
    pub fn number(&self, entity: &'static str, key: &str) -> Result<i64, ValidationError> {
        let invalid = |got: &str| {
            ValidationError::invalid(entity, key, format!("expected a number, got {}", got))
        };
        match self.0.get(key) {
            None => Err(ValidationError::missing(entity, key)),
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .ok_or_else(|| invalid("an out-of-range number")),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(0),
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .map(|f| f as i64)
                .map_err(|_| invalid("a non-numeric string")),
            Some(Value::Null) | Some(Value::Bool(false)) => Ok(0),
            Some(other) => Err(invalid(type_name(other))),
        }
    }

    /// Read a field as an array of values.
    pub fn array(&self, entity: &'static str, key: &str) -> Result<Vec<Value>, ValidationError> {
        match self.0.get(key) {
            None => Err(ValidationError::missing(entity, key)),
            Some(Value::Array(items)) => Ok(items.clone()),
            Some(other) => Err(ValidationError::invalid(
                entity,
                key,
                format!("expected an array, got {}", type_name(other)),
            )),
        }
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// An entity with a fixed set of required fields, built from and projected to a [`Record`].
pub trait Entity: Sized {
    /// Display name used in validation errors.
    const NAME: &'static str;

    /// Fields that must be present once defaults are merged in.
    const REQUIRED: &'static [&'static str];

    /// Build the entity, validating `REQUIRED` first.
    fn from_record(record: Record) -> Result<Self, ValidationError>;

    /// Full field view of the entity.
    fn to_record(&self) -> Record;

    /// Shorthand for `to_record().compact(keys)`.
    fn compact(&self, keys: &[&str]) -> Record {
        self.to_record().compact(keys)
    }
}

/// A keyed, unordered collection of records.
pub trait Collection {
    /// Number of stored entries.
    fn size(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}
