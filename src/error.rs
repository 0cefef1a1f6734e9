use thiserror::Error;

/// Raised synchronously when an entity is built from incomplete or unusable data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is absent after defaults were applied.
    #[error("no {field} for {entity} instance")]
    MissingField { entity: &'static str, field: String },
    /// A field is present but cannot be used (wrong type, or breaks the key scheme).
    #[error("invalid {field} for {entity} instance: {reason}")]
    InvalidField {
        entity: &'static str,
        field: String,
        reason: String,
    },
}

impl ValidationError {
    pub fn missing(entity: &'static str, field: impl Into<String>) -> Self {
        ValidationError::MissingField {
            entity,
            field: field.into(),
        }
    }

    pub fn invalid(entity: &'static str, field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidField {
            entity,
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingField { field, .. } => field,
            ValidationError::InvalidField { field, .. } => field,
        }
    }
}

/// Error type for key-value store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),
    /// A stored value looked like JSON but did not parse.
    #[error("could not decode stored value at {key}: {message}")]
    Decode { key: String, message: String },
    #[error("could not encode value for {key}: {message}")]
    Encode { key: String, message: String },
    #[error("store io error: {0}")]
    Io(String),
}

/// Error type for remote feed retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Request(String),
    #[error("feed responded with status {0}")]
    Status(u16),
    #[error("feed body could not be read: {0}")]
    Body(String),
    #[error("feed unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Feed(#[from] FeedError),
}
