//! Error types for daygrid library operations.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::event::ValidationErrors;

/// Errors raised while laying out a single day.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("event '{id}' starts at {start}, outside of {day}")]
    InvalidEventRange {
        id: String,
        day: NaiveDate,
        start: NaiveDateTime,
    },

    #[error("duplicate event id '{0}'")]
    DuplicateEventId(String),
}

/// Errors raised by the in-memory event store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("event not found: {0}")]
    NotFound(String),

    #[error("invalid event: {0}")]
    Invalid(ValidationErrors),

    #[error("no event is being dragged")]
    NothingDragged,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
