//! Error types for the matching core.
//!
//! Two families:
//! - `ConfigError`: raised while building a policy or aggregator, never
//!   during a run
//! - `RecordError`: data-quality problems found while converting raw JSON
//!   entries into typed records; callers log and skip, they don't propagate

use thiserror::Error;

/// Invalid matcher configuration, detected at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("fuzzy threshold {0} is outside 0-100")]
    ThresholdOutOfRange(u8),

    #[error("{0} vocabulary contains a blank entry")]
    BlankVocabularyEntry(&'static str),

    #[error("no source names configured")]
    NoSources,

    #[error("source `{0}` is configured more than once")]
    DuplicateSource(String),

    #[error("source name `{0}` is blank or reserved")]
    InvalidSourceName(String),

    #[error("unknown league `{0}`")]
    UnknownLeague(String),
}

/// Why a raw schedule row or source record could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("entry is not a JSON object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("record carries neither a score pair nor a spread pair")]
    MissingPayload,
}

impl RecordError {
    /// Absent data, as opposed to data of an unexpected shape.
    pub fn is_missing_data(&self) -> bool {
        matches!(
            self,
            RecordError::NotAnObject | RecordError::MissingField(_) | RecordError::MissingPayload
        )
    }
}
