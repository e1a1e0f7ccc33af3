use thiserror::Error;

/// Failure to turn a raw record into a canonical row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// A timestamp field was present but could not be read as a date
    #[error("invalid timestamp in `{field}`: {value}")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),
}

/// A [`NormalizeError`] tagged with the position of the offending record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record {index}: {source}")]
pub struct RecordError {
    pub index: usize,
    #[source]
    pub source: NormalizeError,
}
