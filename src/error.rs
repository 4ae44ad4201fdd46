use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot access input file {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to map bytes {start}..{end}: {source}")]
    Mapping {
        start: u64,
        end: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record at byte {offset}: {source}")]
    Parse {
        offset: u64,
        #[source]
        source: LineParseError,
    },

    #[error("Station name is not valid UTF-8: {0}")]
    InvalidStationName(String),

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Reasons a single `station;value` line can be rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LineParseError {
    #[error("missing ';' delimiter")]
    MissingDelimiter,

    #[error("invalid measurement '{0}'")]
    InvalidNumber(String),
}

impl From<config::ConfigError> for ProcessingError {
    fn from(err: config::ConfigError) -> Self {
        ProcessingError::Config(err.to_string())
    }
}
