//! Error types for intake ordering and its collaborators.

use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced to the orchestration layer.
///
/// The ordering engine itself never fails: out-of-range emergency levels are
/// normalized and an empty queue yields `None`. Everything here comes from
/// configuration, record validation, storage or notification.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading or writing the record file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File the operation was acting on.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// One or more records failed validation.
    #[error("invalid customer record: {}", summarize(.0))]
    Validation(Vec<ValidationError>),

    /// A persisted line could not be decoded.
    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number.
        line: usize,
        /// What could not be decoded.
        reason: String,
    },

    /// Scoring or sorter configuration is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The notification transport rejected a message.
    #[error("notification failed: {0}")]
    Notification(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error came from input validation rather than I/O.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
