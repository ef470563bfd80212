//! Error types for the SNS stemmer.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnsError {
    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("term catalog is empty, nothing to stem")]
    EmptyCatalog,

    #[error("malformed lookup table line {line}: {reason}")]
    MalformedLookup { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, SnsError>;
