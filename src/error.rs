//! Error types for score comparison

use std::fmt;

/// Errors that can occur while comparing two scores
#[derive(Debug, Clone)]
pub enum ComparisonError {
    /// The aligner cannot score the given elements
    InvalidSequenceInput(String),

    /// The normalizer had no element to clone a filler from
    NormalizationUnderflow(String),

    /// Invalid input parameters or malformed reader output
    InvalidInput(String),

    /// The reader found no recognizable musical content
    ContentError(String),

    /// Reading a score document failed
    IoError(String),

    /// Decoding a score document failed
    ParseError(String),
}

impl fmt::Display for ComparisonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonError::InvalidSequenceInput(msg) => {
                write!(f, "Invalid sequence input: {}", msg)
            }
            ComparisonError::NormalizationUnderflow(msg) => {
                write!(f, "Normalization underflow: {}", msg)
            }
            ComparisonError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ComparisonError::ContentError(msg) => write!(f, "Content error: {}", msg),
            ComparisonError::IoError(msg) => write!(f, "I/O error: {}", msg),
            ComparisonError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ComparisonError {}

impl From<std::io::Error> for ComparisonError {
    fn from(err: std::io::Error) -> Self {
        ComparisonError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for ComparisonError {
    fn from(err: serde_json::Error) -> Self {
        ComparisonError::ParseError(err.to_string())
    }
}
