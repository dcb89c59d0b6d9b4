use std::io;

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    #[error("Unknown digest algorithm: {0}. Expected `sha1` or `sha512t24u`")]
    UnknownDigestAlgorithm(String),
}

/// A single input line that could not be turned into an annotation record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed annotation at line {line_number}: {reason}")]
pub struct MalformedRecord {
    /// 1-based line number in the input
    pub line_number: u64,
    /// The offending line, without its line terminator
    pub line: String,
    pub reason: String,
}

impl MalformedRecord {
    pub fn new(line_number: u64, line: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            line_number,
            line: line.into(),
            reason: reason.into(),
        }
    }
}

/// Errors a record source can signal.
///
/// `Malformed` is recoverable: the source has already moved past the bad line
/// and the next call yields the following record. `Io` is not.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error(transparent)]
    Malformed(#[from] MalformedRecord),

    #[error("IO error while reading annotations: {0}")]
    Io(#[from] io::Error),
}

impl ReadError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ReadError::Malformed(_))
    }
}
