use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Chunk size must be a positive integer")]
    InvalidChunkSize,

    #[error("Retry attempts must be at least 1")]
    InvalidRetryAttempts,

    #[error("Collection name must not be empty")]
    EmptyCollection,

    #[error("Can't read config file: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document store lock was poisoned by a panicking writer")]
    Poisoned,

    #[error("IO error on store snapshot: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid store snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Batch of {batch_size} records rejected: {reason}")]
    Rejected { batch_size: usize, reason: String },

    #[error("Giving up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<SinkError>,
    },
}
