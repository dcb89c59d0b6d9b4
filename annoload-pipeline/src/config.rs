//! Load configuration, read from a TOML file:
//!
//! ```toml
//! [pipeline]
//! chunk_size = 1000
//! skip_limit = 50
//!
//! [store]
//! path = "annotations.json"
//! collection = "variants"
//! retry_attempts = 3
//! retry_backoff_ms = 500
//!
//! [digest]
//! algorithm = "sha1"
//! ```
//!
//! Every key is optional.

use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use annoload_core::DigestAlgorithm;

use crate::consts::*;
use crate::errors::ConfigError;

/// Batch size and skip tolerance of a single run.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct LoaderConfig {
    pub chunk_size: usize,
    pub skip_limit: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            skip_limit: DEFAULT_SKIP_LIMIT,
        }
    }
}

impl LoaderConfig {
    pub fn new(chunk_size: usize, skip_limit: u64) -> Result<Self, ConfigError> {
        let config = Self {
            chunk_size,
            skip_limit,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize);
        }
        Ok(())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StoreConfig {
    pub path: PathBuf,
    pub collection: String,
    pub retry_attempts: u32,
    pub retry_backoff_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STORE_PATH),
            collection: DEFAULT_COLLECTION.to_string(),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DigestConfig {
    pub algorithm: DigestAlgorithm,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub pipeline: LoaderConfig,
    pub store: StoreConfig,
    pub digest: DigestConfig,
}

impl AppConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let toml_str = read_to_string(path.as_ref())?;
        Self::from_toml_str(&toml_str)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pipeline.validate()?;
        if self.store.collection.is_empty() {
            return Err(ConfigError::EmptyCollection);
        }
        if self.store.retry_attempts == 0 {
            return Err(ConfigError::InvalidRetryAttempts);
        }
        Ok(())
    }
}
