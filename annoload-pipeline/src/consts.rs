/// Records per batch when nothing else is configured.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Malformed records tolerated per run when nothing else is configured.
pub const DEFAULT_SKIP_LIMIT: u64 = 50;

pub const DEFAULT_STORE_PATH: &str = "annotations.json";
pub const DEFAULT_COLLECTION: &str = "variants";

/// Attempts per batch for [`RetryingSink`](crate::RetryingSink); 1 means no retry.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 1;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;
