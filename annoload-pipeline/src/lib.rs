//! # Chunked annotation loading
//!
//! Moves [`AnnotationRecord`](annoload_core::AnnotationRecord)s from a record
//! source into an [`AnnotationSink`] in batches of a fixed size:
//!
//! - malformed input lines are skipped, up to a configured limit per run
//!   ([`SkipBudget`]); every skip is reported to a [`SkipListener`] first
//! - each full batch (and the final partial one) is written synchronously
//! - a [`CancellationToken`] is honoured between batches
//! - the run ends with a [`RunReport`] saying whether it completed and, if not, why
//!
//! Sinks upsert by storage key, so re-running a load over the same input
//! does not duplicate documents.
//!
//! ```
//! use annoload_core::AnnotationRecord;
//! use annoload_pipeline::{ChunkedLoader, DocumentStore, LoaderConfig, StoreSink};
//!
//! let records = vec![
//!     Ok(AnnotationRecord::new("20", 60343, 60343, "G", "A")),
//!     Ok(AnnotationRecord::new("20", 60419, 60419, "A", "G")),
//! ];
//! let store = DocumentStore::new();
//! let sink = StoreSink::new(store.clone(), "variants");
//!
//! let report = ChunkedLoader::new(LoaderConfig::new(1, 0).unwrap(), records.into_iter(), sink)
//!     .unwrap()
//!     .run();
//!
//! assert!(report.is_completed());
//! assert_eq!(report.records_written, 2);
//! assert_eq!(store.len("variants").unwrap(), 2);
//! ```
pub mod cancel;
pub mod config;
pub mod consts;
pub mod errors;
pub mod pipeline;
pub mod report;
pub mod sink;
pub mod skip;
pub mod store;

pub use cancel::CancellationToken;
pub use config::{AppConfig, LoaderConfig, StoreConfig};
pub use errors::{ConfigError, SinkError, StoreError};
pub use pipeline::{ChunkedLoader, PipelineState};
pub use report::{AbortReason, RunReport};
pub use sink::{AnnotationSink, RetryingSink};
pub use skip::{LoggingSkipListener, SkipBudget, SkipListener};
pub use store::{AnnotationDocument, DocumentStore, StoreSink, UpsertOutcome};
