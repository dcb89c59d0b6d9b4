//! # Core types for variant annotation loading
//!
//! This crate holds the pieces every other `annoload` crate agrees on:
//!
//! - the annotation data model ([`AnnotationRecord`], [`ConsequenceType`], [`Xref`])
//! - the deterministic storage key for a variant ([`build_storage_key`], [`StorageKeyBuilder`])
//! - the digest algorithms used to shorten long alleles ([`DigestAlgorithm`])
//!
//! ```
//! use annoload_core::build_storage_key;
//!
//! let key = build_storage_key("20", 60343, "G", "A");
//! assert_eq!(key.as_str(), "20_60343_G_A");
//! ```
pub mod digest;
pub mod errors;
pub mod models;
pub mod storage_key;

pub use digest::DigestAlgorithm;
pub use errors::{CoreError, MalformedRecord, ReadError};
pub use models::{AnnotationRecord, ConsequenceType, Score, Xref};
pub use storage_key::{
    LONG_ALLELE_THRESHOLD, MISSING_ALLELE, StorageKey, StorageKeyBuilder, build_storage_key,
};
