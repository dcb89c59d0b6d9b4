//! # Readers for annotator output
//!
//! Turns the tab-separated output of the Ensembl Variant Effect Predictor into a
//! lazy stream of [`AnnotationRecord`](annoload_core::AnnotationRecord)s. Lines that
//! cannot be parsed are yielded as [`ReadError::Malformed`](annoload_core::ReadError)
//! and the stream carries on with the next line, so callers decide how many bad
//! lines they are willing to tolerate.
//!
pub mod consts;
pub mod error;
pub mod reader;
pub mod vep;

// re-expose core functions
pub use consts::*;
pub use error::*;
pub use reader::*;
pub use vep::*;
