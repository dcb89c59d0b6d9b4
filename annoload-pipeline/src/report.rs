use std::fmt::{self, Display};

use thiserror::Error;

use annoload_core::MalformedRecord;

use crate::errors::SinkError;
use crate::pipeline::PipelineState;

/// Why a run stopped before reaching the end of its input.
#[derive(Error, Debug)]
pub enum AbortReason {
    #[error("Skip limit of {limit} exceeded by malformed record at line {}: {}", .record.line_number, .record.reason)]
    SkipLimitExceeded {
        limit: u64,
        record: MalformedRecord,
    },

    #[error("Reader failure: {0}")]
    Reader(#[source] std::io::Error),

    #[error("Sink failure: {0}")]
    Sink(#[from] SinkError),

    #[error("Cancelled")]
    Cancelled,
}

///
/// Outcome of one load.
///
/// Batches written before an abort stay written; `records_written` counts
/// exactly those.
///
#[derive(Debug)]
pub struct RunReport {
    pub state: PipelineState,
    pub abort_reason: Option<AbortReason>,
    /// Records parsed from the source, including any still unwritten at abort
    pub records_read: u64,
    /// Records handed to the sink in successfully written batches
    pub records_written: u64,
    pub records_skipped: u64,
    pub batches_written: u64,
}

impl RunReport {
    pub fn is_completed(&self) -> bool {
        self.state == PipelineState::Completed
    }

    pub fn is_aborted(&self) -> bool {
        self.state == PipelineState::Aborted
    }

    /// `Ok(self)` for a completed run, the abort reason otherwise.
    pub fn into_result(mut self) -> Result<Self, AbortReason> {
        match self.abort_reason.take() {
            Some(reason) => Err(reason),
            None => Ok(self),
        }
    }
}

impl Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}: {} read, {} written in {} batches, {} skipped",
            self.state,
            self.records_read,
            self.records_written,
            self.batches_written,
            self.records_skipped
        )?;
        if let Some(reason) = &self.abort_reason {
            write!(f, " ({})", reason)?;
        }
        Ok(())
    }
}
