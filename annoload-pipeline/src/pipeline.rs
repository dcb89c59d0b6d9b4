//! The chunked load loop.
//!
//! ```text
//! Idle -> Running -> Completed
//!                 \-> Aborted (skip limit, reader failure, sink failure, cancellation)
//! ```

use log::{debug, error, info};

use annoload_core::{AnnotationRecord, ReadError};

use crate::cancel::CancellationToken;
use crate::config::LoaderConfig;
use crate::errors::ConfigError;
use crate::report::{AbortReason, RunReport};
use crate::sink::AnnotationSink;
use crate::skip::{LoggingSkipListener, SkipBudget, SkipListener};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Running,
    Completed,
    Aborted,
}

#[derive(Debug, Default)]
struct Counters {
    read: u64,
    written: u64,
    batches: u64,
}

///
/// Streams records from `source` into `sink`, `chunk_size` records at a time.
///
/// The source is any iterator of parse results, so a file reader, an
/// in-memory vector or a test fake all plug in the same way. A run is
/// strictly sequential: one batch is assembled, written, and only then is
/// the next one started.
///
pub struct ChunkedLoader<S, W, L = LoggingSkipListener> {
    source: S,
    sink: W,
    listener: L,
    config: LoaderConfig,
    cancellation: Option<CancellationToken>,
    state: PipelineState,
}

impl<S, W> ChunkedLoader<S, W, LoggingSkipListener>
where
    S: Iterator<Item = Result<AnnotationRecord, ReadError>>,
    W: AnnotationSink,
{
    pub fn new(config: LoaderConfig, source: S, sink: W) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            source,
            sink,
            listener: LoggingSkipListener,
            config,
            cancellation: None,
            state: PipelineState::Idle,
        })
    }
}

impl<S, W, L> ChunkedLoader<S, W, L>
where
    S: Iterator<Item = Result<AnnotationRecord, ReadError>>,
    W: AnnotationSink,
    L: SkipListener,
{
    /// Replace the skip listener (the default logs each skip).
    pub fn with_listener<L2: SkipListener>(self, listener: L2) -> ChunkedLoader<S, W, L2> {
        ChunkedLoader {
            source: self.source,
            sink: self.sink,
            listener,
            config: self.config,
            cancellation: self.cancellation,
            state: self.state,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn transition(&mut self, next: PipelineState) {
        debug!("Load state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    ///
    /// Run the load to completion or abort.
    ///
    /// Consumes the loader: a finished run cannot be resumed. Batches written
    /// before an abort are not rolled back.
    ///
    pub fn run(mut self) -> RunReport {
        info!(
            "Starting annotation load (chunk size {}, skip limit {})",
            self.config.chunk_size, self.config.skip_limit
        );
        self.transition(PipelineState::Running);

        let mut budget = SkipBudget::new(self.config.skip_limit);
        let mut counters = Counters::default();
        let outcome = self.drive(&mut budget, &mut counters);

        let abort_reason = match outcome {
            Ok(()) => {
                self.transition(PipelineState::Completed);
                None
            }
            Err(reason) => {
                self.transition(PipelineState::Aborted);
                Some(reason)
            }
        };

        let report = RunReport {
            state: self.state,
            abort_reason,
            records_read: counters.read,
            records_written: counters.written,
            records_skipped: budget.skipped(),
            batches_written: counters.batches,
        };
        if report.is_completed() {
            info!("Annotation load finished. {}", report);
        } else {
            error!("Annotation load aborted. {}", report);
        }
        report
    }

    fn drive(&mut self, budget: &mut SkipBudget, counters: &mut Counters) -> Result<(), AbortReason> {
        let mut batch = Vec::with_capacity(self.config.chunk_size);
        loop {
            if self.is_cancelled() {
                return Err(AbortReason::Cancelled);
            }

            let exhausted = self.fill_batch(&mut batch, budget, counters)?;

            if !batch.is_empty() {
                self.sink.write(&batch)?;
                counters.written += batch.len() as u64;
                counters.batches += 1;
                debug!(
                    "Wrote batch {} ({} records, {} total)",
                    counters.batches,
                    batch.len(),
                    counters.written
                );
                batch.clear();
            }

            if exhausted {
                return Ok(());
            }
        }
    }

    /// Pull records until the batch is full or the source runs dry.
    /// Returns true once the source is exhausted.
    fn fill_batch(
        &mut self,
        batch: &mut Vec<AnnotationRecord>,
        budget: &mut SkipBudget,
        counters: &mut Counters,
    ) -> Result<bool, AbortReason> {
        while batch.len() < self.config.chunk_size {
            match self.source.next() {
                None => return Ok(true),
                Some(Ok(record)) => {
                    counters.read += 1;
                    batch.push(record);
                }
                Some(Err(ReadError::Malformed(record))) => {
                    // listener first, so it also sees the record that aborts the run
                    self.listener.on_skip_in_read(&record);
                    if let Err(exceeded) = budget.try_consume() {
                        return Err(AbortReason::SkipLimitExceeded {
                            limit: exceeded.limit,
                            record,
                        });
                    }
                }
                Some(Err(ReadError::Io(e))) => return Err(AbortReason::Reader(e)),
            }
        }
        Ok(false)
    }
}
