use std::thread;
use std::time::Duration;

use log::warn;

use annoload_core::AnnotationRecord;

use crate::consts::{DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_BACKOFF_MS};
use crate::errors::SinkError;

///
/// Destination for batches of annotation records.
///
/// A write either applies the whole batch or fails. Writes must be idempotent
/// per storage key: writing the same record twice leaves one document.
///
pub trait AnnotationSink {
    fn write(&mut self, batch: &[AnnotationRecord]) -> Result<(), SinkError>;
}

impl<W: AnnotationSink + ?Sized> AnnotationSink for &mut W {
    fn write(&mut self, batch: &[AnnotationRecord]) -> Result<(), SinkError> {
        (**self).write(batch)
    }
}

impl<W: AnnotationSink + ?Sized> AnnotationSink for Box<W> {
    fn write(&mut self, batch: &[AnnotationRecord]) -> Result<(), SinkError> {
        (**self).write(batch)
    }
}

///
/// Retries failed batch writes of the wrapped sink with a fixed pause.
///
/// Safe because sink writes are idempotent. The loader itself never retries.
///
pub struct RetryingSink<W> {
    inner: W,
    max_attempts: u32,
    backoff: Duration,
}

impl<W: AnnotationSink> RetryingSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            max_attempts: DEFAULT_RETRY_ATTEMPTS,
            backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
        }
    }

    /// Total attempts per batch, clamped to at least one.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: AnnotationSink> AnnotationSink for RetryingSink<W> {
    fn write(&mut self, batch: &[AnnotationRecord]) -> Result<(), SinkError> {
        let mut attempt = 1;
        loop {
            match self.inner.write(batch) {
                Ok(()) => return Ok(()),
                Err(e) if attempt >= self.max_attempts => {
                    if self.max_attempts == 1 {
                        return Err(e);
                    }
                    return Err(SinkError::RetriesExhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
                Err(e) => {
                    warn!(
                        "Writing batch of {} records failed (attempt {}/{}): {}",
                        batch.len(),
                        attempt,
                        self.max_attempts,
                        e
                    );
                    thread::sleep(self.backoff);
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Fails the first `failures` writes, then accepts everything.
    struct FlakySink {
        failures: u32,
        calls: u32,
        written: usize,
    }

    impl AnnotationSink for FlakySink {
        fn write(&mut self, batch: &[AnnotationRecord]) -> Result<(), SinkError> {
            self.calls += 1;
            if self.calls <= self.failures {
                return Err(SinkError::Rejected {
                    batch_size: batch.len(),
                    reason: "connection reset".to_string(),
                });
            }
            self.written += batch.len();
            Ok(())
        }
    }

    fn batch() -> Vec<AnnotationRecord> {
        vec![AnnotationRecord::new("1", 10, 10, "A", "C")]
    }

    #[test]
    fn test_retry_recovers_from_transient_failure() {
        let flaky = FlakySink { failures: 2, calls: 0, written: 0 };
        let mut sink = RetryingSink::new(flaky)
            .with_max_attempts(3)
            .with_backoff(Duration::ZERO);

        sink.write(&batch()).unwrap();

        let inner = sink.into_inner();
        assert_eq!(inner.calls, 3);
        assert_eq!(inner.written, 1);
    }

    #[test]
    fn test_retry_gives_up_after_max_attempts() {
        let flaky = FlakySink { failures: 5, calls: 0, written: 0 };
        let mut sink = RetryingSink::new(flaky)
            .with_max_attempts(2)
            .with_backoff(Duration::ZERO);

        let err = sink.write(&batch()).unwrap_err();
        assert!(matches!(err, SinkError::RetriesExhausted { attempts: 2, .. }));
        assert_eq!(sink.into_inner().calls, 2);
    }

    #[test]
    fn test_single_attempt_passes_error_through() {
        let flaky = FlakySink { failures: 1, calls: 0, written: 0 };
        let mut sink = RetryingSink::new(flaky);

        let err = sink.write(&batch()).unwrap_err();
        assert!(matches!(err, SinkError::Rejected { batch_size: 1, .. }));
    }
}
