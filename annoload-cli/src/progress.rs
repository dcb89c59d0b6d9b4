use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use annoload_core::AnnotationRecord;
use annoload_pipeline::{AnnotationSink, SinkError};

const SPINNER_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {prefix} {pos} records {msg}";

/// Sink wrapper that ticks a spinner forward by each successfully written batch.
pub struct ProgressSink<W> {
    inner: W,
    bar: ProgressBar,
}

impl<W: AnnotationSink> ProgressSink<W> {
    pub fn new(inner: W, label: &str, multi: &MultiProgress) -> Self {
        let style = ProgressStyle::with_template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let bar = multi.add(ProgressBar::new_spinner());
        bar.set_style(style);
        bar.set_prefix(label.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { inner, bar }
    }

    pub fn finish(&self, message: String) {
        self.bar.finish_with_message(message);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl<W: AnnotationSink> AnnotationSink for ProgressSink<W> {
    fn write(&mut self, batch: &[AnnotationRecord]) -> Result<(), SinkError> {
        self.inner.write(batch)?;
        self.bar.inc(batch.len() as u64);
        Ok(())
    }
}
