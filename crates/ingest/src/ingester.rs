//! Ingester - frame consumer feeding the sample table
//!
//! Pulls completed frames off the reader channel, tokenizes them, decodes
//! records through a pluggable [`RecordDecoder`] and merges the resulting
//! samples into a shared [`SampleTable`]. A record that fails to decode
//! poisons the rest of its frame: the decoder's cursor position is no
//! longer trustworthy, so the remainder is dropped with a warning rather
//! than misattributed to the wrong fields.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crossfire::AsyncRx;
use tokio_util::sync::CancellationToken;

use muster_samples::{Sample, SampleTable};

use crate::frame::Frame;
use crate::tokenizer::{DEFAULT_QUOTE, DEFAULT_SEPARATOR, FieldIter};

/// Ingester configuration
#[derive(Debug, Clone)]
pub struct IngesterConfig {
    /// Byte that delimits fields within a frame
    pub separator: u8,

    /// Byte that opens and closes a quoted field
    pub quote: u8,
}

impl Default for IngesterConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            quote: DEFAULT_QUOTE,
        }
    }
}

/// Decodes one record from a field stream into a sample.
///
/// Implementations consume exactly the fields that make up one record and
/// leave the iterator positioned at the start of the next one.
pub trait RecordDecoder {
    type Error: std::fmt::Display;

    fn decode(&mut self, fields: &mut FieldIter<'_>) -> Result<Sample, Self::Error>;
}

/// Counters for the ingestion loop.
#[derive(Debug, Default)]
pub struct IngesterMetrics {
    /// Frames pulled off the channel
    pub frames_processed: AtomicU64,

    /// Records decoded and merged into the table
    pub records_ingested: AtomicU64,

    /// Records rejected by the decoder
    pub decode_failures: AtomicU64,

    /// Samples the table refused to merge
    pub merge_failures: AtomicU64,
}

impl IngesterMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            frames_processed: AtomicU64::new(0),
            records_ingested: AtomicU64::new(0),
            decode_failures: AtomicU64::new(0),
            merge_failures: AtomicU64::new(0),
        }
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> IngesterSnapshot {
        IngesterSnapshot {
            frames_processed: self.frames_processed.load(Ordering::Relaxed),
            records_ingested: self.records_ingested.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            merge_failures: self.merge_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of ingester counters.
#[derive(Debug, Clone, Copy)]
pub struct IngesterSnapshot {
    pub frames_processed: u64,
    pub records_ingested: u64,
    pub decode_failures: u64,
    pub merge_failures: u64,
}

/// Frame consumer that stages decoded samples into a table.
pub struct Ingester<D> {
    frame_rx: AsyncRx<Frame>,
    decoder: D,
    table: Arc<SampleTable>,
    config: IngesterConfig,
    metrics: Arc<IngesterMetrics>,
}

impl<D> Ingester<D>
where
    D: RecordDecoder,
{
    /// Create an ingester over the reader's frame channel.
    pub fn new(
        frame_rx: AsyncRx<Frame>,
        decoder: D,
        table: Arc<SampleTable>,
        config: IngesterConfig,
    ) -> Self {
        Self {
            frame_rx,
            decoder,
            table,
            config,
            metrics: Arc::new(IngesterMetrics::new()),
        }
    }

    /// Shared ingester counters.
    pub fn metrics(&self) -> &Arc<IngesterMetrics> {
        &self.metrics
    }

    /// Consume frames until the channel closes or the token is cancelled.
    pub async fn run(mut self, cancel: CancellationToken) {
        loop {
            let frame = tokio::select! {
                received = self.frame_rx.recv() => match received {
                    Ok(frame) => frame,
                    // all workers are gone
                    Err(_) => break,
                },
                _ = cancel.cancelled() => break,
            };
            self.process(frame);
        }
        tracing::debug!("ingester stopped");
    }

    fn process(&mut self, frame: Frame) {
        self.metrics.frames_processed.fetch_add(1, Ordering::Relaxed);

        let mut fields = FieldIter::new(frame.bytes(), self.config.separator, self.config.quote);
        while fields.has_next() {
            let sample = match self.decoder.decode(&mut fields) {
                Ok(sample) => sample,
                Err(e) => {
                    self.metrics.decode_failures.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(error = %e, "record failed to decode, dropping rest of frame");
                    break;
                }
            };
            match self.table.upsert_merge(sample) {
                Ok(()) => {
                    self.metrics.records_ingested.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    self.metrics.merge_failures.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(error = %e, "sample rejected by table");
                }
            }
        }

        frame.release();
    }
}

#[cfg(test)]
#[path = "ingester_test.rs"]
mod ingester_test;
