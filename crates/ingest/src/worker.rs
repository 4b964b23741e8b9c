//! SocketWorker - per-connection read loop
//!
//! Drains one connection into complete frames with bounded memory: fills a
//! pooled buffer, trusts only the *last* separator in the buffered data as
//! a frame boundary (a frame may batch several records), copies the
//! carry-over tail into a second pooled buffer, and hands the completed
//! frame downstream. Steady state allocates nothing - two buffers cycle
//! through the pool per connection.
//!
//! # Shutdown
//!
//! Every suspension point (the read and the channel send) races the
//! cancellation token, so a stalled producer or a full downstream queue can
//! never hold the worker past a shutdown request. A partial trailing
//! record at shutdown or disconnect is discarded with a warning; full-frame
//! integrity is the only delivery guarantee.

use std::sync::Arc;

use crossfire::MAsyncTx;
use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;

use crate::buffer::BoundedBuffer;
use crate::frame::Frame;
use crate::metrics::ReaderMetrics;
use crate::pool::BufferPool;
use crate::tokenizer::{DEFAULT_SEPARATOR, memrchr};

/// Default maximum frame size (64KB, matching the wire protocol's bound)
pub const DEFAULT_MAX_FRAME_SIZE: usize = 64 * 1024;

/// Socket worker configuration
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Byte that terminates a frame and delimits fields within it
    pub separator: u8,

    /// Fatal bound on unterminated buffered data
    pub max_frame_size: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

/// Socket worker errors
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    /// Buffered data reached the maximum frame size with no separator.
    /// Not retried: the same data would exceed the bound again.
    #[error("frame exceeded maximum size of {max} bytes with no separator")]
    FrameTooLarge { max: usize },

    /// Carry-over after a frame boundary did not fit a pool buffer
    #[error("carry-over of {len} bytes exceeds buffer capacity {capacity}")]
    CarryOverTooLarge { len: usize, capacity: usize },

    /// Transport failure; the caller owns reconnect policy
    #[error("failed to read from connection: {0}")]
    Read(#[from] std::io::Error),

    /// Downstream consumer is gone
    #[error("frame channel closed")]
    ChannelClosed,
}

/// Per-connection worker that turns a byte stream into frames.
///
/// Generic over the connection so tests can drive it with in-memory
/// streams.
pub struct SocketWorker<C> {
    conn: C,
    pool: Arc<BufferPool>,
    frame_tx: MAsyncTx<Frame>,
    config: WorkerConfig,
    metrics: Arc<ReaderMetrics>,
}

impl<C> SocketWorker<C>
where
    C: AsyncRead + Unpin,
{
    /// Create a worker over an established connection.
    pub fn new(
        conn: C,
        pool: Arc<BufferPool>,
        frame_tx: MAsyncTx<Frame>,
        config: WorkerConfig,
        metrics: Arc<ReaderMetrics>,
    ) -> Self {
        Self {
            conn,
            pool,
            frame_tx,
            config,
            metrics,
        }
    }

    /// Run the read loop until the connection closes, an error occurs, or
    /// the token is cancelled.
    ///
    /// Clean close and cancellation return `Ok`; capacity violations and
    /// transport errors are reported to the owner.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<(), WorkerError> {
        let mut active = self.pool.acquire();

        loop {
            // data without a boundary may not outgrow the configured bound
            if active.len() >= self.config.max_frame_size {
                self.metrics.error();
                self.pool.release(active);
                return Err(WorkerError::FrameTooLarge {
                    max: self.config.max_frame_size,
                });
            }

            let read = tokio::select! {
                read = active.fill_from(&mut self.conn) => read,
                _ = cancel.cancelled() => {
                    self.discard_partial(&active, "shutdown requested");
                    self.pool.release(active);
                    return Ok(());
                }
            };

            let n = match read {
                Ok(0) => {
                    self.discard_partial(&active, "connection closed");
                    self.pool.release(active);
                    return Ok(());
                }
                Ok(n) => n,
                Err(e) => {
                    self.discard_partial(&active, "read failed");
                    self.metrics.error();
                    self.pool.release(active);
                    return Err(WorkerError::Read(e));
                }
            };
            self.metrics.bytes_read(n as u64);

            // only the last separator in the buffered data is a trusted
            // boundary; anything after it is a partial next record
            let Some(boundary) = memrchr(self.config.separator, active.view()) else {
                continue;
            };

            let mut carry = self.pool.acquire();
            let partial_len = active.len() - (boundary + 1);
            let copied = carry.append(&active.view()[boundary + 1..]);
            if copied < partial_len {
                self.metrics.error();
                self.pool.release(active);
                self.pool.release(carry);
                return Err(WorkerError::CarryOverTooLarge {
                    len: partial_len,
                    capacity: self.pool.buffer_capacity(),
                });
            }

            let frame = Frame::new(active, boundary + 1, Arc::clone(&self.pool));
            tokio::select! {
                sent = self.frame_tx.send(frame) => {
                    if sent.is_err() {
                        self.pool.release(carry);
                        return Err(WorkerError::ChannelClosed);
                    }
                    self.metrics.frame_emitted();
                }
                _ = cancel.cancelled() => {
                    // shutdown wins the race against a full queue; the
                    // in-flight frame releases its buffer on drop
                    self.metrics.frame_dropped();
                    self.pool.release(carry);
                    return Ok(());
                }
            }

            active = carry;
        }
    }

    fn discard_partial(&self, active: &BoundedBuffer, reason: &'static str) {
        if !active.is_empty() {
            self.metrics.partial_discarded();
            tracing::warn!(
                bytes = active.len(),
                reason,
                "discarding unterminated partial record"
            );
        }
    }
}

#[cfg(test)]
#[path = "worker_test.rs"]
mod worker_test;
