//! SocketReader - unix-socket listener and worker supervisor
//!
//! Exposes a unix-domain socket, accepts producer connections and runs one
//! [`SocketWorker`] per connection. All workers share one buffer pool and
//! one bounded frame channel; frames from a single connection stay in
//! order, no ordering is implied across connections.
//!
//! A stale socket file from a crashed process is removed before binding.
//! On cancellation the accept loop stops, every worker is cancelled, and
//! `run` returns only after all worker tasks have drained.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crossfire::{AsyncRx, MAsyncTx};
use tokio::net::UnixListener;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::frame::Frame;
use crate::metrics::ReaderMetrics;
use crate::pool::BufferPool;
use crate::worker::{DEFAULT_MAX_FRAME_SIZE, SocketWorker, WorkerConfig, WorkerError};

/// Default depth of the completed-frame queue
const DEFAULT_FRAME_QUEUE_DEPTH: usize = 1024;

/// Default cap on idle pooled buffers
const DEFAULT_POOL_MAX_IDLE: usize = 64;

/// Socket reader configuration
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Unix socket path producers connect to
    pub socket_path: PathBuf,

    /// Byte that terminates a frame and delimits fields within it
    pub separator: u8,

    /// Fatal bound on unterminated buffered data; also the pooled buffer
    /// capacity
    pub max_frame_size: usize,

    /// Depth of the completed-frame queue
    pub frame_queue_depth: usize,

    /// Cap on idle pooled buffers
    pub pool_max_idle: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from("/var/run/muster/telemetry.sock"),
            separator: crate::tokenizer::DEFAULT_SEPARATOR,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            frame_queue_depth: DEFAULT_FRAME_QUEUE_DEPTH,
            pool_max_idle: DEFAULT_POOL_MAX_IDLE,
        }
    }
}

impl ReaderConfig {
    /// Create config listening on the given path
    pub fn with_socket_path(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            ..Default::default()
        }
    }
}

/// Socket reader errors
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// An orphaned socket file could not be removed
    #[error("failed to remove stale socket {path}: {source}")]
    StaleSocket {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to bind the listening socket
    #[error("failed to bind {path}: {source}")]
    Bind {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to accept a new connection
    #[error("failed to accept connection: {0}")]
    Accept(#[from] io::Error),
}

/// Unix-socket frame source.
pub struct SocketReader {
    config: ReaderConfig,
    pool: Arc<BufferPool>,
    frame_tx: MAsyncTx<Frame>,
    metrics: Arc<ReaderMetrics>,
}

impl SocketReader {
    /// Create a reader and the receiving side of its frame channel.
    pub fn new(config: ReaderConfig) -> (Self, AsyncRx<Frame>) {
        let (frame_tx, frame_rx) = crossfire::mpsc::bounded_async(config.frame_queue_depth);
        let pool = Arc::new(BufferPool::new(config.pool_max_idle, config.max_frame_size));
        let reader = Self {
            config,
            pool,
            frame_tx,
            metrics: Arc::new(ReaderMetrics::new()),
        };
        (reader, frame_rx)
    }

    /// Shared reader counters.
    pub fn metrics(&self) -> &Arc<ReaderMetrics> {
        &self.metrics
    }

    /// Bind the socket and serve connections until cancelled or a listener
    /// error occurs.
    ///
    /// Worker failures are logged, not propagated: one misbehaving
    /// producer must not take the listener down.
    pub async fn run(self, cancel: CancellationToken) -> Result<(), ReaderError> {
        self.cleanup_stale_socket()?;

        let listener =
            UnixListener::bind(&self.config.socket_path).map_err(|e| ReaderError::Bind {
                path: self.config.socket_path.clone(),
                source: e,
            })?;

        tracing::info!(
            path = %self.config.socket_path.display(),
            max_frame_size = self.config.max_frame_size,
            "telemetry socket reader listening"
        );

        // workers stop with the reader, whatever stops it first
        let stop = cancel.child_token();
        let mut workers: JoinSet<Result<(), WorkerError>> = JoinSet::new();

        let result = self.accept_loop(&listener, &stop, &mut workers).await;

        stop.cancel();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!(error = %e, "reader worker failed"),
                Err(e) => tracing::error!(error = %e, "reader worker panicked"),
            }
        }

        tracing::info!("telemetry socket reader stopped");
        result
    }

    async fn accept_loop(
        &self,
        listener: &UnixListener,
        stop: &CancellationToken,
        workers: &mut JoinSet<Result<(), WorkerError>>,
    ) -> Result<(), ReaderError> {
        let mut next_worker_id: u64 = 0;

        loop {
            tokio::select! {
                _ = stop.cancelled() => return Ok(()),
                accepted = listener.accept() => {
                    let (stream, _addr) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            self.metrics.error();
                            return Err(ReaderError::Accept(e));
                        }
                    };

                    let worker_id = next_worker_id;
                    next_worker_id += 1;
                    tracing::debug!(worker_id, "connection accepted, starting reader worker");
                    self.metrics.connection_opened();

                    let worker = SocketWorker::new(
                        stream,
                        Arc::clone(&self.pool),
                        self.frame_tx.clone(),
                        WorkerConfig {
                            separator: self.config.separator,
                            max_frame_size: self.config.max_frame_size,
                        },
                        Arc::clone(&self.metrics),
                    );

                    let token = stop.clone();
                    let metrics = Arc::clone(&self.metrics);
                    workers.spawn(async move {
                        let result = worker.run(token).await;
                        metrics.connection_closed();
                        tracing::debug!(worker_id, "reader worker stopped");
                        result
                    });
                }
            }
        }
    }

    fn cleanup_stale_socket(&self) -> Result<(), ReaderError> {
        let path = &self.config.socket_path;
        match std::fs::remove_file(path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "removed stale socket file");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ReaderError::StaleSocket {
                path: path.clone(),
                source: e,
            }),
        }
    }
}

#[cfg(test)]
#[path = "reader_test.rs"]
mod reader_test;
