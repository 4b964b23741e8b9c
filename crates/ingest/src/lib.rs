//! Muster - Ingest
//!
//! Telemetry ingestion path: unix-socket frame reader, pooled buffers and
//! the ingestion loop that stages decoded records into a sample table.
//!
//! # Overview
//!
//! This crate provides:
//! - [`BoundedBuffer`] / [`BufferPool`] - fixed-capacity read buffers,
//!   recycled so steady-state ingestion allocates nothing
//! - [`FieldIter`] - single-pass field tokenizer with quoted-field support
//! - [`SocketWorker`] - per-connection read loop that cuts the byte stream
//!   into complete frames at separator boundaries
//! - [`SocketReader`] - unix-socket listener supervising one worker per
//!   connection
//! - [`Ingester`] - frame consumer decoding records through a
//!   [`RecordDecoder`] into a [`SampleTable`](muster_samples::SampleTable)
//!
//! # Protocol
//!
//! Producers write separator-terminated records over a unix stream socket.
//! The separator byte (`;` by default) both terminates records and delimits
//! fields within them; a field may contain the separator if wrapped in
//! quotes. Workers trust only the last separator in buffered data as a
//! frame boundary, so one frame may batch several records and never ends
//! mid-record. Data buffered past the maximum frame size with no separator
//! ends the connection.
//!
//! # Shutdown
//!
//! Every loop in the crate races its suspension points against a
//! `CancellationToken`. Cancellation discards unterminated partial records;
//! complete frames already queued are either drained by the ingester or
//! release their buffers on drop.

pub mod buffer;
pub mod frame;
pub mod ingester;
pub mod metrics;
pub mod pool;
#[cfg(unix)]
pub mod reader;
pub mod tokenizer;
pub mod worker;

pub use buffer::BoundedBuffer;
pub use frame::Frame;
pub use ingester::{Ingester, IngesterConfig, IngesterMetrics, IngesterSnapshot, RecordDecoder};
pub use metrics::{ReaderMetrics, ReaderSnapshot};
pub use pool::{BufferPool, PoolSnapshot};
#[cfg(unix)]
pub use reader::{ReaderConfig, ReaderError, SocketReader};
pub use tokenizer::FieldIter;
pub use worker::{SocketWorker, WorkerConfig, WorkerError};
