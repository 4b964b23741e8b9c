//! Metrics shared across the ingestion path
//!
//! Plain atomic counters: no allocations on the hot path, snapshots for
//! reporting.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by the reader and all of its workers.
#[derive(Debug, Default)]
pub struct ReaderMetrics {
    /// Currently active connections
    pub connections_active: AtomicU64,

    /// Total connections accepted
    pub connections_total: AtomicU64,

    /// Total bytes read off connections
    pub bytes_received: AtomicU64,

    /// Completed frames handed downstream
    pub frames_emitted: AtomicU64,

    /// Frames dropped because shutdown won the race against a full queue
    pub frames_dropped: AtomicU64,

    /// Partial trailing records discarded at connection end
    pub partials_discarded: AtomicU64,

    /// Total errors encountered
    pub errors: AtomicU64,
}

impl ReaderMetrics {
    /// Create new metrics instance
    pub const fn new() -> Self {
        Self {
            connections_active: AtomicU64::new(0),
            connections_total: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            frames_emitted: AtomicU64::new(0),
            frames_dropped: AtomicU64::new(0),
            partials_discarded: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    /// Increment active connections
    #[inline]
    pub fn connection_opened(&self) {
        self.connections_active.fetch_add(1, Ordering::Relaxed);
        self.connections_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Decrement active connections
    #[inline]
    pub fn connection_closed(&self) {
        self.connections_active.fetch_sub(1, Ordering::Relaxed);
    }

    /// Record bytes read
    #[inline]
    pub fn bytes_read(&self, n: u64) {
        self.bytes_received.fetch_add(n, Ordering::Relaxed);
    }

    /// Record an emitted frame
    #[inline]
    pub fn frame_emitted(&self) {
        self.frames_emitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a frame dropped during shutdown
    #[inline]
    pub fn frame_dropped(&self) {
        self.frames_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a discarded partial record
    #[inline]
    pub fn partial_discarded(&self) {
        self.partials_discarded.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an error
    #[inline]
    pub fn error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> ReaderSnapshot {
        ReaderSnapshot {
            connections_active: self.connections_active.load(Ordering::Relaxed),
            connections_total: self.connections_total.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            frames_emitted: self.frames_emitted.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
            partials_discarded: self.partials_discarded.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of reader counters.
#[derive(Debug, Clone, Copy)]
pub struct ReaderSnapshot {
    pub connections_active: u64,
    pub connections_total: u64,
    pub bytes_received: u64,
    pub frames_emitted: u64,
    pub frames_dropped: u64,
    pub partials_discarded: u64,
    pub errors: u64,
}
