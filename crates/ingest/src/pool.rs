//! BufferPool - reuse pool for bounded buffers
//!
//! Keeps steady-state allocation at zero once warmed up: a worker cycles
//! through at most a handful of buffers, and each released buffer is
//! cleared and parked on a lock-free queue for the next acquire. The queue
//! capacity caps the idle set, so a burst of connections cannot pin memory
//! forever.

use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam::queue::ArrayQueue;

use crate::buffer::BoundedBuffer;

/// Pool counters for monitoring reuse behavior.
#[derive(Debug, Default)]
pub struct PoolMetrics {
    /// Acquires served from the idle set
    pub hits: AtomicU64,

    /// Acquires that had to allocate
    pub misses: AtomicU64,

    /// Buffers parked back into the idle set
    pub returns: AtomicU64,

    /// Buffers dropped on release (idle set full or wrong capacity)
    pub drops: AtomicU64,
}

impl PoolMetrics {
    pub const fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            returns: AtomicU64::new(0),
            drops: AtomicU64::new(0),
        }
    }

    /// Get snapshot of pool counters.
    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            returns: self.returns.load(Ordering::Relaxed),
            drops: self.drops.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of pool counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoolSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub returns: u64,
    pub drops: u64,
}

/// Concurrent get-or-create pool of [`BoundedBuffer`]s, all at one nominal
/// capacity.
#[derive(Debug)]
pub struct BufferPool {
    /// Lock-free idle set
    idle: ArrayQueue<BoundedBuffer>,

    /// Capacity every buffer is allocated with
    buffer_capacity: usize,

    metrics: PoolMetrics,
}

impl BufferPool {
    /// Create a pool whose idle set holds at most `max_idle` buffers of
    /// `buffer_capacity` bytes each. Buffers are allocated on first demand.
    pub fn new(max_idle: usize, buffer_capacity: usize) -> Self {
        Self {
            idle: ArrayQueue::new(max_idle),
            buffer_capacity,
            metrics: PoolMetrics::new(),
        }
    }

    /// Take an idle buffer, or allocate a fresh one at nominal capacity.
    pub fn acquire(&self) -> BoundedBuffer {
        match self.idle.pop() {
            Some(buf) => {
                self.metrics.hits.fetch_add(1, Ordering::Relaxed);
                buf
            }
            None => {
                self.metrics.misses.fetch_add(1, Ordering::Relaxed);
                BoundedBuffer::with_capacity(self.buffer_capacity)
            }
        }
    }

    /// Reset a buffer and park it for reuse.
    ///
    /// Buffers whose capacity does not match the pool's nominal capacity
    /// are dropped, as are returns while the idle set is full.
    pub fn release(&self, mut buf: BoundedBuffer) {
        buf.clear();

        if buf.capacity() == self.buffer_capacity {
            match self.idle.push(buf) {
                Ok(()) => {
                    self.metrics.returns.fetch_add(1, Ordering::Relaxed);
                }
                Err(_) => {
                    self.metrics.drops.fetch_add(1, Ordering::Relaxed);
                }
            }
        } else {
            self.metrics.drops.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Buffers currently idle.
    pub fn available(&self) -> usize {
        self.idle.len()
    }

    /// Nominal capacity of every buffer handed out.
    pub fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    /// Pool counters.
    pub fn metrics(&self) -> &PoolMetrics {
        &self.metrics
    }
}

#[cfg(test)]
#[path = "pool_test.rs"]
mod pool_test;
