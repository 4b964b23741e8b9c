//! Frame - one completed protocol message
//!
//! A frame owns the pooled buffer its bytes live in and carries a handle
//! back to the pool. Consumers read the bytes, then call
//! [`release`](Frame::release) exactly once to hand the buffer back;
//! dropping an unreleased frame releases it as well. Double release is
//! impossible by construction (`release` consumes the frame).

use std::sync::Arc;

use crate::buffer::BoundedBuffer;
use crate::pool::BufferPool;

/// Read-only view of one completed frame, including its trailing
/// separator byte.
#[derive(Debug)]
pub struct Frame {
    /// Backing storage; taken out exactly once on release
    buf: Option<BoundedBuffer>,

    /// Declared frame length; the buffer may hold carry-over bytes past it
    /// in the window between boundary detection and the carry-over copy
    len: usize,

    pool: Arc<BufferPool>,
}

impl Frame {
    pub(crate) fn new(buf: BoundedBuffer, len: usize, pool: Arc<BufferPool>) -> Self {
        debug_assert!(len <= buf.len());
        Self {
            buf: Some(buf),
            len,
            pool,
        }
    }

    /// The frame's bytes. Empty after release (release consumes the frame,
    /// so this can only be observed through the empty-buf fallback).
    pub fn bytes(&self) -> &[u8] {
        match &self.buf {
            Some(buf) => &buf.view()[..self.len],
            None => &[],
        }
    }

    /// Declared frame length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True for a zero-length frame.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Hand the backing buffer back to its pool.
    pub fn release(mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.release(buf);
        }
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.release(buf);
        }
    }
}

#[cfg(test)]
#[path = "frame_test.rs"]
mod frame_test;
