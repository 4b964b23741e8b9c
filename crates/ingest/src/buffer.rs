//! BoundedBuffer - fixed-capacity accumulation buffer
//!
//! The read loop fills one of these across many socket reads until a frame
//! boundary shows up. Capacity never changes after construction, which is
//! what bounds the worker's memory: a stream that never produces a
//! separator fills the buffer and is rejected instead of growing it.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

/// Fixed-capacity byte buffer with a valid-data high-water mark.
///
/// Only `[0, size)` holds meaningful bytes. Fills and appends write past
/// `size`; nothing ever shrinks it except [`clear`](Self::clear).
#[derive(Debug)]
pub struct BoundedBuffer {
    storage: Box<[u8]>,
    size: usize,
}

impl BoundedBuffer {
    /// Allocate an empty buffer of the given capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: vec![0u8; capacity].into_boxed_slice(),
            size: 0,
        }
    }

    /// Read once from `source` into the unused tail, advancing `size` by
    /// however many bytes were produced.
    ///
    /// Returns `Ok(0)` on end-of-stream (or when the buffer is already
    /// full); the caller decides what an empty read means.
    pub async fn fill_from<R>(&mut self, source: &mut R) -> io::Result<usize>
    where
        R: AsyncRead + Unpin,
    {
        let n = source.read(&mut self.storage[self.size..]).await?;
        self.size += n;
        Ok(n)
    }

    /// Copy as many of `bytes` as fit into the remaining tail.
    ///
    /// Returns the count actually copied; a short count signals overflow to
    /// the caller.
    pub fn append(&mut self, bytes: &[u8]) -> usize {
        let n = bytes.len().min(self.remaining());
        self.storage[self.size..self.size + n].copy_from_slice(&bytes[..n]);
        self.size += n;
        n
    }

    /// The valid region `[0, size)`.
    pub fn view(&self) -> &[u8] {
        &self.storage[..self.size]
    }

    /// Valid-data length.
    pub fn len(&self) -> usize {
        self.size
    }

    /// True when no valid bytes are held.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Total capacity.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Unused tail capacity.
    pub fn remaining(&self) -> usize {
        self.storage.len() - self.size
    }

    /// Reset to empty. Storage contents are left as-is; this is capacity
    /// reuse, not erasure.
    pub fn clear(&mut self) {
        self.size = 0;
    }
}

#[cfg(test)]
#[path = "buffer_test.rs"]
mod buffer_test;
