//! Tests for frame release semantics

use std::sync::Arc;

use crate::frame::Frame;
use crate::pool::BufferPool;

fn frame_with(pool: &Arc<BufferPool>, data: &[u8]) -> Frame {
    let mut buf = pool.acquire();
    assert_eq!(buf.append(data), data.len());
    Frame::new(buf, data.len(), Arc::clone(pool))
}

#[test]
fn test_bytes_view() {
    let pool = Arc::new(BufferPool::new(2, 32));
    let frame = frame_with(&pool, b"data;");

    assert_eq!(frame.bytes(), b"data;");
    assert_eq!(frame.len(), 5);
    assert!(!frame.is_empty());
}

#[test]
fn test_release_returns_buffer_to_pool() {
    let pool = Arc::new(BufferPool::new(2, 32));
    let frame = frame_with(&pool, b"data;");
    assert_eq!(pool.available(), 0);

    frame.release();
    assert_eq!(pool.available(), 1);

    // the recycled buffer comes back reset
    let buf = pool.acquire();
    assert!(buf.is_empty());
    assert_eq!(buf.capacity(), 32);
}

#[test]
fn test_drop_releases_too() {
    let pool = Arc::new(BufferPool::new(2, 32));
    {
        let _frame = frame_with(&pool, b"x;");
    }
    assert_eq!(pool.available(), 1);
    assert_eq!(pool.metrics().snapshot().returns, 1);
}

#[test]
fn test_frame_len_can_exclude_carry_over() {
    let pool = Arc::new(BufferPool::new(2, 32));
    let mut buf = pool.acquire();
    buf.append(b"data;part");

    // frame covers only through the separator
    let frame = Frame::new(buf, 5, Arc::clone(&pool));
    assert_eq!(frame.bytes(), b"data;");
}
