//! Pooled field encoder.

use crate::flatten::FlatFields;
use grovelog_shared::{ErrorCode, LogError, Result};
use parking_lot::Mutex;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Maximum number of idle buffers kept by a pool.
pub const POOL_CAPACITY: usize = 32;

/// Buffers that grew past this many bytes are dropped instead of pooled.
pub const MAX_POOLED_BUFFER: usize = 64 * 1024;

const INITIAL_BUFFER_CAPACITY: usize = 512;

/// Bounded free list of scratch buffers.
///
/// Acquire and release each take the lock once, without blocking: when the
/// lock is contended or the list is empty a fresh buffer is allocated, and a
/// buffer that cannot be returned is dropped.
#[derive(Debug, Default)]
pub struct BufferPool {
    free: Mutex<Vec<Vec<u8>>>,
}

impl BufferPool {
    /// Empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a cleared buffer. It returns to the pool when dropped.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let mut buffer = self
            .free
            .try_lock()
            .and_then(|mut free| free.pop())
            .unwrap_or_else(|| Vec::with_capacity(INITIAL_BUFFER_CAPACITY));
        buffer.clear();
        PooledBuffer { pool: self, buffer }
    }

    /// Number of idle buffers.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }

    fn release(&self, buffer: Vec<u8>) {
        if buffer.capacity() > MAX_POOLED_BUFFER {
            return;
        }
        if let Some(mut free) = self.free.try_lock() {
            if free.len() < POOL_CAPACITY {
                free.push(buffer);
            }
        }
    }
}

/// Scratch buffer on loan from a [`BufferPool`].
#[derive(Debug)]
pub struct PooledBuffer<'pool> {
    pool: &'pool BufferPool,
    buffer: Vec<u8>,
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.buffer
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buffer
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buffer));
    }
}

/// Encodes flattened fields as a pretty-printed JSON object.
#[derive(Debug, Clone, Default)]
pub struct FieldEncoder {
    pool: Arc<BufferPool>,
}

impl FieldEncoder {
    /// Encoder drawing scratch space from `pool`.
    #[must_use]
    pub const fn new(pool: Arc<BufferPool>) -> Self {
        Self { pool }
    }

    /// Pool shared with this encoder.
    #[must_use]
    pub fn pool(&self) -> &Arc<BufferPool> {
        &self.pool
    }

    /// Encode `fields` into an owned byte vector.
    ///
    /// Output has two-space indentation, keeps insertion order, and has no
    /// trailing newline. Identical input yields identical bytes.
    pub fn encode(&self, fields: &FlatFields) -> Result<Vec<u8>> {
        let mut buffer = self.pool.acquire();
        serde_json::to_writer_pretty(&mut *buffer, fields).map_err(encode_error)?;
        Ok(buffer.to_vec())
    }
}

/// Map a serializer failure to an encoding error.
pub(crate) fn encode_error(error: serde_json::Error) -> LogError {
    let code = if error.is_data() {
        ErrorCode::unsupported_value()
    } else {
        ErrorCode::serialize()
    };
    LogError::encoding(code, error.to_string()).with_source(error)
}
