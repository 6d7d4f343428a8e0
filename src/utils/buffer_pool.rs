//! # Scratch Buffer Pool
//!
//! Pool of small scratch buffers for nested encodes. A length-prefixed write
//! encodes its payload into a scratch buffer first so the outer length is known
//! before anything reaches the destination.
//!
//! ## Lifetime
//! A [`ScratchBuffer`] is a scoped acquisition: it goes back to its pool when
//! dropped, which happens on success, on an early `?` return and on unwind alike.
//!
//! ## Usage
//! ```rust
//! use bytes::BufMut;
//! use mclb_protocol::utils::buffer_pool::ScratchPool;
//!
//! let pool = ScratchPool::new(4);
//! {
//!     let mut scratch = pool.acquire();
//!     scratch.put_slice(b"payload");
//!     assert_eq!(scratch.len(), 7);
//! }
//! assert_eq!(pool.available(), 4);
//! ```

use std::sync::{Arc, Mutex};

/// Buffers that grew beyond this are dropped instead of pooled
const MAX_POOLED_BUFFER_SIZE: usize = 64 * 1024;

/// Default buffer capacity
const DEFAULT_BUFFER_CAPACITY: usize = 256;

/// Default number of pre-allocated buffers
pub const DEFAULT_POOL_SIZE: usize = 16;

type Slots = Arc<Mutex<Vec<Vec<u8>>>>;

/// A pooled scratch buffer that returns itself to the pool when dropped
pub struct ScratchBuffer {
    buffer: Vec<u8>,
    pool: Slots,
}

impl ScratchBuffer {
    /// Bytes written so far
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }
}

impl Drop for ScratchBuffer {
    fn drop(&mut self) {
        if self.buffer.capacity() <= MAX_POOLED_BUFFER_SIZE {
            self.buffer.clear();
            if let Ok(mut pool) = self.pool.lock() {
                pool.push(std::mem::take(&mut self.buffer));
            }
        }
    }
}

impl std::ops::Deref for ScratchBuffer {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.buffer
    }
}

impl std::ops::DerefMut for ScratchBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buffer
    }
}

/// Thread-safe pool of scratch buffers
#[derive(Clone)]
pub struct ScratchPool {
    pool: Slots,
}

impl ScratchPool {
    /// Create a pool with `pool_size` pre-allocated buffers
    pub fn new(pool_size: usize) -> Self {
        let pool = (0..pool_size)
            .map(|_| Vec::with_capacity(DEFAULT_BUFFER_CAPACITY))
            .collect();

        Self {
            pool: Arc::new(Mutex::new(pool)),
        }
    }

    /// Take a buffer from the pool, allocating when the pool is empty
    pub fn acquire(&self) -> ScratchBuffer {
        let buffer = self
            .pool
            .lock()
            .ok()
            .and_then(|mut pool| pool.pop())
            .unwrap_or_else(|| Vec::with_capacity(DEFAULT_BUFFER_CAPACITY));

        ScratchBuffer {
            buffer,
            pool: self.pool.clone(),
        }
    }

    /// Number of idle buffers in the pool
    pub fn available(&self) -> usize {
        self.pool.lock().map(|p| p.len()).unwrap_or(0)
    }
}

impl Default for ScratchPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_SIZE)
    }
}

thread_local! {
    static LOCAL_POOL: ScratchPool = ScratchPool::default();
}

/// Acquire a scratch buffer from this thread's pool.
pub fn acquire_scratch() -> ScratchBuffer {
    LOCAL_POOL.with(ScratchPool::acquire)
}
