//! # Core Codec Components
//!
//! Low-level primitives that move typed values in and out of a `bytes` cursor.
//!
//! ## Components
//! - **VarInt / VarShort**: variable-width integers
//! - **Codec**: bounded strings, blobs, length-prefixed and nullable values, enum
//!   ordinals, UUIDs
//! - **BitSet**: fixed-width bit-sets
//! - **Frame**: Tokio codec splitting a connection stream into length-prefixed frames
//!
//! ## Security
//! - Every declared length is checked against its ceiling before any byte is read
//! - Fixed-size reads check the readable length first and fail with `Truncated`
//!   instead of panicking inside `bytes`

pub mod bit_set;
pub mod codec;
pub mod frame;
pub mod varint;

use bytes::Buf;

use crate::error::{ProtocolError, Result};

/// Fail with [`ProtocolError::Truncated`] unless `needed` bytes are readable.
#[inline]
pub(crate) fn ensure_remaining<B: Buf + ?Sized>(src: &B, needed: usize) -> Result<()> {
    let remaining = src.remaining();
    if remaining < needed {
        return Err(ProtocolError::Truncated { needed, remaining });
    }
    Ok(())
}
