//! # Fixed-Width Bit-Sets
//!
//! A bit-set whose width is known to both peers is sent as `ceil(width / 8)` raw
//! bytes with no length prefix. Bit 0 of byte 0 is index 0; unused high bits of
//! the last byte are zero.

use bytes::{Buf, BufMut};
pub use fixedbitset::FixedBitSet;

use super::ensure_remaining;
use crate::error::{ProtocolError, Result};

/// Bytes on the wire for a bit-set of `width` bits.
#[inline]
pub fn fixed_bit_set_size(width: usize) -> usize {
    width.div_ceil(8)
}

/// Read `ceil(width / 8)` bytes into a set of `width` bits.
///
/// Padding bits set by the peer are kept; the set grows to hold them.
pub fn read_fixed_bit_set<B: Buf + ?Sized>(width: usize, src: &mut B) -> Result<FixedBitSet> {
    let size = fixed_bit_set_size(width);
    ensure_remaining(src, size)?;

    let mut bits = FixedBitSet::with_capacity(width);
    for byte_index in 0..size {
        let byte = src.get_u8();
        for bit in 0..8 {
            if byte & (1 << bit) != 0 {
                let index = byte_index * 8 + bit;
                bits.grow(index + 1);
                bits.insert(index);
            }
        }
    }
    Ok(bits)
}

/// Write `bits` into exactly `ceil(width / 8)` bytes, failing when a set bit
/// lies at or beyond `width`.
pub fn write_fixed_bit_set<B: BufMut + ?Sized>(
    bits: &FixedBitSet,
    width: usize,
    dst: &mut B,
) -> Result<()> {
    if let Some(highest) = bits.ones().last() {
        if highest >= width {
            return Err(ProtocolError::BitSetOverflow {
                width,
                length: highest + 1,
            });
        }
    }

    let mut packed = vec![0u8; fixed_bit_set_size(width)];
    for index in bits.ones() {
        packed[index / 8] |= 1 << (index % 8);
    }
    dst.put_slice(&packed);
    Ok(())
}
