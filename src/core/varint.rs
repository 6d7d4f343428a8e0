//! # Variable-Length Integers
//!
//! Two distinct schemes share this module:
//!
//! - **VarInt**: 7 value bits per byte, low-order group first, bit 7 set on every
//!   byte except the last. A `u32` needs at most 5 bytes.
//! - **VarShort**: a big-endian `u16` holding the low 15 bits, whose top bit flags
//!   one extra byte carrying bits 15..=22. Values need 2 or 3 bytes.
//!
//! ## Wire Format
//! ```text
//! VarInt(300)      = [0xAC, 0x02]
//! VarShort(0x7FFF) = [0x7F, 0xFF]
//! VarShort(0x8000) = [0x80, 0x00, 0x01]
//! ```

use bytes::{Buf, BufMut};
use tracing::debug;

use super::ensure_remaining;
use crate::error::{ProtocolError, Result};

/// Widest VarInt a `u32` can occupy
pub const MAX_VAR_INT_BYTES: usize = 5;

const SEGMENT_BITS: u8 = 0x7F;
const CONTINUE_BIT: u8 = 0x80;

const VAR_SHORT_LOW_MASK: u32 = 0x7FFF;
const VAR_SHORT_FLAG: u16 = 0x8000;

/// Read a VarInt of at most [`MAX_VAR_INT_BYTES`] bytes.
#[inline]
pub fn read_var_int<B: Buf + ?Sized>(src: &mut B) -> Result<u32> {
    read_var_int_bounded(src, MAX_VAR_INT_BYTES)
}

/// Read a VarInt, failing with [`ProtocolError::MalformedVarInt`] as soon as the
/// continuation chain would need more than `max_bytes` bytes.
///
/// A bound of zero rejects every VarInt. Groups past the 32nd bit are dropped,
/// like a 32-bit accumulator would. The byte that would exceed the bound is
/// never consumed.
pub fn read_var_int_bounded<B: Buf + ?Sized>(src: &mut B, max_bytes: usize) -> Result<u32> {
    let mut value = 0u32;

    for index in 0..max_bytes {
        ensure_remaining(src, 1)?;
        let byte = src.get_u8();
        value |= group_bits(byte, index);

        if byte & CONTINUE_BIT == 0 {
            return Ok(value);
        }
    }

    debug!(max_bytes, "rejecting unterminated VarInt");
    Err(ProtocolError::MalformedVarInt { max_bytes })
}

#[inline]
fn group_bits(byte: u8, index: usize) -> u32 {
    u32::try_from(7 * index)
        .ok()
        .and_then(|shift| u32::from(byte & SEGMENT_BITS).checked_shl(shift))
        .unwrap_or(0)
}

/// Write `value` as a VarInt. Zero still emits exactly one byte.
pub fn write_var_int<B: BufMut + ?Sized>(value: u32, dst: &mut B) {
    let mut value = value;
    loop {
        let mut part = (value as u8) & SEGMENT_BITS;
        value >>= 7;
        if value != 0 {
            part |= CONTINUE_BIT;
        }
        dst.put_u8(part);
        if value == 0 {
            break;
        }
    }
}

/// Number of bytes `write_var_int(value, _)` emits.
#[inline]
pub fn var_int_size(value: u32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        0x20_0000..=0x0FFF_FFFF => 4,
        _ => 5,
    }
}

/// Decode a VarInt from the front of `src` without consuming anything.
///
/// Returns `Ok(None)` while the chain is still incomplete, otherwise the value
/// and the number of bytes it occupies.
pub fn peek_var_int(src: &[u8], max_bytes: usize) -> Result<Option<(u32, usize)>> {
    let mut value = 0u32;

    for index in 0..max_bytes {
        let Some(&byte) = src.get(index) else {
            return Ok(None);
        };
        value |= group_bits(byte, index);
        if byte & CONTINUE_BIT == 0 {
            return Ok(Some((value, index + 1)));
        }
    }

    Err(ProtocolError::MalformedVarInt { max_bytes })
}

/// Read a VarShort: two bytes, plus a third when the continuation flag is set.
pub fn read_var_short<B: Buf + ?Sized>(src: &mut B) -> Result<u32> {
    ensure_remaining(src, 2)?;
    let mut low = u32::from(src.get_u16());
    let mut high = 0u32;

    if low & u32::from(VAR_SHORT_FLAG) != 0 {
        low &= VAR_SHORT_LOW_MASK;
        ensure_remaining(src, 1)?;
        high = u32::from(src.get_u8());
    }

    Ok((high << 15) | low)
}

/// Write a VarShort.
///
/// Only bits 0..=22 are representable; anything above is dropped without an
/// error, matching what deployed peers send and accept.
pub fn write_var_short<B: BufMut + ?Sized>(value: u32, dst: &mut B) {
    let mut low = (value & VAR_SHORT_LOW_MASK) as u16;
    let high = ((value >> 15) & 0xFF) as u8;

    if high != 0 {
        low |= VAR_SHORT_FLAG;
    }

    dst.put_u16(low);
    if high != 0 {
        dst.put_u8(high);
    }
}
