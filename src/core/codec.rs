//! # Primitive Codec
//!
//! Bounded reads and writes of the protocol's composite field types.
//!
//! All functions operate on a caller-owned `bytes` cursor and never retain it.
//! Readers take `&mut B where B: Buf + ?Sized`, writers `&mut B where B: BufMut + ?Sized`,
//! so both concrete buffers and `dyn Buf` trait objects work.
//!
//! ## Bounds
//! Every declared size is compared with its ceiling *before* the payload is read
//! or allocated. A hostile length field costs at most the bytes of the length
//! itself.
//!
//! | Field              | Read ceiling             | Write ceiling            |
//! |--------------------|--------------------------|--------------------------|
//! | string             | `3 * max_chars` bytes, then `max_chars` chars | chars first, then bytes |
//! | byte array         | caller-chosen            | [`MAX_ARRAY_LEN`]        |
//! | length-prefixed    | `max_size`               | `max_size` (measured)    |
//!
//! String character counts are UTF-16 code units, the unit peers count in. A
//! character outside the BMP counts twice, which keeps 3 bytes per unit a
//! sound upper bound on the UTF-8 length.

use std::collections::HashMap;

use bytes::{Buf, BufMut, Bytes};
use tracing::debug;
use uuid::Uuid;

use super::ensure_remaining;
use super::varint::{read_var_int, write_var_int};
use crate::error::constants::{
    FIELD_ARRAY, FIELD_LENGTH_PREFIXED, FIELD_STRING_BYTES, FIELD_STRING_CHARS,
};
use crate::error::{ProtocolError, Result};
use crate::utils::buffer_pool::{acquire_scratch, ScratchBuffer, ScratchPool};

/// Default character ceiling for strings
pub const MAX_STRING_CHARS: usize = i16::MAX as usize;

/// Largest byte array [`write_array`] accepts
pub const MAX_ARRAY_LEN: usize = i16::MAX as usize;

/// An enumeration encoded as the VarInt index into its ordered variant table.
pub trait ProtocolEnum: Copy + 'static {
    /// Every variant, in wire order
    const VARIANTS: &'static [Self];

    /// Index of `self` in [`Self::VARIANTS`]
    fn ordinal(self) -> u32;
}

// ---------------------------------------------------------------------------
// Fixed-size scalars
// ---------------------------------------------------------------------------

pub fn read_u8<B: Buf + ?Sized>(src: &mut B) -> Result<u8> {
    ensure_remaining(src, 1)?;
    Ok(src.get_u8())
}

/// Big-endian unsigned short.
pub fn read_u16<B: Buf + ?Sized>(src: &mut B) -> Result<u16> {
    ensure_remaining(src, 2)?;
    Ok(src.get_u16())
}

pub fn write_u16<B: BufMut + ?Sized>(value: u16, dst: &mut B) {
    dst.put_u16(value);
}

pub fn read_i64<B: Buf + ?Sized>(src: &mut B) -> Result<i64> {
    ensure_remaining(src, 8)?;
    Ok(src.get_i64())
}

pub fn write_i64<B: BufMut + ?Sized>(value: i64, dst: &mut B) {
    dst.put_i64(value);
}

/// One byte; anything non-zero is `true`.
pub fn read_bool<B: Buf + ?Sized>(src: &mut B) -> Result<bool> {
    Ok(read_u8(src)? != 0)
}

pub fn write_bool<B: BufMut + ?Sized>(value: bool, dst: &mut B) {
    dst.put_u8(u8::from(value));
}

/// A length as its VarInt value; a `u32` is the widest length the wire holds.
fn length_prefix(field: &'static str, len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| ProtocolError::too_long(field, u32::MAX as usize, len))
}

// ---------------------------------------------------------------------------
// Strings
// ---------------------------------------------------------------------------

/// Length of `value` in UTF-16 code units.
#[inline]
pub fn char_len(value: &str) -> usize {
    value.chars().map(char::len_utf16).sum()
}

/// Read a VarInt-prefixed UTF-8 string of at most `max_chars` characters.
///
/// The declared byte length is checked against `3 * max_chars` before anything
/// is read; the character count is checked again after decoding.
pub fn read_string<B: Buf + ?Sized>(src: &mut B, max_chars: usize) -> Result<String> {
    let len = read_var_int(src)? as usize;
    let max_bytes = max_chars.saturating_mul(3);
    if len > max_bytes {
        debug!(declared = len, max_bytes, "rejecting oversized string");
        return Err(ProtocolError::too_long(FIELD_STRING_BYTES, max_bytes, len));
    }

    ensure_remaining(src, len)?;
    let mut raw = vec![0u8; len];
    src.copy_to_slice(&mut raw);
    let value = String::from_utf8(raw)?;

    let chars = char_len(&value);
    if chars > max_chars {
        debug!(chars, max_chars, "rejecting string with too many characters");
        return Err(ProtocolError::too_long(FIELD_STRING_CHARS, max_chars, chars));
    }

    Ok(value)
}

/// Write a VarInt-prefixed UTF-8 string, enforcing the same two bounds as
/// [`read_string`]: character count first, encoded byte length second.
pub fn write_string<B: BufMut + ?Sized>(value: &str, dst: &mut B, max_chars: usize) -> Result<()> {
    let chars = char_len(value);
    if chars > max_chars {
        return Err(ProtocolError::too_long(FIELD_STRING_CHARS, max_chars, chars));
    }

    let max_bytes = max_chars.saturating_mul(3);
    if value.len() > max_bytes {
        return Err(ProtocolError::too_long(FIELD_STRING_BYTES, max_bytes, value.len()));
    }

    write_var_int(length_prefix(FIELD_STRING_BYTES, value.len())?, dst);
    dst.put_slice(value.as_bytes());
    Ok(())
}

/// Read a string and resolve it through `map`, surfacing the key when absent.
pub fn read_string_map_key<'m, T, B: Buf + ?Sized>(
    src: &mut B,
    map: &'m HashMap<String, T>,
) -> Result<&'m T> {
    let key = read_string(src, MAX_STRING_CHARS)?;
    match map.get(&key) {
        Some(value) => Ok(value),
        None => {
            debug!(%key, "unknown string key");
            Err(ProtocolError::UnknownKey(key))
        }
    }
}

// ---------------------------------------------------------------------------
// Byte arrays
// ---------------------------------------------------------------------------

/// Write a VarInt-prefixed byte array of at most [`MAX_ARRAY_LEN`] bytes.
pub fn write_array<B: BufMut + ?Sized>(bytes: &[u8], dst: &mut B) -> Result<()> {
    if bytes.len() > MAX_ARRAY_LEN {
        return Err(ProtocolError::too_long(FIELD_ARRAY, MAX_ARRAY_LEN, bytes.len()));
    }

    write_var_int(bytes.len() as u32, dst);
    dst.put_slice(bytes);
    Ok(())
}

/// Read a VarInt-prefixed byte array, rejecting a declared length above `limit`.
pub fn read_array<B: Buf + ?Sized>(src: &mut B, limit: usize) -> Result<Bytes> {
    let len = read_var_int(src)? as usize;
    take_array(src, len, limit)
}

/// [`read_array`] bounded by whatever the cursor holds after the length.
pub fn read_array_unbounded<B: Buf + ?Sized>(src: &mut B) -> Result<Bytes> {
    let len = read_var_int(src)? as usize;
    let limit = src.remaining();
    take_array(src, len, limit)
}

fn take_array<B: Buf + ?Sized>(src: &mut B, len: usize, limit: usize) -> Result<Bytes> {
    if len > limit {
        debug!(declared = len, limit, "rejecting oversized byte array");
        return Err(ProtocolError::too_long(FIELD_ARRAY, limit, len));
    }

    ensure_remaining(src, len)?;
    Ok(src.copy_to_bytes(len))
}

/// Consume every remaining byte.
pub fn read_remaining<B: Buf + ?Sized>(src: &mut B) -> Bytes {
    let len = src.remaining();
    src.copy_to_bytes(len)
}

// ---------------------------------------------------------------------------
// Combinators
// ---------------------------------------------------------------------------

/// Read a VarInt size, then hand `reader` a view of exactly that many bytes.
///
/// The reader cannot see past its slice. Sizes above `max_size` fail before the
/// payload is touched.
pub fn read_length_prefixed<T, B, F>(reader: F, src: &mut B, max_size: usize) -> Result<T>
where
    B: Buf + ?Sized,
    F: FnOnce(&mut Bytes) -> Result<T>,
{
    let size = read_var_int(src)? as usize;
    if size > max_size {
        debug!(declared = size, max_size, "rejecting oversized length-prefixed payload");
        return Err(ProtocolError::too_long(FIELD_LENGTH_PREFIXED, max_size, size));
    }

    ensure_remaining(src, size)?;
    let mut slice = src.copy_to_bytes(size);
    reader(&mut slice)
}

/// Encode `value` with `writer` into a scratch buffer, then emit the measured
/// size as a VarInt followed by the scratch bytes.
///
/// The scratch buffer comes from this thread's pool and goes back to it on
/// every exit path.
pub fn write_length_prefixed<T, B, F>(
    value: &T,
    writer: F,
    dst: &mut B,
    max_size: usize,
) -> Result<()>
where
    T: ?Sized,
    B: BufMut + ?Sized,
    F: FnOnce(&T, &mut Vec<u8>) -> Result<()>,
{
    prefix_from_scratch(acquire_scratch(), value, writer, dst, max_size)
}

/// [`write_length_prefixed`] drawing its scratch buffer from `pool`.
pub fn write_length_prefixed_with<T, B, F>(
    pool: &ScratchPool,
    value: &T,
    writer: F,
    dst: &mut B,
    max_size: usize,
) -> Result<()>
where
    T: ?Sized,
    B: BufMut + ?Sized,
    F: FnOnce(&T, &mut Vec<u8>) -> Result<()>,
{
    prefix_from_scratch(pool.acquire(), value, writer, dst, max_size)
}

fn prefix_from_scratch<T, B, F>(
    mut scratch: ScratchBuffer,
    value: &T,
    writer: F,
    dst: &mut B,
    max_size: usize,
) -> Result<()>
where
    T: ?Sized,
    B: BufMut + ?Sized,
    F: FnOnce(&T, &mut Vec<u8>) -> Result<()>,
{
    writer(value, &mut *scratch)?;

    let size = scratch.len();
    if size > max_size {
        return Err(ProtocolError::too_long(FIELD_LENGTH_PREFIXED, max_size, size));
    }

    write_var_int(length_prefix(FIELD_LENGTH_PREFIXED, size)?, dst);
    dst.put_slice(scratch.as_slice());
    Ok(())
}

/// A presence flag followed, when set, by whatever `reader` decodes.
pub fn read_nullable<T, B, F>(reader: F, src: &mut B) -> Result<Option<T>>
where
    B: Buf + ?Sized,
    F: FnOnce(&mut B) -> Result<T>,
{
    if read_bool(src)? {
        reader(src).map(Some)
    } else {
        Ok(None)
    }
}

pub fn write_nullable<T, B, F>(value: Option<&T>, writer: F, dst: &mut B) -> Result<()>
where
    T: ?Sized,
    B: BufMut + ?Sized,
    F: FnOnce(&T, &mut B) -> Result<()>,
{
    match value {
        Some(value) => {
            write_bool(true, dst);
            writer(value, dst)
        }
        None => {
            write_bool(false, dst);
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Enums and identifiers
// ---------------------------------------------------------------------------

/// Read a VarInt ordinal and look it up in `table`.
pub fn read_ordinal<T: Copy, B: Buf + ?Sized>(table: &[T], src: &mut B) -> Result<T> {
    let ordinal = read_var_int(src)?;
    table.get(ordinal as usize).copied().ok_or_else(|| {
        debug!(ordinal, variants = table.len(), "unknown enum ordinal");
        ProtocolError::UnknownOrdinal {
            ordinal,
            variants: table.len(),
        }
    })
}

pub fn read_enum<E: ProtocolEnum, B: Buf + ?Sized>(src: &mut B) -> Result<E> {
    read_ordinal(E::VARIANTS, src)
}

pub fn write_enum<E: ProtocolEnum, B: BufMut + ?Sized>(value: E, dst: &mut B) {
    write_var_int(value.ordinal(), dst);
}

/// Two big-endian 64-bit words, most significant first.
pub fn read_uuid<B: Buf + ?Sized>(src: &mut B) -> Result<Uuid> {
    ensure_remaining(src, 16)?;
    let most = src.get_u64();
    let least = src.get_u64();
    Ok(Uuid::from_u64_pair(most, least))
}

pub fn write_uuid<B: BufMut + ?Sized>(value: &Uuid, dst: &mut B) {
    let (most, least) = value.as_u64_pair();
    dst.put_u64(most);
    dst.put_u64(least);
}
