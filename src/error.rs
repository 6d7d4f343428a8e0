//! # Error Types
//!
//! Error handling for the wire codec and packet layer.
//!
//! Every primitive codec operation that can fail returns a typed [`ProtocolError`]
//! immediately. Nothing is retried and no default is substituted, so a caller
//! always sees the first field that went wrong.
//!
//! ## Error Categories
//! - **Size Errors**: declared or actual lengths above their ceiling (`FieldTooLong`)
//! - **Encoding Errors**: over-long VarInts, invalid UTF-8, bit-sets wider than their field
//! - **Lookup Errors**: enum ordinals or string keys with no matching entry
//! - **Cursor Errors**: fewer readable bytes than a fixed-size read needs (`Truncated`)
//! - **I/O and Configuration Errors**: surfaced by the frame codec and config loader
//!
//! ## Example Usage
//! ```rust
//! use bytes::Bytes;
//! use mclb_protocol::core::codec::read_string;
//! use mclb_protocol::error::ProtocolError;
//!
//! // Declares 10 bytes but the string may only take 3 bytes (1 char).
//! let mut buf = Bytes::from_static(&[10, b'a']);
//! match read_string(&mut buf, 1) {
//!     Err(ProtocolError::FieldTooLong { max, actual, .. }) => {
//!         assert_eq!((max, actual), (3, 10));
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use std::io;
use thiserror::Error;

/// Field labels carried by [`ProtocolError::FieldTooLong`].
/// Static strings keep the error path free of allocations.
pub mod constants {
    pub const FIELD_STRING_CHARS: &str = "string characters";
    pub const FIELD_STRING_BYTES: &str = "string bytes";
    pub const FIELD_ARRAY: &str = "byte array";
    pub const FIELD_LENGTH_PREFIXED: &str = "length-prefixed payload";
    pub const FIELD_FRAME: &str = "frame";
}

// ProtocolError is the primary error type for all codec operations
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("VarInt too big (max {max_bytes} bytes)")]
    MalformedVarInt { max_bytes: usize },

    #[error("{field} too long: {actual} (max {max})")]
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("Unknown ordinal {ordinal} (expected fewer than {variants})")]
    UnknownOrdinal { ordinal: u32, variants: usize },

    #[error("Unknown string key {0}")]
    UnknownKey(String),

    #[error("BitSet too large (expected {width} bits, got {length})")]
    BitSetOverflow { width: usize, length: usize },

    #[error("Truncated input: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("Invalid UTF-8 in string: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ProtocolError {
    /// Shorthand used by every bounded read and write.
    pub(crate) fn too_long(field: &'static str, max: usize, actual: usize) -> Self {
        ProtocolError::FieldTooLong { field, max, actual }
    }
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
