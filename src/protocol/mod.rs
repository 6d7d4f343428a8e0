//! # Packet Layer
//!
//! Typed protocol messages decoded from, and encoded to, a frame body.
//!
//! Every packet is read and written against a `(version, direction, cursor)`
//! triple. The version and direction let a packet revision branch its field
//! sequence (a field only present from some version on, or only in one
//! direction) without changing the [`Packet`] contract.
//!
//! ## Lifecycle
//! A packet starts out empty (`Default`), is populated in place by exactly one
//! [`Packet::read`] call and is only read from afterwards. A failed `read`
//! leaves later fields unpopulated; callers must discard the packet.

pub mod handshake;


use std::fmt;

use bytes::{Buf, BufMut};

use crate::error::Result;

pub use handshake::{Handshake, HandshakeIntent};

/// Wire-format revision negotiated for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ProtocolVersion(i32);

impl ProtocolVersion {
    /// 1.8.x
    pub const V1_8: ProtocolVersion = ProtocolVersion(47);

    pub const fn new(raw: i32) -> Self {
        ProtocolVersion(raw)
    }

    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl From<i32> for ProtocolVersion {
    fn from(raw: i32) -> Self {
        ProtocolVersion(raw)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which endpoint a packet flows toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Client-originating
    ToServer,
    /// Server-originating
    ToClient,
}

/// A protocol message that populates itself from, and writes itself to, a cursor.
///
/// Fields are read and written in the same order. Codec failures propagate
/// unchanged.
pub trait Packet {
    fn read(&mut self, version: ProtocolVersion, direction: Direction, src: &mut dyn Buf)
        -> Result<()>;

    fn write(
        &self,
        version: ProtocolVersion,
        direction: Direction,
        dst: &mut dyn BufMut,
    ) -> Result<()>;
}

/// Construct an empty `P` and populate it from `src`.
pub fn read_packet<P: Packet + Default>(
    version: ProtocolVersion,
    direction: Direction,
    src: &mut dyn Buf,
) -> Result<P> {
    let mut packet = P::default();
    packet.read(version, direction, src)?;
    Ok(packet)
}
