//! Connection handshake, the first packet a client sends.
//!
//! ```text
//! [VarInt protocol version] [String host (<= 255 chars)] [u16 port] [VarInt intent]
//! ```
//!
//! The load balancer routes on the host and intent before any other packet
//! arrives, so this is the only packet it must always understand.

use bytes::{Buf, BufMut};
use tracing::instrument;

use super::{Direction, Packet, ProtocolVersion};
use crate::core::codec::{
    read_enum, read_string, read_u16, write_enum, write_string, write_u16, ProtocolEnum,
};
use crate::core::varint::{read_var_int, write_var_int};
use crate::error::Result;

/// Character ceiling of the target host field
pub const MAX_HOST_CHARS: usize = 255;

/// What the client wants to do after the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HandshakeIntent {
    #[default]
    Status,
    Login,
    Transfer,
}

impl ProtocolEnum for HandshakeIntent {
    const VARIANTS: &'static [Self] = &[
        HandshakeIntent::Status,
        HandshakeIntent::Login,
        HandshakeIntent::Transfer,
    ];

    fn ordinal(self) -> u32 {
        self as u32
    }
}

/// Client-to-server handshake packet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Handshake {
    protocol_version: i32,
    host: String,
    port: u16,
    intent: HandshakeIntent,
}

impl Handshake {
    /// Packet id inside the handshaking state
    pub const ID: u32 = 0x00;

    pub fn new(
        protocol_version: i32,
        host: impl Into<String>,
        port: u16,
        intent: HandshakeIntent,
    ) -> Self {
        Self {
            protocol_version,
            host: host.into(),
            port,
            intent,
        }
    }

    /// Protocol version the client speaks, as it declared it.
    pub fn protocol_version(&self) -> ProtocolVersion {
        ProtocolVersion::new(self.protocol_version)
    }

    /// Host the client typed to connect, used for routing.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn intent(&self) -> HandshakeIntent {
        self.intent
    }
}

impl Packet for Handshake {
    #[instrument(level = "trace", skip(self, src))]
    fn read(
        &mut self,
        version: ProtocolVersion,
        direction: Direction,
        src: &mut dyn Buf,
    ) -> Result<()> {
        // Negative versions are sent as their two's complement
        self.protocol_version = read_var_int(src)? as i32;
        self.host = read_string(src, MAX_HOST_CHARS)?;
        self.port = read_u16(src)?;
        self.intent = read_enum(src)?;
        Ok(())
    }

    #[instrument(level = "trace", skip(self, dst))]
    fn write(
        &self,
        version: ProtocolVersion,
        direction: Direction,
        dst: &mut dyn BufMut,
    ) -> Result<()> {
        write_var_int(self.protocol_version as u32, dst);
        write_string(&self.host, dst, MAX_HOST_CHARS)?;
        write_u16(self.port, dst);
        write_enum(self.intent, dst);
        Ok(())
    }
}
