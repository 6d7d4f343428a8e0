//! # mclb-protocol
//!
//! Wire codec for a length-framed, version-aware game protocol, as spoken
//! between clients and the load balancer in front of the game servers.
//!
//! ## Layers
//! - [`core`]: primitive codec (VarInt, VarShort, bounded strings and blobs,
//!   length-prefixed and nullable values, enum ordinals, bit-sets, UUIDs) and
//!   the Tokio frame codec
//! - [`protocol`]: the [`protocol::Packet`] contract and the connection handshake
//!
//! ## Example
//! ```rust
//! use bytes::BytesMut;
//! use mclb_protocol::protocol::{read_packet, Direction, Handshake, HandshakeIntent, Packet, ProtocolVersion};
//!
//! let version = ProtocolVersion::V1_8;
//! let handshake = Handshake::new(47, "play.example.com", 25565, HandshakeIntent::Login);
//!
//! let mut buf = BytesMut::new();
//! handshake.write(version, Direction::ToServer, &mut buf)?;
//!
//! let mut bytes = buf.freeze();
//! let decoded: Handshake = read_packet(version, Direction::ToServer, &mut bytes)?;
//! assert_eq!(decoded.host(), "play.example.com");
//! # Ok::<(), mclb_protocol::error::ProtocolError>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod protocol;
pub mod utils;

pub use crate::core::frame::FrameCodec;
pub use crate::error::{ProtocolError, Result};
pub use crate::protocol::{Direction, Handshake, HandshakeIntent, Packet, ProtocolVersion};
