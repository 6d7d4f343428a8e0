//! # Frame Codec
//!
//! Splits a connection's byte stream into frames and writes frames back out.
//!
//! ## Wire Format
//! ```text
//! [VarInt length (1-3 bytes)] [body (length bytes)]
//! ```
//!
//! The body starts with the packet id and is handed to the packet layer
//! untouched. Compression framing is not handled here.

use std::sync::Arc;

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use super::varint::{peek_var_int, var_int_size, write_var_int};
use crate::config::{LimitsConfig, MAX_FRAME_HEADER_BYTES, MAX_FRAME_LENGTH};
use crate::error::constants::FIELD_FRAME;
use crate::error::{ProtocolError, Result};
use crate::utils::metrics::{global_metrics, CodecMetrics};

/// Tokio codec for VarInt length-prefixed frames
#[derive(Debug, Clone)]
pub struct FrameCodec {
    max_length: usize,
    metrics: Arc<CodecMetrics>,
}

impl FrameCodec {
    /// Codec with the protocol's frame ceiling, reporting to the global metrics
    pub fn new() -> Self {
        Self {
            max_length: MAX_FRAME_LENGTH,
            metrics: global_metrics(),
        }
    }

    pub fn from_config(limits: &LimitsConfig) -> Self {
        Self::new().with_max_length(limits.max_frame_length)
    }

    /// Lower the frame ceiling. Values above [`MAX_FRAME_LENGTH`] are clamped.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length.min(MAX_FRAME_LENGTH);
        self
    }

    /// Report to `metrics` instead of the global instance
    pub fn with_metrics(mut self, metrics: Arc<CodecMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn metrics(&self) -> &Arc<CodecMetrics> {
        &self.metrics
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for FrameCodec {
    type Item = BytesMut;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        // Peek at the length (don't consume yet)
        let (length, header) = match peek_var_int(&src[..], MAX_FRAME_HEADER_BYTES) {
            Ok(Some((length, header))) => (length as usize, header),
            Ok(None) => return Ok(None),
            Err(e) => {
                self.metrics.malformed_frame();
                debug!("rejecting frame with unterminated length prefix");
                return Err(e);
            }
        };

        if length > self.max_length {
            self.metrics.oversized_frame();
            debug!(declared = length, max = self.max_length, "rejecting oversized frame");
            return Err(ProtocolError::too_long(FIELD_FRAME, self.max_length, length));
        }

        let total = header + length;
        if src.len() < total {
            src.reserve(total - src.len());
            return Ok(None);
        }

        src.advance(header);
        let frame = src.split_to(length);
        self.metrics.frame_decoded(length as u64);
        Ok(Some(frame))
    }
}

impl Encoder<Bytes> for FrameCodec {
    type Error = ProtocolError;

    fn encode(&mut self, body: Bytes, dst: &mut BytesMut) -> Result<()> {
        let length = body.len();
        if length > self.max_length {
            self.metrics.oversized_frame();
            return Err(ProtocolError::too_long(FIELD_FRAME, self.max_length, length));
        }

        dst.reserve(var_int_size(length as u32) + length);
        write_var_int(length as u32, dst);
        dst.extend_from_slice(&body);
        self.metrics.frame_encoded(length as u64);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn isolated() -> FrameCodec {
        FrameCodec::new().with_metrics(Arc::new(CodecMetrics::new()))
    }

    #[test]
    fn test_encode_then_decode() {
        let mut codec = isolated();
        let mut buf = BytesMut::new();
        codec.encode(Bytes::from_static(b"\x00hello"), &mut buf).unwrap();
        assert_eq!(buf[0], 6);

        let frame = codec.decode(&mut buf).unwrap().expect("complete frame");
        assert_eq!(&frame[..], b"\x00hello");
        assert!(buf.is_empty());

        let snapshot = codec.metrics().snapshot();
        assert_eq!(snapshot.frames_encoded, 1);
        assert_eq!(snapshot.frames_decoded, 1);
        assert_eq!(snapshot.bytes_received, 6);
    }

    #[test]
    fn test_partial_frame_preserves_buffer() {
        let mut codec = isolated();
        let mut buf = BytesMut::from(&[0x05, 0x00, 0x01][..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 3);

        // Incomplete length prefix
        let mut buf = BytesMut::from(&[0x80][..]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn test_two_frames_in_one_read() {
        let mut codec = isolated();
        let mut buf = BytesMut::from(&[0x01, 0xAA, 0x02, 0xBB, 0xCC][..]);
        assert_eq!(&codec.decode(&mut buf).unwrap().unwrap()[..], &[0xAA]);
        assert_eq!(&codec.decode(&mut buf).unwrap().unwrap()[..], &[0xBB, 0xCC]);
        assert!(codec.decode(&mut buf).unwrap().is_none());
    }

    #[test]
    fn test_oversized_frame_rejected_without_consuming() {
        let mut codec = isolated().with_max_length(4);
        let mut buf = BytesMut::from(&[0x05, 1, 2, 3, 4, 5][..]);
        assert!(matches!(
            codec.decode(&mut buf),
            Err(ProtocolError::FieldTooLong { max: 4, actual: 5, .. })
        ));
        assert_eq!(buf.len(), 6);
        assert_eq!(codec.metrics().snapshot().oversized_frames, 1);
    }

    #[test]
    fn test_four_byte_length_prefix_is_malformed() {
        let mut codec = isolated();
        let mut buf = BytesMut::from(&[0x80, 0x80, 0x80, 0x01][..]);
        assert!(matches!(
            codec.decode(&mut buf),
            Err(ProtocolError::MalformedVarInt { max_bytes: 3 })
        ));
        assert_eq!(codec.metrics().snapshot().malformed_frames, 1);
    }

    #[test]
    fn test_encode_rejects_oversized_body() {
        let mut codec = isolated().with_max_length(2);
        let mut buf = BytesMut::new();
        assert!(codec.encode(Bytes::from_static(b"abc"), &mut buf).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_from_config_clamps() {
        let limits = LimitsConfig {
            max_frame_length: usize::MAX,
            ..LimitsConfig::default()
        };
        assert_eq!(FrameCodec::from_config(&limits).max_length(), MAX_FRAME_LENGTH);
    }
}
