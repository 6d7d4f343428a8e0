//! Stream-level tests: frames flowing through `FramedRead`/`FramedWrite`
//! and into the packet layer.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use futures::{SinkExt, StreamExt};
use mclb_protocol::core::varint::{read_var_int, write_var_int};
use mclb_protocol::error::ProtocolError;
use mclb_protocol::protocol::{read_packet, Direction, Handshake, HandshakeIntent, Packet, ProtocolVersion};
use mclb_protocol::utils::metrics::CodecMetrics;
use mclb_protocol::FrameCodec;
use tokio_util::codec::{FramedRead, FramedWrite};

fn handshake_frame_body(handshake: &Handshake) -> Bytes {
    let mut body = BytesMut::new();
    write_var_int(Handshake::ID, &mut body);
    handshake
        .write(ProtocolVersion::V1_8, Direction::ToServer, &mut body)
        .unwrap();
    body.freeze()
}

#[tokio::test]
async fn test_write_then_read_handshake_frames() {
    let metrics = Arc::new(CodecMetrics::new());
    let codec = FrameCodec::new().with_metrics(metrics.clone());

    let sent = vec![
        Handshake::new(47, "a.example.com", 25565, HandshakeIntent::Status),
        Handshake::new(766, "b.example.com", 25566, HandshakeIntent::Transfer),
    ];

    let mut writer = FramedWrite::new(Vec::new(), codec.clone());
    for handshake in &sent {
        writer.send(handshake_frame_body(handshake)).await.unwrap();
    }
    let wire = writer.into_inner();

    let mut reader = FramedRead::new(&wire[..], codec);
    let mut received = Vec::new();
    while let Some(frame) = reader.next().await {
        let mut frame = frame.unwrap().freeze();
        assert_eq!(read_var_int(&mut frame).unwrap(), Handshake::ID);
        let handshake: Handshake =
            read_packet(ProtocolVersion::V1_8, Direction::ToServer, &mut frame).unwrap();
        received.push(handshake);
    }

    assert_eq!(received, sent);
    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.frames_encoded, 2);
    assert_eq!(snapshot.frames_decoded, 2);
    assert_eq!(snapshot.bytes_sent, snapshot.bytes_received);
}

#[tokio::test]
async fn test_oversized_frame_ends_stream_with_error() {
    let codec = FrameCodec::new()
        .with_max_length(16)
        .with_metrics(Arc::new(CodecMetrics::new()));

    let mut wire = BytesMut::new();
    write_var_int(17, &mut wire);
    wire.extend_from_slice(&[0u8; 17]);

    let mut reader = FramedRead::new(&wire[..], codec);
    let first = reader.next().await.expect("an item");
    assert!(matches!(
        first,
        Err(ProtocolError::FieldTooLong { max: 16, actual: 17, .. })
    ));
}

#[tokio::test]
async fn test_truncated_stream_reports_io_error() {
    let codec = FrameCodec::new().with_metrics(Arc::new(CodecMetrics::new()));

    // Declares 10 bytes, delivers 3, then EOF
    let wire = [10u8, 1, 2, 3];
    let mut reader = FramedRead::new(&wire[..], codec);
    let first = reader.next().await.expect("an item");
    assert!(matches!(first, Err(ProtocolError::Io(_))));
}
