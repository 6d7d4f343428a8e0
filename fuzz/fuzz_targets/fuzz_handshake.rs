#![no_main]

use bytes::{Bytes, BytesMut};
use libfuzzer_sys::fuzz_target;
use mclb_protocol::protocol::{read_packet, Direction, Handshake, Packet, ProtocolVersion};

fuzz_target!(|data: &[u8]| {
    let mut src = Bytes::copy_from_slice(data);
    let version = ProtocolVersion::V1_8;

    // Anything that decodes must re-encode and decode to the same packet
    if let Ok(handshake) = read_packet::<Handshake>(version, Direction::ToServer, &mut src) {
        let mut buf = BytesMut::new();
        if handshake.write(version, Direction::ToServer, &mut buf).is_ok() {
            let again: Handshake = read_packet(version, Direction::ToServer, &mut buf.freeze())
                .expect("re-encoded handshake must decode");
            assert_eq!(again, handshake);
        }
    }
});
