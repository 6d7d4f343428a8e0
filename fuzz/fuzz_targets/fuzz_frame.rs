#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use mclb_protocol::FrameCodec;
use tokio_util::codec::Decoder;

fuzz_target!(|data: &[u8]| {
    let mut codec = FrameCodec::new().with_max_length(4096);
    let mut src = BytesMut::from(data);

    // Drain until the codec asks for more input or rejects the stream
    while let Ok(Some(frame)) = codec.decode(&mut src) {
        assert!(frame.len() <= 4096);
    }
});
