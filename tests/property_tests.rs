//! Property-based tests using proptest
//!
//! These tests validate codec invariants across a wide range of randomly
//! generated inputs, including hostile byte streams.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use bytes::{Buf, Bytes, BytesMut};
use fixedbitset::FixedBitSet;
use mclb_protocol::core::bit_set::{fixed_bit_set_size, read_fixed_bit_set, write_fixed_bit_set};
use mclb_protocol::core::codec::{char_len, read_string, read_uuid, write_string, write_uuid};
use mclb_protocol::core::varint::{
    read_var_int, read_var_short, var_int_size, write_var_int, write_var_short,
};
use mclb_protocol::protocol::{read_packet, Direction, Handshake, ProtocolVersion};
use proptest::prelude::*;
use uuid::Uuid;

// Property: every u32 survives a VarInt roundtrip and uses var_int_size bytes
proptest! {
    #[test]
    fn prop_var_int_roundtrip(value in any::<u32>()) {
        let mut buf = BytesMut::new();
        write_var_int(value, &mut buf);
        prop_assert_eq!(buf.len(), var_int_size(value));

        let mut bytes = buf.freeze();
        prop_assert_eq!(read_var_int(&mut bytes).expect("valid VarInt"), value);
        prop_assert!(!bytes.has_remaining());
    }
}

// Property: every 23-bit value survives a VarShort roundtrip in 2 or 3 bytes
proptest! {
    #[test]
    fn prop_var_short_roundtrip(value in 0u32..(1 << 23)) {
        let mut buf = BytesMut::new();
        write_var_short(value, &mut buf);
        let expected_len = if value < 0x8000 { 2 } else { 3 };
        prop_assert_eq!(buf.len(), expected_len);

        let mut bytes = buf.freeze();
        prop_assert_eq!(read_var_short(&mut bytes).expect("valid VarShort"), value);
    }
}

// Property: strings within the character ceiling roundtrip unchanged
proptest! {
    #[test]
    fn prop_string_roundtrip(value in "\\PC{0,64}") {
        let max_chars = char_len(&value).max(1);
        let mut buf = BytesMut::new();
        write_string(&value, &mut buf, max_chars).expect("within ceiling");

        let mut bytes = buf.freeze();
        prop_assert_eq!(read_string(&mut bytes, max_chars).expect("valid string"), value);
    }
}

// Property: a string one character over its ceiling never encodes
proptest! {
    #[test]
    fn prop_string_over_ceiling_rejected(value in "[a-z]{1,64}") {
        let mut buf = BytesMut::new();
        prop_assert!(write_string(&value, &mut buf, value.len() - 1).is_err());
        prop_assert!(buf.is_empty());
    }
}

// Property: bit-sets within their width roundtrip in ceil(width / 8) bytes
proptest! {
    #[test]
    fn prop_bit_set_roundtrip(width in 1usize..256, seeds in prop::collection::vec(any::<usize>(), 0..32)) {
        let mut bits = FixedBitSet::with_capacity(width);
        for seed in seeds {
            bits.insert(seed % width);
        }

        let mut buf = BytesMut::new();
        write_fixed_bit_set(&bits, width, &mut buf).expect("within width");
        prop_assert_eq!(buf.len(), fixed_bit_set_size(width));

        let mut bytes = buf.freeze();
        prop_assert_eq!(read_fixed_bit_set(width, &mut bytes).expect("enough bytes"), bits);
    }
}

// Property: UUIDs roundtrip through their two 64-bit words
proptest! {
    #[test]
    fn prop_uuid_roundtrip(most in any::<u64>(), least in any::<u64>()) {
        let id = Uuid::from_u64_pair(most, least);
        let mut buf = BytesMut::new();
        write_uuid(&id, &mut buf);
        prop_assert_eq!(buf.len(), 16);
        prop_assert_eq!(read_uuid(&mut buf.freeze()).expect("16 bytes"), id);
    }
}

// Property: arbitrary input never panics the handshake decoder
proptest! {
    #[test]
    fn prop_handshake_decode_never_panics(data in prop::collection::vec(any::<u8>(), 0..1024)) {
        let mut bytes = Bytes::from(data);
        let _ = read_packet::<Handshake>(ProtocolVersion::V1_8, Direction::ToServer, &mut bytes);
    }
}
