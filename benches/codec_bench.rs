use bytes::{Bytes, BytesMut};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use mclb_protocol::core::codec::{read_string, write_length_prefixed, write_string};
use mclb_protocol::core::varint::{read_var_int, write_var_int};
use mclb_protocol::protocol::{read_packet, Direction, Handshake, HandshakeIntent, Packet, ProtocolVersion};

#[allow(clippy::unwrap_used)]
fn bench_var_int(c: &mut Criterion) {
    let mut group = c.benchmark_group("var_int");

    for &value in &[0u32, 300, 25_565, u32::MAX] {
        group.bench_function(format!("write_{value}"), |b| {
            let mut buf = BytesMut::with_capacity(8);
            b.iter(|| {
                buf.clear();
                write_var_int(value, &mut buf);
            })
        });

        let mut encoded = BytesMut::new();
        write_var_int(value, &mut encoded);
        let encoded = encoded.freeze();
        group.bench_function(format!("read_{value}"), |b| {
            b.iter_batched(
                || encoded.clone(),
                |mut bytes| read_var_int(&mut bytes).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

#[allow(clippy::unwrap_used)]
fn bench_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("string");

    for &chars in &[16usize, 255, 4096] {
        let value = "x".repeat(chars);
        group.throughput(Throughput::Bytes(chars as u64));

        group.bench_function(format!("write_{chars}"), |b| {
            let mut buf = BytesMut::with_capacity(chars + 8);
            b.iter(|| {
                buf.clear();
                write_string(&value, &mut buf, chars).unwrap();
            })
        });

        group.bench_function(format!("write_length_prefixed_{chars}"), |b| {
            let mut buf = BytesMut::with_capacity(chars + 16);
            b.iter(|| {
                buf.clear();
                write_length_prefixed(
                    value.as_str(),
                    |v, scratch| write_string(v, scratch, chars),
                    &mut buf,
                    chars * 3 + 8,
                )
                .unwrap();
            })
        });

        let mut encoded = BytesMut::new();
        write_string(&value, &mut encoded, chars).unwrap();
        let encoded: Bytes = encoded.freeze();
        group.bench_function(format!("read_{chars}"), |b| {
            b.iter_batched(
                || encoded.clone(),
                |mut bytes| read_string(&mut bytes, chars).unwrap(),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

#[allow(clippy::unwrap_used)]
fn bench_handshake(c: &mut Criterion) {
    let handshake = Handshake::new(47, "play.example.com", 25565, HandshakeIntent::Login);
    let mut encoded = BytesMut::new();
    handshake
        .write(ProtocolVersion::V1_8, Direction::ToServer, &mut encoded)
        .unwrap();
    let encoded = encoded.freeze();

    c.bench_function("handshake_decode", |b| {
        b.iter_batched(
            || encoded.clone(),
            |mut bytes| {
                read_packet::<Handshake>(ProtocolVersion::V1_8, Direction::ToServer, &mut bytes)
                    .unwrap()
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_var_int, bench_strings, bench_handshake);
criterion_main!(benches);
