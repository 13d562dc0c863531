use criterion::{black_box, criterion_group, criterion_main, Criterion};
use motorlink_core::{decode, frame, Opcode, Request, Response};

fn bench_encode(c: &mut Criterion) {
    c.bench_function("encode move", |b| {
        b.iter(|| frame::encode(Opcode::Move, black_box(&(-1600i32).to_be_bytes())))
    });

    c.bench_function("encode request", |b| {
        let config = motorlink_core::ProtocolConfig::STANDARD;
        b.iter(|| black_box(Request::SetSpeed(500)).encode(&config))
    });
}

fn bench_decode(c: &mut Criterion) {
    let response = Response::Speed(500).frame().encode();
    c.bench_function("decode response", |b| b.iter(|| decode(black_box(&response))));

    let text = b"motor: limit reached, stopping";
    c.bench_function("decode text", |b| b.iter(|| decode(black_box(text))));
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
