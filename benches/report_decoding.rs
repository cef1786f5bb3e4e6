//! Report Decoding Benchmarks
//!
//! Measures the per-report cost of the mouse decoder, the key-state diff and
//! the full session dispatch path.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;

use logi_mouse::config::Config;
use logi_mouse::input::{
    EventFrame, EventSink, KeyBitset, KeyStateTracker, MouseDecoder, ReportClass,
};
use logi_mouse::DeviceSession;

/// Sink that drops every frame
struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, frame: EventFrame) {
        black_box(frame);
    }
}

fn key_report(codes: &[u8]) -> Vec<u8> {
    let mut report = vec![0u8; 9];
    report[2..2 + codes.len()].copy_from_slice(codes);
    report
}

/// Benchmark mouse report decoding for both layouts
fn bench_mouse_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("mouse_decode");
    group.throughput(Throughput::Elements(1));

    let decoder = MouseDecoder::default();
    let short = [0x00, 0x01, 0x00, 0x0A, 0x00, 0xF6, 0xFF, 0x01, 0x00];
    let mut long = [0u8; 13];
    long[0] = 0x01;
    long[2] = 0x0A;
    long[6] = 0xFF;

    group.bench_function(BenchmarkId::new("layout", "9_bytes"), |b| {
        b.iter(|| black_box(decoder.decode(black_box(&short))))
    });

    group.bench_function(BenchmarkId::new("layout", "13_bytes"), |b| {
        b.iter(|| black_box(decoder.decode(black_box(&long))))
    });

    group.finish();
}

/// Benchmark key-state diffing with a growing number of held keys
fn bench_key_transitions(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_transitions");

    let held_sets: [&[u8]; 3] = [
        &[0x04],
        &[0x04, 0x05, 0x06],
        &[0x04, 0x16, 0x28, 0x3A, 0x59, 0x5D, 0x61],
    ];

    for codes in held_sets {
        let pressed = key_report(codes);
        let released = key_report(&[]);

        group.bench_function(BenchmarkId::new("press_release", codes.len()), |b| {
            let mut tracker = KeyStateTracker::new();
            b.iter(|| {
                black_box(tracker.process(black_box(&pressed)).ok());
                black_box(tracker.process(black_box(&released)).ok())
            })
        });
    }

    group.bench_function("bitset_diff_full", |b| {
        let all: Vec<u8> = (1..128).collect();
        let full = KeyBitset::from_codes(&all);
        let empty = KeyBitset::new();
        b.iter(|| black_box(empty.transitions(black_box(&full)).count()))
    });

    group.finish();
}

/// Benchmark the full dispatch path through a session
fn bench_session_dispatch(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime");
    let _guard = runtime.enter();

    let mut group = c.benchmark_group("session_dispatch");
    group.throughput(Throughput::Elements(1));

    let mut session = DeviceSession::new(&Config::default_config(), Arc::new(NullSink))
        .expect("Failed to create session");

    let mouse = [0x00, 0x01, 0x00, 0x0A, 0x00, 0xF6, 0xFF, 0x01, 0x00];
    group.bench_function("mouse", |b| {
        b.iter(|| black_box(session.decode(ReportClass::Mouse, black_box(&mouse))))
    });

    let pressed = key_report(&[0x04]);
    let released = key_report(&[]);
    group.bench_function("keyboard", |b| {
        b.iter(|| {
            session.decode(ReportClass::Keyboard, black_box(&pressed));
            black_box(session.decode(ReportClass::Keyboard, black_box(&released)))
        })
    });

    group.finish();
    session.shutdown();
}

criterion_group!(
    benches,
    bench_mouse_decode,
    bench_key_transitions,
    bench_session_dispatch
);
criterion_main!(benches);
