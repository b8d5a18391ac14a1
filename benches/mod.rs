#![cfg(unstable)]
#![feature(test)]
extern crate test;

use chipmunk_json::{escape, escape_fallback, OffsetSink, StructuralIndexer};

use std::str;

#[bench]
fn index_10kb_event_stacktrace_simd(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/10kb_event_stacktrace.json");

    let mut indexer = StructuralIndexer::new();
    let mut sink = OffsetSink::new(input.len());

    b.bytes = input.len() as u64;
    b.iter(|| {
        indexer.index(input, input.len(), &mut sink).unwrap();
        sink.get_last()
    })
}

#[bench]
fn index_10kb_event_stacktrace_fallback(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/10kb_event_stacktrace.json");

    let mut indexer = StructuralIndexer::new();
    let mut sink = OffsetSink::new(input.len());

    b.bytes = input.len() as u64;
    b.iter(|| {
        indexer.index_fallback(input, input.len(), &mut sink).unwrap();
        sink.get_last()
    })
}

#[bench]
fn index_10kb_event_stacktrace_drain(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/10kb_event_stacktrace.json");

    let mut indexer = StructuralIndexer::new();
    let mut sink = OffsetSink::new(input.len());

    b.bytes = input.len() as u64;
    b.iter(|| {
        indexer.index(input, input.len(), &mut sink).unwrap();

        let mut last = 0;
        while !sink.is_end() {
            last = sink.get_and_advance();
        }
        last
    })
}

#[bench]
fn index_10kb_event_stacktrace_value_serde_json(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/10kb_event_stacktrace.json");

    b.bytes = input.len() as u64;
    b.iter(|| {
        let v: serde_json::Value = serde_json::from_slice(input).unwrap();
        v
    })
}

#[bench]
fn index_10kb_event_stacktrace_value_json(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/10kb_event_stacktrace.json");

    b.bytes = input.len() as u64;
    b.iter(|| {
        let v: json::JsonValue = json::parse(str::from_utf8(input).unwrap()).unwrap();
        v
    })
}

#[bench]
fn index_10kb_event_stacktrace_value_simd_json(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/10kb_event_stacktrace.json");

    b.bytes = input.len() as u64;
    b.iter(|| {
        let mut input = input.to_vec();
        let v = simd_json::to_borrowed_value(&mut input).unwrap();
        test::black_box(&v);
    })
}

#[bench]
fn index_10kb_event_stacktrace_to_vec(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/10kb_event_stacktrace.json");

    b.bytes = input.len() as u64;
    b.iter(|| input.to_vec())
}

#[bench]
fn index_10kb_event_stacktrace_validate_utf8(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/10kb_event_stacktrace.json");

    b.bytes = input.len() as u64;
    b.iter(|| str::from_utf8(input).unwrap())
}

#[bench]
fn index_600b_event_no_escape_simd(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/600b_event_no_escape.json");

    let mut indexer = StructuralIndexer::new();
    let mut sink = OffsetSink::new(input.len());

    b.bytes = input.len() as u64;
    b.iter(|| {
        indexer.index(input, input.len(), &mut sink).unwrap();
        sink.get_last()
    })
}

#[bench]
fn index_600b_event_no_escape_fallback(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/600b_event_no_escape.json");

    let mut indexer = StructuralIndexer::new();
    let mut sink = OffsetSink::new(input.len());

    b.bytes = input.len() as u64;
    b.iter(|| {
        indexer.index_fallback(input, input.len(), &mut sink).unwrap();
        sink.get_last()
    })
}

#[bench]
fn index_600b_event_no_escape_value_serde_json(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/600b_event_no_escape.json");

    b.bytes = input.len() as u64;
    b.iter(|| {
        let v: serde_json::Value = serde_json::from_slice(input).unwrap();
        v
    })
}

#[bench]
fn compact_10kb_event_stacktrace_simd(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/10kb_event_stacktrace.json");
    let mut dst = vec![0; input.len()];

    b.bytes = input.len() as u64;
    b.iter(|| escape(input, &mut dst))
}

#[bench]
fn compact_10kb_event_stacktrace_fallback(b: &mut test::Bencher) {
    let input = include_bytes!("../cases/10kb_event_stacktrace.json");
    let mut dst = vec![0; input.len()];

    b.bytes = input.len() as u64;
    b.iter(|| escape_fallback(input, &mut dst))
}
