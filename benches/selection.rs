//! Benchmarks for the selection algebra and clipboard codec hot paths.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gridview::clipboard::{build_payload, plan_table_paste};
use gridview::html_table::parse_clipboard_table;
use gridview::range::{PasteTarget, Range};
use gridview::selection::{
    consolidate_contained_ranges, consolidate_row_ranges, validate_ranges,
};

fn scattered_row_bands(count: u32) -> Vec<Range> {
    (0..count)
        .map(|i| Range::rows(i * 3, i * 3 + 1, 32))
        .collect()
}

/// Benchmark merging of many scattered row bands
fn bench_consolidate_row_ranges(c: &mut Criterion) {
    let ranges = scattered_row_bands(64);
    c.bench_function("consolidate_row_ranges_64", |b| {
        b.iter(|| consolidate_row_ranges(black_box(&ranges)))
    });
}

/// Benchmark the O(n^2) containment elimination
fn bench_consolidate_contained(c: &mut Criterion) {
    let ranges: Vec<Range> = (0..64)
        .map(|i| Range::new(i, i + 4, i % 8, i % 8 + 4))
        .collect();
    c.bench_function("consolidate_contained_64", |b| {
        b.iter(|| consolidate_contained_ranges(black_box(&ranges)))
    });
}

/// Benchmark validation splitting over a large range with a sparse predicate
fn bench_validate(c: &mut Criterion) {
    let ranges = vec![Range::new(0, 4999, 0, 19)];
    let pred = |row: u32| row % 7 != 0;
    c.bench_function("validate_5000_rows", |b| {
        b.iter(|| validate_ranges(black_box(&ranges), Some(&pred), None))
    });
}

/// Benchmark copy payload construction for a large selection
fn bench_build_payload(c: &mut Criterion) {
    let values: Vec<String> = (0..5000).map(|i| format!("value {i}")).collect();
    c.bench_function("build_payload_5000", |b| {
        b.iter(|| build_payload(black_box(&values), 20))
    });
}

/// Benchmark the HTML parse + tiling pipeline for a big paste
fn bench_paste_pipeline(c: &mut Criterion) {
    let values: Vec<String> = (0..100).map(|i| format!("v{i}")).collect();
    let payload = build_payload(&values, 10);
    let target = PasteTarget::from_range(&Range::new(0, 99, 0, 49));
    c.bench_function("paste_pipeline_10x10_into_100x50", |b| {
        b.iter(|| {
            let source =
                parse_clipboard_table(black_box(&payload.html)).expect("payload has a table");
            plan_table_paste(&[target], &source)
        })
    });
}

criterion_group!(
    benches,
    bench_consolidate_row_ranges,
    bench_consolidate_contained,
    bench_validate,
    bench_build_payload,
    bench_paste_pipeline
);
criterion_main!(benches);
