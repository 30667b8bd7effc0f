//! Performance benchmarks for the annotation pipeline
//!
//! Run with: cargo bench --bench annotation_benchmarks

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glyphmark_core::{annotate, segment, ModeFlag, Preferences, RuleConfig};
use std::hint::black_box;

/// Generate test text of specified size
fn generate_text(size: usize) -> String {
    let base_line = "The bold dog quietly dipped a paw in the deep pond. ";
    let repeat_count = size / base_line.len() + 1;

    let mut text = base_line.repeat(repeat_count);
    text.truncate(size);
    text
}

fn rules() -> RuleConfig {
    RuleConfig::builder()
        .group("mirror_letters1", ['b', 'd'], Some("soft-blue"))
        .group("mirror_letters2", ['p', 'q'], Some("soft-green"))
        .group("similar_shapes", ['m', 'w', 'n', 'u'], Some("soft-purple"))
        .color("soft-blue", "#4a90e2")
        .color("soft-green", "#66bb6a")
        .color("soft-purple", "#9575cd")
        .build()
}

/// Benchmark segmentation alone
fn bench_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmentation");

    for size in [1024, 10_240, 102_400] {
        let text = generate_text(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("segment", size), &text, |b, text| {
            b.iter(|| segment(black_box(text)).len());
        });
    }

    group.finish();
}

/// Benchmark the full annotation pass with every mode enabled
fn bench_annotation(c: &mut Criterion) {
    let mut group = c.benchmark_group("annotation");
    let config = rules();
    let prefs = Preferences::default()
        .with_mode(ModeFlag::BoldStarts)
        .with_mode(ModeFlag::VowelColoring)
        .with_group("mirror_letters1")
        .with_group("mirror_letters2")
        .with_group("similar_shapes");

    for size in [1024, 10_240, 102_400] {
        let text = generate_text(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("annotate", size), &text, |b, text| {
            b.iter(|| annotate(black_box(text), &config, &prefs).len());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_segmentation, bench_annotation);
criterion_main!(benches);
