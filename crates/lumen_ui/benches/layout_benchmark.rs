//! # Layout Benchmark
//!
//! Measures what the dirty bits buy:
//! 1. Full relayout of a wide tree
//! 2. Incremental relayout after touching one leaf
//! 3. Render walk into the batcher
//!
//! Target: incremental cost independent of total element count.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lumen_ui::layout::StackDirection;
use lumen_ui::{
    BatchRecorder, Batcher, Color, ElementRef, LayoutEngine, LayoutProperties, UiConfig, Vec2,
};

/// Root stack of `rows` horizontal stacks, each with `columns` leaves.
fn build_tree(rows: usize, columns: usize) -> (ElementRef, ElementRef) {
    let root = ElementRef::plain();
    root.set_size(Vec2::new(1920.0, 1080.0));
    root.set_layout_properties(LayoutProperties::stack(StackDirection::Vertical, 2.0));

    let mut last_leaf = ElementRef::plain();
    for _ in 0..rows {
        let row = ElementRef::plain();
        row.set_layout_properties(LayoutProperties::stack(StackDirection::Horizontal, 2.0));
        for _ in 0..columns {
            let leaf = ElementRef::plain();
            leaf.set_size(Vec2::new(16.0, 16.0));
            leaf.set_color(Color::WHITE);
            let _ = row.add_child(&leaf);
            last_leaf = leaf;
        }
        let _ = root.add_child(&row);
    }
    (root, last_leaf)
}

fn bench_full_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_full");

    for rows in [10, 50, 100] {
        let (root, _) = build_tree(rows, 50);
        let mut engine = LayoutEngine::new();

        group.bench_with_input(BenchmarkId::new("elements", rows * 50), &rows, |b, _| {
            b.iter(|| black_box(engine.layout_full(&root)));
        });
    }

    group.finish();
}

fn bench_incremental_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_incremental");

    for rows in [10, 50, 100] {
        let (root, leaf) = build_tree(rows, 50);
        let mut engine = LayoutEngine::new();
        engine.layout_full(&root);

        let mut toggle = false;
        group.bench_with_input(BenchmarkId::new("elements", rows * 50), &rows, |b, _| {
            b.iter(|| {
                toggle = !toggle;
                leaf.set_position(Vec2::new(if toggle { 1.0 } else { 0.0 }, 0.0));
                black_box(engine.layout(&root))
            });
        });
    }

    group.finish();
}

fn bench_render_walk(c: &mut Criterion) {
    let config = UiConfig {
        slot_quad_capacity: 16_384,
        ..UiConfig::default()
    };
    let (root, _) = build_tree(50, 50);
    LayoutEngine::new().layout_full(&root);
    let mut batcher = Batcher::new(&config);

    c.bench_function("render_2500_quads", |b| {
        b.iter(|| {
            batcher.begin();
            root.render(&mut batcher);
            batcher.end();
            black_box(batcher.stats())
        });
    });
}

criterion_group!(benches, bench_full_layout, bench_incremental_layout, bench_render_walk);
criterion_main!(benches);
