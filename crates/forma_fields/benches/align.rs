//! Benchmark: step alignment and commit throughput.
//!
//! Run with: `cargo bench -p forma_fields --bench align`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use forma_core::{FieldController, FieldEvent};
use forma_fields::{align, parse_number, NumberField, NumberFieldConfig};

fn bench_align(c: &mut Criterion) {
    let mut group = c.benchmark_group("align");

    group.bench_function("integer_grid", |b| {
        b.iter(|| align(black_box(7.0), black_box(0.0), black_box(10.0), black_box(3.0)))
    });

    group.bench_function("fractional_grid", |b| {
        b.iter(|| align(black_box(0.37), black_box(0.0), black_box(1.0), black_box(0.05)))
    });

    group.bench_function("clamp_high", |b| {
        b.iter(|| align(black_box(1e12), black_box(-5.5), black_box(99.5), black_box(0.25)))
    });

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_number", |b| {
        b.iter(|| parse_number(black_box("  -12.75e-1px")))
    });
}

fn bench_commit(c: &mut Criterion) {
    c.bench_function("type_and_commit", |b| {
        let mut field =
            NumberField::with_config(NumberFieldConfig::new().min(0.0).max(100.0).step(0.5));
        let typed = FieldEvent::text("42.3");
        b.iter(|| {
            field.handle_event(&FieldEvent::Focus);
            field.handle_event(black_box(&typed));
            field.handle_event(&FieldEvent::Blur);
            black_box(field.value())
        })
    });
}

criterion_group!(benches, bench_align, bench_parse, bench_commit);
criterion_main!(benches);
