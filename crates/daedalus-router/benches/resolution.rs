//! Resolution benchmarks.
//!
//! Run with: `cargo bench -p daedalus-router`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use daedalus_router::{RouteTable, VerbKey};
use http::Method;

fn build_table(num_routes: usize) -> RouteTable<String> {
    let mut table = RouteTable::new();

    for i in 0..num_routes / 3 {
        table.insert(
            &format!("resource{i}"),
            VerbKey::Method(Method::GET),
            format!("getResource{i}"),
        );
    }

    for i in 0..num_routes / 3 {
        table.insert(
            &format!(r"resource{i}/(\d+)"),
            VerbKey::Method(Method::GET),
            format!("getResourceById{i}"),
        );
    }

    for i in 0..num_routes / 3 {
        table.insert(
            &format!(r"org/([\w-]+)/resource{i}/(\d+)"),
            VerbKey::Any,
            format!("orgResource{i}"),
        );
    }

    table
}

fn bench_exact(c: &mut Criterion) {
    let table = build_table(99);

    c.bench_function("exact", |b| {
        b.iter(|| black_box(table.resolve("resource20", &Method::GET)));
    });
}

fn bench_regex(c: &mut Criterion) {
    let table = build_table(99);

    c.bench_function("regex", |b| {
        b.iter(|| black_box(table.resolve("resource25/12345", &Method::GET)));
    });
}

fn bench_wildcard_regex(c: &mut Criterion) {
    let table = build_table(99);

    c.bench_function("wildcard_regex", |b| {
        b.iter(|| black_box(table.resolve("org/acme-corp/resource10/12345", &Method::DELETE)));
    });
}

fn bench_miss(c: &mut Criterion) {
    let table = build_table(99);

    c.bench_function("miss", |b| {
        b.iter(|| black_box(table.resolve("nonexistent/path", &Method::GET)));
    });
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");

    for size in [30, 300, 900] {
        let table = build_table(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &table, |b, table| {
            b.iter(|| black_box(table.resolve("resource5/1", &Method::GET)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_exact,
    bench_regex,
    bench_wildcard_regex,
    bench_miss,
    bench_scaling
);
criterion_main!(benches);
