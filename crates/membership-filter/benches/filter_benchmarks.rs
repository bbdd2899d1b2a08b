//! # Membership Filter Benchmarks
//!
//! | Operation | Cost |
//! |-----------|------|
//! | add | O(k) |
//! | might_contain (absent) | usually exits at the first unset bit |
//! | might_contain (present) | O(k) |
//! | to_bytes / from_bytes | O(m) |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use membership_filter::MembershipFilter;

fn populated(expected: u64, rate: f64) -> MembershipFilter {
    let mut filter = MembershipFilter::new(expected, rate).unwrap();
    for i in 0..expected {
        filter.add(format!("user_{}", i).as_bytes());
    }
    filter
}

fn bench_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("membership-filter-add");
    group.measurement_time(Duration::from_secs(5));

    for rate in [0.1, 0.01, 0.001] {
        let items: Vec<Vec<u8>> = (0..1_000).map(|i| format!("user_{}", i).into_bytes()).collect();
        group.throughput(Throughput::Elements(items.len() as u64));
        group.bench_with_input(BenchmarkId::new("rate", rate), &items, |b, items| {
            b.iter(|| {
                let mut filter = MembershipFilter::new(1_000, rate).unwrap();
                for item in items {
                    filter.add(black_box(item));
                }
                filter
            })
        });
    }

    group.finish();
}

fn bench_might_contain(c: &mut Criterion) {
    let mut group = c.benchmark_group("membership-filter-query");
    let filter = populated(10_000, 0.01);

    group.bench_function("present", |b| {
        b.iter(|| black_box(filter.might_contain(black_box(b"user_4242"))))
    });
    group.bench_function("absent", |b| {
        b.iter(|| black_box(filter.might_contain(black_box(b"visitor_4242"))))
    });

    group.finish();
}

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("membership-filter-codec");

    for expected in [1_000u64, 100_000] {
        let filter = populated(expected, 0.01);
        let bytes = filter.to_bytes();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("to_bytes", expected), &filter, |b, f| {
            b.iter(|| black_box(f.to_bytes()))
        });
        group.bench_with_input(BenchmarkId::new("from_bytes", expected), &bytes, |b, bytes| {
            b.iter(|| black_box(MembershipFilter::from_bytes(bytes).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_add, bench_might_contain, bench_serialization);
criterion_main!(benches);
