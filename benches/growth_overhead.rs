//! Benchmarks for on-demand worker growth

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::time::Duration;
use tierpool::prelude::*;

fn bench_fixed_pool(c: &mut Criterion) {
    c.bench_function("fixed_pool_burst", |b| {
        b.iter(|| {
            let pool = WorkerPool::new(4, 4).unwrap();
            for i in 0..64 {
                pool.execute(move || {
                    black_box(i);
                    std::thread::sleep(Duration::from_micros(50));
                });
            }
            pool.shutdown();
        });
    });
}

fn bench_growing_pool(c: &mut Criterion) {
    c.bench_function("growing_pool_burst", |b| {
        b.iter(|| {
            let pool = WorkerPool::new(0, 4).unwrap();
            for i in 0..64 {
                pool.execute(move || {
                    black_box(i);
                    std::thread::sleep(Duration::from_micros(50));
                });
            }
            pool.shutdown();
        });
    });
}

criterion_group!(benches, bench_fixed_pool, bench_growing_pool);
criterion_main!(benches);
