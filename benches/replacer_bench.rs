//! Replacer benchmarks: access recording and eviction under a fixed pool.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use framecache::{FrameId, LruKReplacer};

const POOL_SIZE: usize = 1024;

fn bench_record_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_access");

    for k in [1usize, 2, 10] {
        group.bench_with_input(BenchmarkId::from_parameter(k), &k, |b, &k| {
            let replacer = LruKReplacer::new(POOL_SIZE, k);
            let mut next = 0usize;
            b.iter(|| {
                // Stride through the pool so frames cycle cold -> hot
                next = (next + 7) % POOL_SIZE;
                replacer.record_access(black_box(FrameId::new(next)));
            });
        });
    }

    group.finish();
}

fn bench_evict_refill(c: &mut Criterion) {
    c.bench_function("evict_refill", |b| {
        let replacer = LruKReplacer::new(POOL_SIZE, 2);
        for id in 0..POOL_SIZE {
            replacer.record_access(FrameId::new(id));
            replacer.record_access(FrameId::new(id));
        }

        b.iter(|| {
            if let Some(victim) = replacer.evict() {
                replacer.record_access(victim);
                black_box(victim);
            }
        });
    });
}

fn bench_evict_mostly_pinned(c: &mut Criterion) {
    c.bench_function("evict_mostly_pinned", |b| {
        let replacer = LruKReplacer::new(POOL_SIZE, 2);
        for id in 0..POOL_SIZE {
            replacer.record_access(FrameId::new(id));
            replacer.set_evictable(FrameId::new(id), false);
        }
        let last = FrameId::new(POOL_SIZE - 1);

        b.iter(|| {
            // Only the last frame is evictable: worst-case scan
            replacer.set_evictable(last, true);
            let victim = replacer.evict();
            replacer.record_access(last);
            replacer.set_evictable(last, false);
            black_box(victim);
        });
    });
}

criterion_group!(
    benches,
    bench_record_access,
    bench_evict_refill,
    bench_evict_mostly_pinned
);
criterion_main!(benches);
