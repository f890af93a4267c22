//! Extendible hash table benchmarks: growth, lookups and page-table churn.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use framecache::{ExtendibleHashTable, FrameId, PageId, PageTable};

fn bench_insert_grow(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_grow");

    for bucket_size in [2usize, 4, 16, 64] {
        group.bench_with_input(
            BenchmarkId::from_parameter(bucket_size),
            &bucket_size,
            |b, &bucket_size| {
                b.iter_batched(
                    || ExtendibleHashTable::<u64, u64>::new(bucket_size),
                    |table| {
                        for key in 0..10_000u64 {
                            table.insert(key, key);
                        }
                        table
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

fn bench_find(c: &mut Criterion) {
    let table = ExtendibleHashTable::<u64, u64>::new(4);
    for key in 0..100_000u64 {
        table.insert(key, key);
    }

    let mut key = 0u64;
    c.bench_function("find_hit", |b| {
        b.iter(|| {
            key = (key + 7919) % 100_000;
            black_box(table.find(black_box(&key)));
        });
    });

    c.bench_function("find_miss", |b| {
        b.iter(|| black_box(table.find(black_box(&200_000))));
    });
}

fn bench_page_table_churn(c: &mut Criterion) {
    let page_table = PageTable::new(4);
    for i in 0..1024u32 {
        page_table.insert(PageId::new(i), FrameId::new(i as usize));
    }

    let mut next = 1024u32;
    c.bench_function("page_table_churn", |b| {
        b.iter(|| {
            // Evict the oldest resident page and map a new one into its frame
            let old = PageId::new(next - 1024);
            let frame = page_table.find(&old).unwrap_or(FrameId::new(0));
            page_table.remove(&old);
            page_table.insert(PageId::new(next), frame);
            next += 1;
        });
    });
}

criterion_group!(benches, bench_insert_grow, bench_find, bench_page_table_churn);
criterion_main!(benches);
