use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use railway_async::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_result(i: u64, fail_every: u64) -> Result<u64> {
    if fail_every != 0 && i % fail_every == 0 {
        failure(Error::validation_field(format!("field_{}", i % 7), "invalid"))
    } else {
        success(i)
    }
}

async fn lookup(i: u64) -> Result<u64> {
    tokio::task::yield_now().await;
    success(i * 2)
}

// ---------------------------------------------------------------------------
// Benchmark: sync chain
// ---------------------------------------------------------------------------

fn bench_sync_chain(c: &mut Criterion) {
    c.bench_function("sync_chain", |b| {
        b.iter(|| {
            black_box(
                success(black_box(21u64))
                    .ensure(|v| *v > 0, Error::validation("zero"))
                    .map(|v| v * 2)
                    .bind(|v| success_if(v == 42, v, Error::domain("mismatch")))
                    .tap(|v| {
                        black_box(v);
                    }),
            )
        });
    });
}

// ---------------------------------------------------------------------------
// Benchmark: combine_iter with validation merges
// ---------------------------------------------------------------------------

fn bench_combine_iter(c: &mut Criterion) {
    let mut group = c.benchmark_group("combine_iter");
    for (count, fail_every) in [(100, 0), (100, 10), (1_000, 10), (1_000, 2)] {
        group.bench_with_input(
            BenchmarkId::new(format!("{}items_fail_every_{}", count, fail_every), count),
            &(count, fail_every),
            |b, &(count, fail_every)| {
                b.iter(|| {
                    black_box(combine_iter((0..count).map(|i| make_result(i, fail_every))))
                });
            },
        );
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark: async chain and parallel fan-out
// ---------------------------------------------------------------------------

fn bench_async_chain(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    c.bench_function("async_chain", |b| {
        b.to_async(&rt).iter(|| async {
            black_box(
                lookup(black_box(1))
                    .bind_async(lookup)
                    .map(|v| v + 1)
                    .ensure(|v| *v > 0, Error::domain("negative"))
                    .await,
            )
        });
    });
}

fn bench_parallel(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("parallel");
    group.bench_function("tuple_3", |b| {
        b.to_async(&rt).iter(|| async {
            black_box((|| lookup(1), || lookup(2), || lookup(3)).parallel().await)
        });
    });
    for count in [10u64, 100] {
        group.bench_with_input(BenchmarkId::new("parallel_all", count), &count, |b, &count| {
            b.to_async(&rt)
                .iter(|| async move { black_box(parallel_all((0..count).map(lookup)).await) });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_sync_chain,
    bench_combine_iter,
    bench_async_chain,
    bench_parallel,
);
criterion_main!(benches);
