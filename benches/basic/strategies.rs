//! Strategy benchmarks

use criterion::{BenchmarkId, Criterion};
use futures::future::BoxFuture;
use tickrace::{EventLoop, Strategy, StrategyKind};

const COUNTS: [usize; 3] = [10, 1_000, 10_000];

pub fn bench_strategies_event_loop(c: &mut Criterion) {
    let mut group = c.benchmark_group("strategies_event_loop");

    for kind in StrategyKind::ALL {
        for count in COUNTS {
            group.bench_with_input(BenchmarkId::new(kind.name(), count), &count, |b, &count| {
                b.iter(|| {
                    let event_loop = EventLoop::new();
                    let handle = event_loop.handle();
                    let sequence = event_loop
                        .block_on(kind.build(count, &handle))
                        .unwrap()
                        .unwrap();
                    // Drain racy leftovers so every strategy does the same work
                    event_loop.run_until_stalled();
                    sequence
                });
            });
        }
    }

    group.finish();
}

pub fn bench_strategies_tokio(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let spawner = |fut: BoxFuture<'static, ()>| {
        tokio::spawn(fut);
    };
    let mut group = c.benchmark_group("strategies_tokio");

    for kind in [StrategyKind::Synchronous, StrategyKind::NoRace] {
        for count in COUNTS {
            group.bench_with_input(BenchmarkId::new(kind.name(), count), &count, |b, &count| {
                b.iter(|| rt.block_on(async { kind.build(count, &spawner).await.unwrap() }));
            });
        }
    }

    group.finish();
}
