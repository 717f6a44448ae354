//! Raw event loop overhead

use criterion::Criterion;
use tickrace::{next_tick, EventLoop};

pub fn bench_event_loop(c: &mut Criterion) {
    c.bench_function("spawn_and_drain_1000_tasks", |b| {
        b.iter(|| {
            let event_loop = EventLoop::new();
            for _ in 0..1_000 {
                event_loop.spawn(async {});
            }
            event_loop.run_until_stalled()
        });
    });

    c.bench_function("1000_next_tick_resumptions", |b| {
        b.iter(|| {
            let event_loop = EventLoop::new();
            event_loop
                .block_on(async {
                    for _ in 0..1_000 {
                        next_tick().await;
                    }
                })
                .unwrap();
            event_loop.ticks()
        });
    });
}
