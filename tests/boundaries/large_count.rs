//! Large counts on the built-in loop

use tickrace::{EventLoop, NoRace, Strategy, StrategyKind};

#[test]
fn test_large_count_every_strategy_eventually_complete() {
    const COUNT: usize = 20_000;
    let event_loop = EventLoop::new();
    let handle = event_loop.handle();

    for kind in StrategyKind::ALL {
        let sequence = event_loop
            .block_on(kind.build(COUNT, &handle))
            .unwrap()
            .unwrap();
        event_loop.run_until_stalled();

        assert_eq!(sequence.len(), COUNT, "{}", kind.name());
    }
}

#[test]
fn test_no_race_large_count_exact_at_completion() {
    const COUNT: usize = 10_000;
    let event_loop = EventLoop::new();
    let handle = event_loop.handle();

    let sequence = event_loop
        .block_on(NoRace.build(COUNT, &handle))
        .unwrap()
        .unwrap();

    assert_eq!(sequence.len(), COUNT);
    assert_eq!(event_loop.ticks(), 2 * COUNT as u64);
}
