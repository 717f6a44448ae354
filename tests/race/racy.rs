//! Racy strategy: completion races ahead of the scheduled producers

use crate::common::{assert_unit_interval, init_tracing};
use tickrace::{measure, EventLoop, Racy, Strategy};

#[test]
fn test_racy_completion_observes_incomplete_sequence() {
    init_tracing();
    let event_loop = EventLoop::new();
    let handle = event_loop.handle();

    let sequence = event_loop
        .block_on(Racy.build(8, &handle))
        .unwrap()
        .unwrap();

    assert!(sequence.len() < 8);
}

#[test]
fn test_racy_later_observation_is_complete() {
    let event_loop = EventLoop::new();
    let handle = event_loop.handle();

    let sequence = event_loop
        .block_on(Racy.build(8, &handle))
        .unwrap()
        .unwrap();
    let at_completion = sequence.len();

    event_loop.run_until_stalled();

    assert_eq!(at_completion, 0);
    assert_eq!(sequence.len(), 8);
    assert_unit_interval(&sequence.snapshot());
}

#[test]
fn test_racy_hundred_thousand_elements() {
    // count = 100_000: nothing at completion, everything after the batch drains
    const COUNT: usize = 100_000;
    let event_loop = EventLoop::new();
    let handle = event_loop.handle();

    let measurement = event_loop
        .block_on(measure(&Racy, COUNT, &handle))
        .unwrap()
        .unwrap();

    assert_eq!(measurement.record.count, 0);
    assert_eq!(measurement.sequence.len(), 0);
    assert_eq!(event_loop.pending(), COUNT);

    event_loop.run_until_stalled();
    assert_eq!(measurement.sequence.len(), COUNT);
}

#[test]
fn test_racy_sequence_mutated_after_completion() {
    let event_loop = EventLoop::new();
    let handle = event_loop.handle();

    let sequence = event_loop
        .block_on(Racy.build(4, &handle))
        .unwrap()
        .unwrap();

    let mut lengths = vec![sequence.len()];
    while event_loop.pending() > 0 {
        event_loop.tick();
        lengths.push(sequence.len());
    }

    // 0 at completion, still 0 after producers suspend, then all appended
    assert_eq!(lengths, vec![0, 0, 4]);
}

#[test]
fn test_racy_interleaves_with_next_strategy() {
    // A racy run followed by another scheduled run: the leftovers from the first
    // run keep appending while the second one is in progress.
    let event_loop = EventLoop::new();
    let handle = event_loop.handle();

    let racy = event_loop
        .block_on(Racy.build(16, &handle))
        .unwrap()
        .unwrap();
    assert_eq!(racy.len(), 0);

    let controlled = event_loop
        .block_on(tickrace::NoRace.build(2, &handle))
        .unwrap()
        .unwrap();

    assert_eq!(controlled.len(), 2);
    assert_eq!(racy.len(), 16);
}
