//! Runtime compatibility tests for Tokio (current-thread scheduler)

use std::time::Duration;

use crate::common::{assert_unit_interval, tokio_spawner};
use tickrace::{measure, run_all_in_series, NoRace, Racy, Strategy, StrategyKind};

#[tokio::test]
async fn test_no_race_on_tokio() {
    let sequence = NoRace.build(25, &tokio_spawner).await.unwrap();

    assert_eq!(sequence.len(), 25);
    assert_unit_interval(&sequence.snapshot());
}

#[tokio::test]
async fn test_racy_on_tokio_completes_early_then_fills() {
    const COUNT: usize = 1_000;

    let measurement = measure(&Racy, COUNT, &tokio_spawner).await.unwrap();
    assert!(measurement.record.count < COUNT);

    let sequence = measurement.sequence;
    tokio::time::timeout(Duration::from_secs(5), async {
        while sequence.len() < COUNT {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("scheduled producers never drained");

    assert_eq!(sequence.len(), COUNT);
}

#[tokio::test]
async fn test_series_on_tokio() {
    let strategies: Vec<&dyn Strategy> =
        StrategyKind::ALL.iter().map(|kind| kind.strategy()).collect();

    let timings = run_all_in_series(&strategies, 30, &tokio_spawner)
        .await
        .unwrap();

    assert_eq!(timings.len(), 4);
    assert_eq!(timings.get("NoRace").unwrap().count, 30);
    assert_eq!(timings.get("Synchronous").unwrap().count, 30);
}

#[test]
fn test_closure_spawner_on_tokio_runtime() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();

    let sequence = runtime.block_on(async {
        let spawner = |fut: futures::future::BoxFuture<'static, ()>| {
            tokio::spawn(fut);
        };
        NoRace.build(7, &spawner).await
    });

    assert_eq!(sequence.unwrap().len(), 7);
}
