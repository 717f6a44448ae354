//! # Race Demo
//!
//! Runs every strategy in series, prints the timing map after each pass, then shows
//! the racy strategy handing out an incomplete sequence.
//!
//! ## Running This Example
//!
//! ```bash
//! cargo run --example race_demo
//!
//! # With library events (ticks, loop iterations, harness runs)
//! RUST_LOG=tickrace=debug cargo run --example race_demo --features tracing
//! ```
//!
//! ## What You'll See
//!
//! - Pass 1 on the built-in tick loop: `Racy` reports 0 elements, the rest report
//!   all of them
//! - Pass 2 on a Tokio current-thread runtime: same shape, different timings
//! - Racy diagnostics: the length at completion versus after the remaining
//!   continuations have run

use std::error::Error;
use std::time::Duration;

use futures::future::BoxFuture;
use tickrace::{measure, run_all_in_series, BuildError, EventLoop, Racy, Strategy, StrategyKind};

use tracing_subscriber::{fmt, EnvFilter};

/// Number of elements every strategy builds.
const DEMO_COUNT: usize = 100_000;

/// How long the Tokio pass waits before sampling the racy sequence again.
const SETTLE_DELAY: Duration = Duration::from_millis(100);

fn main() -> Result<(), Box<dyn Error>> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tickrace=info")),
        )
        .init();

    let strategies: Vec<&dyn Strategy> = StrategyKind::ALL
        .iter()
        .map(|kind| kind.strategy())
        .collect();

    println!("=== Strategy Timings (count = {}) ===\n", DEMO_COUNT);

    println!("Pass 1: built-in tick loop");
    println!("--------------------------");
    let event_loop = EventLoop::new();
    let handle = event_loop.handle();
    let timings = event_loop.block_on(run_all_in_series(&strategies, DEMO_COUNT, &handle))??;
    println!("{}", timings);
    println!("(ticks so far: {})\n", event_loop.ticks());
    event_loop.run_until_stalled();

    println!("Pass 2: Tokio current-thread runtime");
    println!("------------------------------------");
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let spawner = |fut: BoxFuture<'static, ()>| {
        tokio::spawn(fut);
    };
    let (timings, racy_at_completion, racy_after_delay) = runtime.block_on(async {
        let timings = run_all_in_series(&strategies, DEMO_COUNT, &spawner).await?;
        let racy = measure(&Racy, DEMO_COUNT, &spawner).await?;
        let at_completion = racy.sequence.len();
        tokio::time::sleep(SETTLE_DELAY).await;
        Ok::<_, BuildError>((timings, at_completion, racy.sequence.len()))
    })?;
    println!("{}", timings);
    println!(
        "Racy on Tokio: {} at completion, {} after {:?}\n",
        racy_at_completion, racy_after_delay, SETTLE_DELAY
    );

    println!("Racy diagnostics (built-in tick loop)");
    println!("-------------------------------------");
    let racy = event_loop.block_on(measure(&Racy, DEMO_COUNT, &handle))??;
    println!("Length when completion fired: {}", racy.sequence.len());
    let drained_ticks = event_loop.run_until_stalled();
    println!(
        "Length after {} more ticks:    {}",
        drained_ticks,
        racy.sequence.len()
    );
    println!("\nRacy completed before its producers ran. NoRace awaits each producer");
    println!("inside a controlled loop and always reports the full count.");

    Ok(())
}
