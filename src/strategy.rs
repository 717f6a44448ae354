//! Array builder strategies.
//!
//! Four interchangeable ways of building a [`Sequence`] of `count` random values.
//! They differ only in *when* each element is produced:
//!
//! | Strategy        | Element production                  | Complete at resolution? |
//! |-----------------|-------------------------------------|-------------------------|
//! | [`Synchronous`] | one pass, current tick              | always                  |
//! | [`Confused`]    | callback producer, current tick     | always                  |
//! | [`Racy`]        | detached continuation per element   | **no**                  |
//! | [`NoRace`]      | one continuation at a time, awaited | always                  |
//!
//! [`Racy`] is broken on purpose: it resolves as soon as every continuation has been
//! *scheduled*, not once they have *run*, and keeps appending to the sequence it
//! already handed out.

use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use futures::FutureExt;

#[cfg(feature = "tracing")]
use tracing::{debug, warn};

use crate::control::whilst;
use crate::error::{panic_message, BuildError, BuildResult};
use crate::event_loop::Schedule;
use crate::producer::{produce, produce_next_tick, produce_with};
use crate::sequence::Sequence;

/// A way of building a sequence of `count` values.
///
/// The returned future is the completion: it resolves exactly once, with either the
/// sequence or an error. Nothing happens until it is polled.
pub trait Strategy {
    /// Identity used to key timing records.
    fn name(&self) -> &'static str;

    /// Build a sequence of `count` values, scheduling continuations on `scheduler`.
    fn build<'a>(
        &'a self,
        count: usize,
        scheduler: &'a dyn Schedule,
    ) -> LocalBoxFuture<'a, BuildResult<Sequence>>;
}

/// Generate all values in one uninterrupted pass.
pub fn build_sync(count: usize) -> Vec<f64> {
    (0..count).map(|_| produce()).collect()
}

/// Builds everything during the first poll.
#[derive(Debug, Clone, Copy, Default)]
pub struct Synchronous;

impl Strategy for Synchronous {
    fn name(&self) -> &'static str {
        "Synchronous"
    }

    fn build<'a>(
        &'a self,
        count: usize,
        _scheduler: &'a dyn Schedule,
    ) -> LocalBoxFuture<'a, BuildResult<Sequence>> {
        async move { Ok(Sequence::from(build_sync(count))) }.boxed_local()
    }
}

/// Uses a callback-shaped producer that calls back immediately.
///
/// Asynchronous in shape only: the whole loop still runs within one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct Confused;

impl Strategy for Confused {
    fn name(&self) -> &'static str {
        "Confused"
    }

    fn build<'a>(
        &'a self,
        count: usize,
        _scheduler: &'a dyn Schedule,
    ) -> LocalBoxFuture<'a, BuildResult<Sequence>> {
        build_confused_with(count, |done| produce_with(done)).boxed_local()
    }
}

/// Confused loop over any callback-shaped producer.
///
/// The first failed delivery ends the build; no further producer is called.
pub(crate) async fn build_confused_with<P>(
    count: usize,
    mut producer: P,
) -> BuildResult<Sequence>
where
    P: FnMut(&mut dyn FnMut(BuildResult<f64>)),
{
    let sequence = Sequence::with_capacity(count);
    for _ in 0..count {
        let mut failure = None;
        let deliver: &mut dyn FnMut(BuildResult<f64>) =
            &mut |result: BuildResult<f64>| match result {
                Ok(value) => sequence.push(value),
                Err(err) => failure = Some(err),
            };
        producer(deliver);
        if let Some(err) = failure {
            return Err(err);
        }
    }
    Ok(sequence)
}

/// Schedules every element on the next tick and resolves without waiting.
///
/// The resolved sequence holds anywhere from `0` to `count` values and keeps growing
/// as the scheduled continuations run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Racy;

impl Strategy for Racy {
    fn name(&self) -> &'static str {
        "Racy"
    }

    fn build<'a>(
        &'a self,
        count: usize,
        scheduler: &'a dyn Schedule,
    ) -> LocalBoxFuture<'a, BuildResult<Sequence>> {
        build_racy(count, scheduler).boxed_local()
    }
}

async fn build_racy(count: usize, scheduler: &dyn Schedule) -> BuildResult<Sequence> {
    let sequence = Sequence::with_capacity(count);
    for _ in 0..count {
        let sink = sequence.clone();
        scheduler.schedule(
            async move {
                let value = produce_next_tick().await;
                sink.push(value);
            }
            .boxed(),
        );
    }

    #[cfg(feature = "tracing")]
    warn!(
        count,
        observed = sequence.len(),
        "resolving before scheduled producers have run"
    );

    Ok(sequence)
}

/// Produces one element per iteration of a controlled loop.
///
/// Each producer is scheduled, awaited and appended before the next is scheduled,
/// so the sequence is complete when the future resolves.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRace;

impl Strategy for NoRace {
    fn name(&self) -> &'static str {
        "NoRace"
    }

    fn build<'a>(
        &'a self,
        count: usize,
        scheduler: &'a dyn Schedule,
    ) -> LocalBoxFuture<'a, BuildResult<Sequence>> {
        build_no_race_with(
            Sequence::with_capacity(count),
            count,
            scheduler,
            |_| produce_next_tick(),
        )
        .boxed_local()
    }
}

/// Fill `sequence` up to `count` values, one scheduled producer at a time.
///
/// `producer(index)` is the work scheduled for element `index`. If it panics or is
/// dropped, the build fails and nothing more is scheduled or appended.
pub(crate) async fn build_no_race_with<P, Fut>(
    sequence: Sequence,
    count: usize,
    scheduler: &dyn Schedule,
    producer: P,
) -> BuildResult<Sequence>
where
    P: Fn(usize) -> Fut,
    Fut: Future<Output = f64> + Send + 'static,
{
    let seq = &sequence;
    let producer = &producer;

    whilst(
        move || seq.len() < count,
        move || {
            let index = seq.len();
            let delivery = schedule_producer(scheduler, index, producer(index));
            async move {
                let value = delivery
                    .await
                    .map_err(|_| BuildError::Canceled { index })??;
                seq.push(value);
                Ok::<(), BuildError>(())
            }
        },
    )
    .await?;

    #[cfg(feature = "tracing")]
    debug!(count, observed = sequence.len(), "controlled loop finished");

    Ok(sequence)
}

/// Schedule one producer and return the channel its result arrives on.
fn schedule_producer<Fut>(
    scheduler: &dyn Schedule,
    index: usize,
    produce: Fut,
) -> oneshot::Receiver<BuildResult<f64>>
where
    Fut: Future<Output = f64> + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    scheduler.schedule(
        async move {
            let result = AssertUnwindSafe(produce)
                .catch_unwind()
                .await
                .map_err(|payload| BuildError::ProducerPanicked {
                    index,
                    panic_message: panic_message(&*payload),
                });
            // The receiver may already be gone
            let _ = tx.send(result);
        }
        .boxed(),
    );
    rx
}

/// The four built-in strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Synchronous,
    Confused,
    Racy,
    NoRace,
}

impl StrategyKind {
    /// All strategies, in demonstration order.
    pub const ALL: [StrategyKind; 4] = [
        StrategyKind::Synchronous,
        StrategyKind::Confused,
        StrategyKind::Racy,
        StrategyKind::NoRace,
    ];

    pub fn strategy(self) -> &'static dyn Strategy {
        match self {
            StrategyKind::Synchronous => &Synchronous,
            StrategyKind::Confused => &Confused,
            StrategyKind::Racy => &Racy,
            StrategyKind::NoRace => &NoRace,
        }
    }

    /// Whether the resolved sequence is guaranteed to hold every element.
    pub fn is_race_free(self) -> bool {
        !matches!(self, StrategyKind::Racy)
    }
}

impl Strategy for StrategyKind {
    fn name(&self) -> &'static str {
        self.strategy().name()
    }

    fn build<'a>(
        &'a self,
        count: usize,
        scheduler: &'a dyn Schedule,
    ) -> LocalBoxFuture<'a, BuildResult<Sequence>> {
        self.strategy().build(count, scheduler)
    }
}
