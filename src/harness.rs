//! Timing harness and sequencer.
//!
//! [`measure`] times one strategy run; [`run_all_in_series`] runs several strategies
//! strictly one after another and returns their timings as a value, so separate
//! passes never share state.

use std::fmt;
use std::time::{Duration, Instant};

#[cfg(feature = "tracing")]
use tracing::{debug, info};

use crate::control::series;
use crate::error::BuildResult;
use crate::event_loop::Schedule;
use crate::sequence::Sequence;
use crate::strategy::Strategy;

/// Timing of a single strategy run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingRecord {
    /// Time from invocation to completion.
    pub duration: Duration,
    /// Elements observed in the sequence at completion time.
    pub count: usize,
}

impl TimingRecord {
    /// Duration in whole milliseconds.
    pub fn duration_ms(&self) -> u128 {
        self.duration.as_millis()
    }
}

/// Outcome of [`measure`].
#[derive(Debug, Clone)]
pub struct Measurement {
    pub name: &'static str,
    pub record: TimingRecord,
    /// The sequence as handed over at completion. For a racy strategy it may
    /// still be growing.
    pub sequence: Sequence,
}

/// Timing records keyed by strategy name, in the order they were first recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timings {
    records: Vec<(&'static str, TimingRecord)>,
}

impl Timings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `record` under `name`, replacing any earlier record for that name.
    pub fn insert(&mut self, name: &'static str, record: TimingRecord) {
        match self.records.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = record,
            None => self.records.push((name, record)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TimingRecord> {
        self.records
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.records.iter().map(|(name, _)| *name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &TimingRecord)> + '_ {
        self.records.iter().map(|(name, record)| (*name, record))
    }
}

impl fmt::Display for Timings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{{")?;
        for (name, record) in self.iter() {
            writeln!(
                f,
                "  {}: {}ms ({} elements)",
                name,
                record.duration_ms(),
                record.count
            )?;
        }
        write!(f, "}}")
    }
}

/// Run `strategy` once and time it.
///
/// The end timestamp and the element count are both taken the moment the strategy
/// resolves, so the record shows exactly what a caller would have seen.
///
/// # Examples
///
/// ```
/// use tickrace::{measure, EventLoop, Synchronous};
///
/// let event_loop = EventLoop::new();
/// let handle = event_loop.handle();
///
/// let measurement = event_loop
///     .block_on(measure(&Synchronous, 5, &handle))
///     .unwrap()
///     .unwrap();
///
/// assert_eq!(measurement.name, "Synchronous");
/// assert_eq!(measurement.record.count, 5);
/// ```
pub async fn measure(
    strategy: &dyn Strategy,
    count: usize,
    scheduler: &dyn Schedule,
) -> BuildResult<Measurement> {
    let name = strategy.name();

    #[cfg(feature = "tracing")]
    debug!(strategy = name, count, "measuring strategy");

    let start = Instant::now();
    let sequence = strategy.build(count, scheduler).await?;
    let record = TimingRecord {
        duration: start.elapsed(),
        count: sequence.len(),
    };

    #[cfg(feature = "tracing")]
    debug!(
        strategy = name,
        duration_ms = record.duration_ms() as u64,
        observed = record.count,
        "strategy completed"
    );

    Ok(Measurement {
        name,
        record,
        sequence,
    })
}

/// Measure each strategy in order, never starting one before the previous completes.
///
/// Returns one record per distinct strategy name. Stops at the first error.
#[cfg_attr(feature = "tracing", tracing::instrument(skip(strategies, scheduler)))]
pub async fn run_all_in_series(
    strategies: &[&dyn Strategy],
    count: usize,
    scheduler: &dyn Schedule,
) -> BuildResult<Timings> {
    #[cfg(feature = "tracing")]
    info!(strategies = strategies.len(), "starting sequencing pass");

    let measurements = series(
        strategies
            .iter()
            .map(|&strategy| move || measure(strategy, count, scheduler)),
    )
    .await?;

    let mut timings = Timings::new();
    for measurement in measurements {
        timings.insert(measurement.name, measurement.record);
    }

    #[cfg(feature = "tracing")]
    info!(entries = timings.len(), "sequencing pass completed");

    Ok(timings)
}
