//! Tick-based Scheduling Races
//!
//! A small, self-contained illustration of how deferring work to a later tick of a
//! single-threaded cooperative event loop produces an "asynchronous" function that
//! completes before its work is done, and how a controlled asynchronous loop removes
//! that race.
//!
//! # Features
//!
//! - **Observable ticks**: [`EventLoop`] runs one tick at a time and counts them, so
//!   "scheduled on the next tick" is something you can assert on.
//! - **Four strategies** for building a sequence of random values in `[0, 1)`:
//!   [`Synchronous`], [`Confused`], [`Racy`] and [`NoRace`], all behind the
//!   [`Strategy`] trait.
//! - **A deliberate race**: [`Racy`] resolves as soon as its producers are
//!   *scheduled*, handing out a sequence that keeps growing afterward.
//! - **Controlled iteration**: [`control::whilst`] awaits each iteration before the
//!   next starts; [`NoRace`] is built on it and always resolves complete.
//! - **Timing harness**: [`measure`] and [`run_all_in_series`] time strategies one
//!   after another and return their [`Timings`] as a value.
//! - **Runtime-agnostic**: strategies schedule through the [`Schedule`] trait, which
//!   any `Fn(BoxFuture<'static, ()>)` implements (e.g. `|fut| { tokio::spawn(fut); }`).
//!
//! # Quick Start
//!
//! ```
//! use tickrace::{EventLoop, NoRace, Racy, Strategy};
//!
//! let event_loop = EventLoop::new();
//! let handle = event_loop.handle();
//!
//! // Resolves once every scheduled producer has delivered
//! let complete = event_loop.block_on(NoRace.build(5, &handle)).unwrap().unwrap();
//! assert_eq!(complete.len(), 5);
//!
//! // Resolves before any scheduled producer has run
//! let premature = event_loop.block_on(Racy.build(5, &handle)).unwrap().unwrap();
//! assert_eq!(premature.len(), 0);
//!
//! // ...and is still being appended to afterward
//! event_loop.run_until_stalled();
//! assert_eq!(premature.len(), 5);
//! ```
//!
//! # Tracing
//!
//! Enable the `tracing` feature to emit events for ticks, controlled-loop iterations
//! and harness runs. Filter them with `RUST_LOG` through
//! `tracing_subscriber::EnvFilter`, e.g. `RUST_LOG=tickrace=debug`.

pub mod control;
pub mod error;
pub mod event_loop;
pub mod harness;
pub mod producer;
pub mod sequence;
pub mod strategy;

pub use error::{BuildError, BuildResult, LoopError};
pub use event_loop::{next_tick, EventLoop, LoopHandle, NextTick, Schedule};
pub use harness::{measure, run_all_in_series, Measurement, TimingRecord, Timings};
pub use sequence::Sequence;
pub use strategy::{build_sync, Confused, NoRace, Racy, Strategy, StrategyKind, Synchronous};
