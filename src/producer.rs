//! Value producers used by the strategies.
//!
//! Every producer yields a uniformly distributed `f64` in `[0, 1)`. They differ only
//! in how the value is delivered.

use crate::error::BuildResult;
use crate::event_loop::next_tick;

/// Produce a value right now.
pub fn produce() -> f64 {
    rand::random::<f64>()
}

/// Callback-shaped producer that invokes `done` before returning.
///
/// Looks asynchronous at the call site but never leaves the current tick.
pub fn produce_with<F>(done: F)
where
    F: FnOnce(BuildResult<f64>),
{
    done(Ok(produce()))
}

/// Produce a value after suspending for one tick.
pub async fn produce_next_tick() -> f64 {
    next_tick().await;
    produce()
}
