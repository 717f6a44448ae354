//! Controlled asynchronous control flow.
//!
//! [`whilst`] is the loop construct the race-free strategy is built on: the next
//! iteration only starts after the previous one has resolved, and the loop's own
//! completion is only reached once the condition is false. [`series`] runs a list of
//! steps strictly one after another.

use std::future::Future;

#[cfg(feature = "tracing")]
use tracing::trace;

/// Repeatedly await `body` while `test` holds.
///
/// Each iteration's future is awaited to completion before `test` is checked again,
/// so at most one iteration is in flight. Stops at the first error.
///
/// Returns the number of iterations that ran.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use tickrace::control::whilst;
///
/// let n = Cell::new(0);
/// let iterations = futures::executor::block_on(whilst(
///     || n.get() < 3,
///     || async {
///         n.set(n.get() + 1);
///         Ok::<_, ()>(())
///     },
/// ))
/// .unwrap();
///
/// assert_eq!(iterations, 3);
/// ```
pub async fn whilst<T, B, Fut, E>(mut test: T, mut body: B) -> Result<usize, E>
where
    T: FnMut() -> bool,
    B: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
{
    let mut iterations = 0;
    while test() {
        body().await?;
        iterations += 1;

        #[cfg(feature = "tracing")]
        trace!(iterations, "whilst iteration resolved");
    }
    Ok(iterations)
}

/// Run `steps` one at a time, in order, collecting their outputs.
///
/// A step is only created (and so only starts) after the previous step's future has
/// resolved. The first error ends the run; later steps never start.
pub async fn series<I, F, Fut, T, E>(steps: I) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let steps = steps.into_iter();
    let mut outputs = Vec::with_capacity(steps.size_hint().0);
    for step in steps {
        outputs.push(step().await?);

        #[cfg(feature = "tracing")]
        trace!(completed = outputs.len(), "series step resolved");
    }
    Ok(outputs)
}
