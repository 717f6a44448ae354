//! Single-threaded, tick-based cooperative event loop.
//!
//! A tick polls every task that was ready when the tick began, once. Tasks woken
//! during a tick (including tasks that wake themselves) are polled on the next tick.
//! This makes "defer to the next tick" an observable, countable thing.
//!
//! Tasks are stored behind `Arc` because wakers must be `Send + Sync`, but every poll
//! happens on the thread that calls [`EventLoop::tick`].

use std::collections::VecDeque;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::{pin, Pin};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use futures::task::{waker, waker_ref, ArcWake};
use futures::FutureExt;
use parking_lot::Mutex;

#[cfg(feature = "tracing")]
use tracing::{debug, error, trace, warn};

use crate::error::LoopError;

/// Something that accepts detached continuations.
///
/// Implemented by [`LoopHandle`] and by any `Fn(BoxFuture<'static, ()>)` closure, so
/// strategies run unchanged on another runtime:
///
/// ```no_run
/// # use futures::future::BoxFuture;
/// let spawner = |fut: BoxFuture<'static, ()>| {
///     tokio::spawn(fut);
/// };
/// # let _: &dyn tickrace::Schedule = &spawner;
/// ```
pub trait Schedule {
    /// Register `fut` to run on a later tick. Never polls it inline.
    fn schedule(&self, fut: BoxFuture<'static, ()>);
}

impl<F> Schedule for F
where
    F: Fn(BoxFuture<'static, ()>),
{
    fn schedule(&self, fut: BoxFuture<'static, ()>) {
        self(fut)
    }
}

struct Task {
    future: Mutex<Option<BoxFuture<'static, ()>>>,
    queued: AtomicBool,
    shared: Weak<Shared>,
}

impl ArcWake for Task {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        // Loop is gone: the task is dropped along with its last waker.
        let Some(shared) = arc_self.shared.upgrade() else {
            return;
        };
        if !arc_self.queued.swap(true, Ordering::AcqRel) {
            shared.ready.lock().push_back(Arc::clone(arc_self));
        }
    }
}

#[derive(Default)]
struct Shared {
    ready: Mutex<VecDeque<Arc<Task>>>,
    ticks: AtomicU64,
}

impl Shared {
    fn spawn(self: &Arc<Self>, future: BoxFuture<'static, ()>) {
        let task = Arc::new(Task {
            future: Mutex::new(Some(future)),
            queued: AtomicBool::new(true),
            shared: Arc::downgrade(self),
        });
        self.ready.lock().push_back(task);
    }
}

/// Cooperative executor that runs one tick at a time on the calling thread.
///
/// # Examples
///
/// ```
/// use tickrace::{next_tick, EventLoop};
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// let event_loop = EventLoop::new();
/// let done = Arc::new(AtomicBool::new(false));
/// let flag = done.clone();
///
/// event_loop.spawn(async move {
///     next_tick().await;
///     flag.store(true, Ordering::SeqCst);
/// });
///
/// event_loop.tick();
/// assert!(!done.load(Ordering::SeqCst));
/// event_loop.tick();
/// assert!(done.load(Ordering::SeqCst));
/// ```
pub struct EventLoop {
    shared: Arc<Shared>,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Create an empty event loop.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::default()),
        }
    }

    /// A cloneable handle for scheduling continuations onto this loop.
    ///
    /// The handle does not keep the loop alive; continuations scheduled after the
    /// loop is dropped are discarded.
    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Register a task. It is first polled on the next tick.
    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.shared.spawn(future.boxed());
    }

    /// Number of tasks waiting to be polled on the next tick.
    pub fn pending(&self) -> usize {
        self.shared.ready.lock().len()
    }

    /// Total ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.shared.ticks.load(Ordering::Acquire)
    }

    /// Run exactly one tick and return how many tasks were polled.
    ///
    /// Only tasks that were ready when the tick started are polled. A task that
    /// panics is dropped; the panic does not escape the tick.
    pub fn tick(&self) -> usize {
        let batch: Vec<Arc<Task>> = self.shared.ready.lock().drain(..).collect();
        self.shared.ticks.fetch_add(1, Ordering::AcqRel);

        #[cfg(feature = "tracing")]
        let tick = self.ticks();
        #[cfg(feature = "tracing")]
        trace!(tick, ready = batch.len(), "running tick");

        let polled = batch.len();
        for task in batch {
            task.queued.store(false, Ordering::Release);

            let Some(mut future) = task.future.lock().take() else {
                continue;
            };

            let waker = waker_ref(&task);
            let mut cx = Context::from_waker(&waker);
            let outcome =
                std::panic::catch_unwind(AssertUnwindSafe(|| future.as_mut().poll(&mut cx)));

            match outcome {
                Ok(Poll::Pending) => *task.future.lock() = Some(future),
                Ok(Poll::Ready(())) => self.retire(&task),
                Err(_payload) => {
                    #[cfg(feature = "tracing")]
                    error!(
                        tick,
                        panic_message = %crate::error::panic_message(&*_payload),
                        "continuation panicked; dropping it"
                    );
                    self.retire(&task);
                }
            }
        }
        polled
    }

    /// Keep a finished task out of the ready queue for good.
    ///
    /// The task may have woken itself before finishing; that entry is removed, and
    /// leaving `queued` set makes every later wake a no-op.
    fn retire(&self, task: &Arc<Task>) {
        if task.queued.swap(true, Ordering::AcqRel) {
            self.shared
                .ready
                .lock()
                .retain(|queued| !Arc::ptr_eq(queued, task));
        }
    }

    /// Run ticks until no task is ready. Returns the number of ticks run.
    pub fn run_until_stalled(&self) -> u64 {
        let mut ran = 0;
        while self.pending() > 0 {
            self.tick();
            ran += 1;
        }

        #[cfg(feature = "tracing")]
        debug!(ticks = ran, "event loop stalled");

        ran
    }

    /// Drive `future` to completion, running one tick between polls.
    ///
    /// The future is polled first, before any tick runs, so work it finishes
    /// synchronously completes in zero ticks. A future that wakes itself waits one
    /// tick before it is polled again.
    ///
    /// # Errors
    ///
    /// Returns [`LoopError::Stalled`] if the future is pending, not woken, and no
    /// task is ready, since nothing could ever wake it. No tick is run in that case.
    pub fn block_on<F: Future>(&self, future: F) -> Result<F::Output, LoopError> {
        let mut future = pin!(future);
        let woken = Arc::new(MainWake(AtomicBool::new(true)));
        let main_waker = waker(Arc::clone(&woken));
        let mut cx = Context::from_waker(&main_waker);

        loop {
            if woken.0.swap(false, Ordering::AcqRel) {
                if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
                    return Ok(output);
                }
            }

            if !woken.0.load(Ordering::Acquire) && self.pending() == 0 {
                #[cfg(feature = "tracing")]
                warn!(ticks = self.ticks(), "block_on stalled");

                return Err(LoopError::Stalled {
                    ticks: self.ticks(),
                });
            }

            self.tick();
        }
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) {
        // Dropping a task's future can wake other tasks, which re-queues them.
        loop {
            let drained: Vec<Arc<Task>> = self.shared.ready.lock().drain(..).collect();
            if drained.is_empty() {
                break;
            }
            for task in drained {
                let future = task.future.lock().take();
                drop(future);
            }
        }
    }
}

struct MainWake(AtomicBool);

impl ArcWake for MainWake {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.0.store(true, Ordering::Release);
    }
}

/// Cloneable scheduling handle for an [`EventLoop`].
#[derive(Clone)]
pub struct LoopHandle {
    shared: Weak<Shared>,
}

impl LoopHandle {
    /// Whether the loop this handle points at still exists.
    pub fn is_alive(&self) -> bool {
        self.shared.strong_count() > 0
    }
}

impl Schedule for LoopHandle {
    fn schedule(&self, fut: BoxFuture<'static, ()>) {
        match self.shared.upgrade() {
            Some(shared) => shared.spawn(fut),
            None => {
                #[cfg(feature = "tracing")]
                warn!("continuation scheduled after the event loop was dropped");
                drop(fut);
            }
        }
    }
}

/// Future returned by [`next_tick`].
#[derive(Debug, Default)]
#[must_use = "futures do nothing unless awaited"]
pub struct NextTick {
    yielded: bool,
}

impl Future for NextTick {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

/// Suspend once and resume on the next tick.
///
/// Works on any executor that honors self-wakes; on [`EventLoop`] the resumption
/// is always exactly one tick later.
pub fn next_tick() -> NextTick {
    NextTick::default()
}
