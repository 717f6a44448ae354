//! Error types for building sequences and driving the event loop.

use std::any::Any;

/// Errors a strategy can deliver through its completion.
///
/// Under normal conditions no strategy produces one of these. They exist so every
/// completion carries an error channel, and they fire when a scheduled producer is
/// lost or panics.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum BuildError {
    /// A scheduled producer was dropped before it delivered its value
    Canceled { index: usize },
    /// A scheduled producer panicked while producing its value
    ProducerPanicked { index: usize, panic_message: String },
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::Canceled { index } => {
                write!(
                    f,
                    "Producer for element #{} was canceled before delivering a value\n\
                     \n\
                     The event loop driving it was dropped or never ran the continuation.",
                    index
                )
            }
            BuildError::ProducerPanicked {
                index,
                panic_message,
            } => {
                write!(
                    f,
                    "Producer for element #{} panicked: {}",
                    index, panic_message
                )
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// Errors reported by [`EventLoop::block_on`](crate::EventLoop::block_on).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LoopError {
    /// The future is pending but no task is ready, so it can never complete
    Stalled { ticks: u64 },
}

impl std::fmt::Display for LoopError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoopError::Stalled { ticks } => write!(
                f,
                "Event loop stalled after {} ticks: the awaited future is pending \
                 and no continuation is ready to wake it",
                ticks
            ),
        }
    }
}

impl std::error::Error for LoopError {}

/// Result type for sequence builds
pub type BuildResult<T> = Result<T, BuildError>;

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
