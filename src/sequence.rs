//! Shared result sequence handed out by the strategies.

use std::sync::Arc;

use parking_lot::Mutex;

/// Ordered, growable sequence of values in `[0, 1)`.
///
/// Cloning yields another handle to the same storage. Continuations scheduled by a
/// strategy append through their own handle, so a handle obtained at completion time
/// keeps reflecting appends that happen afterward. For the race-free strategies the
/// sequence is complete when handed out and never changes again.
#[derive(Clone, Debug, Default)]
pub struct Sequence {
    values: Arc<Mutex<Vec<f64>>>,
}

impl Sequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty sequence with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Arc::new(Mutex::new(Vec::with_capacity(capacity))),
        }
    }

    pub(crate) fn push(&self, value: f64) {
        self.values.lock().push(value);
    }

    /// Number of values appended so far.
    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the values appended so far.
    pub fn snapshot(&self) -> Vec<f64> {
        self.values.lock().clone()
    }

    /// Whether both handles point at the same storage.
    pub fn ptr_eq(&self, other: &Sequence) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }
}

impl From<Vec<f64>> for Sequence {
    fn from(values: Vec<f64>) -> Self {
        Self {
            values: Arc::new(Mutex::new(values)),
        }
    }
}
