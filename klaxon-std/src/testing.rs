//! Testing utilities for Klaxon.
//!
//! This module provides listeners that make signal behavior easy to observe.
//!
//! # Features
//!
//! - [`InvocationLog`] / [`RecordingListener`]: record the order listeners ran in
//! - [`CountingListener`]: counts invocations, optionally asking to be discarded
//! - [`CapturingListener`]: records the first dispatched argument
//! - [`FailingListener`]: always returns an error

use klaxon_core::{BoxError, Listener0, Listener1, Retention};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Invocation Log
// ============================================================================

/// A shared, ordered log of listener labels.
///
/// # Example
///
/// ```rust,ignore
/// let log = InvocationLog::new();
/// signal.connect_with_priority(log.recorder("high"), 10);
/// signal.connect(log.recorder("low"));
///
/// signal.dispatch().unwrap();
/// assert_eq!(log.entries(), vec!["high", "low"]);
/// ```
#[derive(Clone, Default)]
pub struct InvocationLog {
    entries: Arc<Mutex<Vec<&'static str>>>,
}

impl InvocationLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a listener that appends `label` to this log when invoked.
    ///
    /// Each call returns a distinct listener, even for the same label.
    pub fn recorder(&self, label: &'static str) -> Arc<RecordingListener> {
        Arc::new(RecordingListener {
            label,
            log: self.clone(),
        })
    }

    /// Append an entry directly.
    pub fn push(&self, label: &'static str) {
        self.entries.lock().unwrap().push(label);
    }

    /// Get a clone of the recorded labels.
    pub fn entries(&self) -> Vec<&'static str> {
        self.entries.lock().unwrap().clone()
    }

    /// Clear all recorded labels.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

/// A listener that records its label in an [`InvocationLog`].
pub struct RecordingListener {
    label: &'static str,
    log: InvocationLog,
}

impl RecordingListener {
    /// The label this listener records.
    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl Listener0 for RecordingListener {
    fn apply(&self) -> Result<Retention, BoxError> {
        self.log.push(self.label);
        Ok(Retention::Keep)
    }
}

// ============================================================================
// Counting Listener
// ============================================================================

/// A listener that counts invocations.
///
/// The counter is shared, so it can still be read after the listener itself
/// has been dropped (see [`CountingListener::counter`]).
pub struct CountingListener {
    count: Arc<AtomicUsize>,
    result: Retention,
}

impl CountingListener {
    /// Create a counting listener that stays connected.
    pub fn new() -> Self {
        Self::with_result(Retention::Keep)
    }

    /// Create a counting listener that returns a specific result.
    pub fn with_result(result: Retention) -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
            result,
        }
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Get the shared counter.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        self.count.clone()
    }
}

impl Default for CountingListener {
    fn default() -> Self {
        Self::new()
    }
}

impl Listener0 for CountingListener {
    fn apply(&self) -> Result<Retention, BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(self.result)
    }
}

// ============================================================================
// Capturing Listener
// ============================================================================

/// A listener that records every first argument it receives.
pub struct CapturingListener<T> {
    captured: Mutex<Vec<T>>,
}

impl<T: Clone> CapturingListener<T> {
    /// Create a new capturing listener.
    pub fn new() -> Self {
        Self {
            captured: Mutex::new(Vec::new()),
        }
    }

    /// Get the recorded arguments.
    pub fn captured(&self) -> Vec<T> {
        self.captured.lock().unwrap().clone()
    }
}

impl<T: Clone> Default for CapturingListener<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Listener1<T> for CapturingListener<T>
where
    T: Clone + Send + 'static,
{
    fn apply(&self, arg1: &T) -> Result<Retention, BoxError> {
        self.captured.lock().unwrap().push(arg1.clone());
        Ok(Retention::Keep)
    }
}

// ============================================================================
// Failing Listener
// ============================================================================

/// A listener that always fails with the given message.
pub struct FailingListener {
    message: &'static str,
}

impl FailingListener {
    /// Create a failing listener.
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

impl Listener0 for FailingListener {
    fn apply(&self) -> Result<Retention, BoxError> {
        Err(self.message.into())
    }
}
