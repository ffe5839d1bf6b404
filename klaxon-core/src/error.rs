//! Error types for Klaxon.
//!
//! Connecting, disconnecting and handle operations never fail: duplicate
//! registrations are superseded, lapsed weak listeners are dropped silently,
//! and operations on dead handles are no-ops. The only surfaced failure is a
//! listener returning an error during dispatch.
//!
//! - [`KlaxonError`] - Top-level error type
//! - [`DispatchError`] - Listener failures during dispatch

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Klaxon operations.
#[derive(Error, Debug)]
pub enum KlaxonError {
    /// An error occurred during dispatch.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors that can occur during dispatch.
///
/// Dispatch stops at the first failing listener; listeners later in priority
/// order are not invoked for that call.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A listener returned an error.
    #[error("listener #{sequence} (priority {priority}) failed")]
    Listener {
        /// Priority of the failing connection.
        priority: i32,
        /// Insertion sequence number of the failing connection.
        sequence: u64,
        /// The error returned by the listener.
        #[source]
        source: BoxError,
    },
}

impl DispatchError {
    /// Priority of the connection whose listener failed.
    pub fn priority(&self) -> i32 {
        match self {
            DispatchError::Listener { priority, .. } => *priority,
        }
    }

    /// Consume the error, returning the listener's own error.
    pub fn into_source(self) -> BoxError {
        match self {
            DispatchError::Listener { source, .. } => source,
        }
    }
}

// Convenience conversions
impl From<BoxError> for KlaxonError {
    fn from(err: BoxError) -> Self {
        KlaxonError::Custom(err)
    }
}
