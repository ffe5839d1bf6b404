//! # klaxon-std
//!
//! Registry and dispatch engine for the Klaxon signal library.
//!
//! This crate provides:
//! - **Dispatch engine**: [`Signaller`], generic over the dispatched argument tuple
//! - **Connection handles**: [`Connection`], [`ScopedConnection`]
//! - **Configuration**: [`ConnectOptions`]
//! - **Testing utilities**: recording and counting listeners in [`testing`]
//!
//! [`Signaller`]: signaller::Signaller
//! [`Connection`]: connection::Connection
//! [`ScopedConnection`]: connection::ScopedConnection
//! [`ConnectOptions`]: options::ConnectOptions

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use klaxon_core;

/// Emits a `tracing` event when the `tracing` feature is enabled.
macro_rules! log_event {
    ($level:ident, $($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        {
            tracing::$level!($($arg)+);
        }
    };
}

// Modules
pub mod connection;
pub mod options;
mod registry;
pub mod signaller;
pub mod testing;
