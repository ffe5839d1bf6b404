//! # klaxon-core
//!
//! Core traits for the Klaxon signal library.
//!
//! This crate has minimal dependencies and is meant for code that declares
//! listeners without needing the registry and dispatch engine in `klaxon-std`.
//!
//! # Contents
//!
//! - **Listener shapes**: [`Listener0`] .. [`Listener3`], one per argument count.
//!   Closures implement them automatically.
//! - **Arity bridge**: [`Connectable`] narrows a dispatched argument tuple to the
//!   prefix a listener consumes, selected at compile time by an arity marker.
//! - **Retention**: [`Retention`] and [`IntoRetention`] let a listener ask to be
//!   removed after it runs.
//!
//! # Error Types
//!
//! - [`KlaxonError`] - Top-level error type
//! - [`DispatchError`] - Listener failures surfaced by dispatch

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod arity;
mod error;
mod listener;
mod retention;

/// Priority used when a connection does not specify one.
///
/// This is the midpoint of the `i32` range, so callers can register both
/// before and after default-priority listeners.
pub const DEFAULT_PRIORITY: i32 = 0;

// Re-exports
pub use arity::{Arity0, Arity1, Arity2, Arity3, Connectable};
pub use error::{BoxError, DispatchError, KlaxonError};
pub use listener::{Listener0, Listener1, Listener2, Listener3};
pub use retention::{IntoRetention, Retention};
