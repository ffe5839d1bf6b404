//! # klaxon - Typed, Priority-Ordered Signals
//!
//! `klaxon` dispatches a fixed list of arguments to every connected listener,
//! highest priority first and in connection order within a priority. Listeners
//! can be one-shot or held weakly, and may connect and disconnect freely while
//! a dispatch is running, including from other threads.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use klaxon::{Signal2, ConnectOptions};
//! use std::sync::Arc;
//!
//! let saved: Signal2<u64, String> = Signal2::named("document-saved");
//!
//! // Listeners may take any prefix of the arguments.
//! let audit = saved.connect(Arc::new(|id: &u64, path: &String| {
//!     println!("saved #{id} to {path}");
//! }));
//! saved.connect_with(
//!     Arc::new(|| println!("first save!")),
//!     ConnectOptions::new().with_priority(10).once_only(),
//! );
//!
//! saved.dispatch(7, "notes.txt".into())?;
//! audit.disconnect();
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod signal;

pub use klaxon_core::{
    // Arity bridge
    Arity0,
    Arity1,
    Arity2,
    Arity3,
    // Error types
    BoxError,
    Connectable,
    DEFAULT_PRIORITY,
    DispatchError,
    // Retention
    IntoRetention,
    KlaxonError,
    // Listener shapes
    Listener0,
    Listener1,
    Listener2,
    Listener3,
    Retention,
};

pub use klaxon_std::{
    connection::{Connection, ScopedConnection},
    options::ConnectOptions,
    signaller::Signaller,
};

pub use signal::{Signal0, Signal1, Signal2, Signal3};

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use klaxon_std::testing::*;
}

/// Prelude module - common imports for Klaxon.
///
/// # Usage
///
/// ```rust,ignore
/// use klaxon::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Handles
        ConnectOptions,
        Connection,
        DEFAULT_PRIORITY,
        // Errors
        DispatchError,
        IntoRetention,
        // Listener shapes
        Listener0,
        Listener1,
        Listener2,
        Listener3,
        Retention,
        ScopedConnection,
        // Signals
        Signal0,
        Signal1,
        Signal2,
        Signal3,
    };
}
