//! # Listener shapes
//!
//! One trait per argument count. A signal dispatching `N` arguments accepts
//! listeners of any shape up to `N`; lower-arity listeners see a prefix of the
//! dispatched arguments (see [`Connectable`]).
//!
//! Closures implement these traits directly, as long as they return something
//! that converts with [`IntoRetention`]:
//!
//! ```rust,ignore
//! let log = |code: &u16, path: &String| println!("{code} {path}");
//! let once = |code: &u16| *code < 500; // returning false disconnects
//! ```
//!
//! [`Connectable`]: crate::Connectable

use crate::{
    error::BoxError,
    retention::{IntoRetention, Retention},
};

/// A listener that takes no arguments.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Listener0`",
    label = "missing `Listener0` implementation",
    note = "Closures of the form `|| -> R` implement `Listener0` when `R: IntoRetention`."
)]
pub trait Listener0: Send + Sync + 'static {
    /// Called when a signal this listener is connected to dispatches.
    fn apply(&self) -> Result<Retention, BoxError>;
}

/// A listener that takes the first dispatched argument.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Listener1<{T1}>`",
    label = "missing `Listener1` implementation",
    note = "Closures of the form `|a: &{T1}| -> R` implement `Listener1` when `R: IntoRetention`."
)]
pub trait Listener1<T1>: Send + Sync + 'static {
    /// Called when a signal this listener is connected to dispatches.
    fn apply(&self, arg1: &T1) -> Result<Retention, BoxError>;
}

/// A listener that takes the first two dispatched arguments.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Listener2<{T1}, {T2}>`",
    label = "missing `Listener2` implementation"
)]
pub trait Listener2<T1, T2>: Send + Sync + 'static {
    /// Called when a signal this listener is connected to dispatches.
    fn apply(&self, arg1: &T1, arg2: &T2) -> Result<Retention, BoxError>;
}

/// A listener that takes three dispatched arguments.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Listener3<{T1}, {T2}, {T3}>`",
    label = "missing `Listener3` implementation"
)]
pub trait Listener3<T1, T2, T3>: Send + Sync + 'static {
    /// Called when a signal this listener is connected to dispatches.
    fn apply(&self, arg1: &T1, arg2: &T2, arg3: &T3) -> Result<Retention, BoxError>;
}

impl<F, R> Listener0 for F
where
    F: Fn() -> R + Send + Sync + 'static,
    R: IntoRetention,
{
    fn apply(&self) -> Result<Retention, BoxError> {
        (self)().into_retention()
    }
}

impl<T1, F, R> Listener1<T1> for F
where
    F: Fn(&T1) -> R + Send + Sync + 'static,
    R: IntoRetention,
{
    fn apply(&self, arg1: &T1) -> Result<Retention, BoxError> {
        (self)(arg1).into_retention()
    }
}

impl<T1, T2, F, R> Listener2<T1, T2> for F
where
    F: Fn(&T1, &T2) -> R + Send + Sync + 'static,
    R: IntoRetention,
{
    fn apply(&self, arg1: &T1, arg2: &T2) -> Result<Retention, BoxError> {
        (self)(arg1, arg2).into_retention()
    }
}

impl<T1, T2, T3, F, R> Listener3<T1, T2, T3> for F
where
    F: Fn(&T1, &T2, &T3) -> R + Send + Sync + 'static,
    R: IntoRetention,
{
    fn apply(&self, arg1: &T1, arg2: &T2, arg3: &T3) -> Result<Retention, BoxError> {
        (self)(arg1, arg2, arg3).into_retention()
    }
}
