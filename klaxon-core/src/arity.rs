//! Compile-time arity bridge between listeners and argument tuples.
//!
//! The dispatch engine only knows an argument tuple `A`. [`Connectable`] lets a
//! listener of arity `k` receive the first `k` elements of `A`, with the arity
//! chosen by a zero-sized marker type that the compiler infers from the
//! listener's shape.

use crate::{
    error::BoxError,
    listener::{Listener0, Listener1, Listener2, Listener3},
    retention::Retention,
};

/// Marker for [`Listener0`] connections.
#[derive(Debug, Clone, Copy)]
pub enum Arity0 {}
/// Marker for [`Listener1`] connections.
#[derive(Debug, Clone, Copy)]
pub enum Arity1 {}
/// Marker for [`Listener2`] connections.
#[derive(Debug, Clone, Copy)]
pub enum Arity2 {}
/// Marker for [`Listener3`] connections.
#[derive(Debug, Clone, Copy)]
pub enum Arity3 {}

/// A listener that can be invoked with the argument tuple `A`.
///
/// `M` is one of the `Arity*` markers. It only exists so that one listener
/// type can be connectable through several impls without overlap; callers never
/// name it.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot listen to a signal dispatching `{A}`",
    label = "listener shape does not match the signal's arguments",
    note = "A listener may take any prefix of the dispatched arguments, by reference."
)]
pub trait Connectable<A, M>: Send + Sync + 'static {
    /// Number of arguments the listener consumes.
    const ARITY: u8;

    /// Invoke the listener with its prefix of `args`.
    fn invoke(&self, args: &A) -> Result<Retention, BoxError>;
}

impl<A, L> Connectable<A, Arity0> for L
where
    L: Listener0,
{
    const ARITY: u8 = 0;

    fn invoke(&self, _args: &A) -> Result<Retention, BoxError> {
        Listener0::apply(self)
    }
}

macro_rules! impl_connectable {
    ($marker:ident, $arity:literal, $listener:ident<$($T:ident),+> for ($($A:ident),+) => $($idx:tt),+) => {
        impl<$($A,)+ L> Connectable<($($A,)+), $marker> for L
        where
            L: $listener<$($T),+>,
        {
            const ARITY: u8 = $arity;

            fn invoke(&self, args: &($($A,)+)) -> Result<Retention, BoxError> {
                $listener::apply(self, $(&args.$idx),+)
            }
        }
    };
}

impl_connectable!(Arity1, 1, Listener1<T1> for (T1) => 0);
impl_connectable!(Arity1, 1, Listener1<T1> for (T1, T2) => 0);
impl_connectable!(Arity1, 1, Listener1<T1> for (T1, T2, T3) => 0);
impl_connectable!(Arity2, 2, Listener2<T1, T2> for (T1, T2) => 0, 1);
impl_connectable!(Arity2, 2, Listener2<T1, T2> for (T1, T2, T3) => 0, 1);
impl_connectable!(Arity3, 3, Listener3<T1, T2, T3> for (T1, T2, T3) => 0, 1, 2);
