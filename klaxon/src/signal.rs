//! Fixed-arity signal types.
//!
//! Each `SignalN` wraps a [`Signaller`] over the tuple of its `N` argument
//! types. `connect` accepts any listener that takes a prefix of those
//! arguments, so a `Signal2<A, B>` takes `Listener0`, `Listener1<A>` and
//! `Listener2<A, B>` listeners alike.

use klaxon_core::{Connectable, DispatchError};
use klaxon_std::{connection::Connection, options::ConnectOptions, signaller::Signaller};
use std::{fmt, sync::Arc};

macro_rules! define_signal {
    ($(#[$meta:meta])* $name:ident<$($T:ident),*>($($arg:ident),*)) => {
        $(#[$meta])*
        pub struct $name<$($T: 'static),*> {
            signaller: Signaller<($($T,)*)>,
        }

        impl<$($T: 'static),*> $name<$($T),*> {
            /// Create a signal with no listeners.
            pub fn new() -> Self {
                Self {
                    signaller: Signaller::new(),
                }
            }

            /// Create a signal whose name appears in log output.
            pub fn named(name: &'static str) -> Self {
                Self {
                    signaller: Signaller::named(name),
                }
            }

            /// The signal's name, if it has one.
            pub fn name(&self) -> Option<&'static str> {
                self.signaller.name()
            }

            /// Connect `listener` at [`DEFAULT_PRIORITY`](crate::DEFAULT_PRIORITY).
            pub fn connect<L, M>(&self, listener: Arc<L>) -> Connection
            where
                L: Connectable<($($T,)*), M>,
                M: 'static,
            {
                self.signaller.connect(listener)
            }

            /// Connect `listener` at `priority`; higher priorities run first.
            pub fn connect_with_priority<L, M>(&self, listener: Arc<L>, priority: i32) -> Connection
            where
                L: Connectable<($($T,)*), M>,
                M: 'static,
            {
                self.signaller.connect_with_priority(listener, priority)
            }

            /// Connect `listener` with explicit options.
            pub fn connect_with<L, M>(&self, listener: Arc<L>, options: ConnectOptions) -> Connection
            where
                L: Connectable<($($T,)*), M>,
                M: 'static,
            {
                self.signaller.connect_with(listener, options)
            }

            /// Disconnect `listener` if it is connected. Returns whether it was.
            pub fn disconnect<L: ?Sized>(&self, listener: &Arc<L>) -> bool {
                self.signaller.disconnect(listener)
            }

            /// Disconnect every listener. Returns how many were connected.
            pub fn disconnect_all(&self) -> usize {
                self.signaller.disconnect_all()
            }

            /// Invoke every live listener, highest priority first.
            pub fn dispatch(&self, $($arg: $T),*) -> Result<(), DispatchError> {
                self.signaller.dispatch(&($($arg,)*))
            }

            /// Live connections in dispatch order.
            pub fn connections(&self) -> Vec<Connection> {
                self.signaller.connections()
            }

            /// Number of live connections.
            pub fn len(&self) -> usize {
                self.signaller.len()
            }

            /// Whether no listener is connected.
            pub fn is_empty(&self) -> bool {
                self.signaller.is_empty()
            }
        }

        impl<$($T: 'static),*> Default for $name<$($T),*> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<$($T: 'static),*> fmt::Debug for $name<$($T),*> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("name", &self.signaller.name())
                    .field("len", &self.signaller.len())
                    .finish()
            }
        }
    };
}

define_signal!(
    /// A signal that dispatches no arguments.
    Signal0<>()
);
define_signal!(
    /// A signal that dispatches one argument.
    Signal1<T1>(arg1)
);
define_signal!(
    /// A signal that dispatches two arguments.
    Signal2<T1, T2>(arg1, arg2)
);
define_signal!(
    /// A signal that dispatches three arguments.
    Signal3<T1, T2, T3>(arg1, arg2, arg3)
);
