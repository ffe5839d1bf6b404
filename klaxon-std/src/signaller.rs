//! The dispatch engine.
//!
//! [`Signaller`] does all the connection management and dispatching for one
//! signal. It is generic over the dispatched argument tuple `A` only; the
//! typed `Signal0` .. `Signal3` wrappers in `klaxon` narrow it to a fixed
//! argument list.
//!
//! # Dispatch
//!
//! `dispatch` iterates a snapshot of the registry taken when it starts. No lock
//! is held while a listener runs, so listeners may connect, disconnect (even
//! themselves) or dispatch again on the same signal. Listeners connected during
//! a dispatch are not part of it; listeners disconnected during a dispatch are
//! skipped if they have not run yet.

use crate::{
    connection::{Bound, Claim, Connection, identity_of},
    options::ConnectOptions,
    registry::Registry,
};
use klaxon_core::{Connectable, DispatchError, Retention};
use std::{fmt, sync::Arc};

/// Connection registry plus dispatch loop for argument tuple `A`.
pub struct Signaller<A> {
    registry: Arc<Registry<A>>,
    name: Option<&'static str>,
}

impl<A: 'static> Default for Signaller<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static> Signaller<A> {
    /// Create a signal with no listeners.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Registry::new()),
            name: None,
        }
    }

    /// Create a signal whose name appears in log output.
    pub fn named(name: &'static str) -> Self {
        Self {
            registry: Arc::new(Registry::new()),
            name: Some(name),
        }
    }

    /// The signal's name, if it has one.
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// Connect `listener` at [`DEFAULT_PRIORITY`](klaxon_core::DEFAULT_PRIORITY).
    pub fn connect<L, M>(&self, listener: Arc<L>) -> Connection
    where
        L: Connectable<A, M>,
        M: 'static,
    {
        self.connect_with(listener, ConnectOptions::new())
    }

    /// Connect `listener` at `priority`.
    ///
    /// Listeners with a higher priority run before listeners with a lower
    /// priority. Listeners with equal priority run in the order they were
    /// connected.
    pub fn connect_with_priority<L, M>(&self, listener: Arc<L>, priority: i32) -> Connection
    where
        L: Connectable<A, M>,
        M: 'static,
    {
        self.connect_with(listener, ConnectOptions::new().with_priority(priority))
    }

    /// Connect `listener` with explicit options.
    ///
    /// If the same `Arc` is already connected to this signal, that registration
    /// is disconnected first. Identity is the allocation, not equality.
    pub fn connect_with<L, M>(&self, listener: Arc<L>, options: ConnectOptions) -> Connection
    where
        L: Connectable<A, M>,
        M: 'static,
    {
        let identity = identity_of(&listener);
        let held = Bound::<L, M>::new(listener, options.is_weak());
        let inserted = self.registry.insert(Box::new(held), identity, L::ARITY, &options);

        #[cfg(feature = "tracing")]
        {
            if let Some(old) = &inserted.superseded {
                tracing::debug!(
                    signal = ?self.name,
                    sequence = old.sequence,
                    "listener reconnected, previous registration dropped"
                );
            }
        }
        log_event!(
            trace,
            signal = ?self.name,
            priority = options.priority(),
            sequence = inserted.slot.sequence,
            arity = L::ARITY,
            once = options.is_once(),
            weak = options.is_weak(),
            "listener connected"
        );
        Connection::new(inserted.slot)
    }

    /// Disconnect `listener` if it is connected. Returns whether it was.
    pub fn disconnect<L: ?Sized>(&self, listener: &Arc<L>) -> bool {
        let removed = self.registry.remove_by_identity(identity_of(listener));
        #[cfg(feature = "tracing")]
        {
            if let Some(slot) = &removed {
                tracing::trace!(signal = ?self.name, sequence = slot.sequence, "listener disconnected");
            }
        }
        removed.is_some()
    }

    /// Disconnect every listener. Returns how many were connected.
    pub fn disconnect_all(&self) -> usize {
        let severed = self.registry.remove_all();
        log_event!(trace, signal = ?self.name, count = severed, "all listeners disconnected");
        severed
    }

    /// Invoke every live listener with `args`, in priority order.
    ///
    /// Stops at the first listener that returns an error and hands that error
    /// back; listeners after it do not run for this call. Panics propagate
    /// unchanged. A one-shot listener is removed only after an invocation that
    /// succeeds, so one that fails stays connected.
    pub fn dispatch(&self, args: &A) -> Result<(), DispatchError> {
        let snapshot = self.registry.snapshot();
        for slot in snapshot.iter().map(Arc::as_ref) {
            if !slot.is_connected() {
                continue;
            }

            // A one-shot record runs in at most one dispatch at a time, so
            // concurrent or nested dispatches skip it while it is running.
            let _claim = if slot.is_once() {
                match Claim::take(slot) {
                    Some(claim) => Some(claim),
                    None => continue,
                }
            } else {
                None
            };

            match slot.invoke(args) {
                None => {
                    log_event!(debug, signal = ?self.name, sequence = slot.sequence, "weak listener lapsed");
                    slot.disconnect();
                }
                // Re-read the flag: the listener may have made itself one-shot.
                Some(Ok(retention)) => {
                    if retention == Retention::Discard || slot.is_once() {
                        slot.disconnect();
                    }
                }
                Some(Err(source)) => {
                    log_event!(
                        debug,
                        signal = ?self.name,
                        priority = slot.priority,
                        sequence = slot.sequence,
                        error = %source,
                        "listener failed, dispatch aborted"
                    );
                    return Err(DispatchError::Listener {
                        priority: slot.priority,
                        sequence: slot.sequence,
                        source,
                    });
                }
            }
        }
        Ok(())
    }

    /// Live connections in dispatch order.
    pub fn connections(&self) -> Vec<Connection> {
        self.registry
            .snapshot()
            .iter()
            .filter(|s| s.is_connected())
            .map(|s| Connection::new(s.clone()))
            .collect()
    }

    /// Number of live connections.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Whether no listener is connected.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<A> Drop for Signaller<A> {
    fn drop(&mut self) {
        // Outstanding handles keep their records alive; make sure they read as
        // disconnected and stop owning their listeners.
        self.registry.remove_all();
    }
}

impl<A> fmt::Debug for Signaller<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signaller")
            .field("name", &self.name)
            .field("len", &self.registry.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingListener, InvocationLog};
    use klaxon_core::BoxError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_dispatch_in_priority_order() {
        let log = InvocationLog::new();
        let signal = Signaller::<()>::new();
        signal.connect_with_priority(log.recorder("L1"), 10);
        signal.connect_with_priority(log.recorder("L2"), 5);
        signal.connect_with_priority(log.recorder("L3"), 10);

        signal.dispatch(&()).unwrap();
        assert_eq!(log.entries(), vec!["L1", "L3", "L2"]);
    }

    #[test]
    fn test_once_removed_after_success() {
        let signal = Signaller::<()>::new();
        let counter = Arc::new(CountingListener::new());
        let conn = signal.connect(counter.clone()).once_only();

        signal.dispatch(&()).unwrap();
        signal.dispatch(&()).unwrap();

        assert_eq!(counter.count(), 1);
        assert!(!conn.is_connected());
        assert!(signal.is_empty());
        assert!(signal.registry.snapshot().is_empty());
    }

    #[test]
    fn test_failing_once_listener_stays_connected() {
        let signal = Signaller::<()>::new();
        let failures = Arc::new(AtomicUsize::new(0));
        let counter = failures.clone();
        let conn = signal
            .connect(Arc::new(move || -> Result<(), BoxError> {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err("not yet".into())
                } else {
                    Ok(())
                }
            }))
            .once_only();

        assert!(signal.dispatch(&()).is_err());
        assert!(conn.is_connected());
        assert!(conn.is_once());

        signal.dispatch(&()).unwrap();
        signal.dispatch(&()).unwrap();
        assert_eq!(failures.load(Ordering::SeqCst), 2);
        assert!(!conn.is_connected());
        assert!(signal.registry.snapshot().is_empty());
    }

    #[test]
    fn test_drop_disconnects_handles() {
        let counter = Arc::new(CountingListener::new());
        let signal = Signaller::<(u32,)>::named("drop");
        let conn = signal.connect(counter.clone());
        assert_eq!(Arc::strong_count(&counter), 2);

        drop(signal);
        assert!(!conn.is_connected());
        assert_eq!(Arc::strong_count(&counter), 1);
        conn.disconnect();
    }
}
