//! Ordered, copy-on-write connection registry.
//!
//! Records are kept sorted by descending priority, then ascending sequence.
//! Writers serialize on a mutex that also guards the sequence counter, build a
//! new vector, and swap it in. Readers load the current vector without locking
//! and keep it for as long as they iterate.
//!
//! Nothing that can run user code happens under the mutex: listeners are
//! released and retired vectors are dropped after the guard is gone.

use crate::{
    connection::{Held, Slot},
    options::ConnectOptions,
};
use arc_swap::ArcSwap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Point-in-time view of a registry.
pub(crate) type Snapshot<A> = Arc<Vec<Arc<Slot<A>>>>;

/// The ordered collection of connection records for one signal.
pub(crate) struct Registry<A> {
    slots: ArcSwap<Vec<Arc<Slot<A>>>>,
    next_sequence: Mutex<u64>,
}

/// Result of [`Registry::insert`].
pub(crate) struct Inserted<A> {
    pub(crate) slot: Arc<Slot<A>>,
    /// Earlier registration of the same listener that was disconnected.
    pub(crate) superseded: Option<Arc<Slot<A>>>,
}

impl<A> Registry<A> {
    pub(crate) fn new() -> Self {
        Self {
            slots: ArcSwap::from_pointee(Vec::new()),
            next_sequence: Mutex::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, u64> {
        // The guarded state is a plain counter; a poisoned lock is still usable.
        self.next_sequence
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Current records in dispatch order.
    pub(crate) fn snapshot(&self) -> Snapshot<A> {
        self.slots.load_full()
    }

    /// Number of live records.
    pub(crate) fn len(&self) -> usize {
        self.slots.load().iter().filter(|s| s.is_connected()).count()
    }

    /// Insert a new record after every record of equal or higher priority.
    ///
    /// A live record for the same listener identity is disconnected in the
    /// same step.
    pub(crate) fn insert(
        self: &Arc<Self>,
        listener: Box<dyn Held<A>>,
        identity: usize,
        arity: u8,
        options: &ConnectOptions,
    ) -> Inserted<A> {
        let mut sequence = self.lock();
        let slot = Arc::new(Slot::new(
            listener,
            identity,
            arity,
            *sequence,
            options,
            Arc::downgrade(self),
        ));
        *sequence += 1;

        let current = self.slots.load_full();
        let superseded = current
            .iter()
            .find(|s| s.identity == identity && s.is_connected())
            .cloned();

        if let Some(old) = &superseded {
            old.sever();
        }

        let mut next: Vec<_> = current
            .iter()
            .filter(|s| superseded.as_ref().is_none_or(|old| !Arc::ptr_eq(*s, old)))
            .cloned()
            .collect();
        let at = next.partition_point(|s| s.priority >= slot.priority);
        next.insert(at, slot.clone());

        let retired = self.slots.swap(Arc::new(next));
        drop(sequence);
        drop(current);
        drop(retired);

        if let Some(old) = &superseded {
            old.release();
        }
        Inserted { slot, superseded }
    }

    /// Remove a specific record. No-op if it is not present.
    pub(crate) fn remove(&self, slot: &Slot<A>) {
        let guard = self.lock();
        let current = self.slots.load_full();
        let Some(at) = current
            .iter()
            .position(|s| std::ptr::eq(Arc::as_ptr(s), slot))
        else {
            return;
        };
        let mut next = Vec::clone(&current);
        next.remove(at);

        let retired = self.slots.swap(Arc::new(next));
        drop(guard);
        drop(current);
        drop(retired);
    }

    /// Disconnect the first live record whose listener has `identity`.
    ///
    /// Connecting a listener supersedes its previous registration, so at most
    /// one record can match.
    pub(crate) fn remove_by_identity(&self, identity: usize) -> Option<Arc<Slot<A>>> {
        let snapshot = self.snapshot();
        let slot = snapshot
            .iter()
            .find(|s| s.identity == identity && s.is_connected())?
            .clone();
        slot.disconnect();
        Some(slot)
    }

    /// Disconnect every record. Returns how many were live.
    pub(crate) fn remove_all(&self) -> usize {
        let guard = self.lock();
        let retired = self.slots.swap(Arc::new(Vec::new()));
        drop(guard);

        let mut severed = 0;
        for slot in retired.iter() {
            if slot.sever() {
                slot.release();
                severed += 1;
            }
        }
        severed
    }
}
