//! Connection records and the caller-facing [`Connection`] handle.
//!
//! A record lives in exactly one registry. Its state only moves forward:
//! once the `CONNECTED` bit is cleared it is never set again, and every later
//! handle operation is a no-op.

use crate::{options::ConnectOptions, registry::Registry};
use arc_swap::ArcSwapOption;
use bitflags::bitflags;
use klaxon_core::{BoxError, Connectable, Retention};
use std::{
    any::Any,
    fmt,
    marker::PhantomData,
    ops::Deref,
    sync::{
        Arc, Weak,
        atomic::{AtomicU8, Ordering},
    },
};

bitflags! {
    /// State bits of a connection record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct ConnectionFlags: u8 {
        const CONNECTED = 1;
        const ONCE = 1 << 1;
        const WEAK = 1 << 2;
        /// A dispatch is running this one-shot listener.
        const CLAIMED = 1 << 3;
    }
}

impl ConnectionFlags {
    fn initial(options: &ConnectOptions) -> Self {
        let mut flags = ConnectionFlags::CONNECTED;
        flags.set(ConnectionFlags::ONCE, options.is_once());
        flags.set(ConnectionFlags::WEAK, options.is_weak());
        flags
    }
}

// ============================================================================
// Listener storage
// ============================================================================

/// Type-erased listener storage for argument tuple `A`.
pub(crate) trait Held<A>: Send + Sync {
    /// Runs the listener, or returns `None` if it has been reclaimed.
    fn invoke(&self, args: &A) -> Option<Result<Retention, BoxError>>;

    /// Drops the strong reference, leaving only the weak one.
    fn downgrade(&self);

    /// The listener, if it is still reachable.
    fn current(&self) -> Option<Arc<dyn Any + Send + Sync>>;
}

/// A listener held strongly, weakly, or both, bound to arity marker `M`.
pub(crate) struct Bound<L, M> {
    strong: ArcSwapOption<L>,
    weak: Weak<L>,
    _arity: PhantomData<fn() -> M>,
}

impl<L, M> Bound<L, M> {
    pub(crate) fn new(listener: Arc<L>, weak: bool) -> Self {
        Self {
            weak: Arc::downgrade(&listener),
            strong: ArcSwapOption::new((!weak).then_some(listener)),
            _arity: PhantomData,
        }
    }

    fn resolve(&self) -> Option<Arc<L>> {
        self.strong.load_full().or_else(|| self.weak.upgrade())
    }
}

impl<A, L, M> Held<A> for Bound<L, M>
where
    L: Connectable<A, M>,
{
    fn invoke(&self, args: &A) -> Option<Result<Retention, BoxError>> {
        // Keep our own reference for the call so a concurrent make_weak or
        // disconnect cannot drop the listener under us.
        let listener = self.resolve()?;
        Some(<L as Connectable<A, M>>::invoke(&listener, args))
    }

    fn downgrade(&self) {
        self.strong.store(None);
    }

    fn current(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        self.resolve().map(|l| l as Arc<dyn Any + Send + Sync>)
    }
}

/// Address of the listener allocation, used as its identity.
pub(crate) fn identity_of<L: ?Sized>(listener: &Arc<L>) -> usize {
    Arc::as_ptr(listener) as *const () as usize
}

// ============================================================================
// Connection record
// ============================================================================

/// One registration of a listener in a registry.
pub(crate) struct Slot<A> {
    pub(crate) priority: i32,
    pub(crate) sequence: u64,
    pub(crate) identity: usize,
    arity: u8,
    flags: AtomicU8,
    listener: Box<dyn Held<A>>,
    registry: Weak<Registry<A>>,
}

impl<A> Slot<A> {
    pub(crate) fn new(
        listener: Box<dyn Held<A>>,
        identity: usize,
        arity: u8,
        sequence: u64,
        options: &ConnectOptions,
        registry: Weak<Registry<A>>,
    ) -> Self {
        Self {
            priority: options.priority(),
            sequence,
            identity,
            arity,
            flags: AtomicU8::new(ConnectionFlags::initial(options).bits()),
            listener,
            registry,
        }
    }

    fn flags(&self) -> ConnectionFlags {
        ConnectionFlags::from_bits_truncate(self.flags.load(Ordering::Acquire))
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.flags().contains(ConnectionFlags::CONNECTED)
    }

    pub(crate) fn is_once(&self) -> bool {
        self.flags().contains(ConnectionFlags::ONCE)
    }

    /// Clears `CONNECTED`, returning whether this call was the one to clear it.
    pub(crate) fn sever(&self) -> bool {
        let prev = self
            .flags
            .fetch_and(!ConnectionFlags::CONNECTED.bits(), Ordering::AcqRel);
        ConnectionFlags::from_bits_truncate(prev).contains(ConnectionFlags::CONNECTED)
    }

    /// Drops the strong listener reference.
    pub(crate) fn release(&self) {
        self.listener.downgrade();
    }

    /// Releases the listener and removes the record from its registry.
    pub(crate) fn detach(&self) {
        self.release();
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self);
        }
    }

    pub(crate) fn disconnect(&self) {
        if self.sever() {
            self.detach();
        }
    }

    /// Reserves a one-shot record for the calling dispatch.
    ///
    /// Fails if the record is dead or another dispatch already holds it.
    pub(crate) fn claim(&self) -> bool {
        let prev = ConnectionFlags::from_bits_truncate(
            self.flags
                .fetch_or(ConnectionFlags::CLAIMED.bits(), Ordering::AcqRel),
        );
        prev.contains(ConnectionFlags::CONNECTED) && !prev.contains(ConnectionFlags::CLAIMED)
    }

    fn unclaim(&self) {
        self.flags
            .fetch_and(!ConnectionFlags::CLAIMED.bits(), Ordering::AcqRel);
    }

    fn set(&self, flag: ConnectionFlags) -> bool {
        if !self.is_connected() {
            return false;
        }
        self.flags.fetch_or(flag.bits(), Ordering::AcqRel);
        true
    }

    pub(crate) fn invoke(&self, args: &A) -> Option<Result<Retention, BoxError>> {
        self.listener.invoke(args)
    }
}

/// Holds a [`Slot::claim`] for the duration of one invocation.
///
/// The claim is given back when the guard drops, so a listener that fails or
/// panics stays connected and can be claimed by a later dispatch.
pub(crate) struct Claim<'a, A>(&'a Slot<A>);

impl<'a, A> Claim<'a, A> {
    pub(crate) fn take(slot: &'a Slot<A>) -> Option<Self> {
        slot.claim().then_some(Claim(slot))
    }
}

impl<A> Drop for Claim<'_, A> {
    fn drop(&mut self) {
        self.0.unclaim();
    }
}

/// Object-safe view of a record, independent of its argument tuple.
trait Link: Send + Sync {
    fn flags(&self) -> ConnectionFlags;
    fn priority(&self) -> i32;
    fn sequence(&self) -> u64;
    fn arity(&self) -> u8;
    fn once_only(&self);
    fn make_weak(&self);
    fn disconnect(&self);
    fn listener(&self) -> Option<Arc<dyn Any + Send + Sync>>;
}

impl<A: 'static> Link for Slot<A> {
    fn flags(&self) -> ConnectionFlags {
        Slot::flags(self)
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn sequence(&self) -> u64 {
        self.sequence
    }

    fn arity(&self) -> u8 {
        self.arity
    }

    fn once_only(&self) {
        self.set(ConnectionFlags::ONCE);
    }

    fn make_weak(&self) {
        if self.set(ConnectionFlags::WEAK) {
            self.listener.downgrade();
        }
    }

    fn disconnect(&self) {
        Slot::disconnect(self);
    }

    fn listener(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        self.listener.current()
    }
}

// ============================================================================
// Connection handle
// ============================================================================

/// A handle to one listener registration.
///
/// Handles are cheap to clone; every clone refers to the same registration.
/// Dropping a handle does not disconnect the listener (see
/// [`Connection::scoped`] for that).
///
/// All operations are safe on a disconnected handle and do nothing.
#[derive(Clone)]
pub struct Connection {
    link: Arc<dyn Link>,
}

impl Connection {
    pub(crate) fn new<A: 'static>(slot: Arc<Slot<A>>) -> Self {
        Self { link: slot }
    }

    /// Disconnect after the next invocation.
    pub fn once_only(self) -> Self {
        self.link.once_only();
        self
    }

    /// Stop keeping the listener alive.
    ///
    /// If nothing else owns the listener it is dropped right away and the
    /// connection lapses silently on the next dispatch.
    pub fn make_weak(self) -> Self {
        self.link.make_weak();
        self
    }

    /// Remove this registration from its signal.
    ///
    /// Safe to call from inside the listener's own invocation.
    pub fn disconnect(&self) {
        self.link.disconnect();
    }

    /// Whether the registration is still live.
    pub fn is_connected(&self) -> bool {
        self.link.flags().contains(ConnectionFlags::CONNECTED)
    }

    /// Whether the registration is one-shot.
    pub fn is_once(&self) -> bool {
        self.link.flags().contains(ConnectionFlags::ONCE)
    }

    /// Whether the listener is held weakly.
    pub fn is_weak(&self) -> bool {
        self.link.flags().contains(ConnectionFlags::WEAK)
    }

    /// Priority the listener was connected with.
    pub fn priority(&self) -> i32 {
        self.link.priority()
    }

    /// Insertion sequence number within the signal.
    pub fn sequence(&self) -> u64 {
        self.link.sequence()
    }

    /// Number of dispatched arguments the listener consumes.
    pub fn arity(&self) -> u8 {
        self.link.arity()
    }

    /// The listener, if it is still reachable.
    ///
    /// Returns `None` once a weak listener has been reclaimed, or after
    /// disconnection when nothing else owns the listener.
    pub fn current_listener(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        self.link.listener()
    }

    /// The listener as its concrete type, if it is still reachable.
    pub fn listener_as<L: Send + Sync + 'static>(&self) -> Option<Arc<L>> {
        self.current_listener()?.downcast::<L>().ok()
    }

    /// Wrap into a guard that disconnects when dropped.
    pub fn scoped(self) -> ScopedConnection {
        ScopedConnection(self)
    }
}

impl PartialEq for Connection {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.link, &other.link)
    }
}

impl Eq for Connection {}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("priority", &self.priority())
            .field("sequence", &self.sequence())
            .field("arity", &self.arity())
            .field("flags", &self.link.flags())
            .finish()
    }
}

/// A [`Connection`] that disconnects when dropped.
#[must_use = "dropping a ScopedConnection disconnects it immediately"]
#[derive(Debug)]
pub struct ScopedConnection(Connection);

impl Deref for ScopedConnection {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Drop for ScopedConnection {
    fn drop(&mut self) {
        self.0.disconnect();
    }
}
