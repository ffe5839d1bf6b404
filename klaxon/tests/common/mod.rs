#![allow(dead_code)]

use klaxon::Connection;
use std::sync::{Arc, Mutex, OnceLock};

// ============================================================================
// Late-bound connections
// ============================================================================

/// A connection that is filled in after the listener needing it was built.
///
/// Lets a listener disconnect itself or a sibling that is connected later.
#[derive(Clone, Default)]
pub struct LateConnection(Arc<OnceLock<Connection>>);

impl LateConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, conn: Connection) {
        let _ = self.0.set(conn);
    }

    pub fn get(&self) -> Option<&Connection> {
        self.0.get()
    }

    pub fn disconnect(&self) {
        if let Some(conn) = self.0.get() {
            conn.disconnect();
        }
    }
}

// ============================================================================
// Shared value log
// ============================================================================

/// Records formatted invocations from closures of any arity.
#[derive(Clone, Default)]
pub struct Calls(Arc<Mutex<Vec<String>>>);

impl Calls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }
}
