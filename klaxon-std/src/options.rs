//! Per-connection configuration.

use klaxon_core::DEFAULT_PRIORITY;

/// Options applied when a listener is connected.
///
/// # Example
/// ```ignore
/// let conn = signal.connect_with(
///     listener,
///     ConnectOptions::new().with_priority(10).once_only(),
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectOptions {
    priority: i32,
    once: bool,
    weak: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectOptions {
    /// Create options for a strong, persistent connection at default priority.
    pub fn new() -> Self {
        Self {
            priority: DEFAULT_PRIORITY,
            once: false,
            weak: false,
        }
    }

    /// Set priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Disconnect after the first invocation.
    pub fn once_only(mut self) -> Self {
        self.once = true;
        self
    }

    /// Do not keep the listener alive.
    ///
    /// The connection lapses as soon as every other `Arc` to the listener is
    /// dropped, including the one passed to `connect_with` if it was the last.
    pub fn weak(mut self) -> Self {
        self.weak = true;
        self
    }

    /// Priority (higher = invoked earlier). Default is [`DEFAULT_PRIORITY`].
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Whether the connection is one-shot.
    pub fn is_once(&self) -> bool {
        self.once
    }

    /// Whether the connection holds its listener weakly.
    pub fn is_weak(&self) -> bool {
        self.weak
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConnectOptions::default();
        assert_eq!(options.priority(), DEFAULT_PRIORITY);
        assert!(!options.is_once());
        assert!(!options.is_weak());
    }

    #[test]
    fn test_builder_chain() {
        let options = ConnectOptions::new().with_priority(-3).weak().once_only();
        assert_eq!(options.priority(), -3);
        assert!(options.is_once());
        assert!(options.is_weak());
    }
}
