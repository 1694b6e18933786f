//! Problem reporting and confirmation
//!
//! Provides the [`ErrorCallback`] capability injected into loaders, action
//! commands and the update engine. The core never writes to a fixed stream.

/// Sink for non-fatal problems and gate for destructive work
///
/// `confirm` is a blocking call-out. Returning `false` declines the single
/// operation that asked; [`ErrorCallback::can_continue`] returning `false`
/// additionally stops any batch in progress.
pub trait ErrorCallback {
    /// Record a non-fatal problem; processing continues
    fn log(&mut self, message: &str);

    /// Ask for permission before destructive work
    fn confirm(&mut self, message: &str) -> bool {
        let _ = message;
        true
    }

    /// Whether a running batch may proceed to its next step
    fn can_continue(&self) -> bool {
        true
    }
}

/// Callback that accumulates logged messages and approves everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageLog {
    messages: Vec<String>,
}

impl MessageLog {
    /// Create empty log
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Logged messages, oldest first
    #[inline]
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Check if nothing was logged
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// All messages joined one per line
    #[must_use]
    pub fn joined(&self) -> String {
        self.messages.join("\n")
    }
}

impl ErrorCallback for MessageLog {
    fn log(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}
