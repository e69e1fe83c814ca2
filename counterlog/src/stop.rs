//! A clonable token to stop the polling loop from outside.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// A cancellation token for the polling loop.
///
/// The token is cheap to clone; all clones share the same flag. A host hands one clone to the
/// [`crate::Poller`] and keeps another to call [`StopToken::cancel`] when the session should end,
/// instead of relying on process termination.
#[derive(Debug, Default, Clone)]
pub struct StopToken {
    cancelled: Arc<AtomicBool>,
}

impl StopToken {
    /// Create a new, not yet cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the token. All clones observe the cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Whether the token has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_seen_by_clones() {
        let token = StopToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
