use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag. The caller sets it from its own task, the
/// orchestrator polls it at the top of each page iteration, so cancellation
/// takes effect between pages rather than mid fetch.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent, later calls are no-ops.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unset() {
        assert!(!CancelToken::new().is_cancelled());
    }

    #[test]
    fn cancel_is_idempotent_and_visible_to_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
        assert!(clone.is_cancelled());
    }
}
