//! Cooperative cancellation.
//!
//! A [`CancellationToken`] is a shared flag backed by a `watch` channel.
//! Cancelling is sticky: once set, every clone observes it and every
//! pending [`cancelled`](CancellationToken::cancelled) wait resolves.

use railway_core::Error;
use std::sync::Arc;
use tokio::sync::watch;

/// Shared, clonable cancellation signal.
///
/// ```ignore
/// let token = CancellationToken::new();
/// let lookup = fetch_user(id).bind_cancellable(&token, |user, t| load_orders(user, t));
/// token.cancel();
/// assert!(lookup.await.unwrap_err().is_cancellation());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    state: Arc<watch::Sender<bool>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        let was_cancelled = self.state.send_replace(true);
        if !was_cancelled {
            tracing::debug!("cancellation requested");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.state.borrow()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called on any clone.
    pub async fn cancelled(&self) {
        let mut rx = self.state.subscribe();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            // The sender lives in `self`, so the channel cannot close here.
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// The failure a step yields when it is skipped because of cancellation.
pub(crate) fn skipped(step: &'static str) -> Error {
    tracing::debug!(step, "cancellation requested; step skipped");
    Error::cancelled()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn starts_uncancelled_and_is_sticky() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn clones_share_state() {
        let token = CancellationToken::default();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_wakes_waiters() {
        let token = CancellationToken::new();
        let waiter = {
            let token = token.clone();
            tokio::spawn(async move { token.cancelled().await })
        };
        tokio::time::sleep(Duration::from_millis(5)).await;
        token.cancel();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake")
            .expect("waiter should not panic");
    }

    #[tokio::test]
    async fn cancelled_returns_immediately_when_already_set() {
        let token = CancellationToken::new();
        token.cancel();
        tokio::time::timeout(Duration::from_millis(50), token.cancelled())
            .await
            .expect("already-cancelled token should resolve at once");
    }

    #[test]
    fn skipped_step_is_a_cancellation_failure() {
        assert!(skipped("bind").is_cancellation());
    }
}
