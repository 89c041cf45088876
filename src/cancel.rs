//! Cooperative cancellation
//!
//! A single [`CancelToken`] is cloned into every operation that performs
//! network I/O. Firing it is sticky: once cancelled, every current and future
//! wait on the token resolves immediately.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

/// Marker error returned when an operation stops because its token fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("operation cancelled")]
pub struct Cancelled;

/// Shared cancellation signal
#[derive(Debug, Clone)]
pub struct CancelToken {
    state: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    /// Creates a token that has not fired
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            state: Arc::new(tx),
        }
    }

    /// Fires the token. Idempotent.
    pub fn cancel(&self) {
        self.state.send_replace(true);
    }

    /// Returns true once the token has fired
    pub fn is_cancelled(&self) -> bool {
        *self.state.borrow()
    }

    /// Fails with [`Cancelled`] if the token has already fired
    pub fn check(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    /// Resolves when the token fires
    pub async fn cancelled(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives as long as `self`, so this only returns once fired
        let _ = rx.wait_for(|fired| *fired).await;
    }

    /// Drives `fut` to completion unless the token fires first
    pub async fn run<F, T>(&self, fut: F) -> Result<T, Cancelled>
    where
        F: Future<Output = T>,
    {
        self.check()?;
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(Cancelled),
            out = fut => Ok(out),
        }
    }

    /// Sleeps for `duration`, waking early with [`Cancelled`] if the token fires
    pub async fn sleep(&self, duration: Duration) -> Result<(), Cancelled> {
        self.run(tokio::time::sleep(duration)).await
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
