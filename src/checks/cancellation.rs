//! Cooperative cancellation for in-flight checks.

use std::sync::Arc;
use tokio::sync::watch;

/// The owning side of a cancellation signal.
#[derive(Debug, Clone)]
pub struct CancellationSource {
    sender: Arc<watch::Sender<bool>>,
}

impl CancellationSource {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(false);
        Self { sender: Arc::new(sender) }
    }

    /// A token observing this source.
    #[must_use]
    pub fn token(&self) -> Cancellation {
        Cancellation {
            receiver: self.sender.subscribe(),
        }
    }

    /// Signal every token. Calling this more than once has no further effect.
    pub fn cancel(&self) {
        let _ = self.sender.send_replace(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

/// A cheap, cloneable handle that checks poll to learn whether they should stop early.
///
/// Observing cancellation is voluntary: a check that never looks at its token simply runs to
/// completion.
#[derive(Debug, Clone)]
pub struct Cancellation {
    receiver: watch::Receiver<bool>,
}

impl Cancellation {
    /// A token that is never cancelled.
    #[must_use]
    pub fn never() -> Self {
        let (_sender, receiver) = watch::channel(false);
        Self { receiver }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolve once the token is cancelled. Pends forever if its source is gone without having
    /// cancelled.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        loop {
            if *receiver.borrow_and_update() {
                return;
            }

            if receiver.changed().await.is_err() {
                futures::future::pending::<()>().await;
            }
        }
    }
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::never()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;

    #[test]
    fn test_never_is_not_cancelled() {
        assert!(!Cancellation::never().is_cancelled());
    }

    #[test]
    fn test_cancel_reaches_existing_and_new_tokens() {
        let source = CancellationSource::new();
        let before = source.token();
        source.cancel();
        let after = source.token();

        assert!(source.is_cancelled());
        assert!(before.is_cancelled());
        assert!(after.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_resolves_after_cancel() {
        let source = CancellationSource::new();
        let token = source.token();

        let waiter = tokio::spawn(async move { token.cancelled().await });
        source.cancel();

        tokio::time::timeout(Duration::from_secs(5), waiter).await.unwrap().unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_pends_when_source_dropped() {
        let token = CancellationSource::new().token();
        let result = tokio::time::timeout(Duration::from_secs(1), token.cancelled()).await;
        assert!(result.is_err());
    }
}
