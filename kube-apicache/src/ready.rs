//! One-shot readiness tracking for stores
use std::time::Duration;
use tokio::time::error::Elapsed;
use tokio_util::sync::CancellationToken;

/// Signals that a store has completed its initial list
///
/// Set at most once; all clones observe the same state. Waiting on a token that
/// is already ready returns immediately.
#[derive(Clone, Debug, Default)]
pub struct ReadyToken(CancellationToken);

impl ReadyToken {
    /// Creates a token that is not ready yet
    #[must_use]
    pub fn new() -> Self {
        Self(CancellationToken::new())
    }

    /// Whether [`Self::make_ready`] has been called on this token or any clone of it
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.0.is_cancelled()
    }

    /// Marks the token as ready, waking every waiter
    ///
    /// Calling this more than once has no further effect.
    pub fn make_ready(&self) {
        self.0.cancel();
    }

    /// Waits until the token is ready
    pub async fn ready(&self) {
        self.0.cancelled().await;
    }

    /// Waits until the token is ready, giving up after `timeout`
    ///
    /// # Errors
    ///
    /// Returns [`Elapsed`] if the token was not made ready in time.
    pub async fn wait_timeout(&self, timeout: Duration) -> Result<(), Elapsed> {
        if self.is_ready() {
            return Ok(());
        }
        tokio::time::timeout(timeout, self.ready()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[test]
    fn not_ready_on_creation() {
        let token = ReadyToken::new();
        assert!(!token.is_ready());
    }

    #[test]
    fn ready_is_shared_between_clones() {
        let token = ReadyToken::new();
        let clone = token.clone();
        clone.make_ready();
        assert!(token.is_ready());
    }

    #[test]
    fn ready_future_resolves_only_after_make_ready() {
        let token = ReadyToken::new();

        let mut first = token.ready().boxed();
        let mut second = token.ready().boxed();
        assert!((&mut first).now_or_never().is_none());
        assert!((&mut second).now_or_never().is_none());

        token.make_ready();
        assert!((&mut first).now_or_never().is_some());
        assert!((&mut second).now_or_never().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn wait_timeout_elapses_when_never_ready() {
        let token = ReadyToken::new();
        assert!(token.wait_timeout(Duration::from_secs(5)).await.is_err());
        assert!(!token.is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn wait_timeout_returns_once_made_ready() {
        let token = ReadyToken::new();
        let setter = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            setter.make_ready();
        });
        assert!(token.wait_timeout(Duration::from_secs(5)).await.is_ok());
    }

    #[tokio::test]
    async fn wait_timeout_with_zero_duration_succeeds_when_already_ready() {
        let token = ReadyToken::new();
        token.make_ready();
        token.make_ready();
        assert!(token.wait_timeout(Duration::ZERO).await.is_ok());
    }
}
