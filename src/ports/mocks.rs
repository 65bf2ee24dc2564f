use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::signal_source::{ProviderError, SignalProvider};
use crate::domain::{Candidate, ProviderSource};

#[derive(Debug, Clone)]
enum MockBehavior {
    Succeed(Vec<Candidate>),
    Fail(u64),
    Panic,
}

/// Mock provider that records calls and returns a configured outcome
#[derive(Debug, Clone)]
pub struct MockProvider {
    source: ProviderSource,
    behavior: MockBehavior,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Provider returning the given candidates
    pub fn returning(source: ProviderSource, candidates: Vec<Candidate>) -> Self {
        Self {
            source,
            behavior: MockBehavior::Succeed(candidates),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Provider that always times out after `timeout_ms`
    pub fn timing_out(source: ProviderSource, timeout_ms: u64) -> Self {
        Self {
            behavior: MockBehavior::Fail(timeout_ms),
            ..Self::returning(source, Vec::new())
        }
    }

    /// Provider whose fetch task panics
    pub fn panicking(source: ProviderSource) -> Self {
        Self {
            behavior: MockBehavior::Panic,
            ..Self::returning(source, Vec::new())
        }
    }

    /// Builder method to delay the response
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of fetches made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SignalProvider for MockProvider {
    fn source(&self) -> ProviderSource {
        self.source
    }

    async fn fetch_candidates(&self) -> Result<Vec<Candidate>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.behavior {
            MockBehavior::Succeed(candidates) => Ok(candidates.clone()),
            MockBehavior::Fail(timeout_ms) => Err(ProviderError::Timeout(*timeout_ms)),
            MockBehavior::Panic => panic!("mock provider {} panicked", self.source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_candidates() {
        let mock = MockProvider::returning(
            ProviderSource::Birdeye,
            vec![Candidate::new("a", "A", ProviderSource::Birdeye)],
        );

        let result = mock.fetch_candidates().await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.source(), ProviderSource::Birdeye);
    }

    #[tokio::test]
    async fn test_mock_timeout() {
        let mock = MockProvider::timing_out(ProviderSource::Gmgn, 10_000);
        let result = mock.fetch_candidates().await;
        assert!(matches!(result, Err(ProviderError::Timeout(10_000))));
    }
}
