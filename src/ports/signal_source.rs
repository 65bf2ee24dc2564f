use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Candidate, ProviderSource};

/// Provider fetch error type
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Rate limited by {0} after retry")]
    RateLimited(ProviderSource),

    #[error("Data parsing error: {0}")]
    Parse(String),

    #[error("Fetch timed out after {0} ms")]
    Timeout(u64),

    #[error("Provider task failed: {0}")]
    Task(String),
}

impl ProviderError {
    /// Transient errors are expected from public APIs and only cost coverage
    pub fn is_transient(&self) -> bool {
        !matches!(self, ProviderError::Task(_))
    }
}

/// One external market data source.
///
/// Implementations own their payload normalization. A malformed record is
/// skipped inside `fetch_candidates`; only a failure of the whole provider
/// surfaces as an error, and the aggregator turns that into an empty batch.
#[async_trait]
pub trait SignalProvider: Send + Sync {
    /// Which source this provider reports as
    fn source(&self) -> ProviderSource;

    /// Fetch and normalize this provider's current candidates
    async fn fetch_candidates(&self) -> Result<Vec<Candidate>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ProviderError::RateLimited(ProviderSource::Birdeye);
        assert_eq!(err.to_string(), "Rate limited by Birdeye after retry");

        let err = ProviderError::Status {
            status: 503,
            url: "https://example.com".into(),
        };
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_transient_classification() {
        assert!(ProviderError::Timeout(10_000).is_transient());
        assert!(ProviderError::Parse("bad".into()).is_transient());
        assert!(!ProviderError::Task("panicked".into()).is_transient());
    }
}
