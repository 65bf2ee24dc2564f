//! Per-Provider Rate Limiter
//!
//! One timestamp cell per provider, created up front and kept for the life of
//! the limiter. `acquire` holds the provider's cell lock while it sleeps out
//! the remaining interval, so concurrent acquisitions for the same provider
//! are serialized and never read-then-write the timestamp concurrently.
//! Different providers never contend.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::domain::ProviderSource;

/// Request class. High priority requests use the shorter interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestPriority {
    #[default]
    Normal,
    High,
}

/// Interval settings for one provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderLimit {
    /// Minimum time between granted permits
    pub min_interval: Duration,
    /// Interval used for high priority requests
    pub high_priority_interval: Duration,
}

impl ProviderLimit {
    /// High priority requests default to half the normal interval
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            high_priority_interval: min_interval / 2,
        }
    }

    pub fn with_high_priority_interval(mut self, interval: Duration) -> Self {
        self.high_priority_interval = interval;
        self
    }

    fn interval_for(&self, priority: RequestPriority) -> Duration {
        match priority {
            RequestPriority::Normal => self.min_interval,
            RequestPriority::High => self.high_priority_interval,
        }
    }
}

/// Proof that a request slot was granted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatePermit {
    pub source: ProviderSource,
    /// Time spent waiting for the slot
    pub waited: Duration,
}

#[derive(Debug)]
struct LimiterCell {
    limit: ProviderLimit,
    last_grant: Mutex<Option<Instant>>,
}

/// Rate limiter keyed by provider
#[derive(Debug, Default)]
pub struct ProviderRateLimiter {
    cells: HashMap<ProviderSource, Arc<LimiterCell>>,
}

impl ProviderRateLimiter {
    /// Create a limiter with one cell per configured provider
    pub fn new(limits: impl IntoIterator<Item = (ProviderSource, ProviderLimit)>) -> Self {
        let cells = limits
            .into_iter()
            .map(|(source, limit)| {
                (
                    source,
                    Arc::new(LimiterCell {
                        limit,
                        last_grant: Mutex::new(None),
                    }),
                )
            })
            .collect();
        Self { cells }
    }

    /// Wait until `source` may issue another request, then claim the slot.
    ///
    /// Providers without a configured limit are granted immediately.
    pub async fn acquire(&self, source: ProviderSource, priority: RequestPriority) -> RatePermit {
        let Some(cell) = self.cells.get(&source) else {
            return RatePermit {
                source,
                waited: Duration::ZERO,
            };
        };

        let interval = cell.limit.interval_for(priority);
        let started = Instant::now();
        let mut last_grant = cell.last_grant.lock().await;

        if let Some(last) = *last_grant {
            let elapsed = last.elapsed();
            if elapsed < interval {
                let wait = interval - elapsed;
                tracing::debug!(
                    "Rate limiting: waiting {:?} before next {} request",
                    wait,
                    source
                );
                tokio::time::sleep(wait).await;
            }
        }

        *last_grant = Some(Instant::now());

        RatePermit {
            source,
            waited: started.elapsed(),
        }
    }
}
