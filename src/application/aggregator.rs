//! Signal Aggregator
//!
//! Runs the aggregation cycle: fetch from every provider concurrently, wait
//! for all of them to settle, then merge, filter, score and rank.
//! Main polling loop that repeats the cycle on a fixed interval.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Notify, RwLock};

use crate::domain::{
    low_cap, merge_candidates, rank, score_candidate, HeuristicFilter, MarketOverview, ProviderBatch,
    ProviderSource, ScoredSignal, ValidityFilter,
};
use crate::ports::{ProviderError, SignalProvider};

/// Tunables for one aggregation cycle
#[derive(Debug, Clone)]
pub struct AggregatorSettings {
    /// Signals kept after ranking
    pub top_k: usize,
    /// Bound on a single provider's fetch; the barrier never waits longer
    pub provider_timeout: Duration,
    pub validity: ValidityFilter,
    pub heuristics: HeuristicFilter,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            top_k: crate::domain::ranker::DEFAULT_TOP_K,
            provider_timeout: Duration::from_secs(120),
            validity: ValidityFilter::default(),
            heuristics: HeuristicFilter::default(),
        }
    }
}

/// How one provider settled within a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome {
    /// Returned this many normalized candidates
    Responded(usize),
    /// Returned an error
    Failed(String),
    /// Did not settle within the provider timeout
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderReport {
    pub source: ProviderSource,
    pub outcome: ProviderOutcome,
}

/// Result of one aggregation cycle with per-stage counts
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Ranked output, at most top_k long
    pub signals: Vec<ScoredSignal>,
    pub providers_total: usize,
    pub providers_responding: usize,
    /// One entry per provider, in priority order
    pub outcomes: Vec<ProviderReport>,
    pub merged_count: usize,
    pub valid_count: usize,
    pub heuristic_count: usize,
}

impl CycleReport {
    pub fn is_degraded(&self) -> bool {
        self.providers_responding < self.providers_total
    }
}

/// Aggregates provider output into ranked signals
#[derive(Clone)]
pub struct SignalAggregator {
    providers: Vec<Arc<dyn SignalProvider>>,
    settings: AggregatorSettings,
    is_running: Arc<RwLock<bool>>,
    wake: Arc<Notify>,
}

impl SignalAggregator {
    /// Create a new aggregator. Providers are kept in merge priority order.
    pub fn new(mut providers: Vec<Arc<dyn SignalProvider>>, settings: AggregatorSettings) -> Self {
        providers.sort_by_key(|p| p.source().priority());

        Self {
            providers,
            settings,
            is_running: Arc::new(RwLock::new(false)),
            wake: Arc::new(Notify::new()),
        }
    }

    pub fn provider_sources(&self) -> Vec<ProviderSource> {
        self.providers.iter().map(|p| p.source()).collect()
    }

    /// Execute one aggregation cycle. Never fails; a provider failure only
    /// shrinks the input.
    pub async fn run_cycle(&self) -> CycleReport {
        let timestamp = Utc::now();
        let timeout = self.settings.provider_timeout;

        // The timeout lives inside each task, so a stuck provider ends with it
        let handles: Vec<_> = self
            .providers
            .iter()
            .map(|provider| {
                let provider = Arc::clone(provider);
                let source = provider.source();
                let handle = tokio::spawn(async move {
                    tokio::time::timeout(timeout, provider.fetch_candidates()).await
                });
                (source, handle)
            })
            .collect();

        // Barrier: every handle is awaited, in priority order
        let mut batches = Vec::with_capacity(handles.len());
        let mut outcomes = Vec::with_capacity(handles.len());

        for (source, handle) in handles {
            let (batch, outcome) = match handle.await {
                Ok(Ok(Ok(candidates))) => {
                    let count = candidates.len();
                    (ProviderBatch::new(source, candidates), ProviderOutcome::Responded(count))
                }
                Ok(Ok(Err(e))) => {
                    if e.is_transient() {
                        tracing::warn!("{} fetch failed: {}", source, e);
                    } else {
                        tracing::error!("{} fetch failed: {}", source, e);
                    }
                    (ProviderBatch::empty(source), ProviderOutcome::Failed(e.to_string()))
                }
                Ok(Err(_elapsed)) => {
                    tracing::warn!("{} fetch timed out after {:?}", source, timeout);
                    (ProviderBatch::empty(source), ProviderOutcome::TimedOut)
                }
                Err(join_error) => {
                    let e = ProviderError::Task(join_error.to_string());
                    tracing::warn!("{} fetch task aborted: {}", source, e);
                    (ProviderBatch::empty(source), ProviderOutcome::Failed(e.to_string()))
                }
            };
            batches.push(batch);
            outcomes.push(ProviderReport { source, outcome });
        }

        let providers_responding = outcomes
            .iter()
            .filter(|r| matches!(r.outcome, ProviderOutcome::Responded(_)))
            .count();

        let merged = merge_candidates(batches);
        let merged_count = merged.len();

        let valid = self.settings.validity.apply(merged);
        let valid_count = valid.len();

        let promising = self.settings.heuristics.apply(valid);
        let heuristic_count = promising.len();

        let scored: Vec<ScoredSignal> = promising
            .into_iter()
            .map(|candidate| score_candidate(candidate, timestamp))
            .collect();
        let signals = rank(scored, self.settings.top_k);

        tracing::info!(
            "Cycle complete | providers {}/{} | merged {} -> valid {} -> heuristic {} -> ranked {}",
            providers_responding,
            self.providers.len(),
            merged_count,
            valid_count,
            heuristic_count,
            signals.len()
        );

        CycleReport {
            signals,
            providers_total: self.providers.len(),
            providers_responding,
            outcomes,
            merged_count,
            valid_count,
            heuristic_count,
        }
    }

    /// Freshly computed ranked signals
    pub async fn get_latest_signals(&self) -> Vec<ScoredSignal> {
        self.run_cycle().await.signals
    }

    /// Overview sliced from a fresh set of latest signals
    pub async fn get_market_overview(&self) -> MarketOverview {
        let signals = self.get_latest_signals().await;
        MarketOverview::from_signals(&signals)
    }

    /// Latest signals under the low-cap market cap bound
    pub async fn get_low_cap_signals(&self) -> Vec<ScoredSignal> {
        low_cap(self.get_latest_signals().await)
    }

    /// Run cycles back to back, handing each report to `sink`, until `stop` is called.
    /// A cycle always finishes before the next one starts.
    pub async fn run<F>(&self, interval: Duration, mut sink: F)
    where
        F: FnMut(CycleReport),
    {
        *self.is_running.write().await = true;

        tracing::info!(
            "Starting signal aggregator - {} providers, poll interval: {:?}",
            self.providers.len(),
            interval
        );

        while *self.is_running.read().await {
            let report = self.run_cycle().await;
            sink(report);

            // Registered before the flag check so a concurrent stop is not missed
            let wake = self.wake.notified();
            tokio::pin!(wake);
            if !*self.is_running.read().await {
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = &mut wake => {}
            }
        }

        tracing::info!("Signal aggregator stopped");
    }

    /// Stop the polling loop after the current cycle.
    ///
    /// Only a loop that is already sleeping is woken; no wake-up is stored
    /// for a later `run`.
    pub async fn stop(&self) {
        *self.is_running.write().await = false;
        self.wake.notify_waiters();
        tracing::info!("Stop signal sent to aggregator");
    }

    pub async fn is_running(&self) -> bool {
        *self.is_running.read().await
    }
}
