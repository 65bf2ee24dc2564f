//! Candidate Filters
//!
//! Two passes run in a fixed order: the strict [`ValidityFilter`] first, then
//! the looser [`HeuristicFilter`] over whatever survived it.

use serde::{Deserialize, Serialize};

use super::candidate::Candidate;

/// Default minimum 24h volume in USD
pub const DEFAULT_MIN_VOLUME_USD: f64 = 50_000.0;
/// Default maximum market cap in USD
pub const DEFAULT_MAX_MARKET_CAP_USD: f64 = 10_000_000.0;
/// Default minimum absolute 24h price change in percent
pub const DEFAULT_MIN_PRICE_CHANGE_PCT: f64 = 5.0;
/// Default minimum holder count
pub const DEFAULT_MIN_HOLDERS: u64 = 100;

/// Strict thresholds. Every bound is inclusive; a candidate must clear all of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidityFilter {
    #[serde(default = "default_min_volume")]
    pub min_volume_usd: f64,
    #[serde(default = "default_max_market_cap")]
    pub max_market_cap_usd: f64,
    #[serde(default = "default_min_price_change")]
    pub min_price_change_pct: f64,
    #[serde(default = "default_min_holders")]
    pub min_holders: u64,
}

fn default_min_volume() -> f64 {
    DEFAULT_MIN_VOLUME_USD
}

fn default_max_market_cap() -> f64 {
    DEFAULT_MAX_MARKET_CAP_USD
}

fn default_min_price_change() -> f64 {
    DEFAULT_MIN_PRICE_CHANGE_PCT
}

fn default_min_holders() -> u64 {
    DEFAULT_MIN_HOLDERS
}

impl Default for ValidityFilter {
    fn default() -> Self {
        Self {
            min_volume_usd: DEFAULT_MIN_VOLUME_USD,
            max_market_cap_usd: DEFAULT_MAX_MARKET_CAP_USD,
            min_price_change_pct: DEFAULT_MIN_PRICE_CHANGE_PCT,
            min_holders: DEFAULT_MIN_HOLDERS,
        }
    }
}

impl ValidityFilter {
    /// Missing provider fields are zero and therefore fail closed
    pub fn passes(&self, candidate: &Candidate) -> bool {
        candidate.volume_usd_24h >= self.min_volume_usd
            && candidate.market_cap_usd <= self.max_market_cap_usd
            && candidate.price_change_24h_pct.abs() >= self.min_price_change_pct
            && candidate.holders() >= self.min_holders
    }

    pub fn apply(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates.into_iter().filter(|c| self.passes(c)).collect()
    }
}

/// Pattern-based secondary filter. A candidate needs to match any one pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicFilter {
    /// Volume above this fraction of market cap counts as a spike
    #[serde(default = "default_volume_spike_ratio")]
    pub volume_spike_ratio: f64,
    /// Absolute price change above this counts as strong momentum
    #[serde(default = "default_strong_momentum_pct")]
    pub strong_momentum_pct: f64,
    /// Exclusive lower market cap bound for the distribution pattern
    #[serde(default = "default_min_market_cap")]
    pub min_market_cap_usd: f64,
    /// Exclusive upper market cap bound for the distribution pattern
    #[serde(default = "default_heuristic_max_market_cap")]
    pub max_market_cap_usd: f64,
    /// Holders above this count as good distribution
    #[serde(default = "default_distribution_holders")]
    pub min_holders: u64,
}

fn default_volume_spike_ratio() -> f64 {
    0.10
}

fn default_strong_momentum_pct() -> f64 {
    15.0
}

fn default_min_market_cap() -> f64 {
    10_000.0
}

fn default_heuristic_max_market_cap() -> f64 {
    10_000_000.0
}

fn default_distribution_holders() -> u64 {
    200
}

impl Default for HeuristicFilter {
    fn default() -> Self {
        Self {
            volume_spike_ratio: default_volume_spike_ratio(),
            strong_momentum_pct: default_strong_momentum_pct(),
            min_market_cap_usd: default_min_market_cap(),
            max_market_cap_usd: default_heuristic_max_market_cap(),
            min_holders: default_distribution_holders(),
        }
    }
}

impl HeuristicFilter {
    pub fn is_volume_spike(&self, candidate: &Candidate) -> bool {
        candidate.volume_usd_24h > candidate.market_cap_usd * self.volume_spike_ratio
    }

    pub fn is_strong_momentum(&self, candidate: &Candidate) -> bool {
        candidate.price_change_24h_pct.abs() > self.strong_momentum_pct
    }

    pub fn has_valid_cap_and_distribution(&self, candidate: &Candidate) -> bool {
        let cap = candidate.market_cap_usd;
        cap > self.min_market_cap_usd
            && cap < self.max_market_cap_usd
            && candidate.holders() > self.min_holders
    }

    pub fn passes(&self, candidate: &Candidate) -> bool {
        self.is_volume_spike(candidate)
            || self.is_strong_momentum(candidate)
            || self.has_valid_cap_and_distribution(candidate)
    }

    pub fn apply(&self, candidates: Vec<Candidate>) -> Vec<Candidate> {
        candidates.into_iter().filter(|c| self.passes(c)).collect()
    }
}
