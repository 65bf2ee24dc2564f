//! Domain Layer - Core signal logic
//!
//! Pure types and algorithms with no I/O. Providers feed candidates in
//! through the ports layer; everything here is deterministic.
//!
//! Pipeline order within one aggregation cycle:
//! - `merger`: first-seen-wins dedup across providers in priority order
//! - `filters`: strict validity thresholds, then heuristic patterns
//! - `scorer`: bounded composite score with pattern/risk/opportunity tags
//! - `ranker`: stable descending sort, top-K, market overview slices

pub mod candidate;
pub mod signal;
pub mod merger;
pub mod filters;
pub mod scorer;
pub mod ranker;

pub use candidate::{Candidate, ProviderSource, Socials, UNKNOWN_AGE};
pub use signal::{RiskLevel, ScoredSignal, SignalAnalysis, SignalScore};
pub use merger::{merge_candidates, ProviderBatch};
pub use filters::{HeuristicFilter, ValidityFilter};
pub use scorer::{analyze, score_candidate};
pub use ranker::{low_cap, rank, MarketOverview, MomentumEntry, PremiumEntry, VolumeEntry};
