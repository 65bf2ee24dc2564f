//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - Rate limit: per-provider request spacing
//! - HTTP: shared rate-limited fetcher with the 429 retry
//! - Market Data: the four signal providers
//! - CLI: Command-line interface definitions

pub mod cli;
pub mod http;
pub mod market_data;
pub mod rate_limit;

pub use cli::CliApp;
pub use http::{HttpFetcher, HttpFetcherConfig, ProviderRequest};
pub use market_data::build_providers;
pub use rate_limit::{ProviderLimit, ProviderRateLimiter, RatePermit, RequestPriority};
