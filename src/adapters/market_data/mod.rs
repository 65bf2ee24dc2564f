//! Market Data Adapters
//!
//! One `SignalProvider` per upstream source:
//! - `DexScreenerProvider`: pair search
//! - `BirdeyeProvider`: trending tokens (API key, tight quota)
//! - `GmgnProvider`: swap routes against the probe tokens
//! - `JupiterProvider`: quotes against the probe tokens
//!
//! All of them share one `HttpFetcher`, and through it one rate limiter.

mod birdeye;
mod dexscreener;
mod gmgn;
mod jupiter;
pub mod payload;
pub mod probe;

use std::sync::Arc;

pub use birdeye::{parse_trending_response, BirdeyeConfig, BirdeyeProvider, BirdeyeToken, DEFAULT_BIRDEYE_API_URL};
pub use dexscreener::{
    parse_search_response, DexScreenerConfig, DexScreenerPair, DexScreenerProvider, DEFAULT_DEXSCREENER_API_URL,
};
pub use gmgn::{GmgnConfig, GmgnProvider, GmgnRoute, GmgnRouteData, DEFAULT_GMGN_API_URL};
pub use jupiter::{JupiterProvider, JupiterQuote, JupiterQuoteConfig, DEFAULT_JUPITER_API_URL};
pub use payload::RawProviderRecord;
pub use probe::{ProbeToken, ProbeTokens, WRAPPED_SOL_MINT};

use crate::adapters::http::HttpFetcher;
use crate::config::Config;
use crate::ports::SignalProvider;

/// Build the enabled providers in merge priority order
pub fn build_providers(config: &Config, http: &HttpFetcher) -> Vec<Arc<dyn SignalProvider>> {
    let p = &config.providers;
    let mut providers: Vec<Arc<dyn SignalProvider>> = Vec::with_capacity(4);

    if p.dexscreener.enabled {
        providers.push(Arc::new(DexScreenerProvider::new(
            DexScreenerConfig::from(&p.dexscreener),
            http.clone(),
        )));
    }
    if p.birdeye.enabled {
        providers.push(Arc::new(BirdeyeProvider::new(
            BirdeyeConfig::from(&p.birdeye),
            http.clone(),
        )));
    }
    if p.gmgn.enabled {
        providers.push(Arc::new(GmgnProvider::new(
            GmgnConfig::from(&p.gmgn),
            config.probe.clone(),
            http.clone(),
        )));
    }
    if p.jupiter.enabled {
        providers.push(Arc::new(JupiterProvider::new(
            JupiterQuoteConfig::from(&p.jupiter),
            config.probe.clone(),
            http.clone(),
        )));
    }

    tracing::debug!("Built {} providers", providers.len());
    providers
}
