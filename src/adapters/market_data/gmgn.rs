//! GMGN Provider
//!
//! GMGN exposes swap routes, not listings. One route is requested per probe
//! token (base mint in, probe token out) and each usable route becomes a
//! candidate priced from its amounts.
//!
//! Endpoint: `GET {api_url}/tx/get_swap_route?token_in_address=..&token_out_address=..`

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::payload::{lenient_f64, lenient_u64, normalize_all, RawProviderRecord};
use super::probe::{price_from_route_amounts, ProbeToken, ProbeTokens};
use crate::adapters::http::{HttpFetcher, ProviderRequest};
use crate::domain::candidate::non_negative;
use crate::domain::{Candidate, ProviderSource, Socials, UNKNOWN_AGE};
use crate::ports::{ProviderError, SignalProvider};

pub const DEFAULT_GMGN_API_URL: &str = "https://gmgn.ai/defi/router/v1/sol";

/// Placeholder wallet for quote-only route requests
pub const ROUTE_FROM_ADDRESS: &str = "11111111111111111111111111111112";

/// GMGN adapter configuration
#[derive(Debug, Clone)]
pub struct GmgnConfig {
    pub api_url: String,
    /// Input amount in lamports
    pub probe_amount: u64,
    /// Slippage percent
    pub slippage: f64,
}

impl Default for GmgnConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_GMGN_API_URL.to_string(),
            probe_amount: 1_000_000_000,
            slippage: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GmgnRouteData {
    #[serde(default)]
    pub token_out_address: Option<String>,
    #[serde(default)]
    pub out_token: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub in_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub out_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub volume_24h: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub market_cap: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub holders: Option<u64>,
}

/// A swap route response
#[derive(Debug, Clone, Deserialize)]
pub struct GmgnRoute {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Option<GmgnRouteData>,
}

impl GmgnRoute {
    pub fn into_candidate(self, probes: &ProbeTokens) -> Option<Candidate> {
        if self.success == Some(false) {
            return None;
        }
        let data = self.data?;
        let id = data
            .token_out_address
            .clone()
            .or_else(|| data.out_token.clone())
            .filter(|a| !a.is_empty())?;

        Some(Candidate {
            symbol: probes.symbol_for(&id),
            name: None,
            price_usd: non_negative(price_from_route_amounts(data.in_amount, data.out_amount)),
            price_change_24h_pct: 0.0,
            volume_usd_24h: non_negative(data.volume_24h.unwrap_or(0.0)),
            market_cap_usd: non_negative(data.market_cap.unwrap_or(0.0)),
            holder_count: data.holders,
            age: UNKNOWN_AGE.to_string(),
            source: ProviderSource::Gmgn,
            socials: Socials::default(),
            id,
        })
    }
}

/// GMGN swap-route provider
#[derive(Debug, Clone)]
pub struct GmgnProvider {
    config: GmgnConfig,
    probes: ProbeTokens,
    http: HttpFetcher,
}

impl GmgnProvider {
    pub fn new(config: GmgnConfig, probes: ProbeTokens, http: HttpFetcher) -> Self {
        Self { config, probes, http }
    }

    fn route_request(&self, token: &ProbeToken) -> ProviderRequest {
        ProviderRequest::get(
            ProviderSource::Gmgn,
            format!("{}/tx/get_swap_route", self.config.api_url.trim_end_matches('/')),
        )
        .query("token_in_address", self.probes.base_mint.clone())
        .query("token_out_address", token.mint.clone())
        .query("in_amount", self.config.probe_amount.to_string())
        .query("from_address", ROUTE_FROM_ADDRESS)
        .query("slippage", self.config.slippage.to_string())
    }

    async fn fetch_route(&self, token: &ProbeToken) -> Result<GmgnRoute, ProviderError> {
        let body: Value = self.http.get_json(&self.route_request(token)).await?;
        serde_json::from_value(body).map_err(|e| ProviderError::Parse(format!("GMGN route: {}", e)))
    }
}

#[async_trait]
impl SignalProvider for GmgnProvider {
    fn source(&self) -> ProviderSource {
        ProviderSource::Gmgn
    }

    async fn fetch_candidates(&self) -> Result<Vec<Candidate>, ProviderError> {
        let mut routes = Vec::with_capacity(self.probes.tokens.len());

        for token in &self.probes.tokens {
            match self.fetch_route(token).await {
                Ok(route) => routes.push(RawProviderRecord::Gmgn(route)),
                Err(e) => tracing::warn!("GMGN route for {} failed: {}", token.symbol, e),
            }
        }

        let candidates = normalize_all(ProviderSource::Gmgn, routes, &self.probes);
        tracing::debug!("GMGN returned {} candidates", candidates.len());
        Ok(candidates)
    }
}
