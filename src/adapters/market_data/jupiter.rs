//! Jupiter Provider
//!
//! Jupiter quotes the base mint against each probe token. The quote amounts
//! give a price; the USD value of the swap stands in for volume.
//!
//! Endpoint: `GET {api_url}/quote?inputMint=..&outputMint=..&amount=..&slippageBps=..`

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::payload::{lenient_f64, normalize_all, RawProviderRecord};
use super::probe::{price_from_route_amounts, ProbeToken, ProbeTokens};
use crate::adapters::http::{HttpFetcher, ProviderRequest};
use crate::domain::candidate::non_negative;
use crate::domain::{Candidate, ProviderSource, Socials, UNKNOWN_AGE};
use crate::ports::{ProviderError, SignalProvider};

pub const DEFAULT_JUPITER_API_URL: &str = "https://api.jup.ag/swap/v1";

/// Quote USD value is scaled by this to approximate daily volume
const VOLUME_FROM_SWAP_VALUE: f64 = 1_000.0;

/// Jupiter adapter configuration
#[derive(Debug, Clone)]
pub struct JupiterQuoteConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    /// Input amount in lamports
    pub probe_amount: u64,
    pub slippage_bps: u16,
}

impl Default for JupiterQuoteConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_JUPITER_API_URL.to_string(),
            api_key: None,
            probe_amount: 1_000_000_000,
            slippage_bps: 50,
        }
    }
}

/// A quote response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JupiterQuote {
    #[serde(default)]
    pub input_mint: Option<String>,
    #[serde(default)]
    pub output_mint: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub in_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub out_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub swap_usd_value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price_impact_pct: Option<f64>,
}

impl JupiterQuote {
    pub fn into_candidate(self, probes: &ProbeTokens) -> Option<Candidate> {
        self.input_mint.as_ref().filter(|m| !m.is_empty())?;
        let id = self.output_mint.filter(|m| !m.is_empty())?;

        Some(Candidate {
            symbol: probes.symbol_for(&id),
            name: None,
            price_usd: non_negative(price_from_route_amounts(self.in_amount, self.out_amount)),
            price_change_24h_pct: 0.0,
            volume_usd_24h: non_negative(self.swap_usd_value.map_or(0.0, |v| v * VOLUME_FROM_SWAP_VALUE)),
            market_cap_usd: 0.0,
            holder_count: None,
            age: UNKNOWN_AGE.to_string(),
            source: ProviderSource::Jupiter,
            socials: Socials::default(),
            id,
        })
    }
}

/// Jupiter quote provider
#[derive(Debug, Clone)]
pub struct JupiterProvider {
    config: JupiterQuoteConfig,
    probes: ProbeTokens,
    http: HttpFetcher,
}

impl JupiterProvider {
    pub fn new(config: JupiterQuoteConfig, probes: ProbeTokens, http: HttpFetcher) -> Self {
        Self { config, probes, http }
    }

    fn quote_request(&self, token: &ProbeToken) -> ProviderRequest {
        let mut request = ProviderRequest::get(
            ProviderSource::Jupiter,
            format!("{}/quote", self.config.api_url.trim_end_matches('/')),
        )
        .query("inputMint", self.probes.base_mint.clone())
        .query("outputMint", token.mint.clone())
        .query("amount", self.config.probe_amount.to_string())
        .query("slippageBps", self.config.slippage_bps.to_string());

        if let Some(ref key) = self.config.api_key {
            request = request.header("x-api-key", key.clone());
        }
        request
    }

    async fn fetch_quote(&self, token: &ProbeToken) -> Result<JupiterQuote, ProviderError> {
        let body: Value = self.http.get_json(&self.quote_request(token)).await?;
        serde_json::from_value(body).map_err(|e| ProviderError::Parse(format!("Jupiter quote: {}", e)))
    }
}

#[async_trait]
impl SignalProvider for JupiterProvider {
    fn source(&self) -> ProviderSource {
        ProviderSource::Jupiter
    }

    async fn fetch_candidates(&self) -> Result<Vec<Candidate>, ProviderError> {
        let mut quotes = Vec::with_capacity(self.probes.tokens.len());

        for token in &self.probes.tokens {
            match self.fetch_quote(token).await {
                Ok(quote) => quotes.push(RawProviderRecord::Jupiter(quote)),
                Err(e) => tracing::warn!("Jupiter quote for {} failed: {}", token.symbol, e),
            }
        }

        let candidates = normalize_all(ProviderSource::Jupiter, quotes, &self.probes);
        tracing::debug!("Jupiter returned {} candidates", candidates.len());
        Ok(candidates)
    }
}
