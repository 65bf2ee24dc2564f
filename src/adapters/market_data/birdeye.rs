//! Birdeye Provider
//!
//! Trending token list from Birdeye. Quota-constrained: the default interval
//! between requests is a full minute.
//!
//! Endpoint: `GET {api_url}/defi/token_trending` with `X-API-KEY`;
//! returns `{ "success": true, "data": { "tokens": [...] } }`

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::payload::{decode_records, lenient_f64, lenient_u64, normalize_all, RawProviderRecord};
use super::probe::ProbeTokens;
use crate::adapters::http::{HttpFetcher, ProviderRequest};
use crate::domain::candidate::{finite_or_zero, non_negative};
use crate::domain::{Candidate, ProviderSource, Socials, UNKNOWN_AGE};
use crate::ports::{ProviderError, SignalProvider};

pub const DEFAULT_BIRDEYE_API_URL: &str = "https://public-api.birdeye.so";

/// Birdeye adapter configuration
#[derive(Debug, Clone)]
pub struct BirdeyeConfig {
    pub api_url: String,
    pub api_key: Option<String>,
}

impl Default for BirdeyeConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_BIRDEYE_API_URL.to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TrendingResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    data: Option<TrendingData>,
}

#[derive(Debug, Deserialize)]
struct TrendingData {
    #[serde(default)]
    tokens: Option<Vec<Value>>,
}

/// One trending token
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirdeyeToken {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
    #[serde(default, alias = "price24hChangePercent", deserialize_with = "lenient_f64")]
    pub price_change_24h: Option<f64>,
    #[serde(default, alias = "volume24hUSD", deserialize_with = "lenient_f64")]
    pub volume_24h: Option<f64>,
    #[serde(default, alias = "marketcap", alias = "mc", deserialize_with = "lenient_f64")]
    pub market_cap: Option<f64>,
    #[serde(default, alias = "holder", deserialize_with = "lenient_u64")]
    pub holders: Option<u64>,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub telegram: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl BirdeyeToken {
    pub fn into_candidate(self) -> Option<Candidate> {
        let id = self.address.filter(|a| !a.is_empty())?;

        Some(Candidate {
            id,
            symbol: self.symbol.unwrap_or_default(),
            name: self.name,
            price_usd: non_negative(self.price.unwrap_or(0.0)),
            price_change_24h_pct: finite_or_zero(self.price_change_24h.unwrap_or(0.0)),
            volume_usd_24h: non_negative(self.volume_24h.unwrap_or(0.0)),
            market_cap_usd: non_negative(self.market_cap.unwrap_or(0.0)),
            holder_count: self.holders,
            age: self.age.unwrap_or_else(|| UNKNOWN_AGE.to_string()),
            source: ProviderSource::Birdeye,
            socials: Socials {
                twitter: self.twitter,
                telegram: self.telegram,
                website: self.website,
            },
        })
    }
}

/// Parse a trending response body into candidates
pub fn parse_trending_response(body: Value) -> Result<Vec<Candidate>, ProviderError> {
    let response: TrendingResponse = serde_json::from_value(body)
        .map_err(|e| ProviderError::Parse(format!("Birdeye trending: {}", e)))?;

    if response.success == Some(false) {
        return Err(ProviderError::Parse("Birdeye reported success=false".into()));
    }

    let items = response.data.and_then(|d| d.tokens).unwrap_or_default();
    let tokens: Vec<BirdeyeToken> = decode_records(ProviderSource::Birdeye, items);

    Ok(normalize_all(
        ProviderSource::Birdeye,
        tokens.into_iter().map(RawProviderRecord::Birdeye),
        &ProbeTokens::default(),
    ))
}

/// Birdeye trending tokens provider
#[derive(Debug, Clone)]
pub struct BirdeyeProvider {
    config: BirdeyeConfig,
    http: HttpFetcher,
}

impl BirdeyeProvider {
    pub fn new(config: BirdeyeConfig, http: HttpFetcher) -> Self {
        if config.api_key.is_none() {
            tracing::warn!("Birdeye API key not set; trending requests will likely be rejected");
        }
        Self { config, http }
    }
}

#[async_trait]
impl SignalProvider for BirdeyeProvider {
    fn source(&self) -> ProviderSource {
        ProviderSource::Birdeye
    }

    async fn fetch_candidates(&self) -> Result<Vec<Candidate>, ProviderError> {
        let mut request = ProviderRequest::get(
            ProviderSource::Birdeye,
            format!("{}/defi/token_trending", self.config.api_url.trim_end_matches('/')),
        )
        .header("x-chain", "solana");

        if let Some(ref key) = self.config.api_key {
            request = request.header("X-API-KEY", key.clone());
        }

        let body: Value = self.http.get_json(&request).await?;
        let candidates = parse_trending_response(body)?;
        tracing::debug!("Birdeye returned {} candidates", candidates.len());
        Ok(candidates)
    }
}
