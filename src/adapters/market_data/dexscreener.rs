//! DexScreener Provider
//!
//! Searches DexScreener for trending pairs. The pair address is the identity
//! key. DexScreener does not report holders, so its candidates carry no
//! holder count.
//!
//! Endpoint: `GET {api_url}/search?q={query}`; returns `{ "pairs": [...] }`

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::payload::{decode_records, lenient_f64, lenient_u64, normalize_all, RawProviderRecord};
use super::probe::ProbeTokens;
use crate::adapters::http::{HttpFetcher, ProviderRequest};
use crate::domain::candidate::{finite_or_zero, non_negative};
use crate::domain::{Candidate, ProviderSource, Socials, UNKNOWN_AGE};
use crate::ports::{ProviderError, SignalProvider};

pub const DEFAULT_DEXSCREENER_API_URL: &str = "https://api.dexscreener.com/latest/dex";

/// DexScreener adapter configuration
#[derive(Debug, Clone)]
pub struct DexScreenerConfig {
    pub api_url: String,
    pub search_query: String,
    pub limit: u32,
}

impl Default for DexScreenerConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_DEXSCREENER_API_URL.to_string(),
            search_query: "solana".to_string(),
            limit: 50,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    pairs: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DexBaseToken {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

/// Windowed metric (`{ "h24": ... }`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DexWindow {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub h24: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DexLink {
    #[serde(default, rename = "type", alias = "platform")]
    pub kind: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DexPairInfo {
    #[serde(default)]
    pub websites: Option<Vec<DexLink>>,
    #[serde(default)]
    pub socials: Option<Vec<DexLink>>,
}

/// One pair from the search response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexScreenerPair {
    #[serde(default)]
    pub pair_address: Option<String>,
    #[serde(default)]
    pub base_token: DexBaseToken,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price_usd: Option<f64>,
    #[serde(default)]
    pub price_change: Option<DexWindow>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price_change_24h: Option<f64>,
    #[serde(default)]
    pub volume: Option<DexWindow>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub volume_usd: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub market_cap: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub fdv: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub holders: Option<u64>,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub info: Option<DexPairInfo>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub telegram: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl DexScreenerPair {
    pub fn into_candidate(self) -> Option<Candidate> {
        let id = self.pair_address.clone().filter(|a| !a.is_empty())?;
        let socials = self.socials();

        let price_change = self
            .price_change
            .and_then(|w| w.h24)
            .or(self.price_change_24h)
            .unwrap_or(0.0);
        let volume = self.volume.and_then(|w| w.h24).or(self.volume_usd).unwrap_or(0.0);
        let market_cap = self.market_cap.or(self.fdv).unwrap_or(0.0);

        Some(Candidate {
            id,
            symbol: self.base_token.symbol.unwrap_or_default(),
            name: self.base_token.name,
            price_usd: non_negative(self.price_usd.unwrap_or(0.0)),
            price_change_24h_pct: finite_or_zero(price_change),
            volume_usd_24h: non_negative(volume),
            market_cap_usd: non_negative(market_cap),
            holder_count: self.holders,
            age: self.age.unwrap_or_else(|| UNKNOWN_AGE.to_string()),
            source: ProviderSource::DexScreener,
            socials,
        })
    }

    fn socials(&self) -> Socials {
        let info = self.info.as_ref();
        let social = |kind: &str| {
            info.and_then(|i| {
                i.socials
                    .iter()
                    .flatten()
                    .find(|s| s.kind.as_deref() == Some(kind))
                    .and_then(|s| s.url.clone())
            })
        };

        Socials {
            twitter: self.twitter.clone().or_else(|| social("twitter")),
            telegram: self.telegram.clone().or_else(|| social("telegram")),
            website: self
                .website
                .clone()
                .or_else(|| info.and_then(|i| i.websites.as_ref()).and_then(|w| w.first()).and_then(|w| w.url.clone())),
        }
    }
}

/// Parse a search response body into candidates
pub fn parse_search_response(body: Value) -> Result<Vec<Candidate>, ProviderError> {
    let response: SearchResponse = serde_json::from_value(body)
        .map_err(|e| ProviderError::Parse(format!("DexScreener search: {}", e)))?;

    let pairs: Vec<DexScreenerPair> =
        decode_records(ProviderSource::DexScreener, response.pairs.unwrap_or_default());

    Ok(normalize_all(
        ProviderSource::DexScreener,
        pairs.into_iter().map(RawProviderRecord::DexScreener),
        &ProbeTokens::default(),
    ))
}

/// DexScreener search provider
#[derive(Debug, Clone)]
pub struct DexScreenerProvider {
    config: DexScreenerConfig,
    http: HttpFetcher,
}

impl DexScreenerProvider {
    pub fn new(config: DexScreenerConfig, http: HttpFetcher) -> Self {
        Self { config, http }
    }
}

#[async_trait]
impl SignalProvider for DexScreenerProvider {
    fn source(&self) -> ProviderSource {
        ProviderSource::DexScreener
    }

    async fn fetch_candidates(&self) -> Result<Vec<Candidate>, ProviderError> {
        let request = ProviderRequest::get(
            ProviderSource::DexScreener,
            format!("{}/search", self.config.api_url.trim_end_matches('/')),
        )
        .query("q", self.config.search_query.clone())
        .query("limit", self.config.limit.to_string());

        let body: Value = self.http.get_json(&request).await?;
        let candidates = parse_search_response(body)?;
        tracing::debug!("DexScreener returned {} candidates", candidates.len());
        Ok(candidates)
    }
}
