//! Normalized candidate records
//!
//! Every provider adapter maps its own payload into a [`Candidate`]. Fields a
//! provider cannot supply stay at their zero/empty sentinel.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Age sentinel used when a provider does not report token age
pub const UNKNOWN_AGE: &str = "Unknown";

/// Market data source a candidate was taken from.
///
/// Declaration order is the merge priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderSource {
    DexScreener,
    Birdeye,
    Gmgn,
    Jupiter,
}

impl ProviderSource {
    /// All providers in merge priority order
    pub const ALL: [ProviderSource; 4] = [
        ProviderSource::DexScreener,
        ProviderSource::Birdeye,
        ProviderSource::Gmgn,
        ProviderSource::Jupiter,
    ];

    /// Position in the merge priority order (0 = highest)
    pub fn priority(&self) -> usize {
        match self {
            ProviderSource::DexScreener => 0,
            ProviderSource::Birdeye => 1,
            ProviderSource::Gmgn => 2,
            ProviderSource::Jupiter => 3,
        }
    }

    /// Config key for this provider
    pub fn key(&self) -> &'static str {
        match self {
            ProviderSource::DexScreener => "dexscreener",
            ProviderSource::Birdeye => "birdeye",
            ProviderSource::Gmgn => "gmgn",
            ProviderSource::Jupiter => "jupiter",
        }
    }
}

impl fmt::Display for ProviderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderSource::DexScreener => write!(f, "DexScreener"),
            ProviderSource::Birdeye => write!(f, "Birdeye"),
            ProviderSource::Gmgn => write!(f, "GMGN"),
            ProviderSource::Jupiter => write!(f, "Jupiter"),
        }
    }
}

/// Social links reported by a provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Socials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

impl Socials {
    pub fn is_empty(&self) -> bool {
        self.twitter.is_none() && self.telegram.is_none() && self.website.is_none()
    }
}

/// Normalized, pre-score asset record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Identity key (token mint or pair address)
    pub id: String,
    pub symbol: String,
    pub name: Option<String>,
    pub price_usd: f64,
    /// Signed 24h price change in percent
    pub price_change_24h_pct: f64,
    pub volume_usd_24h: f64,
    pub market_cap_usd: f64,
    pub holder_count: Option<u64>,
    pub age: String,
    pub source: ProviderSource,
    #[serde(default)]
    pub socials: Socials,
}

impl Candidate {
    /// Create a candidate with every optional metric at its sentinel
    pub fn new(id: impl Into<String>, symbol: impl Into<String>, source: ProviderSource) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: None,
            price_usd: 0.0,
            price_change_24h_pct: 0.0,
            volume_usd_24h: 0.0,
            market_cap_usd: 0.0,
            holder_count: None,
            age: UNKNOWN_AGE.to_string(),
            source,
            socials: Socials::default(),
        }
    }

    pub fn with_price(mut self, price_usd: f64) -> Self {
        self.price_usd = price_usd;
        self
    }

    pub fn with_price_change(mut self, pct: f64) -> Self {
        self.price_change_24h_pct = pct;
        self
    }

    pub fn with_volume(mut self, volume_usd_24h: f64) -> Self {
        self.volume_usd_24h = volume_usd_24h;
        self
    }

    pub fn with_market_cap(mut self, market_cap_usd: f64) -> Self {
        self.market_cap_usd = market_cap_usd;
        self
    }

    pub fn with_holders(mut self, holders: u64) -> Self {
        self.holder_count = Some(holders);
        self
    }

    /// Holder count with the missing case read as zero (fails every holder threshold)
    pub fn holders(&self) -> u64 {
        self.holder_count.unwrap_or(0)
    }

    /// 24h volume as a fraction of market cap.
    ///
    /// A zero cap yields infinity when there is volume and zero when there is none.
    pub fn volume_to_market_cap(&self) -> f64 {
        if self.market_cap_usd > 0.0 {
            self.volume_usd_24h / self.market_cap_usd
        } else if self.volume_usd_24h > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    }
}

/// Clamp provider numbers to a finite, non-negative value
pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Keep signed provider numbers finite
pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_candidate_uses_sentinels() {
        let c = Candidate::new("mint1", "TEST", ProviderSource::Birdeye);
        assert_eq!(c.age, UNKNOWN_AGE);
        assert_eq!(c.holder_count, None);
        assert_eq!(c.holders(), 0);
        assert_eq!(c.market_cap_usd, 0.0);
        assert!(c.socials.is_empty());
    }

    #[test]
    fn test_priority_matches_declaration_order() {
        for (idx, source) in ProviderSource::ALL.iter().enumerate() {
            assert_eq!(source.priority(), idx);
        }
        assert!(ProviderSource::DexScreener < ProviderSource::Jupiter);
    }

    #[test]
    fn test_volume_ratio_zero_market_cap() {
        let c = Candidate::new("a", "A", ProviderSource::Jupiter).with_volume(1_000.0);
        assert!(c.volume_to_market_cap().is_infinite());

        let empty = Candidate::new("b", "B", ProviderSource::Jupiter);
        assert_eq!(empty.volume_to_market_cap(), 0.0);
    }

    #[test]
    fn test_sanitizers() {
        assert_eq!(non_negative(-3.0), 0.0);
        assert_eq!(non_negative(f64::NAN), 0.0);
        assert_eq!(non_negative(12.5), 12.5);
        assert_eq!(finite_or_zero(-7.5), -7.5);
        assert_eq!(finite_or_zero(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_source_display_and_key() {
        assert_eq!(ProviderSource::Gmgn.to_string(), "GMGN");
        assert_eq!(ProviderSource::DexScreener.key(), "dexscreener");
    }
}
