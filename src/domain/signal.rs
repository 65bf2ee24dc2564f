use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::candidate::{Candidate, ProviderSource, Socials};

/// Composite scores above this mark a signal premium
pub const PREMIUM_SCORE_THRESHOLD: u32 = 75;

/// Market caps below this mark a signal premium regardless of score
pub const PREMIUM_MARKET_CAP_USD: f64 = 500_000.0;

/// Ordinal risk level derived from the risk penalty
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    /// Map a risk penalty onto a level (strict cut points at 10, 7, 4)
    pub fn from_risk_score(risk: u32) -> Self {
        if risk > 10 {
            RiskLevel::VeryHigh
        } else if risk > 7 {
            RiskLevel::High
        } else if risk > 4 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
            RiskLevel::VeryHigh => write!(f, "Very High"),
        }
    }
}

/// Bounded sub-scores and their clamped total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignalScore {
    /// 0-100
    pub total: u32,
    /// 0-25
    pub volume: u32,
    /// 0-25
    pub momentum: u32,
    /// 0-35 (holders plus market cap bonus)
    pub technical: u32,
    /// 0-15 penalty
    pub risk: u32,
}

/// Output of scoring one candidate, before it is stamped into a signal
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignalAnalysis {
    pub score: SignalScore,
    pub patterns: Vec<String>,
    pub risk_factors: Vec<String>,
    pub opportunities: Vec<String>,
    pub confidence: f64,
}

/// Scored, ranked output unit handed to downstream consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredSignal {
    pub id: String,
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub price_usd: f64,
    pub price_change_24h_pct: f64,
    pub volume_usd_24h: f64,
    pub market_cap_usd: f64,
    pub holder_count: Option<u64>,
    pub age: String,
    pub source: ProviderSource,
    pub score: SignalScore,
    pub risk_level: RiskLevel,
    pub is_premium: bool,
    pub patterns: Vec<String>,
    pub risk_factors: Vec<String>,
    pub opportunities: Vec<String>,
    pub confidence: f64,
    /// Patterns joined into one sentence list
    pub analysis: String,
    #[serde(default)]
    pub socials: Socials,
    pub chart_url: String,
    pub bubble_map_url: String,
    pub timestamp: DateTime<Utc>,
}

impl ScoredSignal {
    /// Stamp a candidate with its analysis
    pub fn new(candidate: Candidate, analysis: SignalAnalysis, timestamp: DateTime<Utc>) -> Self {
        let SignalAnalysis {
            score,
            patterns,
            risk_factors,
            opportunities,
            confidence,
        } = analysis;

        let is_premium = score.total > PREMIUM_SCORE_THRESHOLD
            || candidate.market_cap_usd < PREMIUM_MARKET_CAP_USD;

        Self {
            chart_url: format!("https://dexscreener.com/solana/{}", candidate.id),
            bubble_map_url: format!("https://bubblemaps.io/solana/{}", candidate.id),
            analysis: patterns.join(". "),
            id: candidate.id,
            symbol: candidate.symbol,
            name: candidate.name,
            price_usd: candidate.price_usd,
            price_change_24h_pct: candidate.price_change_24h_pct,
            volume_usd_24h: candidate.volume_usd_24h,
            market_cap_usd: candidate.market_cap_usd,
            holder_count: candidate.holder_count,
            age: candidate.age,
            source: candidate.source,
            risk_level: RiskLevel::from_risk_score(score.risk),
            score,
            is_premium,
            patterns,
            risk_factors,
            opportunities,
            confidence,
            socials: candidate.socials,
            timestamp,
        }
    }
}
