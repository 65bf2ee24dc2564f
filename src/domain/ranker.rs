//! Ranking and market overview views over scored signals

use serde::{Deserialize, Serialize};

use super::signal::ScoredSignal;

/// Default number of signals kept after ranking
pub const DEFAULT_TOP_K: usize = 20;

/// Entries per market overview section
pub const OVERVIEW_SECTION_SIZE: usize = 5;

/// Momentum sub-scores above this count as hot
pub const HOT_MOMENTUM_SCORE: u32 = 20;

/// Absolute 24h change above this counts as trending
pub const TRENDING_PRICE_CHANGE_PCT: f64 = 10.0;

/// Market caps below this count as low cap
pub const LOW_CAP_MARKET_CAP_USD: f64 = 1_000_000.0;

/// Sort by total score descending and keep the top `top_k`.
///
/// The sort is stable: equal totals keep their merge order.
pub fn rank(mut signals: Vec<ScoredSignal>, top_k: usize) -> Vec<ScoredSignal> {
    signals.sort_by(|a, b| b.score.total.cmp(&a.score.total));
    signals.truncate(top_k);
    signals
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MomentumEntry {
    pub symbol: String,
    pub momentum: u32,
    pub price_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeEntry {
    pub symbol: String,
    pub volume: f64,
    pub price_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumEntry {
    pub symbol: String,
    pub score: u32,
    pub market_cap: f64,
}

/// Slices of one ranked signal list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOverview {
    pub hot_signals: Vec<MomentumEntry>,
    pub volume_leaders: Vec<VolumeEntry>,
    pub premium_picks: Vec<PremiumEntry>,
    pub trending: Vec<MomentumEntry>,
}

impl MarketOverview {
    /// Build the overview from a ranked list. The input is never re-ordered;
    /// each section filters or sorts its own view.
    pub fn from_signals(signals: &[ScoredSignal]) -> Self {
        let momentum_entry = |s: &ScoredSignal| MomentumEntry {
            symbol: s.symbol.clone(),
            momentum: s.score.momentum,
            price_change: s.price_change_24h_pct,
        };

        let hot_signals = signals
            .iter()
            .filter(|s| s.score.momentum > HOT_MOMENTUM_SCORE)
            .take(OVERVIEW_SECTION_SIZE)
            .map(momentum_entry)
            .collect();

        let mut by_volume: Vec<&ScoredSignal> = signals.iter().collect();
        by_volume.sort_by(|a, b| b.volume_usd_24h.total_cmp(&a.volume_usd_24h));
        let volume_leaders = by_volume
            .into_iter()
            .take(OVERVIEW_SECTION_SIZE)
            .map(|s| VolumeEntry {
                symbol: s.symbol.clone(),
                volume: s.volume_usd_24h,
                price_change: s.price_change_24h_pct,
            })
            .collect();

        let premium_picks = signals
            .iter()
            .filter(|s| s.is_premium)
            .take(OVERVIEW_SECTION_SIZE)
            .map(|s| PremiumEntry {
                symbol: s.symbol.clone(),
                score: s.score.total,
                market_cap: s.market_cap_usd,
            })
            .collect();

        let trending = signals
            .iter()
            .filter(|s| s.price_change_24h_pct.abs() > TRENDING_PRICE_CHANGE_PCT)
            .take(OVERVIEW_SECTION_SIZE)
            .map(momentum_entry)
            .collect();

        Self {
            hot_signals,
            volume_leaders,
            premium_picks,
            trending,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hot_signals.is_empty()
            && self.volume_leaders.is_empty()
            && self.premium_picks.is_empty()
            && self.trending.is_empty()
    }
}

/// Signals under the low-cap market cap ceiling, order preserved
pub fn low_cap(signals: Vec<ScoredSignal>) -> Vec<ScoredSignal> {
    signals
        .into_iter()
        .filter(|s| s.market_cap_usd < LOW_CAP_MARKET_CAP_USD)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::candidate::{Candidate, ProviderSource};
    use crate::domain::signal::{SignalAnalysis, SignalScore};
    use chrono::Utc;

    fn signal(id: &str, total: u32, momentum: u32, volume: f64, change: f64, cap: f64) -> ScoredSignal {
        let candidate = Candidate::new(id, id.to_uppercase(), ProviderSource::Birdeye)
            .with_volume(volume)
            .with_price_change(change)
            .with_market_cap(cap);
        let analysis = SignalAnalysis {
            score: SignalScore {
                total,
                momentum,
                ..Default::default()
            },
            confidence: 50.0,
            ..Default::default()
        };
        ScoredSignal::new(candidate, analysis, Utc::now())
    }

    #[test]
    fn test_rank_sorts_descending_and_truncates() {
        let signals = vec![
            signal("a", 10, 5, 1.0, 0.0, 2e6),
            signal("b", 50, 5, 1.0, 0.0, 2e6),
            signal("c", 30, 5, 1.0, 0.0, 2e6),
        ];
        let ranked = rank(signals, 2);
        let ids: Vec<&str> = ranked.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_rank_ties_keep_input_order() {
        let signals = vec![
            signal("first", 40, 5, 1.0, 0.0, 2e6),
            signal("top", 60, 5, 1.0, 0.0, 2e6),
            signal("second", 40, 5, 1.0, 0.0, 2e6),
            signal("third", 40, 5, 1.0, 0.0, 2e6),
        ];
        for _ in 0..3 {
            let ranked = rank(signals.clone(), DEFAULT_TOP_K);
            let ids: Vec<&str> = ranked.iter().map(|s| s.id.as_str()).collect();
            assert_eq!(ids, vec!["top", "first", "second", "third"]);
        }
    }

    #[test]
    fn test_overview_sections() {
        let signals = vec![
            signal("hot", 80, 25, 100.0, 60.0, 2e6),
            signal("whale", 60, 15, 9_000.0, 12.0, 3e6),
            signal("small", 40, 5, 50.0, 2.0, 100_000.0),
        ];
        let overview = MarketOverview::from_signals(&signals);

        assert_eq!(overview.hot_signals.len(), 1);
        assert_eq!(overview.hot_signals[0].symbol, "HOT");

        assert_eq!(overview.volume_leaders[0].symbol, "WHALE");
        assert_eq!(overview.volume_leaders[2].symbol, "SMALL");

        let premium: Vec<&str> = overview.premium_picks.iter().map(|p| p.symbol.as_str()).collect();
        assert_eq!(premium, vec!["HOT", "SMALL"]);

        let trending: Vec<&str> = overview.trending.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(trending, vec!["HOT", "WHALE"]);
    }

    #[test]
    fn test_overview_sections_capped_at_five() {
        let signals: Vec<ScoredSignal> = (0..8)
            .map(|i| signal(&format!("s{}", i), 90, 25, i as f64, 40.0, 100_000.0))
            .collect();
        let overview = MarketOverview::from_signals(&signals);
        assert_eq!(overview.hot_signals.len(), OVERVIEW_SECTION_SIZE);
        assert_eq!(overview.volume_leaders.len(), OVERVIEW_SECTION_SIZE);
        assert_eq!(overview.premium_picks.len(), OVERVIEW_SECTION_SIZE);
        assert_eq!(overview.trending.len(), OVERVIEW_SECTION_SIZE);
        assert_eq!(overview.volume_leaders[0].symbol, "S7");
    }

    #[test]
    fn test_overview_slices_follow_score_order() {
        // ranked by score, volume ascending
        let signals: Vec<ScoredSignal> = (0..7)
            .map(|i| signal(&format!("s{}", i), 90 - i, 25, i as f64, 40.0, 100_000.0))
            .collect();
        let overview = MarketOverview::from_signals(&signals);

        let volume: Vec<&str> = overview.volume_leaders.iter().map(|v| v.symbol.as_str()).collect();
        assert_eq!(volume, vec!["S6", "S5", "S4", "S3", "S2"]);

        let premium: Vec<&str> = overview.premium_picks.iter().map(|p| p.symbol.as_str()).collect();
        assert_eq!(premium, vec!["S0", "S1", "S2", "S3", "S4"]);

        let trending: Vec<&str> = overview.trending.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(trending, vec!["S0", "S1", "S2", "S3", "S4"]);

        assert_eq!(signals[0].id, "s0");
    }

    #[test]
    fn test_empty_overview() {
        let overview = MarketOverview::from_signals(&[]);
        assert!(overview.is_empty());
    }

    #[test]
    fn test_low_cap_filter() {
        let signals = vec![
            signal("big", 10, 5, 1.0, 0.0, 1_000_000.0),
            signal("tiny", 10, 5, 1.0, 0.0, 999_999.0),
        ];
        let out = low_cap(signals);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "tiny");
    }
}
