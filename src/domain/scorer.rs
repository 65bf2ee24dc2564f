//! Candidate Scorer
//!
//! Pure, per-candidate composite scoring. No cross-candidate normalization,
//! no clock access; the same candidate always yields the same analysis.
//!
//! Every cut point is a strict `>` / `<` comparison evaluated from the
//! highest tier down, first match wins. Only the final clamp is inclusive.

use chrono::{DateTime, Utc};

use super::candidate::Candidate;
use super::signal::{ScoredSignal, SignalAnalysis, SignalScore};

pub const MAX_TOTAL_SCORE: u32 = 100;
pub const MAX_CONFIDENCE: f64 = 95.0;
pub const BASE_CONFIDENCE: f64 = 50.0;
pub const CONFIDENCE_PER_POINT: f64 = 0.45;

pub const PATTERN_EXTREME_VOLUME: &str = "Extremely high volume relative to market cap";
pub const PATTERN_HIGH_VOLUME: &str = "High volume relative to market cap";
pub const PATTERN_MODERATE_VOLUME: &str = "Moderate volume activity";
pub const PATTERN_EXTREME_MOVE: &str = "Extreme price movement detected";
pub const PATTERN_STRONG_MOMENTUM: &str = "Strong price momentum";
pub const PATTERN_MODERATE_MOVE: &str = "Moderate price movement";
pub const PATTERN_LARGE_HOLDER_BASE: &str = "Large holder base indicates community interest";
pub const PATTERN_GOOD_DISTRIBUTION: &str = "Good holder distribution";
pub const PATTERN_ULTRA_LOW_CAP: &str = "Ultra low market cap - high growth potential";
pub const PATTERN_LOW_CAP: &str = "Low market cap opportunity";

pub const OPPORTUNITY_TRADING_ACTIVITY: &str = "Strong trading activity indicates high interest";
pub const OPPORTUNITY_UPWARD_MOMENTUM: &str = "Strong upward momentum";
pub const OPPORTUNITY_EARLY_STAGE: &str = "Early stage token with room for growth";

pub const RISK_LOW_LIQUIDITY: &str = "Low volume may indicate low liquidity";
pub const RISK_SHARP_DECLINE: &str = "Sharp decline - potential reversal opportunity";
pub const RISK_HOLDER_CONCENTRATION: &str = "Low holder count may indicate concentration risk";
pub const RISK_VERY_LOW_CAP: &str = "Very low market cap - extremely high risk";
pub const RISK_LOW_CAP: &str = "Low market cap - high risk, high reward";

#[derive(Default)]
struct Tags {
    patterns: Vec<String>,
    risk_factors: Vec<String>,
    opportunities: Vec<String>,
}

impl Tags {
    fn pattern(&mut self, tag: &str) {
        self.patterns.push(tag.to_string());
    }

    fn risk(&mut self, tag: &str) {
        self.risk_factors.push(tag.to_string());
    }

    fn opportunity(&mut self, tag: &str) {
        self.opportunities.push(tag.to_string());
    }
}

/// Score one candidate
pub fn analyze(candidate: &Candidate) -> SignalAnalysis {
    let mut tags = Tags::default();

    let volume = volume_score(candidate, &mut tags);
    let momentum = momentum_score(candidate, &mut tags);
    let technical = holder_score(candidate, &mut tags) + market_cap_bonus(candidate, &mut tags);
    let risk = risk_penalty(candidate, &mut tags);

    let raw = volume as i64 + momentum as i64 + technical as i64 - risk as i64;
    let total = raw.clamp(0, MAX_TOTAL_SCORE as i64) as u32;

    SignalAnalysis {
        score: SignalScore {
            total,
            volume,
            momentum,
            technical,
            risk,
        },
        patterns: tags.patterns,
        risk_factors: tags.risk_factors,
        opportunities: tags.opportunities,
        confidence: confidence_for(total),
    }
}

/// Score a candidate and stamp it into a signal
pub fn score_candidate(candidate: Candidate, timestamp: DateTime<Utc>) -> ScoredSignal {
    let analysis = analyze(&candidate);
    ScoredSignal::new(candidate, analysis, timestamp)
}

/// Confidence in [50, 95] rising linearly with the total score
pub fn confidence_for(total: u32) -> f64 {
    (BASE_CONFIDENCE + total as f64 * CONFIDENCE_PER_POINT).min(MAX_CONFIDENCE)
}

fn volume_score(candidate: &Candidate, tags: &mut Tags) -> u32 {
    let ratio = candidate.volume_to_market_cap();
    if ratio > 0.5 {
        tags.pattern(PATTERN_EXTREME_VOLUME);
        tags.opportunity(OPPORTUNITY_TRADING_ACTIVITY);
        25
    } else if ratio > 0.2 {
        tags.pattern(PATTERN_HIGH_VOLUME);
        20
    } else if ratio > 0.1 {
        tags.pattern(PATTERN_MODERATE_VOLUME);
        15
    } else {
        tags.risk(RISK_LOW_LIQUIDITY);
        5
    }
}

fn momentum_score(candidate: &Candidate, tags: &mut Tags) -> u32 {
    let change = candidate.price_change_24h_pct;
    let magnitude = change.abs();
    if magnitude > 50.0 {
        tags.pattern(PATTERN_EXTREME_MOVE);
        if change > 0.0 {
            tags.opportunity(OPPORTUNITY_UPWARD_MOMENTUM);
        } else {
            tags.risk(RISK_SHARP_DECLINE);
        }
        25
    } else if magnitude > 25.0 {
        tags.pattern(PATTERN_STRONG_MOMENTUM);
        20
    } else if magnitude > 10.0 {
        tags.pattern(PATTERN_MODERATE_MOVE);
        15
    } else {
        5
    }
}

fn holder_score(candidate: &Candidate, tags: &mut Tags) -> u32 {
    let holders = candidate.holders();
    if holders > 1000 {
        tags.pattern(PATTERN_LARGE_HOLDER_BASE);
        20
    } else if holders > 500 {
        tags.pattern(PATTERN_GOOD_DISTRIBUTION);
        15
    } else if holders > 200 {
        10
    } else {
        tags.risk(RISK_HOLDER_CONCENTRATION);
        5
    }
}

fn market_cap_bonus(candidate: &Candidate, tags: &mut Tags) -> u32 {
    let cap = candidate.market_cap_usd;
    if cap < 100_000.0 {
        tags.pattern(PATTERN_ULTRA_LOW_CAP);
        tags.opportunity(OPPORTUNITY_EARLY_STAGE);
        15
    } else if cap < 500_000.0 {
        tags.pattern(PATTERN_LOW_CAP);
        12
    } else if cap < 1_000_000.0 {
        8
    } else {
        0
    }
}

fn risk_penalty(candidate: &Candidate, tags: &mut Tags) -> u32 {
    let cap = candidate.market_cap_usd;
    if cap < 50_000.0 {
        tags.risk(RISK_VERY_LOW_CAP);
        15
    } else if cap < 200_000.0 {
        tags.risk(RISK_LOW_CAP);
        10
    } else if cap < 1_000_000.0 {
        5
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::candidate::ProviderSource;
    use crate::domain::signal::RiskLevel;
    use approx::assert_relative_eq;

    fn candidate() -> Candidate {
        Candidate::new("mint", "TEST", ProviderSource::Birdeye)
            .with_market_cap(2_000_000.0)
            .with_volume(100_000.0)
            .with_price_change(5.0)
            .with_holders(150)
    }

    #[test]
    fn test_volume_ratio_tiers() {
        let c = candidate().with_market_cap(1_000_000.0).with_volume(600_000.0);
        let a = analyze(&c);
        assert_eq!(a.score.volume, 25);
        assert!(a.patterns.contains(&PATTERN_EXTREME_VOLUME.to_string()));
        assert!(a.opportunities.contains(&OPPORTUNITY_TRADING_ACTIVITY.to_string()));

        // exact cut points fall through to the next tier
        let c = candidate().with_market_cap(1_000_000.0).with_volume(500_000.0);
        assert_eq!(analyze(&c).score.volume, 20);
        let c = candidate().with_market_cap(1_000_000.0).with_volume(200_000.0);
        assert_eq!(analyze(&c).score.volume, 15);
        let c = candidate().with_market_cap(1_000_000.0).with_volume(100_000.0);
        let a = analyze(&c);
        assert_eq!(a.score.volume, 5);
        assert!(a.risk_factors.contains(&RISK_LOW_LIQUIDITY.to_string()));
    }

    #[test]
    fn test_momentum_direction_tags() {
        let up = analyze(&candidate().with_price_change(60.0));
        assert_eq!(up.score.momentum, 25);
        assert!(up.patterns.contains(&PATTERN_EXTREME_MOVE.to_string()));
        assert!(up.opportunities.contains(&OPPORTUNITY_UPWARD_MOMENTUM.to_string()));
        assert!(!up.risk_factors.contains(&RISK_SHARP_DECLINE.to_string()));

        let down = analyze(&candidate().with_price_change(-60.0));
        assert_eq!(down.score.momentum, 25);
        assert!(down.risk_factors.contains(&RISK_SHARP_DECLINE.to_string()));
        assert!(!down.opportunities.contains(&OPPORTUNITY_UPWARD_MOMENTUM.to_string()));
    }

    #[test]
    fn test_momentum_tiers() {
        assert_eq!(analyze(&candidate().with_price_change(50.0)).score.momentum, 20);
        assert_eq!(analyze(&candidate().with_price_change(-30.0)).score.momentum, 20);
        assert_eq!(analyze(&candidate().with_price_change(25.0)).score.momentum, 15);
        assert_eq!(analyze(&candidate().with_price_change(10.0)).score.momentum, 5);
    }

    #[test]
    fn test_technical_is_holders_plus_cap_bonus() {
        let c = candidate().with_holders(1_001).with_market_cap(90_000.0);
        assert_eq!(analyze(&c).score.technical, 35);

        let c = candidate().with_holders(600).with_market_cap(300_000.0);
        assert_eq!(analyze(&c).score.technical, 27);

        let c = candidate().with_holders(201).with_market_cap(700_000.0);
        assert_eq!(analyze(&c).score.technical, 18);

        let c = candidate().with_holders(200).with_market_cap(1_000_000.0);
        let a = analyze(&c);
        assert_eq!(a.score.technical, 5);
        assert!(a.risk_factors.contains(&RISK_HOLDER_CONCENTRATION.to_string()));
    }

    #[test]
    fn test_missing_holders_scores_lowest_tier() {
        let mut c = candidate();
        c.holder_count = None;
        assert_eq!(analyze(&c).score.technical, 5);
    }

    #[test]
    fn test_risk_penalty_and_level() {
        let a = analyze(&candidate().with_market_cap(40_000.0));
        assert_eq!(a.score.risk, 15);
        assert_eq!(RiskLevel::from_risk_score(a.score.risk), RiskLevel::VeryHigh);
        assert!(a.risk_factors.contains(&RISK_VERY_LOW_CAP.to_string()));

        assert_eq!(analyze(&candidate().with_market_cap(50_000.0)).score.risk, 10);
        assert_eq!(analyze(&candidate().with_market_cap(200_000.0)).score.risk, 5);
        assert_eq!(analyze(&candidate().with_market_cap(1_000_000.0)).score.risk, 0);
    }

    #[test]
    fn test_total_is_sum_minus_risk() {
        // volume 25, momentum 25, technical 20 + 8, risk 5
        let c = Candidate::new("m", "T", ProviderSource::Birdeye)
            .with_market_cap(900_000.0)
            .with_volume(900_000.0)
            .with_price_change(80.0)
            .with_holders(5_000);
        let a = analyze(&c);
        assert_eq!(a.score.total, 25 + 25 + 28 - 5);
        assert_relative_eq!(a.confidence, 50.0 + 73.0 * 0.45, epsilon = 1e-9);
    }

    #[test]
    fn test_total_and_confidence_bounds() {
        let caps = [0.0, 10_000.0, 49_999.0, 150_000.0, 750_000.0, 5_000_000.0];
        let volumes = [0.0, 1_000.0, 250_000.0, 10_000_000.0];
        let changes = [-90.0, -20.0, 0.0, 12.0, 300.0];
        let holders = [0, 250, 700, 50_000];

        for cap in caps {
            for volume in volumes {
                for change in changes {
                    for h in holders {
                        let c = Candidate::new("m", "T", ProviderSource::Gmgn)
                            .with_market_cap(cap)
                            .with_volume(volume)
                            .with_price_change(change)
                            .with_holders(h);
                        let a = analyze(&c);
                        assert!(a.score.total <= MAX_TOTAL_SCORE);
                        assert!(a.confidence >= BASE_CONFIDENCE);
                        assert!(a.confidence <= MAX_CONFIDENCE);
                    }
                }
            }
        }
    }

    #[test]
    fn test_confidence_caps_at_95() {
        assert_relative_eq!(confidence_for(0), 50.0);
        assert_relative_eq!(confidence_for(100), 95.0);
        assert_relative_eq!(confidence_for(99), 94.55, epsilon = 1e-9);
    }

    #[test]
    fn test_analyze_is_deterministic() {
        let c = candidate().with_price_change(-33.0).with_market_cap(120_000.0);
        assert_eq!(analyze(&c), analyze(&c));

        let ts = Utc::now();
        assert_eq!(score_candidate(c.clone(), ts), score_candidate(c, ts));
    }
}
