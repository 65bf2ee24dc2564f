//! Probe tokens for route/quote based providers
//!
//! GMGN and Jupiter cannot list trending tokens; they are asked for a route
//! from the base mint to each well-known probe token instead. The same table
//! resolves symbols for the mints those responses mention.

use serde::{Deserialize, Serialize};

/// Wrapped SOL mint
pub const WRAPPED_SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Lamports per SOL, the unit of route input amounts
pub const LAMPORTS_PER_SOL: f64 = 1e9;

/// Output amounts are read with six decimals
pub const OUTPUT_UNITS_PER_TOKEN: f64 = 1e6;

/// Symbol used when a mint is not in the probe table
pub const UNKNOWN_SYMBOL: &str = "UNKNOWN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeToken {
    pub mint: String,
    pub symbol: String,
}

impl ProbeToken {
    pub fn new(mint: &str, symbol: &str) -> Self {
        Self {
            mint: mint.to_string(),
            symbol: symbol.to_string(),
        }
    }
}

/// Base mint plus the tokens probed from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeTokens {
    #[serde(default = "default_base_mint")]
    pub base_mint: String,
    #[serde(default = "default_probe_tokens")]
    pub tokens: Vec<ProbeToken>,
}

fn default_base_mint() -> String {
    WRAPPED_SOL_MINT.to_string()
}

fn default_probe_tokens() -> Vec<ProbeToken> {
    vec![
        ProbeToken::new("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", "USDC"),
        ProbeToken::new("Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB", "USDT"),
        ProbeToken::new("DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263", "BONK"),
        ProbeToken::new("7GCihgDB8fe6KNjn2MYtkzZcRjQy3t9GHdC8uHYmW2hr", "POPCAT"),
    ]
}

impl Default for ProbeTokens {
    fn default() -> Self {
        Self {
            base_mint: default_base_mint(),
            tokens: default_probe_tokens(),
        }
    }
}

impl ProbeTokens {
    /// Symbol for a mint, "SOL" for the wrapped SOL base, "UNKNOWN" otherwise
    pub fn symbol_for(&self, mint: &str) -> String {
        if mint == WRAPPED_SOL_MINT {
            return "SOL".to_string();
        }
        self.tokens
            .iter()
            .find(|t| t.mint == mint)
            .map(|t| t.symbol.clone())
            .unwrap_or_else(|| UNKNOWN_SYMBOL.to_string())
    }
}

/// Price implied by a route: SOL in over tokens out. Zero when either side is missing.
pub fn price_from_route_amounts(in_amount: Option<f64>, out_amount: Option<f64>) -> f64 {
    match (in_amount, out_amount) {
        (Some(input), Some(output)) if input > 0.0 && output > 0.0 => {
            (input / LAMPORTS_PER_SOL) / (output / OUTPUT_UNITS_PER_TOKEN)
        }
        _ => 0.0,
    }
}
