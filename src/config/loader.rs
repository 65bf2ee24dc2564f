//! Configuration Loader
//!
//! Loads and validates configuration from a TOML file. Every section has
//! defaults, so an empty file yields a working configuration.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::adapters::http::HttpFetcherConfig;
use crate::adapters::market_data::{
    BirdeyeConfig, DexScreenerConfig, GmgnConfig, JupiterQuoteConfig, ProbeTokens, DEFAULT_BIRDEYE_API_URL,
    DEFAULT_DEXSCREENER_API_URL, DEFAULT_GMGN_API_URL, DEFAULT_JUPITER_API_URL,
};
use crate::adapters::rate_limit::{ProviderLimit, ProviderRateLimiter};
use crate::application::AggregatorSettings;
use crate::domain::{HeuristicFilter, ProviderSource, ValidityFilter};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub aggregator: AggregatorSection,
    /// Validity filter thresholds
    #[serde(default)]
    pub thresholds: ValidityFilter,
    /// Heuristic filter thresholds
    #[serde(default)]
    pub heuristics: HeuristicFilter,
    #[serde(default)]
    pub http: HttpSection,
    #[serde(default)]
    pub providers: ProvidersSection,
    /// Probe tokens for route and quote providers
    #[serde(default)]
    pub probe: ProbeTokens,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Aggregation cycle settings
#[derive(Debug, Clone, Deserialize)]
pub struct AggregatorSection {
    /// Number of signals kept after ranking
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Seconds between cycles in watch mode
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Upper bound on one provider's fetch within a cycle
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,
}

fn default_top_k() -> usize {
    crate::domain::ranker::DEFAULT_TOP_K
}

fn default_poll_interval_secs() -> u64 {
    60
}

fn default_provider_timeout_secs() -> u64 {
    120
}

impl Default for AggregatorSection {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            poll_interval_secs: default_poll_interval_secs(),
            provider_timeout_secs: default_provider_timeout_secs(),
        }
    }
}

impl AggregatorSection {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// HTTP client settings shared by all providers
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSection {
    /// Per-call timeout in seconds
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
    /// Delay before the single retry after a 429
    #[serde(default = "default_retry_delay_ms")]
    pub rate_limit_retry_delay_ms: u64,
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_retry_delay_ms() -> u64 {
    1_000
}

impl Default for HttpSection {
    fn default() -> Self {
        Self {
            timeout_secs: default_http_timeout_secs(),
            rate_limit_retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Per-provider sections
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersSection {
    #[serde(default)]
    pub dexscreener: DexScreenerSection,
    #[serde(default)]
    pub birdeye: BirdeyeSection,
    #[serde(default)]
    pub gmgn: GmgnSection,
    #[serde(default)]
    pub jupiter: JupiterSection,
}

fn default_true() -> bool {
    true
}

fn default_probe_amount() -> u64 {
    1_000_000_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct DexScreenerSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_dexscreener_url")]
    pub api_url: String,
    #[serde(default = "default_dexscreener_interval_ms")]
    pub min_interval_ms: u64,
    /// Interval for the 429 retry; half of `min_interval_ms` when unset
    #[serde(default)]
    pub high_priority_interval_ms: Option<u64>,
    #[serde(default = "default_search_query")]
    pub search_query: String,
}

fn default_dexscreener_url() -> String {
    DEFAULT_DEXSCREENER_API_URL.to_string()
}

fn default_dexscreener_interval_ms() -> u64 {
    1_000
}

fn default_search_query() -> String {
    "solana".to_string()
}

impl Default for DexScreenerSection {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: default_dexscreener_url(),
            min_interval_ms: default_dexscreener_interval_ms(),
            high_priority_interval_ms: None,
            search_query: default_search_query(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BirdeyeSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_birdeye_url")]
    pub api_url: String,
    /// Birdeye's free tier allows roughly one trending call per minute
    #[serde(default = "default_birdeye_interval_ms")]
    pub min_interval_ms: u64,
    #[serde(default)]
    pub high_priority_interval_ms: Option<u64>,
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_birdeye_url() -> String {
    DEFAULT_BIRDEYE_API_URL.to_string()
}

fn default_birdeye_interval_ms() -> u64 {
    60_000
}

impl Default for BirdeyeSection {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: default_birdeye_url(),
            min_interval_ms: default_birdeye_interval_ms(),
            high_priority_interval_ms: None,
            api_key: None,
        }
    }
}

impl BirdeyeSection {
    /// API key, with BIRDEYE_API_KEY taking precedence over the file
    pub fn get_api_key(&self) -> Option<String> {
        if let Ok(key) = std::env::var("BIRDEYE_API_KEY") {
            if !key.is_empty() {
                return Some(key);
            }
        }
        self.api_key.clone().filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GmgnSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_gmgn_url")]
    pub api_url: String,
    #[serde(default = "default_gmgn_interval_ms")]
    pub min_interval_ms: u64,
    #[serde(default)]
    pub high_priority_interval_ms: Option<u64>,
    /// Route input in lamports
    #[serde(default = "default_probe_amount")]
    pub probe_amount: u64,
    /// Slippage in percent
    #[serde(default = "default_gmgn_slippage")]
    pub slippage: f64,
}

fn default_gmgn_url() -> String {
    DEFAULT_GMGN_API_URL.to_string()
}

fn default_gmgn_interval_ms() -> u64 {
    5_000
}

fn default_gmgn_slippage() -> f64 {
    1.0
}

impl Default for GmgnSection {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: default_gmgn_url(),
            min_interval_ms: default_gmgn_interval_ms(),
            high_priority_interval_ms: None,
            probe_amount: default_probe_amount(),
            slippage: default_gmgn_slippage(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JupiterSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_jupiter_url")]
    pub api_url: String,
    #[serde(default = "default_jupiter_interval_ms")]
    pub min_interval_ms: u64,
    #[serde(default)]
    pub high_priority_interval_ms: Option<u64>,
    /// Optional API key for higher rate limits (get from jup.ag)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Quote input in lamports
    #[serde(default = "default_probe_amount")]
    pub probe_amount: u64,
    /// Slippage tolerance in basis points (0.5% = 50 bps)
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u16,
}

fn default_jupiter_url() -> String {
    DEFAULT_JUPITER_API_URL.to_string()
}

fn default_jupiter_interval_ms() -> u64 {
    2_000
}

fn default_slippage_bps() -> u16 {
    50
}

impl Default for JupiterSection {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: default_jupiter_url(),
            min_interval_ms: default_jupiter_interval_ms(),
            high_priority_interval_ms: None,
            api_key: None,
            probe_amount: default_probe_amount(),
            slippage_bps: default_slippage_bps(),
        }
    }
}

impl JupiterSection {
    /// Get API key with environment variable fallback
    /// Checks JUPITER_API_KEY env var if config value is empty/None
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }
        std::env::var("JUPITER_API_KEY").ok().filter(|k| !k.is_empty())
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Interval fields shared by every provider section
struct ProviderView<'a> {
    source: ProviderSource,
    enabled: bool,
    api_url: &'a str,
    min_interval_ms: u64,
    high_priority_interval_ms: Option<u64>,
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.aggregator.top_k == 0 {
            return Err(ConfigError::ValidationError("top_k must be > 0".into()));
        }

        if self.aggregator.provider_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "provider_timeout_secs must be > 0".into(),
            ));
        }

        if self.aggregator.poll_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "poll_interval_secs must be > 0".into(),
            ));
        }

        let t = &self.thresholds;
        for (name, value) in [
            ("min_volume_usd", t.min_volume_usd),
            ("max_market_cap_usd", t.max_market_cap_usd),
            ("min_price_change_pct", t.min_price_change_pct),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "thresholds.{} must be >= 0, got {}",
                    name, value
                )));
            }
        }

        let h = &self.heuristics;
        for (name, value) in [
            ("volume_spike_ratio", h.volume_spike_ratio),
            ("strong_momentum_pct", h.strong_momentum_pct),
            ("min_market_cap_usd", h.min_market_cap_usd),
            ("max_market_cap_usd", h.max_market_cap_usd),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "heuristics.{} must be >= 0, got {}",
                    name, value
                )));
            }
        }

        if h.min_market_cap_usd >= h.max_market_cap_usd {
            return Err(ConfigError::ValidationError(format!(
                "heuristics.min_market_cap_usd ({}) must be below max_market_cap_usd ({})",
                h.min_market_cap_usd, h.max_market_cap_usd
            )));
        }

        if self.http.timeout_secs == 0 {
            return Err(ConfigError::ValidationError("http.timeout_secs must be > 0".into()));
        }

        for provider in self.provider_views() {
            if provider.min_interval_ms == 0 {
                return Err(ConfigError::ValidationError(format!(
                    "providers.{}.min_interval_ms must be > 0",
                    provider.source.key()
                )));
            }
            if provider.enabled && provider.api_url.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "providers.{}.api_url must not be empty",
                    provider.source.key()
                )));
            }
        }

        if self.probe.base_mint.is_empty() {
            return Err(ConfigError::ValidationError("probe.base_mint must not be empty".into()));
        }

        Ok(())
    }

    fn provider_views(&self) -> [ProviderView<'_>; 4] {
        let p = &self.providers;
        [
            ProviderView {
                source: ProviderSource::DexScreener,
                enabled: p.dexscreener.enabled,
                api_url: &p.dexscreener.api_url,
                min_interval_ms: p.dexscreener.min_interval_ms,
                high_priority_interval_ms: p.dexscreener.high_priority_interval_ms,
            },
            ProviderView {
                source: ProviderSource::Birdeye,
                enabled: p.birdeye.enabled,
                api_url: &p.birdeye.api_url,
                min_interval_ms: p.birdeye.min_interval_ms,
                high_priority_interval_ms: p.birdeye.high_priority_interval_ms,
            },
            ProviderView {
                source: ProviderSource::Gmgn,
                enabled: p.gmgn.enabled,
                api_url: &p.gmgn.api_url,
                min_interval_ms: p.gmgn.min_interval_ms,
                high_priority_interval_ms: p.gmgn.high_priority_interval_ms,
            },
            ProviderView {
                source: ProviderSource::Jupiter,
                enabled: p.jupiter.enabled,
                api_url: &p.jupiter.api_url,
                min_interval_ms: p.jupiter.min_interval_ms,
                high_priority_interval_ms: p.jupiter.high_priority_interval_ms,
            },
        ]
    }

    /// Whether a provider is switched on
    pub fn is_enabled(&self, source: ProviderSource) -> bool {
        self.provider_views()
            .iter()
            .any(|p| p.source == source && p.enabled)
    }

    /// Rate limits for every provider, enabled or not
    pub fn provider_limits(&self) -> Vec<(ProviderSource, ProviderLimit)> {
        self.provider_views()
            .iter()
            .map(|p| {
                let mut limit = ProviderLimit::new(Duration::from_millis(p.min_interval_ms));
                if let Some(ms) = p.high_priority_interval_ms {
                    limit = limit.with_high_priority_interval(Duration::from_millis(ms));
                }
                (p.source, limit)
            })
            .collect()
    }

    /// Build the shared rate limiter
    pub fn rate_limiter(&self) -> ProviderRateLimiter {
        ProviderRateLimiter::new(self.provider_limits())
    }
}

impl From<&Config> for HttpFetcherConfig {
    fn from(config: &Config) -> Self {
        HttpFetcherConfig {
            timeout: Duration::from_secs(config.http.timeout_secs),
            retry_delay: Duration::from_millis(config.http.rate_limit_retry_delay_ms),
        }
    }
}

impl From<&Config> for AggregatorSettings {
    fn from(config: &Config) -> Self {
        AggregatorSettings {
            top_k: config.aggregator.top_k,
            provider_timeout: Duration::from_secs(config.aggregator.provider_timeout_secs),
            validity: config.thresholds.clone(),
            heuristics: config.heuristics.clone(),
        }
    }
}

impl From<&DexScreenerSection> for DexScreenerConfig {
    fn from(section: &DexScreenerSection) -> Self {
        DexScreenerConfig {
            api_url: section.api_url.clone(),
            search_query: section.search_query.clone(),
            ..DexScreenerConfig::default()
        }
    }
}

impl From<&BirdeyeSection> for BirdeyeConfig {
    fn from(section: &BirdeyeSection) -> Self {
        BirdeyeConfig {
            api_url: section.api_url.clone(),
            api_key: section.get_api_key(),
        }
    }
}

impl From<&GmgnSection> for GmgnConfig {
    fn from(section: &GmgnSection) -> Self {
        GmgnConfig {
            api_url: section.api_url.clone(),
            probe_amount: section.probe_amount,
            slippage: section.slippage,
        }
    }
}

impl From<&JupiterSection> for JupiterQuoteConfig {
    fn from(section: &JupiterSection) -> Self {
        JupiterQuoteConfig {
            api_url: section.api_url.clone(),
            api_key: section.get_api_key(),
            probe_amount: section.probe_amount,
            slippage_bps: section.slippage_bps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = write_config("");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.aggregator.top_k, 20);
        assert_eq!(config.aggregator.provider_timeout_secs, 120);
        assert_eq!(config.thresholds, ValidityFilter::default());
        assert_eq!(config.heuristics, HeuristicFilter::default());
        assert_eq!(config.providers.birdeye.min_interval_ms, 60_000);
        assert_eq!(config.providers.dexscreener.search_query, "solana");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.probe.tokens.len(), 4);
    }

    #[test]
    fn test_load_overrides() {
        let file = write_config(
            r#"
[aggregator]
top_k = 5
poll_interval_secs = 30

[thresholds]
min_volume_usd = 75000.0

[http]
rate_limit_retry_delay_ms = 250

[providers.gmgn]
enabled = false

[providers.jupiter]
min_interval_ms = 3000
high_priority_interval_ms = 500

[[probe.tokens]]
mint = "MintX"
symbol = "XXX"

[logging]
level = "debug"
"#,
        );

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.aggregator.top_k, 5);
        assert_eq!(config.aggregator.poll_interval(), Duration::from_secs(30));
        assert_eq!(config.thresholds.min_volume_usd, 75_000.0);
        assert_eq!(config.thresholds.min_holders, 100);
        assert!(!config.is_enabled(ProviderSource::Gmgn));
        assert!(config.is_enabled(ProviderSource::Jupiter));
        // untouched fields of a present section keep their provider defaults
        assert_eq!(config.providers.gmgn.min_interval_ms, 5_000);
        assert_eq!(config.probe.tokens.len(), 1);
        assert_eq!(config.probe.symbol_for("MintX"), "XXX");

        let http = HttpFetcherConfig::from(&config);
        assert_eq!(http.retry_delay, Duration::from_millis(250));

        let jupiter = config
            .provider_limits()
            .into_iter()
            .find(|(s, _)| *s == ProviderSource::Jupiter)
            .map(|(_, l)| l)
            .unwrap();
        assert_eq!(jupiter.min_interval, Duration::from_millis(3_000));
        assert_eq!(jupiter.high_priority_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_high_priority_defaults_to_half() {
        let config = Config::default();
        let limits = config.provider_limits();
        assert_eq!(limits.len(), 4);
        let (_, dex) = limits[0];
        assert_eq!(dex.min_interval, Duration::from_millis(1_000));
        assert_eq!(dex.high_priority_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_shipped_default_config_matches_defaults() {
        let config = load_config(concat!(env!("CARGO_MANIFEST_DIR"), "/config/default.toml")).unwrap();
        let defaults = Config::default();

        assert_eq!(config.aggregator.top_k, defaults.aggregator.top_k);
        assert_eq!(config.thresholds, defaults.thresholds);
        assert_eq!(config.heuristics, defaults.heuristics);
        assert_eq!(config.probe, defaults.probe);
        assert_eq!(config.provider_limits(), defaults.provider_limits());
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config("/nonexistent/path/config.toml");
        assert!(matches!(result.unwrap_err(), ConfigError::IoError(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let file = write_config("[aggregator\ntop_k = ");
        assert!(matches!(load_config(file.path()).unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_invalid_top_k() {
        let file = write_config("[aggregator]\ntop_k = 0\n");
        assert!(matches!(
            load_config(file.path()).unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let file = write_config("[thresholds]\nmin_volume_usd = -1.0\n");
        assert!(matches!(
            load_config(file.path()).unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let file = write_config("[providers.birdeye]\nmin_interval_ms = 0\n");
        assert!(matches!(
            load_config(file.path()).unwrap_err(),
            ConfigError::ValidationError(_)
        ));
    }

    #[test]
    fn test_empty_url_only_matters_when_enabled() {
        let file = write_config("[providers.dexscreener]\napi_url = \"\"\n");
        assert!(load_config(file.path()).is_err());

        let file = write_config("[providers.dexscreener]\nenabled = false\napi_url = \"\"\n");
        assert!(load_config(file.path()).is_ok());
    }

    #[test]
    fn test_inverted_heuristic_cap_range_rejected() {
        let mut config = Config::default();
        config.heuristics.min_market_cap_usd = 20_000_000.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_aggregator_settings_from_config() {
        let mut config = Config::default();
        config.aggregator.top_k = 7;
        let settings = AggregatorSettings::from(&config);
        assert_eq!(settings.top_k, 7);
        assert_eq!(settings.provider_timeout, Duration::from_secs(120));
        assert_eq!(settings.validity, ValidityFilter::default());
    }

    #[test]
    fn test_jupiter_key_from_file_wins() {
        let section = JupiterSection {
            api_key: Some("file-key".into()),
            ..JupiterSection::default()
        };
        assert_eq!(section.get_api_key().as_deref(), Some("file-key"));
    }
}
