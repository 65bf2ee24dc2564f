//! CLI Command Definitions
//!
//! Arguments for every signal-scout subcommand.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Default configuration path, used when present
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Signal Scout - multi-source token signal aggregator
#[derive(Parser, Debug)]
#[command(
    name = "signal-scout",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Multi-source token signal aggregator and scorer",
    long_about = "Signal Scout pulls candidate tokens from DexScreener, Birdeye, GMGN and Jupiter, \
                  merges them, filters out noise and ranks what is left by a composite score."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (defaults apply when omitted and config/default.toml is absent)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one aggregation cycle and print the ranked signals
    Signals(SignalsCmd),

    /// Print the market overview sliced from the latest signals
    Overview(OverviewCmd),

    /// Poll continuously and print each cycle until Ctrl+C
    Watch(WatchCmd),
}

/// Output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print ranked signals
#[derive(Parser, Debug)]
pub struct SignalsCmd {
    /// Only signals with market cap under $1M
    #[arg(long)]
    pub low_cap: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Print the market overview
#[derive(Parser, Debug)]
pub struct OverviewCmd {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Poll loop
#[derive(Parser, Debug)]
pub struct WatchCmd {
    /// Seconds between cycles (overrides the config value)
    #[arg(short, long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_signals_defaults() {
        let app = CliApp::try_parse_from(["signal-scout", "signals"]).unwrap();
        assert!(!app.verbose);
        assert!(app.config.is_none());
        match app.command {
            Command::Signals(cmd) => {
                assert!(!cmd.low_cap);
                assert_eq!(cmd.format, OutputFormat::Text);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let app = CliApp::try_parse_from([
            "signal-scout",
            "signals",
            "--low-cap",
            "--format",
            "json",
            "--debug",
            "--config",
            "custom.toml",
        ])
        .unwrap();
        assert!(app.debug);
        assert_eq!(app.config, Some(PathBuf::from("custom.toml")));
        match app.command {
            Command::Signals(cmd) => {
                assert!(cmd.low_cap);
                assert_eq!(cmd.format, OutputFormat::Json);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_watch_interval() {
        let app = CliApp::try_parse_from(["signal-scout", "-v", "watch", "--interval", "30"]).unwrap();
        assert!(app.verbose);
        assert!(matches!(app.command, Command::Watch(WatchCmd { interval: Some(30), .. })));
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(CliApp::try_parse_from(["signal-scout", "overview", "--format", "xml"]).is_err());
    }
}
