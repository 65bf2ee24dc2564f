//! CLI Adapter
//!
//! Command-line interface for signal-scout.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{CliApp, Command, OutputFormat, OverviewCmd, SignalsCmd, WatchCmd, DEFAULT_CONFIG_PATH};

/// Initialize the CLI application
pub fn init() -> CliApp {
    use clap::Parser;
    CliApp::parse()
}
