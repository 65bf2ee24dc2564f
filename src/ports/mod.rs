//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement.
//! Following hexagonal architecture, these traits abstract:
//! - Market data providers (one per external source)
//! - Deterministic mock providers for tests

pub mod signal_source;
pub mod mocks;

pub use signal_source::{ProviderError, SignalProvider};
pub use mocks::MockProvider;
