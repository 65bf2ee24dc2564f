//! Signal Scout - Multi-Source Token Signal Aggregator Library
//!
//! Pulls candidate tokens from several public market data APIs, merges them
//! by identity, filters out noise and ranks the rest by a composite score.
//!
//! # Modules
//!
//! - `domain`: Core signal logic (Candidate, filters, scorer, ranker, overview)
//! - `ports`: Trait abstractions (SignalProvider) and mock providers
//! - `adapters`: External implementations (rate limiter, HTTP, providers, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: The aggregation cycle and polling loop

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
