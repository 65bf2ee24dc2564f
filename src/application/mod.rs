pub mod aggregator;

pub use aggregator::{
    AggregatorSettings, CycleReport, ProviderOutcome, ProviderReport, SignalAggregator,
};
