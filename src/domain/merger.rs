//! Candidate Merger
//!
//! Combines per-provider candidate lists into one set keyed by identity.
//! Providers are visited in priority order and the first record seen for an
//! id wins; later providers only contribute ids nobody reported yet.

use std::collections::HashSet;

use super::candidate::{Candidate, ProviderSource};

/// Candidates returned by one provider for one cycle
#[derive(Debug, Clone)]
pub struct ProviderBatch {
    pub source: ProviderSource,
    pub candidates: Vec<Candidate>,
}

impl ProviderBatch {
    pub fn new(source: ProviderSource, candidates: Vec<Candidate>) -> Self {
        Self { source, candidates }
    }

    pub fn empty(source: ProviderSource) -> Self {
        Self::new(source, Vec::new())
    }
}

/// Merge batches, first-seen-wins.
///
/// Batches are re-ordered by provider priority before merging, so the result
/// does not depend on the order fetches completed in. Records with an empty id
/// are dropped. Output order is priority order, then provider order.
pub fn merge_candidates(mut batches: Vec<ProviderBatch>) -> Vec<Candidate> {
    batches.sort_by_key(|b| b.source.priority());

    let capacity = batches.iter().map(|b| b.candidates.len()).sum();
    let mut seen: HashSet<String> = HashSet::with_capacity(capacity);
    let mut merged = Vec::with_capacity(capacity);

    for batch in batches {
        for candidate in batch.candidates {
            if candidate.id.is_empty() {
                tracing::debug!("Skipping {} record without identity", batch.source);
                continue;
            }
            if seen.insert(candidate.id.clone()) {
                merged.push(candidate);
            }
        }
    }

    merged
}
