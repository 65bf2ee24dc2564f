//! Provider payload decoding
//!
//! Provider APIs mix JSON numbers and numeric strings for the same field and
//! drop fields freely. Every numeric field decodes into an explicit `Option`;
//! a record that does not decode at all is skipped on its own.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::birdeye::BirdeyeToken;
use super::dexscreener::DexScreenerPair;
use super::gmgn::GmgnRoute;
use super::jupiter::JupiterQuote;
use super::probe::ProbeTokens;
use crate::domain::{Candidate, ProviderSource};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

/// Decode a number or numeric string; anything unparsable becomes `None`
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<NumberOrString> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(NumberOrString::Number(n)) if n.is_finite() => Some(n),
        Some(NumberOrString::Text(s)) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    })
}

/// Decode a non-negative count from a number or numeric string
pub(crate) fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?
        .filter(|n| *n >= 0.0)
        .map(|n| n.trunc() as u64))
}

/// One provider record, typed by the schema it came from
#[derive(Debug, Clone)]
pub enum RawProviderRecord {
    DexScreener(DexScreenerPair),
    Birdeye(BirdeyeToken),
    Gmgn(GmgnRoute),
    Jupiter(JupiterQuote),
}

impl RawProviderRecord {
    pub fn source(&self) -> ProviderSource {
        match self {
            RawProviderRecord::DexScreener(_) => ProviderSource::DexScreener,
            RawProviderRecord::Birdeye(_) => ProviderSource::Birdeye,
            RawProviderRecord::Gmgn(_) => ProviderSource::Gmgn,
            RawProviderRecord::Jupiter(_) => ProviderSource::Jupiter,
        }
    }

    /// Map into the common candidate shape. `None` when the record has no identity.
    pub fn normalize(self, probes: &ProbeTokens) -> Option<Candidate> {
        match self {
            RawProviderRecord::DexScreener(pair) => pair.into_candidate(),
            RawProviderRecord::Birdeye(token) => token.into_candidate(),
            RawProviderRecord::Gmgn(route) => route.into_candidate(probes),
            RawProviderRecord::Jupiter(quote) => quote.into_candidate(probes),
        }
    }
}

/// Decode each array item on its own, skipping the ones that do not fit `T`
pub(crate) fn decode_records<T: DeserializeOwned>(source: ProviderSource, items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value::<T>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!("Skipping malformed {} record #{}: {}", source, idx, e);
                None
            }
        })
        .collect()
}

/// Normalize a batch of records, dropping those without identity
pub(crate) fn normalize_all(
    source: ProviderSource,
    records: impl IntoIterator<Item = RawProviderRecord>,
    probes: &ProbeTokens,
) -> Vec<Candidate> {
    let mut skipped = 0usize;
    let candidates: Vec<Candidate> = records
        .into_iter()
        .filter_map(|record| {
            let normalized = record.normalize(probes);
            if normalized.is_none() {
                skipped += 1;
            }
            normalized
        })
        .collect();

    if skipped > 0 {
        tracing::debug!("{}: skipped {} records without identity", source, skipped);
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "lenient_f64")]
        price: Option<f64>,
        #[serde(default, deserialize_with = "lenient_u64")]
        holders: Option<u64>,
    }

    #[test]
    fn test_lenient_f64_accepts_numbers_and_strings() {
        let s: Sample = serde_json::from_value(json!({"price": "0.0042"})).unwrap();
        assert_eq!(s.price, Some(0.0042));

        let s: Sample = serde_json::from_value(json!({"price": 12})).unwrap();
        assert_eq!(s.price, Some(12.0));

        let s: Sample = serde_json::from_value(json!({"price": "n/a"})).unwrap();
        assert_eq!(s.price, None);

        let s: Sample = serde_json::from_value(json!({"price": null})).unwrap();
        assert_eq!(s.price, None);

        let s: Sample = serde_json::from_value(json!({})).unwrap();
        assert_eq!(s.price, None);
    }

    #[test]
    fn test_lenient_u64() {
        let s: Sample = serde_json::from_value(json!({"holders": "1500"})).unwrap();
        assert_eq!(s.holders, Some(1500));

        let s: Sample = serde_json::from_value(json!({"holders": 250.7})).unwrap();
        assert_eq!(s.holders, Some(250));

        let s: Sample = serde_json::from_value(json!({"holders": -4})).unwrap();
        assert_eq!(s.holders, None);
    }

    #[test]
    fn test_decode_records_skips_bad_items() {
        let items = vec![
            json!({"price": 1.0}),
            json!("not an object"),
            json!({"price": "2.5", "holders": 10}),
        ];
        let decoded: Vec<Sample> = decode_records(ProviderSource::Birdeye, items);
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[1].price, Some(2.5));
    }

    #[test]
    fn test_record_source_tags() {
        let quote: JupiterQuote = serde_json::from_value(json!({
            "inputMint": "a", "outputMint": "b", "inAmount": "1", "outAmount": "1"
        }))
        .unwrap();
        assert_eq!(RawProviderRecord::Jupiter(quote).source(), ProviderSource::Jupiter);
    }
}
