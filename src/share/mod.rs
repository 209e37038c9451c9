//! Shareable-link codec for input records.
//!
//! Links carry one `key=value` pair per factor, e.g.
//! `shape=Equidimensional&thickness=V.%20Thick`.

use crate::catalog::Catalog;
use crate::scoring::InputRecord;

/// Encode the catalog's factors present in `inputs` as a query string.
///
/// Pairs follow factor declaration order; absent factors and keys the
/// catalog does not declare are left out.
pub fn encode_inputs(catalog: &Catalog, inputs: &InputRecord) -> String {
    catalog
        .factors()
        .iter()
        .filter_map(|factor| {
            inputs
                .get(&factor.key)
                .map(|value| format!("{}={}", factor.key, urlencoding::encode(value)))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Decode a query string (or full link) back into an input record.
///
/// Unknown keys and empty values are dropped, so the record may be partial;
/// run it through validation before scoring. The first occurrence of a
/// repeated key wins.
pub fn decode_inputs(catalog: &Catalog, query: &str) -> InputRecord {
    // Only a link prefix is stripped; a `?` after the first pair belongs to a value
    let query = match query.split_once('?') {
        Some((prefix, q)) if !prefix.contains(['=', '&']) => q,
        _ => query,
    };
    // Fragments are not part of the query
    let query = query.split('#').next().unwrap_or_default();

    let mut record = InputRecord::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let (Some(key), Some(value)) = (decode_component(raw_key), decode_component(raw_value))
        else {
            tracing::debug!(pair, "dropping undecodable link parameter");
            continue;
        };
        if value.is_empty() || catalog.factor(&key).is_none() || record.get(&key).is_some() {
            continue;
        }
        record.set(key, value);
    }
    record
}

fn decode_component(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(|s| s.into_owned())
}
