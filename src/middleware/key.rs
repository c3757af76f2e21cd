//! Cache Key Derivation
//!
//! Builds the deterministic key a request is cached under.

use axum::http::{Method, Uri};
use url::form_urlencoded;

/// Derives `{prefix:}{METHOD}:{path}{?sorted-query}` for a request.
///
/// Query pairs are decoded, sorted by name and re-encoded, so the order
/// and spelling the client used never change the key while an encoded
/// `&` or `=` inside a value stays part of that value. Repeated names keep
/// their relative order.
pub fn derive_cache_key(method: &Method, uri: &Uri, prefix: Option<&str>) -> String {
    let mut params: Vec<(String, String)> = uri
        .query()
        .map(|query| form_urlencoded::parse(query.as_bytes()).into_owned().collect())
        .unwrap_or_default();
    params.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut key = format!("{}:{}", method.as_str(), uri.path());
    if !params.is_empty() {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&params)
            .finish();
        key.push('?');
        key.push_str(&query);
    }

    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{key}"),
        _ => key,
    }
}
