//! Request helpers.
//!
//! - query parameter parsing
//! - viewer id extraction
//! - boolean query flags

use std::collections::HashMap;

use http::{HeaderMap, HeaderName, Uri};

/// Extract query parameters from URI.
///
/// Values are URL-decoded. Keys without `=` are kept with an empty value.
pub fn extract_query_params(uri: &Uri) -> HashMap<String, String> {
    let mut params = HashMap::new();
    if let Some(query) = uri.query() {
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            params.insert(
                key.to_string(),
                urlencoding::decode(value).unwrap_or_default().to_string(),
            );
        }
    }
    params
}

/// Viewer id from the configured header; non-UTF8 or blank values count as absent.
pub fn extract_viewer(headers: &HeaderMap, header: &HeaderName) -> Option<String> {
    headers
        .get(header)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse a boolean query flag; `None` when the value is not recognised.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
