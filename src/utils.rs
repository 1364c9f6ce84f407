//! Helpers for turning actix request/response parts into record fields

use actix_web::http::header::{HeaderMap, CONNECTION};

use crate::record::MultiMap;

/// Copy a header map into a multimap, keeping every value of repeated headers
///
/// Values that are not valid UTF-8 are converted lossily.
pub fn header_multimap(headers: &HeaderMap) -> MultiMap {
    let mut map = MultiMap::new();
    for (name, value) in headers.iter() {
        map.entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    map
}

/// Parse a raw query string (`a=1&b=2&a=3`) into a multimap
pub fn query_multimap(query: &str) -> MultiMap {
    let mut map = MultiMap::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        map.entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    map
}

/// Whether the `Connection` header asks for a protocol upgrade
pub fn is_upgrade_request(headers: &HeaderMap) -> bool {
    headers.get_all(CONNECTION).any(|value| {
        value.to_str().map_or(false, |value| {
            value
                .split(',')
                .any(|token| token.trim().eq_ignore_ascii_case("upgrade"))
        })
    })
}
