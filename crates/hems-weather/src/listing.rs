//! Apache-style directory listings as served by the DWD open data server
//! and its mirrors.

use crate::error::FetchError;
use regex::Regex;
use std::sync::OnceLock;

/// Every `href` target in the listing, in document order.
pub fn hrefs(html: &str) -> Vec<&str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r#"(?i)href\s*=\s*["']([^"']+)["']"#).unwrap());
    re.captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// The lexicographically greatest href containing `needle`. File names
/// carry their timestamp, so this is the most recent file.
pub fn latest_matching<'a>(html: &'a str, needle: &str) -> Option<&'a str> {
    hrefs(html)
        .into_iter()
        .filter(|href| href.contains(needle))
        .max()
}

/// Four-character subdirectory names, lowercased (one per ICAO station).
pub fn station_directories(html: &str) -> Vec<String> {
    hrefs(html)
        .into_iter()
        .map(|href| href.trim_matches('/'))
        .filter(|name| name.len() == 4 && name.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_lowercase)
        .collect()
}

/// Resolve an href against the listing's URL. `directory` must end in `/`
/// for relative names to land inside it.
pub fn resolve_href(directory: &str, href: &str) -> Result<String, FetchError> {
    reqwest::Url::parse(directory)
        .and_then(|base| base.join(href))
        .map(String::from)
        .map_err(|err| FetchError::InvalidUrl(format!("{directory} + {href}: {err}")))
}
