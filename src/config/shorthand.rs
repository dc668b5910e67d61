//! Normalization of shorthand counter links.
//!
//! Editors that cannot add `data-*` attributes write a link instead, e.g.
//! `<a href="#wm-countup?speed=2000&locale=de-DE">1.234</a>`. The link's
//! query string and its own attributes carry the configuration.

/// Fragments that mark a link as a shorthand counter.
pub const SHORTHAND_FRAGMENTS: [&str; 2] = ["#wm-countup", "#wmcountup"];

/// Configuration keys copied from a shorthand link, in their dataset spelling.
pub const SHORTHAND_KEYS: [&str; 5] = ["speed", "fps", "start", "locale", "hasSeperator"];

/// Whether `href` marks its link as a shorthand counter.
pub fn is_shorthand_href(href: &str) -> bool {
    SHORTHAND_FRAGMENTS.iter().any(|f| href.contains(f))
}

/// Attribute name for a dataset key (`hasSeperator` -> `data-has-seperator`).
pub fn data_attribute_name(key: &str) -> String {
    let mut out = String::from("data-");
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Decoded `key=value` pairs of the query string inside `href`.
///
/// Everything after the first `?` is read, up to a later `#`.
pub fn query_params(href: &str) -> Vec<(String, String)> {
    let Some((_, query)) = href.split_once('?') else {
        return Vec::new();
    };
    let query = query.split('#').next().unwrap_or_default();
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(k), decode_component(v))
        })
        .collect()
}

/// Canonical counter attributes for a shorthand link.
///
/// A non-empty query value wins over the link's own `data-*` attribute.
pub fn counter_attributes(
    href: &str,
    anchor_attribute: impl Fn(&str) -> Option<String>,
) -> Vec<(String, String)> {
    let params = query_params(href);
    let mut out = Vec::new();
    for key in SHORTHAND_KEYS {
        let name = data_attribute_name(key);
        let from_query = params
            .iter()
            .find(|(k, v)| k == key && !v.is_empty())
            .map(|(_, v)| v.clone());
        let value = from_query.or_else(|| anchor_attribute(&name).filter(|v| !v.is_empty()));
        if let Some(value) = value {
            out.push((name, value));
        }
    }
    out
}

fn decode_component(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => match bytes.get(i + 1..i + 3).and_then(|h| hex_pair(h[0], h[1])) {
                Some(decoded) => {
                    out.push(decoded);
                    i += 2;
                }
                None => out.push(b'%'),
            },
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    let hi = (hi as char).to_digit(16)?;
    let lo = (lo as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

#[cfg(test)]
#[path = "../../tests/unit/config/shorthand.rs"]
mod tests;
