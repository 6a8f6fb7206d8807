use std::sync::OnceLock;

use regex::Regex;

use super::types::StyleMap;

/// Parses a flat `key:value;key:value` style list.
///
/// Declarations without a plain property name or with an empty value are
/// skipped. Property names are lower-cased; later duplicates win.
pub fn parse_style(raw: &str) -> StyleMap {
    static DECL_REGEX: OnceLock<Regex> = OnceLock::new();
    let decl = DECL_REGEX.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z][A-Za-z-]*)\s*:\s*(.*?)\s*$").expect("Invalid style regex")
    });

    raw.split(';')
        .filter_map(|d| {
            let caps = decl.captures(d)?;
            let value = caps.get(2)?.as_str();
            if value.is_empty() {
                return None;
            }
            Some((caps[1].to_ascii_lowercase(), value.to_string()))
        })
        .collect()
}

/// Writes a style map back as `key:value;key:value`.
pub fn format_style(style: &StyleMap) -> String {
    style
        .iter()
        .map(|(k, v)| format!("{k}:{v}"))
        .collect::<Vec<_>>()
        .join(";")
}
