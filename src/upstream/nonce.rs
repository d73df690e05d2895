use std::sync::OnceLock;

use regex::Regex;

fn prefixed_nonce_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)__nonce["'\s:=]+([a-f0-9]{10})"#).expect("valid nonce regex")
    })
}

fn bare_nonce_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)nonce["'\s:=]+([a-f0-9]{10})"#).expect("valid nonce regex")
    })
}

/// Find the 10 hex character WordPress nonce embedded in a page
///
/// `__nonce` assignments are preferred over any other `nonce` occurrence.
pub fn extract_nonce(html: &str) -> Option<String> {
    [prefixed_nonce_regex(), bare_nonce_regex()]
        .into_iter()
        .find_map(|re| re.captures(html))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
