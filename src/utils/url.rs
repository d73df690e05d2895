//! URL utilities for consistent URL handling
//!
//! Helpers used by the upstream client and the scrapers: absolutizing
//! scraped links, building relay URLs, slugging titles and masking
//! sensitive values before they reach the logs.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

/// URL utilities for consistent URL handling
pub struct UrlUtils;

fn sensitive_param_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)([?&](?:email|password|pass|pwd|__nonce|nonce)=)[^&]*")
            .expect("valid sensitive parameter regex")
    })
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

impl UrlUtils {
    /// Make a scraped `href`/`src` absolute against the site base
    ///
    /// Values already starting with `http` are returned unchanged, anything
    /// else is appended to the base with exactly one slash between them.
    ///
    /// ```rust
    /// use momenic_proxy::utils::url::UrlUtils;
    ///
    /// assert_eq!(
    ///     UrlUtils::absolutize("https://momenic.webinvit.id", "/audio/a.mp3"),
    ///     "https://momenic.webinvit.id/audio/a.mp3"
    /// );
    /// assert_eq!(
    ///     UrlUtils::absolutize("https://momenic.webinvit.id", "https://cdn.test/a.jpg"),
    ///     "https://cdn.test/a.jpg"
    /// );
    /// ```
    pub fn absolutize(base: &str, value: &str) -> String {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            return value.to_string();
        }
        if value.starts_with("//") {
            return format!("https:{value}");
        }
        if value.is_empty() {
            return base.trim_end_matches('/').to_string();
        }
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            value.trim_start_matches('/')
        )
    }

    /// Expand a relay template for a target URL
    ///
    /// `{url}` receives the percent-encoded target and `{raw_url}` the target
    /// verbatim. A template with neither placeholder gets the encoded target
    /// appended.
    pub fn build_relay_url(template: &str, target: &str) -> String {
        if template.contains("{raw_url}") {
            template.replace("{raw_url}", target)
        } else if template.contains("{url}") {
            template.replace("{url}", &urlencoding::encode(target))
        } else {
            format!("{template}{}", urlencoding::encode(target))
        }
    }

    /// Lowercase the title and replace whitespace runs with `-`
    pub fn slugify(title: &str) -> String {
        whitespace_regex()
            .replace_all(title.trim(), "-")
            .to_lowercase()
    }

    /// WhatsApp deep link with a prefilled message
    pub fn whatsapp_url(phone: &str, text: &str) -> String {
        format!(
            "https://api.whatsapp.com/send?phone={}&text={}",
            urlencoding::encode(phone),
            urlencoding::encode(text)
        )
    }

    /// Extract the host from a URL
    pub fn extract_domain(url: &str) -> Option<String> {
        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
    }

    /// Obfuscate sensitive information in URLs for safe logging
    ///
    /// Masks userinfo as well as email, password and nonce query parameters.
    pub fn obfuscate_credentials(url: &str) -> String {
        let mut obfuscated = url.to_string();

        if let Ok(parsed) = Url::parse(url) {
            if !parsed.username().is_empty() || parsed.password().is_some() {
                let mut new_url = parsed.clone();
                let _ = new_url.set_username("****");
                let _ = new_url.set_password(Some("****"));
                obfuscated = new_url.to_string();
            }
        }

        sensitive_param_regex()
            .replace_all(&obfuscated, "${1}****")
            .to_string()
    }

    /// Keep the first few characters of a secret for correlation in logs
    pub fn mask_secret(value: &str) -> String {
        let visible: String = value.chars().take(4).collect();
        if value.chars().count() <= 4 {
            "****".to_string()
        } else {
            format!("{visible}****")
        }
    }
}
