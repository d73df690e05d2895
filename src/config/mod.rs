use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use defaults::*;
use duration_serde::{duration, parse_default};

use crate::errors::SessionError;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub scraping: ScrapingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Built SPA assets served for every unmatched GET path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
}

/// The WordPress site whose AJAX endpoint serves the theme catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_upstream_base_url")]
    pub base_url: String,
    #[serde(default = "default_ajax_path")]
    pub ajax_path: String,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_dashboard_path")]
    pub dashboard_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Used when the login page does not expose a nonce
    #[serde(default = "default_login_nonce", skip_serializing_if = "Option::is_none")]
    pub login_nonce: Option<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_upstream_timeout", with = "duration")]
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_session_ttl", with = "duration")]
    pub ttl: Duration,
    /// Persist the session as JSON (mode 0600) instead of keeping it in memory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_cache_ttl", with = "duration")]
    pub cache_ttl: Duration,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapingConfig {
    #[serde(default = "default_scrape_base_url")]
    pub base_url: String,
    /// Relay templates; `{url}` is replaced by the encoded target, `{raw_url}` verbatim
    #[serde(default)]
    pub relays: Vec<String>,
    #[serde(default = "default_true")]
    pub direct_first: bool,
    #[serde(default = "default_scrape_timeout", with = "duration")]
    pub timeout: Duration,
    #[serde(default = "default_scrape_cache_ttl", with = "duration")]
    pub cache_ttl: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
    #[serde(default)]
    pub sample_fallback: bool,
    #[serde(default = "default_order_phone")]
    pub order_phone: String,
    #[serde(default = "default_theme_directory_url")]
    pub theme_directory_url: String,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

// Web defaults
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

// Upstream defaults
fn default_upstream_base_url() -> String {
    DEFAULT_UPSTREAM_BASE_URL.to_string()
}

fn default_ajax_path() -> String {
    DEFAULT_AJAX_PATH.to_string()
}

fn default_login_path() -> String {
    DEFAULT_LOGIN_PATH.to_string()
}

fn default_dashboard_path() -> String {
    DEFAULT_DASHBOARD_PATH.to_string()
}

fn default_login_nonce() -> Option<String> {
    Some(DEFAULT_LOGIN_NONCE.to_string())
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_upstream_timeout() -> Duration {
    parse_default(DEFAULT_UPSTREAM_TIMEOUT)
}

// Session defaults
fn default_session_ttl() -> Duration {
    parse_default(DEFAULT_SESSION_TTL)
}

// Catalog defaults
fn default_catalog_cache_ttl() -> Duration {
    parse_default(DEFAULT_CATALOG_CACHE_TTL)
}

fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}

// Scraping defaults
fn default_scrape_base_url() -> String {
    DEFAULT_SCRAPE_BASE_URL.to_string()
}

fn default_scrape_timeout() -> Duration {
    parse_default(DEFAULT_SCRAPE_TIMEOUT)
}

fn default_scrape_cache_ttl() -> Duration {
    parse_default(DEFAULT_SCRAPE_CACHE_TTL)
}

fn default_order_phone() -> String {
    DEFAULT_ORDER_PHONE.to_string()
}

fn default_theme_directory_url() -> String {
    DEFAULT_THEME_DIRECTORY_URL.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_upstream_base_url(),
            ajax_path: default_ajax_path(),
            login_path: default_login_path(),
            dashboard_path: default_dashboard_path(),
            email: None,
            password: None,
            login_nonce: default_login_nonce(),
            user_agent: default_user_agent(),
            request_timeout: default_upstream_timeout(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: default_session_ttl(),
            cache_file: None,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            cache_ttl: default_catalog_cache_ttl(),
            per_page: default_per_page(),
        }
    }
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            base_url: default_scrape_base_url(),
            relays: Vec::new(),
            direct_first: true,
            timeout: default_scrape_timeout(),
            cache_ttl: default_scrape_cache_ttl(),
            cache_dir: None,
            sample_fallback: false,
            order_phone: default_order_phone(),
            theme_directory_url: default_theme_directory_url(),
            per_page: default_per_page(),
        }
    }
}

impl UpstreamConfig {
    /// Absolute URL of the AJAX endpoint
    pub fn ajax_url(&self) -> String {
        join_base(&self.base_url, &self.ajax_path)
    }

    pub fn login_url(&self) -> String {
        join_base(&self.base_url, &self.login_path)
    }

    pub fn dashboard_url(&self) -> String {
        join_base(&self.base_url, &self.dashboard_path)
    }

    /// Email and password, or an error naming what is missing
    pub fn credentials(&self) -> Result<(&str, &str), SessionError> {
        let email = self.email.as_deref().filter(|e| !e.trim().is_empty());
        let password = self.password.as_deref().filter(|p| !p.is_empty());
        match (email, password) {
            (Some(email), Some(password)) => Ok((email, password)),
            _ => Err(SessionError::missing_credentials(format!(
                "{ENV_EMAIL} and {ENV_PASSWORD} must be set"
            ))),
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials().is_ok()
    }
}

fn join_base(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

impl Config {
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        let mut config = if std::path::Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            toml::from_str(&contents)?
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            default_config
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Credentials are normally supplied through the environment rather than the file
    pub fn apply_env_overrides(&mut self) {
        if let Ok(email) = std::env::var(ENV_EMAIL) {
            self.upstream.email = Some(email);
        }
        if let Ok(password) = std::env::var(ENV_PASSWORD) {
            self.upstream.password = Some(password);
        }
        if let Ok(nonce) = std::env::var(ENV_LOGIN_NONCE) {
            self.upstream.login_nonce = Some(nonce);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_defaults_match_upstream_site() {
        let config = Config::default();
        assert_eq!(
            config.upstream.ajax_url(),
            "https://the.invisimple.id/wp-admin/admin-ajax.php"
        );
        assert_eq!(
            config.upstream.login_url(),
            "https://the.invisimple.id/login"
        );
        assert_eq!(
            config.upstream.dashboard_url(),
            "https://the.invisimple.id/dashboard/invitation/create/"
        );
        assert_eq!(config.session.ttl, Duration::from_secs(10 * 60 * 60));
        assert_eq!(config.scraping.cache_ttl, Duration::from_secs(60 * 60));
        assert_eq!(config.scraping.timeout, Duration::from_secs(5));
        assert_eq!(config.scraping.per_page, 12);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [upstream]
            base_url = "http://127.0.0.1:9000/"

            [session]
            ttl = "2h"
            cache_file = "/tmp/session.json"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.upstream.ajax_url(),
            "http://127.0.0.1:9000/wp-admin/admin-ajax.php"
        );
        assert_eq!(config.session.ttl, Duration::from_secs(7200));
        assert_eq!(
            config.session.cache_file,
            Some(PathBuf::from("/tmp/session.json"))
        );
        assert_eq!(config.web.port, DEFAULT_PORT);
        assert_eq!(
            config.upstream.login_nonce.as_deref(),
            Some(DEFAULT_LOGIN_NONCE)
        );
    }

    #[test]
    fn test_missing_credentials() {
        let mut upstream = UpstreamConfig::default();
        assert!(upstream.credentials().is_err());

        upstream.email = Some("owner@example.com".to_string());
        assert!(upstream.credentials().is_err());

        upstream.password = Some("secret".to_string());
        assert_eq!(
            upstream.credentials().unwrap(),
            ("owner@example.com", "secret")
        );
    }

    #[test]
    #[serial]
    fn test_env_overrides_credentials() {
        std::env::set_var(ENV_EMAIL, "env@example.com");
        std::env::set_var(ENV_PASSWORD, "env-secret");
        std::env::set_var(ENV_LOGIN_NONCE, "0123456789");

        let mut config = Config::default();
        config.apply_env_overrides();

        std::env::remove_var(ENV_EMAIL);
        std::env::remove_var(ENV_PASSWORD);
        std::env::remove_var(ENV_LOGIN_NONCE);

        assert_eq!(config.upstream.email.as_deref(), Some("env@example.com"));
        assert_eq!(config.upstream.password.as_deref(), Some("env-secret"));
        assert_eq!(config.upstream.login_nonce.as_deref(), Some("0123456789"));
    }

    #[test]
    #[serial]
    fn test_load_writes_default_file_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path_str = path.to_str().unwrap();

        let config = Config::load_from_file(path_str).unwrap();
        assert!(path.exists());
        assert_eq!(config.web.port, DEFAULT_PORT);

        let reloaded = Config::load_from_file(path_str).unwrap();
        assert_eq!(reloaded.session.ttl, config.session.ttl);
        assert_eq!(reloaded.scraping.base_url, config.scraping.base_url);
    }
}
