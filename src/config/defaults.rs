/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

// Upstream (WordPress AJAX) defaults
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://the.invisimple.id";
pub const DEFAULT_AJAX_PATH: &str = "/wp-admin/admin-ajax.php";
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_DASHBOARD_PATH: &str = "/dashboard/invitation/create/";
pub const DEFAULT_LOGIN_NONCE: &str = "d6c22f171c";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const DEFAULT_UPSTREAM_TIMEOUT: &str = "30s";

// Session cache defaults
pub const DEFAULT_SESSION_TTL: &str = "10h";

// Catalog defaults
pub const DEFAULT_CATALOG_CACHE_TTL: &str = "1h";
pub const DEFAULT_PER_PAGE: u32 = 12;

// Scraping defaults
pub const DEFAULT_SCRAPE_BASE_URL: &str = "https://momenic.webinvit.id";
pub const DEFAULT_SCRAPE_TIMEOUT: &str = "5s";
pub const DEFAULT_SCRAPE_CACHE_TTL: &str = "1h";
pub const DEFAULT_ORDER_PHONE: &str = "6285179897917";
pub const DEFAULT_THEME_DIRECTORY_URL: &str = "https://satumomen.com/api/themes";

// Environment overrides for upstream credentials
pub const ENV_EMAIL: &str = "INVISIMPLE_EMAIL";
pub const ENV_PASSWORD: &str = "INVISIMPLE_PASSWORD";
pub const ENV_LOGIN_NONCE: &str = "INVISIMPLE_LOGIN_NONCE";
