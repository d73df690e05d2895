//! Shared helpers for URL handling and HTTP client construction

pub mod fs;
pub mod http_client;
pub mod url;

pub use http_client::{build_client, HttpClientOptions};
pub use url::UrlUtils;
