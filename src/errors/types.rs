//! Error type definitions for the Momenic catalog proxy
//!
//! This module defines all error types used throughout the application,
//! providing a hierarchical error system that keeps the upstream failure
//! modes (login, nonce, scraping) distinguishable up to the HTTP boundary.

use thiserror::Error;

/// Top-level application error type
///
/// This enum represents all possible errors that can occur in the application.
/// It uses `thiserror` to provide automatic error trait implementations and
/// proper error chaining.
#[derive(Error, Debug)]
pub enum AppError {
    /// Session acquisition errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Upstream AJAX endpoint errors
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Scraping errors
    #[error("Scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    /// Web layer errors
    #[error("Web error: {0}")]
    Web(#[from] WebError),

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors raised while logging in and acquiring cookies and a nonce
#[derive(Error, Debug)]
pub enum SessionError {
    /// Email or password are not configured
    #[error("Missing credentials: {message}")]
    MissingCredentials { message: String },

    /// The upstream login did not yield a usable session
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// The session cache could not be read or written
    #[error("Session cache error: {path} - {message}")]
    Cache { path: String, message: String },
}

/// Errors raised by the upstream AJAX endpoint
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Non-2xx HTTP status
    #[error("HTTP error! status: {status}")]
    Status { status: u16, url: String },

    /// Response body was not the JSON we expected
    #[error("Invalid JSON response: {message}")]
    MalformedJson { message: String },

    /// The upstream answered `success: false` because the nonce was not accepted
    #[error("Nonce rejected: {message}")]
    NonceExpired { message: String },

    /// The upstream answered `success: false` for any other reason
    ///
    /// `detail` keeps a structured `data` value so it can be returned as is.
    #[error("{message}")]
    Rejected {
        message: String,
        detail: Option<serde_json::Value>,
    },
}

/// Errors raised while fetching or parsing catalog pages
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Every direct and relayed attempt failed
    #[error("Failed to fetch {url} after {attempts} attempt(s): {last_error}")]
    FetchFailed {
        url: String,
        attempts: usize,
        last_error: String,
    },

    /// The page was fetched but no card selector produced an item
    #[error("No {kind} items found in {url}")]
    NoMatches { kind: String, url: String },

    /// The page or feed could not be decoded
    #[error("Parse error: {kind} - {message}")]
    Parse { kind: String, message: String },
}

/// Web layer specific errors
#[derive(Error, Debug)]
pub enum WebError {
    /// Invalid request format
    #[error("Invalid request: {field} - {message}")]
    InvalidRequest { field: String, message: String },

    /// Request body is not valid JSON
    #[error("Invalid JSON in request body: {0}")]
    JsonParse(#[from] serde_json::Error),
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl SessionError {
    /// Create an authentication failed error
    pub fn auth_failed<M: Into<String>>(message: M) -> Self {
        Self::AuthenticationFailed {
            message: message.into(),
        }
    }

    /// Create a missing credentials error
    pub fn missing_credentials<M: Into<String>>(message: M) -> Self {
        Self::MissingCredentials {
            message: message.into(),
        }
    }

    /// Create a cache error
    pub fn cache<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::Cache {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl UpstreamError {
    /// Create a status error
    pub fn status<U: Into<String>>(status: u16, url: U) -> Self {
        Self::Status {
            status,
            url: url.into(),
        }
    }

    /// Create a malformed JSON error
    pub fn malformed<M: Into<String>>(message: M) -> Self {
        Self::MalformedJson {
            message: message.into(),
        }
    }

    /// Create a rejection error carrying the upstream message
    pub fn rejected<M: Into<String>>(message: M) -> Self {
        Self::Rejected {
            message: message.into(),
            detail: None,
        }
    }

    /// Create a rejection whose upstream `data` was not a plain string
    pub fn rejected_with_detail(detail: serde_json::Value) -> Self {
        Self::Rejected {
            message: detail.to_string(),
            detail: Some(detail),
        }
    }
}

impl ScrapeError {
    /// Create a fetch failure error
    pub fn fetch_failed<U: Into<String>, E: Into<String>>(
        url: U,
        attempts: usize,
        last_error: E,
    ) -> Self {
        Self::FetchFailed {
            url: url.into(),
            attempts,
            last_error: last_error.into(),
        }
    }

    /// Create a no-matches error
    pub fn no_matches<K: Into<String>, U: Into<String>>(kind: K, url: U) -> Self {
        Self::NoMatches {
            kind: kind.into(),
            url: url.into(),
        }
    }

    /// Create a parse error
    pub fn parse<K: Into<String>, M: Into<String>>(kind: K, message: M) -> Self {
        Self::Parse {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl WebError {
    /// Create an invalid request error
    pub fn invalid_request<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::InvalidRequest {
            field: field.into(),
            message: message.into(),
        }
    }
}
