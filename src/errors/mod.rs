//! Centralized error handling for the Momenic catalog proxy
//!
//! This module provides the error hierarchy shared by every layer of the
//! service and the HTTP mapping used by the web layer.
//!
//! # Error Categories
//!
//! - **Session Errors**: login, cookie and nonce acquisition against the upstream site
//! - **Upstream Errors**: non-2xx answers, malformed JSON, rejected AJAX calls, expired nonces
//! - **Scrape Errors**: relay failures and pages where no card selector matched
//! - **Web Errors**: malformed client requests
//!
//! # Usage
//!
//! ```rust
//! use momenic_proxy::errors::{AppError, AppResult};
//!
//! async fn example_function() -> AppResult<String> {
//!     Ok("success".to_string())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for session acquisition Results
pub type SessionResult<T> = Result<T, SessionError>;

/// Convenience type alias for scraping Results
pub type ScrapeResult<T> = Result<T, ScrapeError>;
