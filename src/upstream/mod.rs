//! Authenticated access to the WordPress AJAX endpoint
//!
//! The upstream site only answers theme queries for a logged-in user that
//! also presents a valid `__nonce`. This module logs in, scrapes the nonce
//! from the dashboard and keeps the resulting session in a pluggable store.

pub mod client;
pub mod nonce;
pub mod session;
pub mod session_manager;
pub mod session_store;

pub use client::UpstreamClient;
pub use nonce::extract_nonce;
pub use session::Session;
pub use session_manager::SessionManager;
pub use session_store::{create_session_store, FileSessionStore, MemorySessionStore, SessionStore};
