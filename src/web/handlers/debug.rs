//! Setup diagnostics
//!
//! Answers "why are themes not loading" without exposing credentials,
//! cookies or the session nonce.

use axum::{extract::State, response::Response};
use serde::Serialize;

use crate::upstream::client::LoginPageCheck;
use crate::utils::fs::{dir_writable, parent_dir};
use crate::web::{responses::ok, AppState};

#[derive(Debug, Serialize)]
pub struct CredentialsReport {
    pub email_configured: bool,
    pub password_configured: bool,
    pub fallback_login_nonce_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub store: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub writable: Option<bool>,
    pub cached: bool,
    pub fresh: bool,
    pub age_seconds: Option<u64>,
    pub ttl_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct ScrapeCacheReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
    pub writable: Option<bool>,
    pub ttl_seconds: u64,
    pub relays: usize,
}

#[derive(Debug, Serialize)]
pub struct DebugReport {
    pub credentials: CredentialsReport,
    pub session: SessionReport,
    pub scrape_cache: ScrapeCacheReport,
    pub login_page: LoginPageCheck,
    pub ready: bool,
}

pub async fn diagnostics(State(state): State<AppState>) -> Response {
    let upstream = &state.config.upstream;
    let credentials = CredentialsReport {
        email_configured: upstream
            .email
            .as_deref()
            .is_some_and(|e| !e.trim().is_empty()),
        password_configured: upstream.password.as_deref().is_some_and(|p| !p.is_empty()),
        fallback_login_nonce_configured: upstream
            .login_nonce
            .as_deref()
            .is_some_and(|n| !n.is_empty()),
    };

    let sessions = &state.sessions;
    let store = sessions.store();
    let cached = sessions.peek().await;
    let writable = match store.location() {
        Some(path) => Some(dir_writable(&parent_dir(path)).await),
        None => None,
    };
    let session = SessionReport {
        store: store.kind(),
        location: store.location().map(|p| p.display().to_string()),
        writable,
        cached: cached.is_some(),
        fresh: cached
            .as_ref()
            .is_some_and(|s| s.is_fresh(sessions.ttl())),
        age_seconds: cached.as_ref().map(|s| s.age().as_secs()),
        ttl_seconds: sessions.ttl().as_secs(),
    };

    let cache = state.scraping.cache();
    let scrape_cache = ScrapeCacheReport {
        directory: cache.dir().map(|p| p.display().to_string()),
        writable: cache.is_writable().await,
        ttl_seconds: cache.ttl().as_secs(),
        relays: state.scraping.config().relays.len(),
    };

    let login_page = sessions.client().check_login_page().await;

    let ready = credentials.email_configured
        && credentials.password_configured
        && (login_page.nonce_found || credentials.fallback_login_nonce_configured)
        && session.writable.unwrap_or(true);

    ok(DebugReport {
        credentials,
        session,
        scrape_cache,
        login_page,
        ready,
    })
}
