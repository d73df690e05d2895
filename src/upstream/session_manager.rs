use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::client::UpstreamClient;
use super::session::Session;
use super::session_store::SessionStore;
use crate::errors::AppResult;

/// Hands out a fresh upstream session, logging in when needed
///
/// Concurrent callers that all find the session stale will each log in;
/// the last save wins.
pub struct SessionManager {
    client: Arc<UpstreamClient>,
    store: Arc<dyn SessionStore>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(client: Arc<UpstreamClient>, store: Arc<dyn SessionStore>, ttl: Duration) -> Self {
        Self { client, store, ttl }
    }

    pub fn client(&self) -> &Arc<UpstreamClient> {
        &self.client
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached session when still fresh, otherwise a new login
    pub async fn get_session(&self) -> AppResult<Session> {
        if let Some(session) = self.store.load().await {
            if session.is_fresh(self.ttl) {
                debug!("Reusing upstream session aged {:?}", session.age());
                return Ok(session);
            }
            info!("Cached upstream session expired, logging in again");
        } else {
            info!("No cached upstream session, logging in");
        }

        self.login_and_store().await
    }

    pub async fn invalidate(&self) -> AppResult<()> {
        self.store.clear().await?;
        Ok(())
    }

    /// Discard the current session and log in again
    pub async fn refresh(&self) -> AppResult<Session> {
        self.invalidate().await?;
        self.login_and_store().await
    }

    /// The stored session, fresh or not
    pub async fn peek(&self) -> Option<Session> {
        self.store.load().await
    }

    async fn login_and_store(&self) -> AppResult<Session> {
        let session = self.client.login().await?;
        self.store.save(&session).await?;
        Ok(session)
    }
}
