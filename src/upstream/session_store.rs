//! Where the current session lives between requests
//!
//! The in-memory store suits a long-running process. The file store keeps
//! the session across restarts and short-lived workers.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::session::Session;
use crate::config::SessionConfig;
use crate::errors::{SessionError, SessionResult};
use crate::utils::fs::write_private;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The stored session, if any. Unreadable state counts as empty.
    async fn load(&self) -> Option<Session>;

    async fn save(&self, session: &Session) -> SessionResult<()>;

    async fn clear(&self) -> SessionResult<()>;

    /// Short name reported by diagnostics
    fn kind(&self) -> &'static str;

    /// Backing file, when there is one
    fn location(&self) -> Option<&Path> {
        None
    }
}

/// Process-wide session held in memory
#[derive(Default)]
pub struct MemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    async fn save(&self, session: &Session) -> SessionResult<()> {
        *self.session.write().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> SessionResult<()> {
        *self.session.write().await = None;
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}

/// Session persisted as a JSON file readable only by the owner
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn cache_error(&self, message: impl std::fmt::Display) -> SessionError {
        SessionError::cache(self.path.display().to_string(), message.to_string())
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Option<Session> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(
                    "Failed to read session cache {}: {}",
                    self.path.display(),
                    e
                );
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(
                    "Ignoring corrupt session cache {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    async fn save(&self, session: &Session) -> SessionResult<()> {
        let contents = serde_json::to_vec(session).map_err(|e| self.cache_error(e))?;
        write_private(&self.path, &contents)
            .await
            .map_err(|e| self.cache_error(e))?;

        debug!("Saved session cache to {}", self.path.display());
        Ok(())
    }

    async fn clear(&self) -> SessionResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.cache_error(e)),
        }
    }

    fn kind(&self) -> &'static str {
        "file"
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// File store when `session.cache_file` is configured, memory otherwise
pub fn create_session_store(config: &SessionConfig) -> Arc<dyn SessionStore> {
    match &config.cache_file {
        Some(path) => Arc::new(FileSessionStore::new(path.clone())),
        None => Arc::new(MemorySessionStore::new()),
    }
}
