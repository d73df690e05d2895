//! Timestamped cache for fetched catalog data
//!
//! Entries are `{data, timestamp}` records keyed by name. They live in memory
//! and, when a directory is configured, are mirrored to `<key>.json` files so
//! a restart still has something to fall back on.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::utils::fs::dir_writable;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: Value,
    /// Milliseconds since the epoch
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl CacheEntry {
    pub fn age(&self) -> Duration {
        (Utc::now() - self.timestamp).to_std().unwrap_or_default()
    }
}

/// Outcome of a typed cache lookup
#[derive(Debug)]
pub enum CacheLookup<T> {
    Fresh(T, DateTime<Utc>),
    Stale(T, DateTime<Utc>),
    Miss,
}

pub struct CacheStore {
    ttl: Duration,
    dir: Option<PathBuf>,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl CacheStore {
    pub fn new(ttl: Duration, dir: Option<PathBuf>) -> Self {
        Self {
            ttl,
            dir,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn in_memory(ttl: Duration) -> Self {
        Self::new(ttl, None)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    fn file_for(&self, key: &str) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.join(format!("{key}.json")))
    }

    /// Raw entry from memory, falling back to disk
    pub async fn entry(&self, key: &str) -> Option<CacheEntry> {
        if let Some(entry) = self.entries.read().await.get(key) {
            return Some(entry.clone());
        }

        let path = self.file_for(key)?;
        let contents = tokio::fs::read_to_string(&path).await.ok()?;
        match serde_json::from_str::<CacheEntry>(&contents) {
            Ok(entry) => {
                self.entries
                    .write()
                    .await
                    .insert(key.to_string(), entry.clone());
                Some(entry)
            }
            Err(e) => {
                warn!("Ignoring corrupt cache file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Typed lookup distinguishing fresh from stale entries
    pub async fn lookup<T: DeserializeOwned>(&self, key: &str) -> CacheLookup<T> {
        let Some(entry) = self.entry(key).await else {
            return CacheLookup::Miss;
        };

        let fresh = entry.age() < self.ttl;
        match serde_json::from_value::<T>(entry.data) {
            Ok(data) if fresh => CacheLookup::Fresh(data, entry.timestamp),
            Ok(data) => CacheLookup::Stale(data, entry.timestamp),
            Err(e) => {
                warn!("Cached '{}' no longer matches its type: {}", key, e);
                CacheLookup::Miss
            }
        }
    }

    /// Store data now. Disk write failures are logged, never surfaced.
    pub async fn put<T: Serialize>(&self, key: &str, data: &T) {
        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to serialize '{}' for caching: {}", key, e);
                return;
            }
        };
        self.insert_entry(
            key,
            CacheEntry {
                data,
                timestamp: Utc::now(),
            },
        )
        .await;
    }

    pub async fn insert_entry(&self, key: &str, entry: CacheEntry) {
        if let Some(path) = self.file_for(key) {
            if let Err(e) = write_entry(&path, &entry).await {
                warn!("Failed to persist cache file {}: {}", path.display(), e);
            } else {
                debug!("Persisted cache entry to {}", path.display());
            }
        }
        self.entries.write().await.insert(key.to_string(), entry);
    }

    /// Whether the configured directory accepts writes; `None` when memory-only
    pub async fn is_writable(&self) -> Option<bool> {
        let dir = self.dir.as_ref()?;
        Some(dir_writable(dir).await)
    }
}

async fn write_entry(path: &Path, entry: &CacheEntry) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let contents = serde_json::to_vec(entry)?;
    tokio::fs::write(path, contents).await
}
