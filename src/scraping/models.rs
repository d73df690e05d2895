use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a response's data came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    /// Fetched during this request
    Live,
    /// Served from a cache entry younger than the TTL
    Cache,
    /// Served from an expired cache entry because the fetch failed
    Stale,
    /// Built-in sample data
    Sample,
}

/// Data together with its provenance
#[derive(Debug, Clone)]
pub struct Sourced<T> {
    pub data: T,
    pub origin: DataOrigin,
    pub fetched_at: DateTime<Utc>,
}

impl<T> Sourced<T> {
    pub fn new(data: T, origin: DataOrigin, fetched_at: DateTime<Utc>) -> Self {
        Self {
            data,
            origin,
            fetched_at,
        }
    }

    pub fn live(data: T) -> Self {
        Self::new(data, DataOrigin::Live, Utc::now())
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        Sourced {
            data: f(self.data),
            origin: self.origin,
            fetched_at: self.fetched_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicItem {
    pub id: usize,
    pub title: String,
    pub category: String,
    pub music_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VideoType {
    #[default]
    Invitation,
    Greeting,
}

impl VideoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoType::Invitation => "invitation",
            VideoType::Greeting => "greeting",
        }
    }

    /// Word used in the WhatsApp order message
    pub fn order_label(&self) -> &'static str {
        match self {
            VideoType::Invitation => "undangan",
            VideoType::Greeting => "ucapan",
        }
    }
}

impl fmt::Display for VideoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "invitation" | "" => Ok(VideoType::Invitation),
            "greeting" => Ok(VideoType::Greeting),
            other => Err(format!(
                "Unknown video type '{other}', expected 'invitation' or 'greeting'"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoItem {
    pub id: usize,
    pub title: String,
    pub image_url: String,
    pub category: String,
    #[serde(rename = "type")]
    pub video_type: VideoType,
    pub price: String,
    pub original_price: String,
    pub preview_url: String,
    pub video_url: String,
    pub order_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub id: usize,
    pub title: String,
    pub category: String,
    pub image_url: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryCategory {
    pub id: u32,
    pub name: &'static str,
}

impl DirectoryCategory {
    pub const fn new(id: u32, name: &'static str) -> Self {
        Self { id, name }
    }
}
