use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

use super::cache::{CacheLookup, CacheStore};
use super::directory::parse_directory;
use super::models::{DataOrigin, MusicItem, PortfolioItem, Sourced, VideoItem, VideoType};
use super::relay::PageSource;
use super::sample;
use super::selectors::{extract_cards, MusicParser, PortfolioParser, VideoParser};
use crate::config::ScrapingConfig;
use crate::errors::ScrapeResult;

/// Fetches, parses and caches every scraped listing
pub struct ScrapingService {
    config: ScrapingConfig,
    source: Arc<dyn PageSource>,
    cache: CacheStore,
    music: MusicParser,
    invitation_videos: VideoParser,
    greeting_videos: VideoParser,
    portfolio: PortfolioParser,
}

impl ScrapingService {
    pub fn new(config: ScrapingConfig, source: Arc<dyn PageSource>) -> ScrapeResult<Self> {
        let base = config.base_url.trim_end_matches('/').to_string();
        let cache = CacheStore::new(config.cache_ttl, config.cache_dir.clone());

        Ok(Self {
            music: MusicParser::new(base.clone())?,
            invitation_videos: VideoParser::new(
                base.clone(),
                config.order_phone.clone(),
                VideoType::Invitation,
            )?,
            greeting_videos: VideoParser::new(
                base.clone(),
                config.order_phone.clone(),
                VideoType::Greeting,
            )?,
            portfolio: PortfolioParser::new(base)?,
            config,
            source,
            cache,
        })
    }

    pub fn config(&self) -> &ScrapingConfig {
        &self.config
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    fn page_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    pub async fn music(&self) -> ScrapeResult<Sourced<Vec<MusicItem>>> {
        let url = self.page_url("/music");
        self.load(
            "music",
            async {
                let html = self.source.fetch_text(&url).await?;
                extract_cards(&self.music, &html, &url)
            },
            || sample::music(&self.config.base_url),
        )
        .await
    }

    pub async fn videos(&self, video_type: VideoType) -> ScrapeResult<Sourced<Vec<VideoItem>>> {
        let url = self.page_url(&format!("/video?type={video_type}"));
        let parser = match video_type {
            VideoType::Invitation => &self.invitation_videos,
            VideoType::Greeting => &self.greeting_videos,
        };
        self.load(
            &format!("videos-{video_type}"),
            async {
                let html = self.source.fetch_text(&url).await?;
                extract_cards(parser, &html, &url)
            },
            || sample::videos(&self.config.base_url, &self.config.order_phone, video_type),
        )
        .await
    }

    pub async fn portfolio(&self) -> ScrapeResult<Sourced<Vec<PortfolioItem>>> {
        let url = self.page_url("/portofolio");
        self.load(
            "portfolio",
            async {
                let html = self.source.fetch_text(&url).await?;
                extract_cards(&self.portfolio, &html, &url)
            },
            || sample::portfolio(&self.config.base_url),
        )
        .await
    }

    pub async fn theme_directory(&self) -> ScrapeResult<Sourced<Vec<Value>>> {
        let url = self.config.theme_directory_url.clone();
        self.load(
            "theme-directory",
            async {
                let body = self.source.fetch_text(&url).await?;
                parse_directory(&body)
            },
            Vec::new,
        )
        .await
    }

    /// Fresh cache, else live fetch, else stale cache, else sample data
    async fn load<T, F, S>(&self, key: &str, fetch: F, sample: S) -> ScrapeResult<Sourced<Vec<T>>>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = ScrapeResult<Vec<T>>>,
        S: FnOnce() -> Vec<T>,
    {
        let stale = match self.cache.lookup::<Vec<T>>(key).await {
            CacheLookup::Fresh(data, at) => return Ok(Sourced::new(data, DataOrigin::Cache, at)),
            CacheLookup::Stale(data, at) => Some((data, at)),
            CacheLookup::Miss => None,
        };

        let error = match fetch.await {
            Ok(items) => {
                info!("Fetched {} {} item(s)", items.len(), key);
                self.cache.put(key, &items).await;
                return Ok(Sourced::live(items));
            }
            Err(e) => e,
        };

        if let Some((data, at)) = stale {
            warn!("Serving stale {} from {}: {}", key, at, error);
            return Ok(Sourced::new(data, DataOrigin::Stale, at));
        }

        if self.config.sample_fallback {
            let items = sample();
            if !items.is_empty() {
                warn!("Serving sample {}: {}", key, error);
                return Ok(Sourced::new(items, DataOrigin::Sample, chrono::Utc::now()));
            }
        }

        Err(error)
    }
}
