//! Public catalog listings scraped from the invitation site
//!
//! Music, video and portfolio pages are HTML and parsed with selector
//! chains; the theme directory is a JSON feed. All four share one fetcher,
//! one cache and one fallback order: fresh cache, live fetch, stale cache,
//! optional sample data.

pub mod cache;
pub mod directory;
pub mod listing;
pub mod models;
pub mod relay;
pub mod sample;
pub mod selectors;
pub mod service;

pub use cache::{CacheLookup, CacheStore};
pub use models::{DataOrigin, MusicItem, PortfolioItem, Sourced, VideoItem, VideoType};
pub use relay::{PageSource, RelayFetcher};
pub use service::ScrapingService;
