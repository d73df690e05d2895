//! Built-in listings served when nothing live or cached is available
//!
//! Only used when `scraping.sample_fallback` is enabled.

use super::models::{MusicItem, PortfolioItem, VideoItem, VideoType};
use super::selectors::{extract_cards, VideoParser};
use crate::utils::UrlUtils;

const SAMPLE_MUSIC: &[(&str, &str, &str)] = &[
    ("Beautiful in White", "Wedding", "/assets/music/beautiful-in-white.mp3"),
    ("A Thousand Years", "Wedding", "/assets/music/a-thousand-years.mp3"),
    ("Perfect", "Romantic", "/assets/music/perfect.mp3"),
    ("Barakallah", "Islami", "/assets/music/barakallah.mp3"),
];

const SAMPLE_VIDEOS: &[(&str, &str)] = &[
    ("Rustic Garden", "Premium"),
    ("Elegant Gold", "Premium"),
    ("Simple Love", "Basic"),
];

const SAMPLE_PORTFOLIO: &[(&str, &str)] = &[
    ("Andi dan Sari", "Wedding"),
    ("Aqiqah Rafa", "Aqiqah"),
    ("Khitan Fadil", "Khitan"),
];

pub fn music(base_url: &str) -> Vec<MusicItem> {
    SAMPLE_MUSIC
        .iter()
        .enumerate()
        .map(|(index, (title, category, path))| MusicItem {
            id: index + 1,
            title: title.to_string(),
            category: category.to_string(),
            music_url: UrlUtils::absolutize(base_url, path),
        })
        .collect()
}

/// Sample videos go through the real card parser so derived links match live data
pub fn videos(base_url: &str, order_phone: &str, video_type: VideoType) -> Vec<VideoItem> {
    let html: String = SAMPLE_VIDEOS
        .iter()
        .map(|(title, category)| {
            format!(
                r#"<div class="card"><span class="badge badge-warning">{category}</span><div class="h5 font-weight-light">{title}</div></div>"#
            )
        })
        .collect();

    VideoParser::new(base_url, order_phone, video_type)
        .and_then(|parser| extract_cards(&parser, &html, base_url))
        .unwrap_or_default()
}

pub fn portfolio(base_url: &str) -> Vec<PortfolioItem> {
    SAMPLE_PORTFOLIO
        .iter()
        .enumerate()
        .map(|(index, (title, category))| {
            let slug = UrlUtils::slugify(title);
            PortfolioItem {
                id: index + 1,
                title: title.to_string(),
                category: category.to_string(),
                image_url: UrlUtils::absolutize(base_url, &format!("/assets/portfolio/{slug}.jpg")),
                link: UrlUtils::absolutize(base_url, &format!("/{slug}")),
            }
        })
        .collect()
}
