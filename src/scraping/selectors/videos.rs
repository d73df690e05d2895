use scraper::ElementRef;

use super::parser::{CardExtractor, SelectorChain};
use crate::errors::ScrapeResult;
use crate::scraping::models::{VideoItem, VideoType};
use crate::utils::UrlUtils;

const DEFAULT_CATEGORY: &str = "Unknown";
const DEFAULT_PRICE: &str = "Rp 200.000";
const DEFAULT_ORIGINAL_PRICE: &str = "Rp 250.000";
const VIDEO_ASSET_BASE: &str = "https://assets.satumomen.com/videos";

/// Cards on the `/video?type=` page
pub struct VideoParser {
    base_url: String,
    order_phone: String,
    video_type: VideoType,
    cards: SelectorChain,
    title: SelectorChain,
    image: SelectorChain,
    category: SelectorChain,
    price: SelectorChain,
    original_price: SelectorChain,
}

impl VideoParser {
    pub fn new(
        base_url: impl Into<String>,
        order_phone: impl Into<String>,
        video_type: VideoType,
    ) -> ScrapeResult<Self> {
        Ok(Self {
            base_url: base_url.into(),
            order_phone: order_phone.into(),
            video_type,
            cards: SelectorChain::parse(&[".card"])?,
            title: SelectorChain::parse(&[".h5.font-weight-light", ".card-title"])?,
            image: SelectorChain::parse(&["img.w-100.h-100.rounded", "img"])?,
            category: SelectorChain::parse(&[".badge.badge-warning", ".badge"])?,
            price: SelectorChain::parse(&[".text-danger.font-weight-bold"])?,
            original_price: SelectorChain::parse(&[".text-gray"])?,
        })
    }

    fn order_url(&self, title: &str) -> String {
        let text = format!(
            "Halo Minmo, saya ingin pesan video {} {}",
            self.video_type.order_label(),
            title
        );
        UrlUtils::whatsapp_url(&self.order_phone, &text)
    }
}

impl CardExtractor for VideoParser {
    type Item = VideoItem;

    fn kind(&self) -> &'static str {
        "video"
    }

    fn cards(&self) -> &SelectorChain {
        &self.cards
    }

    fn extract(&self, card: ElementRef<'_>, id: usize) -> Option<VideoItem> {
        let title = self.title.text(card)?;
        let image = self.image.attr(card, "src").unwrap_or_default();
        let slug = UrlUtils::slugify(&title);

        Some(VideoItem {
            id,
            image_url: UrlUtils::absolutize(&self.base_url, &image),
            category: self
                .category
                .text(card)
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            video_type: self.video_type,
            price: self
                .price
                .text(card)
                .unwrap_or_else(|| DEFAULT_PRICE.to_string()),
            original_price: self
                .original_price
                .text(card)
                .unwrap_or_else(|| DEFAULT_ORIGINAL_PRICE.to_string()),
            preview_url: format!("{}/preview/{}", self.base_url.trim_end_matches('/'), slug),
            video_url: format!("{VIDEO_ASSET_BASE}/{slug}.mp4"),
            order_url: self.order_url(&title),
            title,
        })
    }
}
