use scraper::ElementRef;

use super::parser::{CardExtractor, SelectorChain};
use crate::errors::ScrapeResult;
use crate::scraping::models::MusicItem;
use crate::utils::UrlUtils;

const DEFAULT_CATEGORY: &str = "Wedding";

/// Cards on the `/music` page
pub struct MusicParser {
    base_url: String,
    cards: SelectorChain,
    url: SelectorChain,
    title: SelectorChain,
    category: SelectorChain,
}

impl MusicParser {
    pub fn new(base_url: impl Into<String>) -> ScrapeResult<Self> {
        Ok(Self {
            base_url: base_url.into(),
            cards: SelectorChain::parse(&[".col-md-6.col-lg-4.mb-4", ".d-flex"])?,
            url: SelectorChain::parse(&["button[data-music]", ".btn-music[data-music]"])?,
            title: SelectorChain::parse(&["h6.mb-0", "h6"])?,
            category: SelectorChain::parse(&[".text-gray", "small"])?,
        })
    }
}

impl CardExtractor for MusicParser {
    type Item = MusicItem;

    fn kind(&self) -> &'static str {
        "music"
    }

    fn cards(&self) -> &SelectorChain {
        &self.cards
    }

    fn extract(&self, card: ElementRef<'_>, id: usize) -> Option<MusicItem> {
        let music_url = self.url.attr(card, "data-music")?;
        let title = self.title.text(card)?;
        let category = self
            .category
            .text(card)
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        Some(MusicItem {
            id,
            title,
            category,
            music_url: UrlUtils::absolutize(&self.base_url, &music_url),
        })
    }
}
