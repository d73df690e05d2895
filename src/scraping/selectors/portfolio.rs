use scraper::ElementRef;

use super::parser::{CardExtractor, SelectorChain};
use crate::errors::ScrapeResult;
use crate::scraping::models::PortfolioItem;
use crate::utils::UrlUtils;

const DEFAULT_CATEGORY: &str = "Wedding";

/// Cards on the `/portofolio` page
pub struct PortfolioParser {
    base_url: String,
    cards: SelectorChain,
    link: SelectorChain,
    image: SelectorChain,
    category: SelectorChain,
    title: SelectorChain,
}

impl PortfolioParser {
    pub fn new(base_url: impl Into<String>) -> ScrapeResult<Self> {
        Ok(Self {
            base_url: base_url.into(),
            cards: SelectorChain::parse(&[".col-6.col-md-4.col-lg-3.mb-4"])?,
            link: SelectorChain::parse(&["a[href]"])?,
            image: SelectorChain::parse(&["img[src]"])?,
            category: SelectorChain::parse(&[".small"])?,
            title: SelectorChain::parse(&[".h6"])?,
        })
    }
}

impl CardExtractor for PortfolioParser {
    type Item = PortfolioItem;

    fn kind(&self) -> &'static str {
        "portfolio"
    }

    fn cards(&self) -> &SelectorChain {
        &self.cards
    }

    fn extract(&self, card: ElementRef<'_>, id: usize) -> Option<PortfolioItem> {
        let title = self.title.text(card)?;
        let image = self.image.attr(card, "src")?;
        let link = self.link.attr(card, "href").unwrap_or_default();

        Some(PortfolioItem {
            id,
            title,
            category: self
                .category
                .text(card)
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            image_url: UrlUtils::absolutize(&self.base_url, &image),
            link: UrlUtils::absolutize(&self.base_url, &link),
        })
    }
}
