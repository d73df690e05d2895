use scraper::{ElementRef, Html, Selector};

use crate::errors::{ScrapeError, ScrapeResult};

/// Ordered CSS alternatives; the first one that matches wins
#[derive(Debug, Clone)]
pub struct SelectorChain {
    selectors: Vec<Selector>,
}

impl SelectorChain {
    pub fn parse(alternatives: &[&str]) -> ScrapeResult<Self> {
        let selectors = alternatives
            .iter()
            .map(|css| {
                Selector::parse(css)
                    .map_err(|e| ScrapeError::parse("selector", format!("{css}: {e}")))
            })
            .collect::<ScrapeResult<Vec<_>>>()?;
        Ok(Self { selectors })
    }

    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    /// Trimmed text of the first matching element, ignoring empty text
    pub fn text(&self, scope: ElementRef<'_>) -> Option<String> {
        self.selectors.iter().find_map(|selector| {
            scope
                .select(selector)
                .map(element_text)
                .find(|text| !text.is_empty())
        })
    }

    /// Attribute of the first matching element that carries it
    pub fn attr(&self, scope: ElementRef<'_>, name: &str) -> Option<String> {
        self.selectors.iter().find_map(|selector| {
            scope
                .select(selector)
                .filter_map(|el| el.value().attr(name))
                .map(str::trim)
                .find(|value| !value.is_empty())
                .map(str::to_string)
        })
    }
}

/// Collapse an element's text nodes into one trimmed string
pub fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Turns one listing card into an item
pub trait CardExtractor {
    type Item;

    /// Item kind used in error messages
    fn kind(&self) -> &'static str;

    /// Card container selectors, tried in order
    fn cards(&self) -> &SelectorChain;

    /// Build an item from a card, `None` when required fields are missing
    fn extract(&self, card: ElementRef<'_>, id: usize) -> Option<Self::Item>;
}

/// Extract items using the first card selector that yields any
///
/// Ids are 1-based positions among the items kept. A page with no usable
/// card is an error, never an empty list.
pub fn extract_cards<E: CardExtractor>(
    extractor: &E,
    html: &str,
    url: &str,
) -> ScrapeResult<Vec<E::Item>> {
    let document = Html::parse_document(html);

    for selector in extractor.cards().selectors() {
        let mut items = Vec::new();
        for card in document.select(selector) {
            if let Some(item) = extractor.extract(card, items.len() + 1) {
                items.push(item);
            }
        }
        if !items.is_empty() {
            return Ok(items);
        }
    }

    Err(ScrapeError::no_matches(extractor.kind(), url))
}
