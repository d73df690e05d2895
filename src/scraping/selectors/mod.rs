//! CSS selector chains for the catalog site's listing pages
//!
//! Every field is looked up through an ordered list of alternative
//! selectors so small markup changes on the site degrade gracefully.

pub mod music;
pub mod parser;
pub mod portfolio;
pub mod videos;

pub use music::MusicParser;
pub use parser::{extract_cards, CardExtractor, SelectorChain};
pub use portfolio::PortfolioParser;
pub use videos::VideoParser;
