//! Invitation theme catalog served by the authenticated upstream

pub mod normalize;
pub mod themes;

pub use normalize::{categories, normalize_themes, Theme, ThemeFilter};
pub use themes::{classify_response, CatalogService, ThemeQuery, THEMES_CACHE_KEY};
