use axum::{extract::State, response::Response};

use crate::catalog::{categories, ThemeFilter};
use crate::errors::AppError;
use crate::web::{
    extractors::{ListingParams, ThemeFilterParams},
    responses::{ok, SourcedPage},
    AppState,
};

/// Normalized themes, filtered and paginated
pub async fn list_themes(
    State(state): State<AppState>,
    listing: ListingParams,
    filter: ThemeFilterParams,
) -> Result<Response, AppError> {
    let themes = state.catalog.all_themes().await?;
    let filter = ThemeFilter {
        with_photo: Some(filter.with_photo),
        category: filter.category,
        search: listing.search.clone(),
    };

    let per_page = listing.per_page_or(state.config.catalog.per_page);
    let page = SourcedPage::paginate(themes.map(|t| filter.apply(t)), listing.page, per_page);
    Ok(ok(page))
}

pub async fn list_categories(State(state): State<AppState>) -> Result<Response, AppError> {
    let themes = state.catalog.all_themes().await?;
    Ok(ok(categories(&themes.data)))
}
