//! Scraped catalog listings

use axum::{extract::State, response::Response};

use crate::errors::AppError;
use crate::scraping::{directory, listing};
use crate::web::{
    extractors::{DirectoryParams, ListingParams, VideoTypeParam},
    responses::{ok, SourcedPage},
    AppState,
};

pub async fn list_music(
    State(state): State<AppState>,
    params: ListingParams,
) -> Result<Response, AppError> {
    let music = state.scraping.music().await?;
    let per_page = params.per_page_or(state.config.scraping.per_page);
    let page = SourcedPage::paginate(
        music.map(|items| listing::search(items, params.search())),
        params.page,
        per_page,
    );
    Ok(ok(page))
}

pub async fn list_videos(
    State(state): State<AppState>,
    VideoTypeParam(video_type): VideoTypeParam,
    params: ListingParams,
) -> Result<Response, AppError> {
    let videos = state.scraping.videos(video_type).await?;
    let per_page = params.per_page_or(state.config.scraping.per_page);
    let page = SourcedPage::paginate(
        videos.map(|items| listing::search(items, params.search())),
        params.page,
        per_page,
    );
    Ok(ok(page))
}

pub async fn list_portfolio(
    State(state): State<AppState>,
    params: ListingParams,
) -> Result<Response, AppError> {
    let portfolio = state.scraping.portfolio().await?;
    let per_page = params.per_page_or(state.config.scraping.per_page);
    let page = SourcedPage::paginate(
        portfolio.map(|items| listing::search(items, params.search())),
        params.page,
        per_page,
    );
    Ok(ok(page))
}

pub async fn list_theme_directory(
    State(state): State<AppState>,
    params: ListingParams,
    filter: DirectoryParams,
) -> Result<Response, AppError> {
    let themes = state.scraping.theme_directory().await?;
    let per_page = params.per_page_or(state.config.scraping.per_page);
    let page = SourcedPage::paginate(
        themes.map(|items| directory::filter_directory(items, filter.category_id, params.search())),
        params.page,
        per_page,
    );
    Ok(ok(page))
}

pub async fn directory_categories() -> Response {
    ok(directory::CATEGORIES)
}
