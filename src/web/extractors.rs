//! Request extractors and validation

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{header::CONTENT_TYPE, request::Parts},
    Form,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::catalog::ThemeQuery;
use crate::config::defaults::DEFAULT_PER_PAGE;
use crate::errors::{AppError, WebError};
use crate::scraping::VideoType;

const MAX_PER_PAGE: u32 = 100;

/// Search and pagination shared by every listing endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ListingParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    /// Falls back to the configured page size when absent
    #[serde(default)]
    pub per_page: Option<u32>,
}

fn default_page() -> u32 {
    1
}

impl Default for ListingParams {
    fn default() -> Self {
        Self {
            search: None,
            page: default_page(),
            per_page: None,
        }
    }
}

impl ListingParams {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.page < 1 {
            return Err(WebError::invalid_request("page", "Page must be >= 1").into());
        }
        if let Some(per_page) = self.per_page {
            if per_page < 1 || per_page > MAX_PER_PAGE {
                return Err(WebError::invalid_request(
                    "per_page",
                    format!("per_page must be between 1 and {MAX_PER_PAGE}"),
                )
                .into());
            }
        }
        Ok(())
    }

    pub fn per_page_or(&self, configured: u32) -> u32 {
        let fallback = if configured == 0 {
            DEFAULT_PER_PAGE
        } else {
            configured
        };
        self.per_page.unwrap_or(fallback)
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }
}

/// Deserialize the query string, reporting failures against `field`
fn parse_query<T: DeserializeOwned>(parts: &Parts, field: &str) -> Result<T, AppError> {
    Query::<T>::try_from_uri(&parts.uri)
        .map(|Query(params)| params)
        .map_err(|e| WebError::invalid_request(field, e.body_text()).into())
}

#[async_trait]
impl<S> FromRequestParts<S> for ListingParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let params: ListingParams = parse_query(parts, "query")?;
        params.validate()?;
        Ok(params)
    }
}

/// `?type=` for the video listing, defaulting to invitation videos
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoTypeParam(pub VideoType);

#[derive(Deserialize)]
struct RawVideoType {
    #[serde(rename = "type", default)]
    video_type: Option<String>,
}

#[async_trait]
impl<S> FromRequestParts<S> for VideoTypeParam
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw: RawVideoType = parse_query(parts, "type")?;
        match raw.video_type {
            Some(value) => value
                .parse()
                .map(VideoTypeParam)
                .map_err(|message: String| WebError::invalid_request("type", message).into()),
            None => Ok(VideoTypeParam::default()),
        }
    }
}

/// Theme catalog filters
#[derive(Debug, Clone, Deserialize)]
pub struct ThemeFilterParams {
    #[serde(default = "default_with_photo")]
    pub with_photo: bool,
    #[serde(default)]
    pub category: Option<String>,
}

fn default_with_photo() -> bool {
    true
}

#[async_trait]
impl<S> FromRequestParts<S> for ThemeFilterParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parse_query(parts, "with_photo")
    }
}

/// Theme directory filter; 0 selects every category
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirectoryParams {
    #[serde(default)]
    pub category_id: u32,
}

#[async_trait]
impl<S> FromRequestParts<S> for DirectoryParams
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parse_query(parts, "category_id")
    }
}

/// Theme query from a JSON or form encoded body
///
/// An empty body, or JSON that is not an object, means an unfiltered query.
#[derive(Debug, Clone, Default)]
pub struct ThemeQueryBody(pub ThemeQuery);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

#[async_trait]
impl<S> FromRequest<S> for ThemeQueryBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(query) = Form::<ThemeQuery>::from_request(req, state)
                .await
                .map_err(|e| WebError::invalid_request("body", e.body_text()))?;
            return Ok(Self(query));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| WebError::invalid_request("body", e.body_text()))?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        // Valid JSON that is not an object carries no filters
        let value: Value = serde_json::from_slice(&body).map_err(WebError::JsonParse)?;
        if !value.is_object() {
            return Ok(Self::default());
        }
        let query: ThemeQuery = serde_json::from_value(value)
            .map_err(|e| WebError::invalid_request("body", e.to_string()))?;
        Ok(Self(query))
    }
}
