//! HTTP response types and utilities
//!
//! Standardized response types and the single mapping from `AppError`
//! to status codes used by every endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

use crate::errors::{AppError, ScrapeError, SessionError, UpstreamError, WebError};
use crate::scraping::{DataOrigin, Sourced};

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation was successful
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (present on failure), or the upstream's structured rejection
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn error(error: impl Into<Value>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error.into()),
            timestamp: Utc::now(),
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: u64,
    /// Current page number (1-based)
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, per_page: u32) -> Self {
        let total_pages = if per_page > 0 {
            total.div_ceil(u64::from(per_page)) as u32
        } else {
            1
        };

        Self {
            items,
            total,
            page,
            per_page,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }
}

/// A page of listing data annotated with where it came from
#[derive(Debug, Clone, Serialize)]
pub struct SourcedPage<T> {
    #[serde(flatten)]
    pub page: PaginatedResponse<T>,
    pub origin: DataOrigin,
    pub fetched_at: DateTime<Utc>,
}

impl<T> SourcedPage<T> {
    /// Paginate already filtered items, keeping their provenance
    pub fn paginate(sourced: Sourced<Vec<T>>, page: u32, per_page: u32) -> Self {
        let (items, total) = crate::scraping::listing::paginate(sourced.data, page, per_page);
        Self {
            page: PaginatedResponse::new(items, total, page, per_page),
            origin: sourced.origin,
            fetched_at: sourced.fetched_at,
        }
    }
}

/// Status and client-facing message for an error
pub fn error_status(error: &AppError) -> (StatusCode, String) {
    match error {
        AppError::Upstream(UpstreamError::Rejected { message, .. })
        | AppError::Upstream(UpstreamError::NonceExpired { message }) => {
            (StatusCode::BAD_REQUEST, message.clone())
        }
        AppError::Upstream(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
        AppError::Session(SessionError::MissingCredentials { message }) => {
            (StatusCode::INTERNAL_SERVER_ERROR, message.clone())
        }
        AppError::Session(e @ SessionError::AuthenticationFailed { .. }) => {
            (StatusCode::BAD_GATEWAY, e.to_string())
        }
        AppError::Session(e @ SessionError::Cache { .. }) => {
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        AppError::Scrape(e @ ScrapeError::NoMatches { .. })
        | AppError::Scrape(e @ ScrapeError::FetchFailed { .. })
        | AppError::Scrape(e @ ScrapeError::Parse { .. }) => {
            (StatusCode::BAD_GATEWAY, e.to_string())
        }
        AppError::Web(WebError::JsonParse(_)) => (
            StatusCode::BAD_REQUEST,
            "Invalid JSON in request body".to_string(),
        ),
        AppError::Web(WebError::InvalidRequest { field, message }) => {
            (StatusCode::BAD_REQUEST, format!("{field}: {message}"))
        }
        AppError::Internal { message } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal error: {message}"),
        ),
        AppError::Http(e) => (
            StatusCode::BAD_GATEWAY,
            format!("Upstream communication failed: {e}"),
        ),
    }
}

/// Convert AppError to the `{success: false, error}` response
pub fn handle_error(error: AppError) -> Response {
    let (status, message) = error_status(&error);
    if status.is_server_error() {
        error!("Request failed with {}: {}", status.as_u16(), error);
    } else {
        warn!("Request rejected with {}: {}", status.as_u16(), error);
    }
    let body = match error {
        AppError::Upstream(UpstreamError::Rejected {
            detail: Some(detail),
            ..
        }) => detail,
        _ => Value::String(message),
    };
    (status, Json(ApiResponse::<()>::error(body))).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        handle_error(self)
    }
}

pub fn ok<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(ApiResponse::success(data))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_math() {
        let page = PaginatedResponse::new(vec![1, 2], 26, 3, 12);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_next);
        assert!(page.has_previous);

        let empty: PaginatedResponse<u8> = PaginatedResponse::new(Vec::new(), 0, 1, 12);
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_next);
    }

    #[test]
    fn test_error_status_mapping() {
        let cases: Vec<(AppError, StatusCode)> = vec![
            (UpstreamError::rejected("nope").into(), StatusCode::BAD_REQUEST),
            (UpstreamError::status(503, "https://x.test").into(), StatusCode::BAD_GATEWAY),
            (
                SessionError::missing_credentials("unset").into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (SessionError::auth_failed("no cookies").into(), StatusCode::BAD_GATEWAY),
            (
                ScrapeError::no_matches("music", "https://x.test/music").into(),
                StatusCode::BAD_GATEWAY,
            ),
            (
                WebError::invalid_request("page", "Page must be >= 1").into(),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error_status(&error).0, expected, "{error}");
        }
    }

    #[test]
    fn test_rejection_message_is_verbatim() {
        let (_, message) =
            error_status(&UpstreamError::rejected("Kategori tidak ditemukan").into());
        assert_eq!(message, "Kategori tidak ditemukan");

        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let (status, message) = error_status(&WebError::JsonParse(json_error).into());
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Invalid JSON in request body");
    }

    async fn error_body(error: AppError) -> (StatusCode, Value) {
        let response = handle_error(error);
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_structured_rejection_is_returned_as_is() {
        let detail = serde_json::json!({"code": 17, "message": "Tema tidak tersedia"});
        let (status, body) =
            error_body(UpstreamError::rejected_with_detail(detail.clone()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], detail);

        let (_, body) =
            error_body(UpstreamError::rejected("Kategori tidak ditemukan").into()).await;
        assert_eq!(body["error"], "Kategori tidak ditemukan");
        assert!(body["timestamp"].is_string());
    }
}
