//! Authenticated theme query proxy
//!
//! Successful upstream payloads are returned verbatim so existing clients
//! keep working against the proxy exactly as against the upstream.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::web::{extractors::ThemeQueryBody, AppState};

pub async fn proxy_themes(
    State(state): State<AppState>,
    ThemeQueryBody(query): ThemeQueryBody,
) -> Result<Json<Value>, AppError> {
    let payload = state.catalog.fetch_themes(&query).await?;
    Ok(Json(payload))
}

/// Any method other than POST on the theme endpoints
pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
        .into_response()
}
