use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::normalize::{normalize_themes, Theme};
use crate::errors::{AppError, AppResult, UpstreamError};
use crate::scraping::cache::{CacheLookup, CacheStore};
use crate::scraping::models::{DataOrigin, Sourced};
use crate::upstream::{Session, SessionManager};

const THEME_ACTION: &str = "invitation_get_theme";
const DEFAULT_REJECTION: &str = "API request failed";
const RETRY_REJECTION: &str = "API request failed after retry";
/// Cache key of the normalized catalog
pub const THEMES_CACHE_KEY: &str = "catalog-themes";

/// Filters forwarded to the upstream theme query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeQuery {
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subcategory: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subtheme: String,
}

/// Accept strings, numbers and booleans; null becomes empty
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    })
}

impl ThemeQuery {
    fn form_params(&self) -> [(&'static str, String); 3] {
        [
            ("category", self.category.clone()),
            ("subcategory", self.subcategory.clone()),
            ("subtheme", self.subtheme.clone()),
        ]
    }
}

/// Rejection carrying the upstream `data`
///
/// Empty, `false`, zero and missing values fall back to `default`. Strings
/// become the message; anything structured is kept and returned as is.
fn rejection(data: Option<&Value>, default: &str) -> UpstreamError {
    match data {
        Some(Value::String(s)) if !s.is_empty() => UpstreamError::rejected(s.clone()),
        Some(value @ (Value::Array(_) | Value::Object(_) | Value::Bool(true))) => {
            UpstreamError::rejected_with_detail(value.clone())
        }
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => {
            UpstreamError::rejected_with_detail(Value::Number(n.clone()))
        }
        _ => UpstreamError::rejected(default),
    }
}

/// Decide whether an upstream payload is a success
///
/// Arrays and objects whose `success` is anything but `false` pass through.
/// A `false` whose `data` mentions the nonce means the session must be renewed.
pub fn classify_response(payload: Value) -> Result<Value, UpstreamError> {
    classify_with_default(payload, DEFAULT_REJECTION)
}

fn classify_with_default(payload: Value, default: &str) -> Result<Value, UpstreamError> {
    let rejected = payload
        .as_object()
        .map(|object| object.get("success") == Some(&Value::Bool(false)))
        .unwrap_or(false);
    if !rejected {
        return Ok(payload);
    }

    let data = payload.get("data");
    match data.and_then(Value::as_str) {
        Some(text) if text.contains("Nonce") || text.contains("nonce") => {
            Err(UpstreamError::NonceExpired {
                message: text.to_string(),
            })
        }
        _ => Err(rejection(data, default)),
    }
}

/// Theme queries against the authenticated endpoint
pub struct CatalogService {
    sessions: Arc<SessionManager>,
    cache: CacheStore,
}

impl CatalogService {
    pub fn new(sessions: Arc<SessionManager>, cache: CacheStore) -> Self {
        Self { sessions, cache }
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    async fn query_once(
        &self,
        session: &Session,
        query: &ThemeQuery,
        default_rejection: &str,
    ) -> AppResult<Value> {
        let payload = self
            .sessions
            .client()
            .ajax(session, THEME_ACTION, &query.form_params())
            .await?;
        Ok(classify_with_default(payload, default_rejection)?)
    }

    /// Forward a theme query, renewing the session once if the nonce was refused
    pub async fn fetch_themes(&self, query: &ThemeQuery) -> AppResult<Value> {
        let session = self.sessions.get_session().await?;

        match self.query_once(&session, query, DEFAULT_REJECTION).await {
            Err(AppError::Upstream(UpstreamError::NonceExpired { message })) => {
                info!("Nonce expired ({}), logging in again", message);
            }
            other => return other,
        }

        let session = self.sessions.refresh().await?;
        match self.query_once(&session, query, RETRY_REJECTION).await {
            Err(AppError::Upstream(UpstreamError::NonceExpired { message })) => {
                warn!("Upstream still refused the nonce after re-login");
                Err(UpstreamError::rejected(message).into())
            }
            other => other,
        }
    }

    /// The whole catalog normalized, from cache when fresh
    ///
    /// When the upstream fails an expired cached copy is served instead.
    pub async fn all_themes(&self) -> AppResult<Sourced<Vec<Theme>>> {
        let stale = match self.cache.lookup::<Vec<Theme>>(THEMES_CACHE_KEY).await {
            CacheLookup::Fresh(themes, at) => {
                debug!("Serving {} cached themes", themes.len());
                return Ok(Sourced::new(themes, DataOrigin::Cache, at));
            }
            CacheLookup::Stale(themes, at) => Some((themes, at)),
            CacheLookup::Miss => None,
        };

        match self.fetch_themes(&ThemeQuery::default()).await {
            Ok(payload) => {
                let themes = normalize_themes(&payload);
                info!("Loaded {} themes from upstream", themes.len());
                self.cache.put(THEMES_CACHE_KEY, &themes).await;
                Ok(Sourced::live(themes))
            }
            Err(e) => match stale {
                Some((themes, at)) => {
                    warn!(
                        "Using cached themes from {} after upstream failure: {}",
                        at, e
                    );
                    Ok(Sourced::new(themes, DataOrigin::Stale, at))
                }
                None => Err(e),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_and_success_objects_pass_through() {
        let payload = json!([{"id": 1}]);
        assert_eq!(classify_response(payload.clone()).unwrap(), payload);

        let payload = json!({"success": true, "data": []});
        assert_eq!(classify_response(payload.clone()).unwrap(), payload);

        let payload = json!({"themes": []});
        assert!(classify_response(payload).is_ok());
    }

    #[test]
    fn test_nonce_failures_are_detected() {
        for text in ["Nonce is invalid", "invalid nonce"] {
            match classify_response(json!({"success": false, "data": text})) {
                Err(UpstreamError::NonceExpired { message }) => assert_eq!(message, text),
                other => panic!("expected nonce failure, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_other_failures_are_rejections() {
        match classify_response(json!({"success": false, "data": "Kategori tidak ditemukan"})) {
            Err(UpstreamError::Rejected {
                message,
                detail: None,
            }) => assert_eq!(message, "Kategori tidak ditemukan"),
            other => panic!("unexpected {other:?}"),
        }

        for empty in [json!({"success": false}), json!({"success": false, "data": ""})] {
            match classify_response(empty) {
                Err(UpstreamError::Rejected {
                    message,
                    detail: None,
                }) => assert_eq!(message, "API request failed"),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_structured_failure_data_is_kept() {
        let data = json!({"errors": ["subtheme"]});
        match classify_response(json!({"success": false, "data": data.clone()})) {
            Err(UpstreamError::Rejected {
                detail: Some(detail),
                ..
            }) => assert_eq!(detail, data),
            other => panic!("unexpected {other:?}"),
        }

        match classify_response(json!({"success": false, "data": 0})) {
            Err(UpstreamError::Rejected { detail, .. }) => assert!(detail.is_none()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_query_accepts_numbers_and_missing_fields() {
        let query: ThemeQuery =
            serde_json::from_value(json!({"category": 3, "subtheme": null})).unwrap();
        assert_eq!(query.category, "3");
        assert_eq!(query.subcategory, "");
        assert_eq!(query.subtheme, "");
    }
}
