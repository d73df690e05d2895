//! The public theme directory feed
//!
//! Unlike the other listings this one is JSON. Items are passed through
//! untouched apart from filtering.

use serde_json::Value;

use super::models::DirectoryCategory;
use crate::errors::{ScrapeError, ScrapeResult};

pub const CATEGORIES: &[DirectoryCategory] = &[
    DirectoryCategory::new(0, "All Categories"),
    DirectoryCategory::new(1, "Wedding"),
    DirectoryCategory::new(2, "Kids & Birthday"),
    DirectoryCategory::new(4, "Aqiqah & Tasmiyah"),
    DirectoryCategory::new(5, "Tasyakuran Khitan"),
    DirectoryCategory::new(6, "Umum & Seminar"),
    DirectoryCategory::new(7, "Christmas & New Year"),
    DirectoryCategory::new(8, "Syukuran & Islami"),
    DirectoryCategory::new(9, "Party & Dinner"),
    DirectoryCategory::new(10, "School & Graduation"),
];

/// Items under the feed's `data` key; a feed without one is empty
pub fn parse_directory(body: &str) -> ScrapeResult<Vec<Value>> {
    let feed: Value = serde_json::from_str(body)
        .map_err(|e| ScrapeError::parse("theme directory", e.to_string()))?;

    match feed.get("data") {
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(other) => Err(ScrapeError::parse(
            "theme directory",
            format!("expected an array under 'data', found {}", json_kind(other)),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn category_id(item: &Value) -> Option<u64> {
    match item.get("category_id")? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Filter by category (0 = all) and case-insensitive name search
pub fn filter_directory(items: Vec<Value>, category: u32, search: Option<&str>) -> Vec<Value> {
    let needle = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    items
        .into_iter()
        .filter(|item| category == 0 || category_id(item) == Some(u64::from(category)))
        .filter(|item| match &needle {
            Some(needle) => item
                .get("name")
                .and_then(Value::as_str)
                .map(|name| name.to_lowercase().contains(needle))
                .unwrap_or(false),
            None => true,
        })
        .collect()
}
