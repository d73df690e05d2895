//! Shape raw upstream theme records into one stable form
//!
//! The AJAX endpoint has returned several record layouts over time, so
//! every field is read from a list of candidate keys.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::scraping::listing::Searchable;

const WITHOUT_PHOTO_MARKER: &str = "(Tanpa Foto)";
const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: String,
    pub name: String,
    pub category: String,
    pub image: String,
    pub demo_url: String,
    pub with_photo: bool,
    pub price: u64,
    pub description: String,
}

impl Searchable for Theme {
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.category.to_lowercase().contains(needle)
    }
}

/// First key holding a non-empty string or a number, as text
fn first_text(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn category_of(record: &Map<String, Value>) -> String {
    match record.get("category") {
        Some(Value::Object(category)) => first_text(category, &["title", "name"]),
        _ => first_text(record, &["category", "term_name"]),
    }
    .unwrap_or_else(|| UNCATEGORIZED.to_string())
}

fn with_photo_of(record: &Map<String, Value>, name: &str) -> bool {
    ["with_photo", "withPhoto"]
        .iter()
        .find_map(|key| match record.get(*key)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => Some(n.as_i64() != Some(0)),
            Value::String(s) => Some(matches!(s.trim(), "1" | "true" | "yes")),
            _ => None,
        })
        .unwrap_or_else(|| !name.contains(WITHOUT_PHOTO_MARKER))
}

fn price_of(record: &Map<String, Value>) -> u64 {
    match record.get("price") {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s
            .chars()
            .filter(char::is_ascii_digit)
            .collect::<String>()
            .parse()
            .unwrap_or(0),
        _ => 0,
    }
}

/// Normalize one record; non-object entries are skipped
pub fn normalize_theme(raw: &Value) -> Option<Theme> {
    let record = raw.as_object()?;
    let name = first_text(record, &["name", "post_title"]).unwrap_or_default();

    Some(Theme {
        id: first_text(record, &["id", "ID"]).unwrap_or_default(),
        category: category_of(record),
        image: first_text(record, &["image", "thumbnail", "featured_image"]).unwrap_or_default(),
        demo_url: first_text(record, &["demo_url", "preview_url", "preview"])
            .unwrap_or_else(|| "#".to_string()),
        with_photo: with_photo_of(record, &name),
        price: price_of(record),
        description: first_text(record, &["description", "post_excerpt"]).unwrap_or_default(),
        name,
    })
}

/// Accepts `{data: [...]}` as well as a bare array
pub fn normalize_themes(payload: &Value) -> Vec<Theme> {
    let records: &[Value] = match payload {
        Value::Array(records) => records.as_slice(),
        Value::Object(object) => match object.get("data") {
            Some(Value::Array(records)) => records.as_slice(),
            _ => &[],
        },
        _ => &[],
    };
    records.iter().filter_map(normalize_theme).collect()
}

/// Selection applied to the normalized catalog
#[derive(Debug, Clone, Default)]
pub struct ThemeFilter {
    pub with_photo: Option<bool>,
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ThemeFilter {
    pub fn apply(&self, themes: Vec<Theme>) -> Vec<Theme> {
        let category = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        let with_photo = self.with_photo;
        let filtered = themes
            .into_iter()
            .filter(|t| with_photo.map_or(true, |wanted| t.with_photo == wanted))
            .filter(|t| category.map_or(true, |c| t.category.eq_ignore_ascii_case(c)))
            .collect();

        crate::scraping::listing::search(filtered, self.search.as_deref())
    }
}

/// Unique categories in sorted order
pub fn categories(themes: &[Theme]) -> Vec<String> {
    let mut categories: Vec<String> = themes.iter().map(|t| t.category.clone()).collect();
    categories.sort();
    categories.dedup();
    categories
}
