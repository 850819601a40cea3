use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::db::Document;
use crate::error::{AppError, AppResult};

pub const DEFAULT_LIST_LIMIT: i64 = 50;

fn default_in_stock() -> bool {
    true
}

/// Accepts a JSON number or a numeric string.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom("price is not a representable number")),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("price must be a number, got {s:?}"))),
        other => Err(de::Error::custom(format!("price must be a number, got {other}"))),
    }
}

/// Accepts a JSON bool, `0`/`1`, or the usual textual spellings of either.
fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 0.0 => Some(false),
            Some(f) if f == 1.0 => Some(true),
            _ => None,
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "on" | "1" => Some(true),
            "false" | "f" | "no" | "n" | "off" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    };
    parsed.ok_or_else(|| de::Error::custom(format!("in_stock must be a boolean, got {value}")))
}

/// Body accepted by `POST /api/products`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductIn {
    pub title: String,
    pub description: Option<String>,
    /// Price in dollars
    #[serde(deserialize_with = "lenient_f64")]
    pub price: f64,
    pub category: String,
    #[serde(default = "default_in_stock", deserialize_with = "lenient_bool")]
    pub in_stock: bool,
    pub image_url: Option<String>,
}

impl ProductIn {
    /// Field checks that must pass before anything is written.
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title must not be empty".to_string()));
        }
        if self.category.trim().is_empty() {
            return Err(AppError::Validation("category must not be empty".to_string()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(AppError::Validation("price must be >= 0".to_string()));
        }
        // Postgres JSONB cannot store U+0000.
        let text_fields = [
            ("title", Some(self.title.as_str())),
            ("description", self.description.as_deref()),
            ("category", Some(self.category.as_str())),
            ("image_url", self.image_url.as_deref()),
        ];
        for (name, value) in text_fields {
            if value.is_some_and(|v| v.contains('\0')) {
                return Err(AppError::Validation(format!("{name} must not contain NUL characters")));
            }
        }
        Ok(())
    }

    /// The record exactly as it will be stored.
    pub fn into_document(self) -> AppResult<Document> {
        match serde_json::to_value(self).map_err(|e| AppError::Internal(e.to_string()))? {
            serde_json::Value::Object(map) => Ok(map),
            _ => Err(AppError::Internal("product did not serialize to an object".to_string())),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
    pub category: Option<String>,
    pub limit: Option<i64>,
}

impl ListParams {
    /// Exact-match filter; a missing or empty category matches everything.
    pub fn filter(&self) -> Document {
        let mut filter = Document::new();
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            filter.insert("category".to_string(), category.into());
        }
        filter
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIST_LIMIT)
    }
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: String,
}
