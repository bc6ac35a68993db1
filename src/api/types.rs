//! Lenient views over API responses.
//!
//! The API does not promise a schema, so every field is optional. A field
//! holding an unexpected type is read as absent on its own; only a value that
//! is not an object at all renders as the empty view.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes `value` into `T`, falling back to `T::default()`.
pub fn view<T: DeserializeOwned + Default>(value: &Value) -> T {
    T::deserialize(value).unwrap_or_default()
}

/// Per-field readers that never fail on a mistyped value.
mod lenient {
    use super::*;

    /// Strings as-is; numbers and booleans in their JSON spelling.
    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
    }

    /// Strings only; timestamps of any other type are unusable.
    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            _ => None,
        })
    }

    /// Numbers, numeric strings (blank reads as 0) and booleans.
    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) if s.trim().is_empty() => Some(0.0),
            Value::String(s) => s.trim().parse().ok(),
            Value::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
            _ => None,
        })
    }

    /// JSON numbers only.
    pub fn strict_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(Value::deserialize(d)?.as_f64())
    }

    /// A nested view, absent when it does not fit.
    pub fn nested<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(d)?;
        Ok(T::deserialize(&value).ok())
    }
}

/// Anything with a display name (agents, submolts, authors).
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Named {
    #[serde(deserialize_with = "lenient::text")]
    pub name: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AuthStatus {
    #[serde(deserialize_with = "lenient::text")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient::nested")]
    pub agent: Option<Named>,
    #[serde(deserialize_with = "lenient::text")]
    pub message: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub claim_url: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub hint: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Post {
    /// Ids are strings today; numbers are accepted too.
    pub id: Option<Value>,
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub content: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub upvotes: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub downvotes: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub comment_count: Option<f64>,
    #[serde(deserialize_with = "lenient::string")]
    pub created_at: Option<String>,
    #[serde(deserialize_with = "lenient::nested")]
    pub submolt: Option<Named>,
}

impl Post {
    pub fn score(&self) -> f64 {
        self.upvotes.unwrap_or(0.0) - self.downvotes.unwrap_or(0.0)
    }

    pub fn submolt_name(&self) -> Option<&str> {
        self.submolt.as_ref()?.name.as_deref()
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Comment {
    pub id: Option<Value>,
    #[serde(deserialize_with = "lenient::text")]
    pub content: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub upvotes: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub downvotes: Option<f64>,
    #[serde(deserialize_with = "lenient::string")]
    pub created_at: Option<String>,
    #[serde(deserialize_with = "lenient::nested")]
    pub author: Option<Named>,
}

impl Comment {
    pub fn score(&self) -> f64 {
        self.upvotes.unwrap_or(0.0) - self.downvotes.unwrap_or(0.0)
    }

    pub fn author_name(&self) -> Option<&str> {
        self.author.as_ref()?.name.as_deref()
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SearchResult {
    #[serde(rename = "type", deserialize_with = "lenient::text")]
    pub kind: Option<String>,
    pub id: Option<Value>,
    pub post_id: Option<Value>,
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub content: Option<String>,
    #[serde(deserialize_with = "lenient::strict_number")]
    pub similarity: Option<f64>,
}
