//! Movie catalog models
//!
//! Read-only from the client's point of view. Field names follow the API
//! payloads (`_id`, `Title`, `Genre.Name`, ...).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "ImagePath", default)]
    pub image_path: String,
    #[serde(rename = "Featured", default)]
    pub featured: bool,
    #[serde(rename = "Genre", default)]
    pub genre: Genre,
    #[serde(rename = "Director", default)]
    pub director: Director,
}

impl Movie {
    /// Minimal movie, mostly for tests and fixtures
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            image_path: String::new(),
            featured: false,
            genre: Genre::default(),
            director: Director::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Description", default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Director {
    #[serde(rename = "Name", default)]
    pub name: String,
    /// API sends `Birth`; older records use `BirthYear`. Number or string.
    #[serde(
        rename = "Birth",
        alias = "BirthYear",
        default,
        deserialize_with = "deserialize_year",
        skip_serializing_if = "Option::is_none"
    )]
    pub birth_year: Option<String>,
    #[serde(
        rename = "Death",
        alias = "Deth",
        default,
        deserialize_with = "deserialize_year",
        skip_serializing_if = "Option::is_none"
    )]
    pub death_year: Option<String>,
    #[serde(
        rename = "Bio",
        alias = "Biography",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub biography: Option<String>,
}

/// Deserialize a year that can be number, string or null
fn deserialize_year<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<JsonValue> = Option::deserialize(deserializer)?;
    match value {
        Some(JsonValue::Number(n)) => Ok(Some(n.to_string())),
        Some(JsonValue::String(s)) if s.trim().is_empty() => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s)),
        Some(JsonValue::Null) | None => Ok(None),
        _ => Err(D::Error::custom("expected number or string for year")),
    }
}
