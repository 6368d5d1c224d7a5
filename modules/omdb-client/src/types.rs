use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{OmdbError, Result};

/// A decoded OMDb body. The service answers HTTP 200 for misses too and
/// signals them with `"Response": "False"` plus an `Error` string.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound(String),
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound(_) => None,
        }
    }
}

/// Payload of a `?s=` search call.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPayload {
    #[serde(rename = "Search", default)]
    pub results: Vec<SearchHit>,
    #[serde(rename = "totalResults")]
    pub total_results: Option<String>,
}

/// One row of a search page.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Type")]
    pub kind: Option<String>,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
}

/// Payload of a `?i=` title lookup. Numeric fields arrive as display
/// strings ("7.5", "1,234,567", "N/A") and are left for the caller to parse.
#[derive(Debug, Clone, Deserialize)]
pub struct TitleDetail {
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Type")]
    pub kind: Option<String>,
    #[serde(rename = "Plot")]
    pub plot: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "imdbVotes")]
    pub imdb_votes: Option<String>,
    #[serde(rename = "totalSeasons")]
    pub total_seasons: Option<String>,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
}

/// Decode a response body into `Found`/`NotFound`. Bodies without a
/// `Response` marker are treated as a parse failure.
pub(crate) fn classify<T: DeserializeOwned>(body: &str) -> Result<Lookup<T>> {
    let value: Value = serde_json::from_str(body)?;
    let marker = value
        .get("Response")
        .and_then(Value::as_str)
        .ok_or_else(|| OmdbError::Parse("missing Response marker".to_string()))?;

    if marker.eq_ignore_ascii_case("true") {
        return Ok(Lookup::Found(serde_json::from_value(value)?));
    }

    let message = value
        .get("Error")
        .and_then(Value::as_str)
        .unwrap_or("Unknown API error")
        .to_string();
    Ok(Lookup::NotFound(message))
}
