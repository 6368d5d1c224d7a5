use std::fmt;

use serde::{Deserialize, Serialize};

// --- Catalog kinds ---

/// Catalog entry type as reported by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Movie,
    Series,
    /// Episodes, games and anything else the service may return unscoped.
    #[serde(other)]
    Other,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Movie => "movie",
            Kind::Series => "series",
            Kind::Other => "other",
        }
    }

    /// Case-insensitive parse; unknown labels map to `Other`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "movie" => Kind::Movie,
            "series" => Kind::Series,
            _ => Kind::Other,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Search-stage records ---

/// A title as returned by a search page. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    pub release_year: String,
    pub kind: Kind,
    pub poster: Option<String>,
}

// --- Detail-stage records ---

/// The per-title record from the detail endpoint, with numeric fields
/// already parsed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetailRecord {
    pub id: String,
    pub plot: Option<String>,
    pub rating: Option<f64>,
    pub votes: u64,
    pub poster: Option<String>,
    pub total_seasons: Option<u32>,
}

/// A catalog item merged with its detail-stage rating and vote count.
///
/// `rating` is never NaN or infinite; `votes` defaults to 0 when unknown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedItem {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub rating: Option<f64>,
    pub votes: u64,
}

impl EnrichedItem {
    /// The degraded form used when the detail fetch failed.
    pub fn unrated(item: CatalogItem) -> Self {
        Self {
            item,
            rating: None,
            votes: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.item.id
    }

    pub fn is_rated(&self) -> bool {
        self.rating.is_some()
    }
}

// --- Display-string parsing ---

/// Parse a rating display string ("7.5", "N/A"). Anything that does not
/// yield a finite number is `None`.
pub fn parse_rating(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|r| r.is_finite())
}

/// Parse a vote count display string ("1,234,567"). Thousands separators are
/// stripped and the leading digit run is read; no digits means 0.
pub fn parse_votes(raw: &str) -> u64 {
    let digits: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',')
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse::<u64>().unwrap_or(0)
}

/// Parse a season count display string ("3", "N/A").
pub fn parse_seasons(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}
