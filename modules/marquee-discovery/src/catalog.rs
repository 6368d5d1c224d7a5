//! Remote catalog access.
//!
//! `OmdbCatalog` adapts the HTTP client to [`CatalogSource`], turning wire
//! rows into domain records. `CatalogClient` is what the pipeline holds: it
//! wraps any source, applies the defensive kind filter, and logs misses.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use marquee_common::{
    parse_rating, parse_seasons, parse_votes, CatalogItem, Config, DetailRecord, Kind,
};
use omdb_client::{Lookup, OmdbClient, SearchHit, TitleDetail};

use crate::error::Result;
use crate::traits::{CatalogSource, Classified, SearchPage};

// ---------------------------------------------------------------------------
// OmdbCatalog
// ---------------------------------------------------------------------------

pub struct OmdbCatalog {
    client: OmdbClient,
}

impl OmdbCatalog {
    pub fn new(client: OmdbClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = OmdbClient::new(
            &config.omdb_base_url,
            &config.omdb_api_key,
            config.request_timeout,
        )?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl CatalogSource for OmdbCatalog {
    async fn search_page(
        &self,
        term: &str,
        page: u32,
        kind: Option<Kind>,
    ) -> Classified<SearchPage> {
        let type_param = kind.filter(|k| *k != Kind::Other).map(|k| k.as_str());
        match self.client.search(term, page, type_param).await {
            Ok(Lookup::Found(payload)) => Classified::Success(SearchPage {
                raw_count: payload.results.len(),
                items: payload.results.into_iter().filter_map(item_from_hit).collect(),
            }),
            Ok(Lookup::NotFound(message)) => Classified::EmptyResult(message),
            Err(e) => Classified::TransportError(e.to_string()),
        }
    }

    async fn detail(&self, id: &str) -> Classified<DetailRecord> {
        match self.client.title(id).await {
            Ok(Lookup::Found(detail)) => Classified::Success(record_from_detail(id, detail)),
            Ok(Lookup::NotFound(message)) => Classified::EmptyResult(message),
            Err(e) => Classified::TransportError(e.to_string()),
        }
    }
}

/// Rows without an id cannot be deduplicated or enriched, so they are dropped.
fn item_from_hit(hit: SearchHit) -> Option<CatalogItem> {
    let id = hit.imdb_id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty())?;
    Some(CatalogItem {
        id,
        title: hit.title.unwrap_or_default(),
        release_year: hit.year.unwrap_or_default(),
        kind: Kind::parse(hit.kind.as_deref().unwrap_or_default()),
        poster: non_blank(hit.poster),
    })
}

fn record_from_detail(requested_id: &str, detail: TitleDetail) -> DetailRecord {
    DetailRecord {
        id: detail.imdb_id.unwrap_or_else(|| requested_id.to_string()),
        plot: non_blank(detail.plot).filter(|p| !p.eq_ignore_ascii_case("n/a")),
        rating: detail.imdb_rating.as_deref().and_then(parse_rating),
        votes: detail.imdb_votes.as_deref().map(parse_votes).unwrap_or(0),
        poster: non_blank(detail.poster),
        total_seasons: detail.total_seasons.as_deref().and_then(parse_seasons),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// CatalogClient
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct CatalogClient {
    source: Arc<dyn CatalogSource>,
}

impl CatalogClient {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self { source }
    }

    /// Classified search page. When `kind` is given, rows of any other kind
    /// are removed even if the service ignored the type scope; `raw_count`
    /// still reports what the service sent.
    pub async fn search_page(
        &self,
        term: &str,
        page: u32,
        kind: Option<Kind>,
    ) -> Classified<SearchPage> {
        match self.source.search_page(term, page, kind).await {
            Classified::Success(mut result) => {
                if let Some(kind) = kind {
                    result.items.retain(|item| item.kind == kind);
                }
                Classified::Success(result)
            }
            Classified::EmptyResult(message) => {
                debug!(term, page, message = message.as_str(), "Catalog reported no results");
                Classified::EmptyResult(message)
            }
            Classified::TransportError(error) => {
                warn!(term, page, error = error.as_str(), "Catalog search failed");
                Classified::TransportError(error)
            }
        }
    }

    /// Search results with misses and failures flattened to an empty list.
    pub async fn search(&self, term: &str, page: u32, kind: Option<Kind>) -> Vec<CatalogItem> {
        self.search_page(term, page, kind)
            .await
            .success()
            .map(|page| page.items)
            .unwrap_or_default()
    }

    pub async fn detail(&self, id: &str) -> Classified<DetailRecord> {
        let result = self.source.detail(id).await;
        match &result {
            Classified::Success(_) => {}
            Classified::EmptyResult(message) => {
                debug!(id, message = message.as_str(), "Detail lookup missed");
            }
            Classified::TransportError(error) => {
                warn!(id, error = error.as_str(), "Detail lookup failed");
            }
        }
        result
    }

    /// Detail record, or `None` on a miss or failure.
    pub async fn fetch_detail(&self, id: &str) -> Option<DetailRecord> {
        self.detail(id).await.success()
    }
}
