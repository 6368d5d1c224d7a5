// Test mocks for the discovery pipeline.
//
// MockCatalog stands in for the remote catalog (CatalogSource): searches and
// details are registered per (term, page) and per id, and every call is
// recorded so tests can assert on paging behaviour.
//
// Plus fixture builders for CatalogItem, DetailRecord and EnrichedItem.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use marquee_common::{parse_rating, parse_votes, CatalogItem, DetailRecord, EnrichedItem, Kind};

use crate::traits::{CatalogSource, Classified, SearchPage};

/// What the service says for a search with no hits.
pub const NOT_FOUND: &str = "Movie not found!";
/// What the service says for an unknown id.
pub const BAD_ID: &str = "Incorrect IMDb ID.";

// ---------------------------------------------------------------------------
// MockCatalog
// ---------------------------------------------------------------------------

/// HashMap-based catalog. Unregistered searches and details come back as
/// explicit misses, not failures.
/// Builder pattern: `.on_search()`, `.on_search_error()`, `.on_detail()`,
/// `.on_detail_error()`, `.gated()`.
pub struct MockCatalog {
    searches: HashMap<(String, u32), Result<Vec<CatalogItem>, String>>,
    details: HashMap<String, Result<DetailRecord, String>>,
    search_log: Mutex<Vec<(String, u32, Option<Kind>)>>,
    detail_log: Mutex<Vec<String>>,
    gate: Option<Arc<Semaphore>>,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCatalog {
    pub fn new() -> Self {
        Self {
            searches: HashMap::new(),
            details: HashMap::new(),
            search_log: Mutex::new(Vec::new()),
            detail_log: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Hold every search until `gate` has a permit, so a test can act while
    /// a load is in flight.
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Rows are returned unfiltered; `raw_count` is their number.
    pub fn on_search(mut self, term: &str, page: u32, items: Vec<CatalogItem>) -> Self {
        self.searches.insert((term.to_string(), page), Ok(items));
        self
    }

    pub fn on_search_error(mut self, term: &str, page: u32) -> Self {
        self.searches.insert(
            (term.to_string(), page),
            Err(format!("connection reset while searching {term:?} page {page}")),
        );
        self
    }

    pub fn on_detail(mut self, record: DetailRecord) -> Self {
        self.details.insert(record.id.clone(), Ok(record));
        self
    }

    pub fn on_detail_error(mut self, id: &str) -> Self {
        self.details
            .insert(id.to_string(), Err(format!("timed out fetching {id}")));
        self
    }

    /// Pages requested for `term`, in call order.
    pub fn search_pages(&self, term: &str) -> Vec<u32> {
        self.search_log
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _, _)| t == term)
            .map(|(_, page, _)| *page)
            .collect()
    }

    /// Kind restriction passed with each search for `term`, in call order.
    pub fn search_kinds(&self, term: &str) -> Vec<Option<Kind>> {
        self.search_log
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _, _)| t == term)
            .map(|(_, _, kind)| *kind)
            .collect()
    }

    /// Searches issued for any term.
    pub fn search_count(&self) -> usize {
        self.search_log.lock().unwrap().len()
    }

    /// Ids whose details were requested, in call order.
    pub fn detail_calls(&self) -> Vec<String> {
        self.detail_log.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogSource for MockCatalog {
    async fn search_page(
        &self,
        term: &str,
        page: u32,
        kind: Option<Kind>,
    ) -> Classified<SearchPage> {
        self.search_log
            .lock()
            .unwrap()
            .push((term.to_string(), page, kind));

        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await;
        }

        match self.searches.get(&(term.to_string(), page)) {
            Some(Ok(items)) => Classified::Success(SearchPage {
                items: items.clone(),
                raw_count: items.len(),
            }),
            Some(Err(error)) => Classified::TransportError(error.clone()),
            None => Classified::EmptyResult(NOT_FOUND.to_string()),
        }
    }

    async fn detail(&self, id: &str) -> Classified<DetailRecord> {
        self.detail_log.lock().unwrap().push(id.to_string());

        match self.details.get(id) {
            Some(Ok(record)) => Classified::Success(record.clone()),
            Some(Err(error)) => Classified::TransportError(error.clone()),
            None => Classified::EmptyResult(BAD_ID.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn poster_for(id: &str) -> String {
    format!("https://img.example.com/{id}.jpg")
}

fn item(id: &str, title: &str, kind: Kind) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        title: title.to_string(),
        release_year: "2001".to_string(),
        kind,
        poster: Some(poster_for(id)),
    }
}

/// A movie with a displayable poster.
pub fn movie(id: &str, title: &str) -> CatalogItem {
    item(id, title, Kind::Movie)
}

/// A series with a displayable poster.
pub fn series(id: &str, title: &str) -> CatalogItem {
    item(id, title, Kind::Series)
}

/// A movie the service returned without a poster.
pub fn posterless(id: &str, title: &str) -> CatalogItem {
    CatalogItem {
        poster: None,
        ..movie(id, title)
    }
}

/// `n` distinct items with ids `{prefix}000`, `{prefix}001`, ...
pub fn page_of(prefix: &str, n: usize, kind: Kind) -> Vec<CatalogItem> {
    (0..n)
        .map(|i| {
            let id = format!("{prefix}{i:03}");
            item(&id, &format!("Title {id}"), kind)
        })
        .collect()
}

/// A detail record built from the service's display strings.
pub fn detail(id: &str, rating: &str, votes: &str) -> DetailRecord {
    DetailRecord {
        id: id.to_string(),
        rating: parse_rating(rating),
        votes: parse_votes(votes),
        ..Default::default()
    }
}

pub fn enriched(id: &str, rating: Option<f64>, votes: u64) -> EnrichedItem {
    EnrichedItem {
        item: movie(id, &format!("Title {id}")),
        rating,
        votes,
    }
}
