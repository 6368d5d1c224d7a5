// Trait abstraction for the remote catalog.
//
// CatalogSource is the single seam between the pipeline and the network.
// OmdbCatalog implements it over HTTP; MockCatalog implements it from a
// lookup table so pipeline tests run without a network.

use async_trait::async_trait;

use marquee_common::{CatalogItem, DetailRecord, Kind};

// ---------------------------------------------------------------------------
// Response classification
// ---------------------------------------------------------------------------

/// Every catalog response lands in exactly one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified<T> {
    /// The service returned a payload.
    Success(T),
    /// The service explicitly reported no match. Carries its message.
    EmptyResult(String),
    /// Non-2xx, network failure, or an undecodable body.
    TransportError(String),
}

impl<T> Classified<T> {
    pub fn success(self) -> Option<T> {
        match self {
            Classified::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Classified::Success(_) => "success",
            Classified::EmptyResult(_) => "empty",
            Classified::TransportError(_) => "transport_error",
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchPage {
    pub items: Vec<CatalogItem>,
    /// Rows on the page as the service sent them, before any filtering.
    /// A short page is the only end-of-results signal the service gives.
    pub raw_count: usize,
}

// ---------------------------------------------------------------------------
// CatalogSource
// ---------------------------------------------------------------------------

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch one 1-based page of search results, optionally type-scoped.
    async fn search_page(&self, term: &str, page: u32, kind: Option<Kind>)
        -> Classified<SearchPage>;

    /// Fetch the detail record for one title.
    async fn detail(&self, id: &str) -> Classified<DetailRecord>;
}
