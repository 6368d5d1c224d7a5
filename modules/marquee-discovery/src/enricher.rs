//! Detail-stage enrichment.
//!
//! One detail fetch per item, all in flight together. A fetch that fails
//! for any reason leaves its item unrated rather than dropping it, and the
//! batch only completes once every fetch has settled.

use futures::future::join_all;
use tracing::debug;

use marquee_common::{CatalogItem, DetailRecord, EnrichedItem};

use crate::catalog::CatalogClient;
use crate::stats::DiscoveryStats;
use crate::traits::Classified;
use crate::validity::ValidityCache;

pub struct DetailEnricher<'a> {
    client: &'a CatalogClient,
    validity: &'a ValidityCache,
}

impl<'a> DetailEnricher<'a> {
    pub fn new(client: &'a CatalogClient, validity: &'a ValidityCache) -> Self {
        Self { client, validity }
    }

    /// Enrich every item. Output order matches input order.
    pub async fn enrich(
        &self,
        items: Vec<CatalogItem>,
        stats: &mut DiscoveryStats,
    ) -> Vec<EnrichedItem> {
        let lookups = join_all(items.iter().map(|item| self.client.detail(&item.id))).await;

        items
            .into_iter()
            .zip(lookups)
            .map(|(item, lookup)| match lookup {
                Classified::Success(detail) => {
                    stats.details_enriched += 1;
                    self.merge(item, detail)
                }
                other => {
                    stats.details_degraded += 1;
                    debug!(id = item.id.as_str(), outcome = other.label(), "Item left unrated");
                    EnrichedItem::unrated(item)
                }
            })
            .collect()
    }

    /// Fold a detail record into its item. The detail poster only replaces
    /// the search-time poster when it passes validation itself.
    pub fn merge(&self, mut item: CatalogItem, detail: DetailRecord) -> EnrichedItem {
        if self.validity.check_poster(detail.poster.as_deref()) {
            item.poster = detail.poster;
        }
        EnrichedItem {
            item,
            rating: detail.rating.filter(|r| r.is_finite()),
            votes: detail.votes,
        }
    }
}
