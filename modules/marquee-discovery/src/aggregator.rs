//! Paged collection across search terms.
//!
//! The service has no reliable total count, so each term is walked page by
//! page and abandoned on weak evidence: a short page, an explicit miss, a
//! failure, enough items, or the page budget running out. Terms run
//! concurrently; their results are merged in term order and deduplicated
//! by id across the whole run.

use std::collections::HashSet;

use futures::future::join_all;
use tracing::{debug, info};

use marquee_common::{CatalogItem, Kind};

use crate::catalog::CatalogClient;
use crate::error::{DiscoveryError, Result};
use crate::stats::DiscoveryStats;
use crate::traits::Classified;

/// Pages shorter than this mark the end of a term's results.
pub const SHORT_PAGE_THRESHOLD: usize = 10;

/// How far to walk each term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    pub page_budget: u32,
    /// Stop a term once it holds this many unique accepted items.
    pub target: Option<usize>,
    pub short_page: usize,
}

impl PagePlan {
    pub fn new(page_budget: u32) -> Self {
        Self {
            page_budget,
            target: None,
            short_page: SHORT_PAGE_THRESHOLD,
        }
    }

    pub fn with_target(mut self, target: usize) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_short_page(mut self, short_page: usize) -> Self {
        self.short_page = short_page;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    ShortPage,
    TargetReached,
    BudgetExhausted,
    NoResults,
    Failed,
}

/// What one term produced.
#[derive(Debug)]
struct TermHarvest {
    items: Vec<CatalogItem>,
    pages_fetched: u32,
    pages_empty: u32,
    pages_failed: u32,
    short_pages: u32,
    duplicates: u32,
    rejected: u32,
    /// Set when the very first page failed in transport.
    first_page_error: Option<String>,
}

pub struct PagedAggregator<'a> {
    client: &'a CatalogClient,
}

impl<'a> PagedAggregator<'a> {
    pub fn new(client: &'a CatalogClient) -> Self {
        Self { client }
    }

    /// Collect up to `cap` unique items for `terms`.
    ///
    /// `accept` is applied to each row before it counts toward the target.
    /// Fails only when nothing at all was gathered and some term's first
    /// page failed in transport; every other fault just ends that term.
    pub async fn collect<F>(
        &self,
        terms: &[String],
        kind: Option<Kind>,
        plan: PagePlan,
        cap: usize,
        accept: F,
        stats: &mut DiscoveryStats,
    ) -> Result<Vec<CatalogItem>>
    where
        F: Fn(&CatalogItem) -> bool + Sync,
    {
        let harvests = join_all(
            terms
                .iter()
                .map(|term| self.walk_term(term, kind, plan, &accept)),
        )
        .await;

        let mut seen = HashSet::new();
        let mut merged = Vec::new();
        let mut first_error = None;

        for harvest in harvests {
            stats.pages_fetched += harvest.pages_fetched;
            stats.pages_empty += harvest.pages_empty;
            stats.pages_failed += harvest.pages_failed;
            stats.short_pages += harvest.short_pages;
            stats.items_deduplicated += harvest.duplicates;
            stats.items_rejected += harvest.rejected;
            if first_error.is_none() {
                first_error = harvest.first_page_error;
            }

            for item in harvest.items {
                if seen.insert(item.id.clone()) {
                    merged.push(item);
                } else {
                    stats.items_deduplicated += 1;
                }
            }
        }

        if merged.is_empty() {
            if let Some(error) = first_error {
                return Err(DiscoveryError::Transport(error));
            }
        }

        merged.truncate(cap);
        stats.items_collected += merged.len() as u32;
        Ok(merged)
    }

    async fn walk_term<F>(
        &self,
        term: &str,
        kind: Option<Kind>,
        plan: PagePlan,
        accept: &F,
    ) -> TermHarvest
    where
        F: Fn(&CatalogItem) -> bool + Sync,
    {
        let mut harvest = TermHarvest {
            items: Vec::new(),
            pages_fetched: 0,
            pages_empty: 0,
            pages_failed: 0,
            short_pages: 0,
            duplicates: 0,
            rejected: 0,
            first_page_error: None,
        };
        let mut seen = HashSet::new();
        let mut reason = StopReason::BudgetExhausted;

        for page in 1..=plan.page_budget {
            let result = match self.client.search_page(term, page, kind).await {
                Classified::Success(result) => result,
                Classified::EmptyResult(_) => {
                    harvest.pages_empty += 1;
                    reason = StopReason::NoResults;
                    break;
                }
                Classified::TransportError(error) => {
                    harvest.pages_failed += 1;
                    if page == 1 {
                        harvest.first_page_error = Some(error);
                    }
                    reason = StopReason::Failed;
                    break;
                }
            };

            harvest.pages_fetched += 1;
            for item in result.items {
                if !accept(&item) {
                    harvest.rejected += 1;
                } else if seen.insert(item.id.clone()) {
                    harvest.items.push(item);
                } else {
                    harvest.duplicates += 1;
                }
            }
            debug!(
                term,
                page,
                raw = result.raw_count,
                kept = harvest.items.len(),
                "Page collected"
            );

            if plan.target.is_some_and(|target| harvest.items.len() >= target) {
                reason = StopReason::TargetReached;
                break;
            }
            if result.raw_count < plan.short_page {
                harvest.short_pages += 1;
                reason = StopReason::ShortPage;
                break;
            }
        }

        info!(
            term,
            pages = harvest.pages_fetched,
            items = harvest.items.len(),
            stop = ?reason,
            "Term collected"
        );
        harvest
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::testing::*;

    fn terms(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn short_first_page_stops_the_term() {
        let catalog =
            Arc::new(MockCatalog::new().on_search("noir", 1, page_of("n", 7, Kind::Movie)));
        let client = CatalogClient::new(catalog.clone());
        let mut stats = DiscoveryStats::default();

        let items = PagedAggregator::new(&client)
            .collect(&terms(&["noir"]), None, PagePlan::new(3), 100, |_| true, &mut stats)
            .await
            .unwrap();

        assert_eq!(items.len(), 7);
        assert_eq!(catalog.search_pages("noir"), vec![1]);
        assert_eq!(stats.short_pages, 1);
    }

    #[tokio::test]
    async fn full_pages_walk_until_budget() {
        let catalog = Arc::new(
            MockCatalog::new()
                .on_search("space", 1, page_of("a", 10, Kind::Movie))
                .on_search("space", 2, page_of("b", 10, Kind::Movie))
                .on_search("space", 3, page_of("c", 10, Kind::Movie))
                .on_search("space", 4, page_of("d", 10, Kind::Movie)),
        );
        let client = CatalogClient::new(catalog.clone());
        let mut stats = DiscoveryStats::default();

        let items = PagedAggregator::new(&client)
            .collect(&terms(&["space"]), None, PagePlan::new(3), 100, |_| true, &mut stats)
            .await
            .unwrap();

        assert_eq!(items.len(), 30);
        assert_eq!(catalog.search_pages("space"), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn target_ceiling_stops_paging() {
        let catalog = Arc::new(
            MockCatalog::new()
                .on_search("action", 1, page_of("a", 10, Kind::Movie))
                .on_search("action", 2, page_of("b", 10, Kind::Movie))
                .on_search("action", 3, page_of("c", 10, Kind::Movie)),
        );
        let client = CatalogClient::new(catalog.clone());
        let mut stats = DiscoveryStats::default();

        let items = PagedAggregator::new(&client)
            .collect(
                &terms(&["action"]),
                None,
                PagePlan::new(3).with_target(20),
                100,
                |_| true,
                &mut stats,
            )
            .await
            .unwrap();

        assert_eq!(items.len(), 20);
        assert_eq!(catalog.search_pages("action"), vec![1, 2]);
    }

    #[tokio::test]
    async fn rejected_rows_do_not_count_toward_target_but_raw_rows_decide_short_page() {
        let mut first = page_of("a", 5, Kind::Movie);
        first.extend((0..5).map(|i| posterless(&format!("p{i}"), "No Poster")));
        let catalog = Arc::new(
            MockCatalog::new()
                .on_search("drama", 1, first)
                .on_search("drama", 2, page_of("b", 4, Kind::Movie)),
        );
        let client = CatalogClient::new(catalog.clone());
        let mut stats = DiscoveryStats::default();

        let items = PagedAggregator::new(&client)
            .collect(
                &terms(&["drama"]),
                None,
                PagePlan::new(3).with_target(8),
                100,
                |item| item.poster.is_some(),
                &mut stats,
            )
            .await
            .unwrap();

        // Page 2 pushes the term past the target; the target stops paging, it does not trim.
        assert_eq!(items.len(), 9);
        assert_eq!(stats.items_rejected, 5);
        assert_eq!(catalog.search_pages("drama"), vec![1, 2]);
    }

    #[tokio::test]
    async fn duplicates_removed_within_and_across_terms() {
        let catalog = Arc::new(
            MockCatalog::new()
                .on_search(
                    "cozy",
                    1,
                    vec![
                        movie("tt1", "Amélie"),
                        movie("tt2", "Paddington"),
                        movie("tt1", "Amélie"),
                    ],
                )
                .on_search(
                    "feel good",
                    1,
                    vec![movie("tt2", "Paddington"), movie("tt3", "Chef")],
                ),
        );
        let client = CatalogClient::new(catalog);
        let mut stats = DiscoveryStats::default();

        let items = PagedAggregator::new(&client)
            .collect(
                &terms(&["cozy", "feel good"]),
                None,
                PagePlan::new(3),
                100,
                |_| true,
                &mut stats,
            )
            .await
            .unwrap();

        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["tt1", "tt2", "tt3"]);
        assert_eq!(stats.items_deduplicated, 2);
    }

    #[tokio::test]
    async fn output_is_truncated_to_cap() {
        let catalog = Arc::new(
            MockCatalog::new()
                .on_search("a", 1, page_of("a", 9, Kind::Movie))
                .on_search("b", 1, page_of("b", 9, Kind::Movie)),
        );
        let client = CatalogClient::new(catalog);
        let mut stats = DiscoveryStats::default();

        let items = PagedAggregator::new(&client)
            .collect(&terms(&["a", "b"]), None, PagePlan::new(3), 12, |_| true, &mut stats)
            .await
            .unwrap();

        assert_eq!(items.len(), 12);
        assert_eq!(items[0].id, "a000");
        assert_eq!(items[11].id, "b002");
    }

    #[tokio::test]
    async fn later_page_failure_keeps_earlier_pages() {
        let catalog = Arc::new(
            MockCatalog::new()
                .on_search("heist", 1, page_of("h", 10, Kind::Movie))
                .on_search_error("heist", 2),
        );
        let client = CatalogClient::new(catalog.clone());
        let mut stats = DiscoveryStats::default();

        let items = PagedAggregator::new(&client)
            .collect(&terms(&["heist"]), None, PagePlan::new(3), 100, |_| true, &mut stats)
            .await
            .unwrap();

        assert_eq!(items.len(), 10);
        assert_eq!(catalog.search_pages("heist"), vec![1, 2]);
        assert_eq!(stats.pages_failed, 1);
    }

    #[tokio::test]
    async fn first_page_failure_with_nothing_gathered_propagates() {
        let catalog = Arc::new(MockCatalog::new().on_search_error("western", 1));
        let client = CatalogClient::new(catalog);
        let mut stats = DiscoveryStats::default();

        let err = PagedAggregator::new(&client)
            .collect(&terms(&["western"]), None, PagePlan::new(3), 100, |_| true, &mut stats)
            .await
            .unwrap_err();

        assert!(matches!(err, DiscoveryError::Transport(_)));
    }

    #[tokio::test]
    async fn first_page_failure_is_absorbed_when_another_term_has_data() {
        let catalog = Arc::new(
            MockCatalog::new()
                .on_search_error("western", 1)
                .on_search("samurai", 1, page_of("s", 3, Kind::Movie)),
        );
        let client = CatalogClient::new(catalog);
        let mut stats = DiscoveryStats::default();

        let items = PagedAggregator::new(&client)
            .collect(
                &terms(&["western", "samurai"]),
                None,
                PagePlan::new(3),
                100,
                |_| true,
                &mut stats,
            )
            .await
            .unwrap();

        assert_eq!(items.len(), 3);
    }

    #[tokio::test]
    async fn explicit_no_results_is_empty_not_error() {
        let catalog = Arc::new(MockCatalog::new());
        let client = CatalogClient::new(catalog.clone());
        let mut stats = DiscoveryStats::default();

        let items = PagedAggregator::new(&client)
            .collect(&terms(&["zzzxq"]), None, PagePlan::new(3), 100, |_| true, &mut stats)
            .await
            .unwrap();

        assert!(items.is_empty());
        assert_eq!(stats.pages_empty, 1);
        assert_eq!(catalog.search_pages("zzzxq"), vec![1]);
    }
}
