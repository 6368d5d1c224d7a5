//! The discovery flows.
//!
//! Each flow is a re-entrant transformation from a query to a presentation
//! list: plan → collect pages → enrich details → filter → order. No flow
//! keeps state between calls; the only shared piece is the poster cache.

use std::sync::Arc;

use tracing::{info, warn};

use marquee_common::{CatalogItem, Config, EnrichedItem, Kind};

use crate::aggregator::{PagePlan, PagedAggregator, SHORT_PAGE_THRESHOLD};
use crate::catalog::{CatalogClient, OmdbCatalog};
use crate::enricher::DetailEnricher;
use crate::error::Result;
use crate::planner::{plan_queries_capped, popular_terms, MAX_TERMS};
use crate::ranking;
use crate::sections::SectionConfig;
use crate::stats::DiscoveryStats;
use crate::traits::{CatalogSource, Classified};
use crate::validity::ValidityCache;

const NO_SUGGESTIONS: &str = "No suggestions found. Try refining your mood or keywords.";
const NO_POSTER_MATCHES: &str = "No high-rated matches with posters found. Try a different vibe.";
const NO_RANKED_MATCHES: &str = "No high-rated matches found. Try a different vibe.";
const NO_DESCRIPTION: &str = "No description available.";

/// Tunables for the flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryLimits {
    /// Items returned for a mood prompt.
    pub suggestion_limit: usize,
    /// Candidates carried into enrichment for a mood prompt.
    pub prompt_candidate_cap: usize,
    pub prompt_page_budget: u32,
    pub max_prompt_terms: usize,
    pub search_page_budget: u32,
    /// Cards shown per landing section.
    pub section_display_budget: usize,
    pub section_page_budget: u32,
    pub landing_pages_per_term: u32,
    pub short_page_threshold: usize,
}

impl Default for DiscoveryLimits {
    fn default() -> Self {
        Self {
            suggestion_limit: 5,
            prompt_candidate_cap: 20,
            prompt_page_budget: 3,
            max_prompt_terms: MAX_TERMS,
            search_page_budget: 3,
            section_display_budget: 14,
            section_page_budget: 3,
            landing_pages_per_term: 2,
            short_page_threshold: SHORT_PAGE_THRESHOLD,
        }
    }
}

impl DiscoveryLimits {
    /// Sections over-fetch to twice their display budget to leave room for
    /// items lost to filtering.
    pub fn section_fetch_ceiling(&self) -> usize {
        self.section_display_budget * 2
    }
}

/// A flow's result: items to show, or a well-formed empty state.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Items(Vec<T>),
    NoMatches(String),
}

impl<T> Outcome<T> {
    pub fn items(&self) -> &[T] {
        match self {
            Outcome::Items(items) => items,
            Outcome::NoMatches(_) => &[],
        }
    }

    pub fn is_no_matches(&self) -> bool {
        matches!(self, Outcome::NoMatches(_))
    }

    fn from_items(items: Vec<T>, empty_message: impl Into<String>) -> Self {
        if items.is_empty() {
            Outcome::NoMatches(empty_message.into())
        } else {
            Outcome::Items(items)
        }
    }
}

/// What the details view shows for one title.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDetails {
    pub item: CatalogItem,
    pub plot: String,
    pub rating: Option<f64>,
    pub total_seasons: Option<u32>,
    /// False when the detail lookup missed or failed and only the search
    /// record is available.
    pub loaded: bool,
}

pub struct Discovery {
    client: CatalogClient,
    validity: Arc<ValidityCache>,
    limits: DiscoveryLimits,
}

impl Discovery {
    pub fn new(source: Arc<dyn CatalogSource>, validity: Arc<ValidityCache>) -> Self {
        Self {
            client: CatalogClient::new(source),
            validity,
            limits: DiscoveryLimits::default(),
        }
    }

    /// Wire the OMDb-backed catalog from config.
    pub fn from_config(config: &Config, validity: Arc<ValidityCache>) -> Result<Self> {
        config.validate()?;
        let catalog = OmdbCatalog::from_config(config)?;
        Ok(Self::new(Arc::new(catalog), validity))
    }

    pub fn with_limits(mut self, limits: DiscoveryLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> &DiscoveryLimits {
        &self.limits
    }

    pub fn validity(&self) -> &Arc<ValidityCache> {
        &self.validity
    }

    fn aggregator(&self) -> PagedAggregator<'_> {
        PagedAggregator::new(&self.client)
    }

    fn enricher(&self) -> DetailEnricher<'_> {
        DetailEnricher::new(&self.client, &self.validity)
    }

    fn plan(&self, page_budget: u32) -> PagePlan {
        PagePlan::new(page_budget).with_short_page(self.limits.short_page_threshold)
    }

    /// Keep only items that pass the display filter.
    fn displayable(
        &self,
        items: Vec<EnrichedItem>,
        stats: &mut DiscoveryStats,
    ) -> Vec<EnrichedItem> {
        let before = items.len();
        let kept: Vec<EnrichedItem> = items
            .into_iter()
            .filter(|e| self.validity.is_displayable(&e.item))
            .collect();
        stats.items_filtered += (before - kept.len()) as u32;
        kept
    }

    /// Mood-prompt suggestions: up to three terms searched concurrently,
    /// merged, enriched, filtered and ranked by rating then votes.
    pub async fn suggest(&self, prompt: &str) -> Result<Outcome<EnrichedItem>> {
        let mut stats = DiscoveryStats::default();
        let terms = plan_queries_capped(prompt, self.limits.max_prompt_terms);
        stats.terms_planned = terms.len() as u32;
        info!(?terms, "Planning suggestions");

        let candidates = self
            .aggregator()
            .collect(
                &terms,
                Some(Kind::Movie),
                self.plan(self.limits.prompt_page_budget)
                    .with_target(self.limits.prompt_candidate_cap),
                self.limits.prompt_candidate_cap,
                |item| self.validity.is_displayable(item),
                &mut stats,
            )
            .await?;

        if candidates.is_empty() {
            info!("No candidates for prompt. {stats}");
            return Ok(Outcome::NoMatches(NO_SUGGESTIONS.to_string()));
        }

        let enriched = self.enricher().enrich(candidates, &mut stats).await;
        let displayable = self.displayable(enriched, &mut stats);
        if displayable.is_empty() {
            info!("Nothing displayable after enrichment. {stats}");
            return Ok(Outcome::NoMatches(NO_POSTER_MATCHES.to_string()));
        }

        let ranked = ranking::rank(displayable, self.limits.suggestion_limit);
        stats.items_presented = ranked.len() as u32;
        info!("Suggestions ready. {stats}");
        Ok(Outcome::from_items(ranked, NO_RANKED_MATCHES))
    }

    /// A landing section's list: one fixed topic, paged up to twice the
    /// display budget, enriched, and kept in arrival order.
    pub async fn load_section(&self, section: &SectionConfig) -> Result<Outcome<EnrichedItem>> {
        let mut stats = DiscoveryStats {
            terms_planned: 1,
            ..Default::default()
        };
        let ceiling = self.limits.section_fetch_ceiling();
        let empty_message = section.empty_message();

        let candidates = self
            .aggregator()
            .collect(
                &[section.query.clone()],
                Some(section.kind),
                self.plan(self.limits.section_page_budget).with_target(ceiling),
                ceiling,
                |item| self.validity.is_displayable(item),
                &mut stats,
            )
            .await?;

        if candidates.is_empty() {
            info!(section = section.id.as_str(), "Section has no candidates. {stats}");
            return Ok(Outcome::NoMatches(empty_message));
        }

        let enriched = self.enricher().enrich(candidates, &mut stats).await;
        let displayable = self.displayable(enriched, &mut stats);
        let shown = ranking::arrival_order(displayable, self.limits.section_display_budget);
        stats.items_presented = shown.len() as u32;
        info!(section = section.id.as_str(), "Section ready. {stats}");
        Ok(Outcome::from_items(shown, empty_message))
    }

    /// The catalogue page list. A blank search browses popular terms two
    /// pages each; otherwise the trimmed search is paged directly. Items are
    /// not enriched.
    pub async fn browse(&self, kind: Kind, search: &str) -> Result<Vec<CatalogItem>> {
        let mut stats = DiscoveryStats::default();
        let search = search.trim();

        let (terms, plan) = if search.is_empty() {
            let terms: Vec<String> = popular_terms(kind).iter().map(|t| t.to_string()).collect();
            (terms, self.plan(self.limits.landing_pages_per_term))
        } else {
            (vec![search.to_string()], self.plan(self.limits.search_page_budget))
        };
        stats.terms_planned = terms.len() as u32;

        let items = self
            .aggregator()
            .collect(&terms, Some(kind), plan, usize::MAX, |_| true, &mut stats)
            .await?;
        info!(%kind, search, count = items.len(), "Browse list ready");
        Ok(items)
    }

    /// Details for one title. A failed lookup still yields a value built
    /// from the search record.
    pub async fn describe(&self, item: &CatalogItem) -> ItemDetails {
        match self.client.detail(&item.id).await {
            Classified::Success(detail) => ItemDetails {
                item: item.clone(),
                plot: detail.plot.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
                rating: detail.rating,
                total_seasons: detail.total_seasons,
                loaded: true,
            },
            other => {
                warn!(
                    id = item.id.as_str(),
                    outcome = other.label(),
                    "Showing details without lookup"
                );
                ItemDetails {
                    item: item.clone(),
                    plot: NO_DESCRIPTION.to_string(),
                    rating: None,
                    total_seasons: None,
                    loaded: false,
                }
            }
        }
    }
}
