//! Chain tests — end-to-end with mocks.
//!
//! Each test follows MOCK → FUNCTION → OUTPUT:
//! set up the fake catalog, call the ACTUAL flow, assert what came out.
//! We never reach into a flow and call its internal stages.

use std::sync::Arc;

use marquee_common::{CatalogItem, Kind};

use crate::discovery::{Discovery, Outcome};
use crate::favorites::{Favorites, FAVORITES_SLOT};
use crate::sections::{
    default_sections, Bounds, SectionConfig, SectionLoadController, SectionPhase, Viewport,
    VisibilityEntry,
};
use crate::store::{KeyValueStore, MemoryStore};
use crate::testing::*;
use crate::validity::{ValidityCache, POSTER_CACHE_SLOT};

fn discovery_over(catalog: &Arc<MockCatalog>) -> Discovery {
    Discovery::new(catalog.clone(), Arc::new(ValidityCache::in_memory()))
}

fn with_poster(id: &str, title: &str, poster: &str) -> CatalogItem {
    CatalogItem {
        poster: Some(poster.to_string()),
        ..movie(id, title)
    }
}

// ---------------------------------------------------------------------------
// Chain Test 1: Mood prompt → ranked suggestions
//
// "cozy, feel good" → two terms searched concurrently → merged and deduped
// → rows without a displayable poster or title dropped before enrichment →
// details fetched → top 5 by rating, then votes.
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mood_prompt_yields_top_five_by_rating_then_votes() {
    let catalog = Arc::new(
        MockCatalog::new()
            .on_search(
                "cozy",
                1,
                vec![
                    movie("tt01", "Amélie"),
                    movie("tt02", "Paddington"),
                    posterless("tt03", "Lost Poster"),
                    movie("tt04", "Chef"),
                    movie("tt05", "N/A"),
                ],
            )
            .on_search(
                "feel good",
                1,
                vec![
                    movie("tt02", "Paddington"),
                    movie("tt06", "Up"),
                    movie("tt07", "Soul"),
                    movie("tt08", "Coco"),
                    with_poster("tt09", "Placeholder", "N/A"),
                ],
            )
            .on_detail(detail("tt01", "8.3", "700,000"))
            .on_detail(detail("tt02", "7.8", "90,000"))
            .on_detail(detail("tt04", "7.3", "200,000"))
            .on_detail(detail("tt06", "8.3", "1,100,000"))
            .on_detail(detail("tt07", "8.0", "350,000"))
            .on_detail(detail("tt08", "8.4", "550,000")),
    );
    let discovery = discovery_over(&catalog);

    let outcome = discovery.suggest("cozy, feel good").await.unwrap();

    let ids: Vec<&str> = outcome.items().iter().map(|i| i.id()).collect();
    assert_eq!(ids, vec!["tt08", "tt06", "tt01", "tt07", "tt02"]);

    // Both terms hit once each; both pages were short.
    assert_eq!(catalog.search_pages("cozy"), vec![1]);
    assert_eq!(catalog.search_pages("feel good"), vec![1]);

    // Rejected rows are never enriched; the duplicate is enriched once.
    let mut enriched = catalog.detail_calls();
    enriched.sort();
    assert_eq!(enriched, vec!["tt01", "tt02", "tt04", "tt06", "tt07", "tt08"]);
}

// ---------------------------------------------------------------------------
// Chain Test 2: Short topic page
//
// A topic whose page 1 has fewer than 10 rows stops after page 1 and only
// those rows are enriched.
// ---------------------------------------------------------------------------

#[tokio::test]
async fn short_first_page_stops_topic_and_enriches_only_its_items() {
    let catalog = Arc::new(MockCatalog::new().on_search("comedy", 1, page_of("c", 7, Kind::Movie)));
    let discovery = discovery_over(&catalog);
    let section = SectionConfig::new("comedy", "Comedy", "comedy", Kind::Movie);

    let outcome = discovery.load_section(&section).await.unwrap();

    assert_eq!(outcome.items().len(), 7);
    assert_eq!(catalog.search_pages("comedy"), vec![1]);
    let mut enriched = catalog.detail_calls();
    enriched.sort();
    let expected: Vec<String> = page_of("c", 7, Kind::Movie).into_iter().map(|i| i.id).collect();
    assert_eq!(enriched, expected);
}

// ---------------------------------------------------------------------------
// Chain Test 3: Favorites are unique by id
// ---------------------------------------------------------------------------

#[test]
fn favorite_added_twice_is_stored_once_and_removal_empties_it() {
    let store = Arc::new(MemoryStore::new());
    let favorites = Favorites::load(store.clone());

    favorites.add(movie("tt001", "Heat"));
    favorites.add(movie("tt001", "Heat"));

    let stored: Vec<CatalogItem> =
        serde_json::from_str(&store.get(FAVORITES_SLOT).unwrap().unwrap()).unwrap();
    assert_eq!(stored.len(), 1);

    favorites.remove("tt001");
    let stored: Vec<CatalogItem> =
        serde_json::from_str(&store.get(FAVORITES_SLOT).unwrap().unwrap()).unwrap();
    assert!(stored.is_empty());

    // A fresh load sees the same thing.
    assert!(Favorites::load(store).is_empty());
}

// ---------------------------------------------------------------------------
// Chain Test 4: Failed detail fetch degrades one item
//
// The item stays in the list, unrated, after every rated item.
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_detail_keeps_item_unrated_after_rated_ones() {
    let catalog = Arc::new(
        MockCatalog::new()
            .on_search(
                "heist",
                1,
                vec![
                    movie("tt1", "Heat"),
                    movie("tt2", "Rififi"),
                    movie("tt3", "Inside Man"),
                ],
            )
            .on_detail_error("tt1")
            .on_detail(detail("tt2", "8.1", "40,000"))
            .on_detail(detail("tt3", "7.6", "380,000")),
    );
    let discovery = discovery_over(&catalog);

    let outcome = discovery.suggest("heist").await.unwrap();
    let items = outcome.items();

    let ids: Vec<&str> = items.iter().map(|i| i.id()).collect();
    assert_eq!(ids, vec!["tt2", "tt3", "tt1"]);
    assert_eq!(items[2].rating, None);
    assert_eq!(items[2].votes, 0);
}

// ---------------------------------------------------------------------------
// Chain Test 5: Empty states and the one propagating failure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn prompt_with_only_posterless_hits_is_no_matches() {
    let catalog = Arc::new(MockCatalog::new().on_search(
        "obscure",
        1,
        vec![posterless("tt1", "Forgotten"), posterless("tt2", "Lost")],
    ));
    let discovery = discovery_over(&catalog);

    let outcome = discovery.suggest("obscure").await.unwrap();

    assert!(outcome.is_no_matches());
    assert!(catalog.detail_calls().is_empty());
}

#[tokio::test]
async fn prompt_survives_one_term_failing() {
    let catalog = Arc::new(
        MockCatalog::new()
            .on_search_error("noir", 1)
            .on_search("rain", 1, vec![movie("tt1", "Blade Runner")]),
    );
    let discovery = discovery_over(&catalog);

    let outcome = discovery.suggest("noir or rain").await.unwrap();

    assert_eq!(outcome.items().len(), 1);
}

#[tokio::test]
async fn prompt_fails_only_when_every_term_is_unreachable() {
    let catalog = Arc::new(
        MockCatalog::new()
            .on_search_error("noir", 1)
            .on_search_error("rain", 1),
    );
    let discovery = discovery_over(&catalog);

    let err = discovery.suggest("noir and rain").await.unwrap_err();
    assert!(err.to_string().starts_with("Catalog unreachable"));
}

// ---------------------------------------------------------------------------
// Chain Test 6: Poster cache warms across runs
//
// First run validates posters and persists them; a second run over the same
// store serves them from cache and returns the same list.
// ---------------------------------------------------------------------------

#[tokio::test]
async fn poster_cache_persists_and_warm_run_matches_cold_run() {
    let catalog = Arc::new(
        MockCatalog::new()
            .on_search("space", 1, page_of("s", 4, Kind::Movie))
            .on_detail(detail("s000", "7.0", "10"))
            .on_detail(detail("s001", "8.0", "10")),
    );
    let store = Arc::new(MemoryStore::new());

    let cold_cache = Arc::new(ValidityCache::new(store.clone()));
    let cold = Discovery::new(catalog.clone(), cold_cache.clone())
        .suggest("space")
        .await
        .unwrap();
    assert!(store.get(POSTER_CACHE_SLOT).unwrap().is_some());

    let warm_cache = Arc::new(ValidityCache::new(store.clone()));
    let warm = Discovery::new(catalog.clone(), warm_cache.clone())
        .suggest("space")
        .await
        .unwrap();

    assert_eq!(cold, warm);
    assert!(warm_cache.stats().hits > 0);
    assert_eq!(warm_cache.stats().validations, 0);
}

// ---------------------------------------------------------------------------
// Chain Test 7: Landing page scroll
//
// mount → first section loads → comedy scrolls into the lookahead margin and
// loads → animation is still far below → a search suppresses it → clearing
// the search and scrolling loads it.
// ---------------------------------------------------------------------------

fn at(id: &str, top: f64, scroll: f64) -> VisibilityEntry {
    VisibilityEntry {
        section_id: id.to_string(),
        bounds: Bounds { top, height: 400.0 },
        viewport: Viewport {
            top: scroll,
            height: 800.0,
        },
    }
}

#[tokio::test]
async fn landing_sections_load_progressively() {
    let catalog = Arc::new(
        MockCatalog::new()
            .on_search("action", 1, page_of("a", 10, Kind::Movie))
            .on_search("action", 2, page_of("b", 10, Kind::Movie))
            .on_search("action", 3, page_of("c", 10, Kind::Movie))
            .on_search("comedy", 1, page_of("d", 6, Kind::Movie))
            .on_search(
                "animated series",
                1,
                vec![series("tt10", "Arcane"), movie("tt11", "Shorts"), series("tt12", "Bluey")],
            ),
    );
    let discovery = Arc::new(discovery_over(&catalog));
    let controller = SectionLoadController::new(discovery, default_sections());

    controller.mount().await;
    let action = controller.section("action").unwrap();
    assert_eq!(action.phase, SectionPhase::Loaded);
    assert_eq!(action.items.len(), 14);
    assert_eq!(action.filler_count(14), 0);
    // 28 candidates wanted (twice the display budget): pages 1 to 3.
    assert_eq!(catalog.search_pages("action"), vec![1, 2, 3]);

    // Comedy sits just below the fold, animation well below.
    let loaded = controller
        .handle_visibility(&[at("comedy", 950.0, 0.0), at("animation", 1600.0, 0.0)])
        .await;
    assert_eq!(loaded, vec!["comedy"]);
    let comedy = controller.section("comedy").unwrap();
    assert_eq!(comedy.items.len(), 6);
    assert_eq!(comedy.filler_count(14), 8);

    controller.set_search_term("arcane");
    let loaded = controller
        .handle_visibility(&[at("animation", 1600.0, 1200.0)])
        .await;
    assert!(loaded.is_empty());
    assert!(catalog.search_pages("animated series").is_empty());

    controller.set_search_term("");
    let loaded = controller
        .handle_visibility(&[at("animation", 1600.0, 1200.0)])
        .await;
    assert_eq!(loaded, vec!["animation"]);

    let animation = controller.section("animation").unwrap();
    let ids: Vec<&str> = animation.items.iter().map(|i| i.id()).collect();
    assert_eq!(ids, vec!["tt10", "tt12"]);
    assert_eq!(
        catalog.search_kinds("animated series"),
        vec![Some(Kind::Series)]
    );
}

// ---------------------------------------------------------------------------
// Chain Test 8: Series catalogue browse
//
// Blank search → popular series terms, two pages each, merged in term order,
// movies filtered out, duplicates across terms removed.
// ---------------------------------------------------------------------------

#[tokio::test]
async fn series_browse_merges_popular_terms() {
    let catalog = Arc::new(
        MockCatalog::new()
            .on_search("series", 1, vec![series("tt1", "Dark"), series("tt2", "Fargo")])
            .on_search(
                "tv",
                1,
                vec![series("tt2", "Fargo"), movie("tt3", "TV Movie"), series("tt4", "Lost")],
            )
            .on_search("drama", 1, vec![series("tt5", "The Wire")]),
    );
    let discovery = discovery_over(&catalog);

    let items = discovery.browse(Kind::Series, "").await.unwrap();

    let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["tt1", "tt2", "tt4", "tt5"]);
    assert!(catalog.detail_calls().is_empty());
    assert_eq!(catalog.search_kinds("tv"), vec![Some(Kind::Series)]);
}

// ---------------------------------------------------------------------------
// Chain Test 9: Details view
// ---------------------------------------------------------------------------

#[tokio::test]
async fn describe_series_includes_seasons_and_plot_fallback() {
    let mut record = detail("tt7", "9.3", "21,455");
    record.total_seasons = Some(3);
    let catalog = Arc::new(MockCatalog::new().on_detail(record));
    let discovery = discovery_over(&catalog);

    let details = discovery.describe(&series("tt7", "Bluey")).await;

    assert!(details.loaded);
    assert_eq!(details.total_seasons, Some(3));
    assert_eq!(details.rating, Some(9.3));
    assert_eq!(details.plot, "No description available.");
}

#[test]
fn no_matches_outcome_has_no_items() {
    let outcome: Outcome<CatalogItem> = Outcome::NoMatches("nothing".to_string());
    assert!(outcome.items().is_empty());
}
