//! Poster and title validity.
//!
//! The poster predicate is pure; `ValidityCache` memoizes its positive
//! answers in a persisted set so later checks skip the rules entirely. The
//! set only grows. Anything in it also passes the full rules, so a cold
//! cache and a warm cache always agree.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use marquee_common::CatalogItem;

use crate::store::{KeyValueStore, MemoryStore};

pub const POSTER_CACHE_SLOT: &str = "validated_posters";

/// Placeholder strings the service uses for "no value".
const SENTINELS: &[&str] = &["n/a", "none", "null", "undefined", ""];

const MIN_POSTER_LEN: usize = 10;

fn is_sentinel(value: &str) -> bool {
    let lowered = value.to_lowercase();
    SENTINELS.contains(&lowered.as_str())
}

/// The poster rules without any caching. Expects a trimmed value.
pub fn poster_passes_rules(poster: &str) -> bool {
    if poster.is_empty() || is_sentinel(poster) {
        return false;
    }
    if poster.chars().count() < MIN_POSTER_LEN {
        return false;
    }
    let lowered = poster.to_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}

pub fn is_valid_title(title: &str) -> bool {
    let title = title.trim();
    !title.is_empty() && !is_sentinel(title)
}

/// Lookup counters, for observing cache behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub validations: u64,
}

pub struct ValidityCache {
    store: Arc<dyn KeyValueStore>,
    known: Mutex<Option<HashSet<String>>>,
    hits: AtomicU64,
    validations: AtomicU64,
}

impl ValidityCache {
    /// The set is read from `store` on first use, not here.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            known: Mutex::new(None),
            hits: AtomicU64::new(0),
            validations: AtomicU64::new(0),
        }
    }

    /// A fresh cache over an empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Lock the set, reading it from the store the first time.
    fn known(&self) -> MutexGuard<'_, Option<HashSet<String>>> {
        let mut guard = self.known.lock().unwrap_or_else(|e| e.into_inner());
        if guard.is_none() {
            *guard = Some(self.read_store());
        }
        guard
    }

    fn read_store(&self) -> HashSet<String> {
        let raw = match self.store.get(POSTER_CACHE_SLOT) {
            Ok(Some(raw)) => raw,
            Ok(None) => return HashSet::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read poster cache, starting empty");
                return HashSet::new();
            }
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(entries) => {
                // Entries that would fail the rules are ignored so a tampered
                // slot cannot make warm answers differ from cold ones.
                let known: HashSet<String> = entries
                    .into_iter()
                    .filter(|p| poster_passes_rules(p))
                    .collect();
                debug!(entries = known.len(), "Loaded poster cache");
                known
            }
            Err(e) => {
                warn!(error = %e, "Poster cache slot is corrupt, starting empty");
                HashSet::new()
            }
        }
    }

    fn write_store(&self, known: &HashSet<String>) {
        let mut entries: Vec<&String> = known.iter().collect();
        entries.sort();
        let result = serde_json::to_string(&entries)
            .map_err(anyhow::Error::from)
            .and_then(|json| self.store.put(POSTER_CACHE_SLOT, &json));
        if let Err(e) = result {
            warn!(error = %e, "Failed to persist poster cache");
        }
    }

    /// Force the lazy load. Returns the number of known posters.
    pub fn load(&self) -> usize {
        self.known().as_ref().map_or(0, HashSet::len)
    }

    pub fn has(&self, poster: &str) -> bool {
        self.known()
            .as_ref()
            .is_some_and(|known| known.contains(poster.trim()))
    }

    /// Add a poster. Returns true when it was new and has been persisted.
    /// Posters that fail the rules are refused.
    pub fn add(&self, poster: &str) -> bool {
        let poster = poster.trim();
        if !poster_passes_rules(poster) {
            return false;
        }
        let mut guard = self.known();
        let Some(known) = guard.as_mut() else {
            return false;
        };
        if !known.insert(poster.to_string()) {
            return false;
        }
        self.write_store(known);
        true
    }

    /// Rewrite the persisted slot from memory.
    pub fn persist(&self) {
        let guard = self.known();
        if let Some(known) = guard.as_ref() {
            self.write_store(known);
        }
    }

    /// Record a poster the view layer rendered successfully.
    pub fn remember(&self, poster: &str) {
        if self.add(poster) {
            debug!(poster = poster.trim(), "Remembered rendered poster");
        }
    }

    /// Poster check: cache hit short-circuits, otherwise run the rules and
    /// remember a pass.
    pub fn check_poster(&self, poster: Option<&str>) -> bool {
        let Some(poster) = poster.map(str::trim).filter(|p| !p.is_empty()) else {
            return false;
        };

        if self.has(poster) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return true;
        }

        self.validations.fetch_add(1, Ordering::Relaxed);
        let valid = poster_passes_rules(poster);
        if valid {
            self.add(poster);
        }
        valid
    }

    pub fn is_valid_poster(&self, item: &CatalogItem) -> bool {
        self.check_poster(item.poster.as_deref())
    }

    pub fn is_valid_title(&self, item: &CatalogItem) -> bool {
        is_valid_title(&item.title)
    }

    /// The display filter: both poster and title must hold.
    pub fn is_displayable(&self, item: &CatalogItem) -> bool {
        self.is_valid_title(item) && self.is_valid_poster(item)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            validations: self.validations.load(Ordering::Relaxed),
        }
    }
}
