//! The user's favorites list.
//!
//! An ordered list of catalog items, unique by id, read from its slot once
//! and rewritten on every change. Mutations are synchronous
//! read-modify-write; the last writer wins.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{info, warn};

use marquee_common::CatalogItem;

use crate::store::KeyValueStore;

pub const FAVORITES_SLOT: &str = "favorites";

pub struct Favorites {
    store: Arc<dyn KeyValueStore>,
    items: Mutex<Vec<CatalogItem>>,
}

impl Favorites {
    /// Read the persisted list. A missing or unreadable slot starts empty.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let items = match store.get(FAVORITES_SLOT) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CatalogItem>>(&raw) {
                Ok(items) => dedup_by_id(items),
                Err(e) => {
                    warn!(error = %e, "Favorites slot is corrupt, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read favorites, starting empty");
                Vec::new()
            }
        };
        info!(count = items.len(), "Favorites loaded");

        Self {
            store,
            items: Mutex::new(items),
        }
    }

    fn items_mut(&self) -> MutexGuard<'_, Vec<CatalogItem>> {
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn items(&self) -> Vec<CatalogItem> {
        self.items_mut().clone()
    }

    pub fn len(&self) -> usize {
        self.items_mut().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items_mut().is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items_mut().iter().any(|i| i.id == id)
    }

    /// Append `item`. No-op (and no write) when its id is already present.
    pub fn add(&self, item: CatalogItem) -> bool {
        let mut items = self.items_mut();
        if items.iter().any(|i| i.id == item.id) {
            return false;
        }
        items.push(item);
        self.persist(&items);
        true
    }

    /// Remove by id. Returns whether anything was removed.
    pub fn remove(&self, id: &str) -> bool {
        let mut items = self.items_mut();
        let before = items.len();
        items.retain(|i| i.id != id);
        if items.len() == before {
            return false;
        }
        self.persist(&items);
        true
    }

    /// Add when absent, remove when present. Returns whether it is now a
    /// favorite.
    pub fn toggle(&self, item: CatalogItem) -> bool {
        if self.contains(&item.id) {
            self.remove(&item.id);
            false
        } else {
            self.add(item)
        }
    }

    fn persist(&self, items: &[CatalogItem]) {
        let json = match serde_json::to_string(items) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to encode favorites");
                return;
            }
        };
        if let Err(e) = self.store.put(FAVORITES_SLOT, &json) {
            warn!(error = %e, "Failed to persist favorites");
        }
    }
}

fn dedup_by_id(items: Vec<CatalogItem>) -> Vec<CatalogItem> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|i| seen.insert(i.id.clone()))
        .collect()
}
