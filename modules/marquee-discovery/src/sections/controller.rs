//! Progressive landing-page loading.
//!
//! `SectionLoadController` owns one [`SectionState`] per configured section
//! and decides when each runs the topic pipeline: the first section on
//! mount, the rest when they become visible. A section leaves idle at most
//! once. State lives behind a `std::sync::Mutex` that is never held across
//! an await; the claim (idle → loading) and the commit are each a single
//! locked step, so concurrent triggers for one section collapse into one
//! load.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::discovery::{Discovery, Outcome};

use super::config::SectionConfig;
use super::observer::{ObserverOptions, VisibilityEntry, VisibilityObserver};
use super::reducer::{SectionEvent, SectionReducer};
use super::state::SectionState;

struct Board {
    states: HashMap<String, SectionState>,
    observer: VisibilityObserver,
    search_term: String,
}

impl Board {
    fn search_active(&self) -> bool {
        !self.search_term.is_empty()
    }
}

pub struct SectionLoadController {
    discovery: Arc<Discovery>,
    sections: Vec<SectionConfig>,
    board: Mutex<Board>,
    /// Cleared on teardown; results that land afterwards are dropped.
    alive: AtomicBool,
}

impl SectionLoadController {
    pub fn new(discovery: Arc<Discovery>, sections: Vec<SectionConfig>) -> Self {
        Self::with_observer(discovery, sections, ObserverOptions::default())
    }

    pub fn with_observer(
        discovery: Arc<Discovery>,
        sections: Vec<SectionConfig>,
        options: ObserverOptions,
    ) -> Self {
        let mut observer = VisibilityObserver::new(options);
        let states = sections
            .iter()
            .map(|s| {
                observer.observe(&s.id);
                (s.id.clone(), SectionState::new())
            })
            .collect();

        Self {
            discovery,
            sections,
            board: Mutex::new(Board {
                states,
                observer,
                search_term: String::new(),
            }),
            alive: AtomicBool::new(true),
        }
    }

    fn board(&self) -> MutexGuard<'_, Board> {
        self.board.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn config(&self, id: &str) -> Option<&SectionConfig> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn sections(&self) -> &[SectionConfig] {
        &self.sections
    }

    /// Move a section from idle to loading and stop observing it. False when
    /// the section is unknown or not idle, a search is active, or the
    /// controller has been torn down.
    pub fn claim(&self, id: &str) -> bool {
        if !self.alive.load(Ordering::SeqCst) {
            return false;
        }
        let mut board = self.board();
        if board.search_active() {
            return false;
        }
        let Some(state) = board.states.get_mut(id) else {
            return false;
        };
        if !SectionReducer.reduce(state, SectionEvent::LoadStarted) {
            return false;
        }
        board.observer.unobserve(id);
        info!(section = id, "Section loading");
        true
    }

    /// Run the topic pipeline for one section and commit the result.
    /// Returns false when nothing was started or the result was discarded.
    pub async fn load(&self, id: &str) -> bool {
        let Some(config) = self.config(id) else {
            return false;
        };
        if !self.claim(id) {
            debug!(section = id, "Load trigger ignored");
            return false;
        }

        let event = match self.discovery.load_section(config).await {
            Ok(Outcome::Items(items)) => SectionEvent::LoadSucceeded { items },
            Ok(Outcome::NoMatches(message)) => SectionEvent::LoadFailed { message },
            Err(e) => {
                warn!(section = id, error = %e, "Section load failed");
                SectionEvent::LoadFailed {
                    message: e.to_string(),
                }
            }
        };

        self.commit(id, event)
    }

    fn commit(&self, id: &str, event: SectionEvent) -> bool {
        if !self.alive.load(Ordering::SeqCst) {
            debug!(section = id, "Controller torn down, discarding result");
            return false;
        }
        let mut board = self.board();
        let Some(state) = board.states.get_mut(id) else {
            return false;
        };
        let applied = SectionReducer.reduce(state, event);
        if applied {
            info!(
                section = id,
                phase = ?state.phase,
                items = state.items.len(),
                "Section settled"
            );
        }
        applied
    }

    /// Load the first section if it is still idle. Later sections wait for
    /// visibility.
    pub async fn mount(&self) -> bool {
        let Some(first) = self.sections.first() else {
            return false;
        };
        let id = first.id.clone();
        self.load(&id).await
    }

    /// Ids of idle, observed sections the entries report as visible.
    pub fn on_visibility(&self, entries: &[VisibilityEntry]) -> Vec<String> {
        let board = self.board();
        if board.search_active() {
            return Vec::new();
        }
        board
            .observer
            .visible(entries)
            .into_iter()
            .filter(|id| board.states.get(id).is_some_and(SectionState::is_idle))
            .collect()
    }

    /// Load every section the entries report as visible, concurrently.
    /// Returns the ids that were loaded.
    pub async fn handle_visibility(&self, entries: &[VisibilityEntry]) -> Vec<String> {
        let ids = self.on_visibility(entries);
        let loaded = join_all(ids.iter().map(|id| self.load(id))).await;
        ids.into_iter()
            .zip(loaded)
            .filter_map(|(id, ok)| ok.then_some(id))
            .collect()
    }

    /// A non-empty term suppresses section loading and observation.
    /// Clearing it re-arms observation for sections that are still idle.
    pub fn set_search_term(&self, term: &str) {
        let term = term.trim();
        let mut board = self.board();
        let was_active = board.search_active();
        board.search_term = term.to_string();

        if board.search_active() {
            if !was_active {
                info!(search = term, "Search active, section loading suspended");
            }
            board.observer.disconnect();
            return;
        }

        if !self.alive.load(Ordering::SeqCst) {
            return;
        }
        let Board {
            states, observer, ..
        } = &mut *board;
        for section in &self.sections {
            if states.get(&section.id).is_some_and(SectionState::is_idle) {
                observer.observe(&section.id);
            }
        }
        if was_active {
            info!("Search cleared, observing idle sections again");
        }
    }

    /// Apply a new search term. Clearing it also loads the first section
    /// when a search suppressed it at mount. Returns whether a load ran.
    pub async fn update_search(&self, term: &str) -> bool {
        self.set_search_term(term);
        if self.is_search_active() {
            return false;
        }
        self.mount().await
    }

    pub fn is_search_active(&self) -> bool {
        self.board().search_active()
    }

    pub fn is_observing(&self, id: &str) -> bool {
        self.board().observer.is_observing(id)
    }

    pub fn section(&self, id: &str) -> Option<SectionState> {
        self.board().states.get(id).cloned()
    }

    /// Every section with its state, in page order.
    pub fn snapshot(&self) -> Vec<(SectionConfig, SectionState)> {
        let board = self.board();
        self.sections
            .iter()
            .map(|s| {
                let state = board.states.get(&s.id).cloned().unwrap_or_default();
                (s.clone(), state)
            })
            .collect()
    }

    /// Stop observing and drop any result still in flight.
    pub fn teardown(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.board().observer.disconnect();
        info!("Section controller torn down");
    }
}
