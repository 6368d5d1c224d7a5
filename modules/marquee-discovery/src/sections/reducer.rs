//! Pure state updates for section loading.
//!
//! The reducer sees every section event and moves the section's state
//! machine. No I/O, no side effects, just bookkeeping:
//!
//! ```text
//! idle ──LoadStarted──▶ loading ──LoadSucceeded(≥1)──▶ loaded
//!                          │
//!                          └──LoadFailed / LoadSucceeded(0)──▶ errored
//! ```

use marquee_common::EnrichedItem;

use super::state::{SectionPhase, SectionState};

/// Used when a load "succeeds" with nothing to show.
const NOTHING_TO_SHOW: &str = "Nothing to show right now.";

#[derive(Debug, Clone, PartialEq)]
pub enum SectionEvent {
    LoadStarted,
    LoadSucceeded { items: Vec<EnrichedItem> },
    LoadFailed { message: String },
}

pub struct SectionReducer;

impl SectionReducer {
    /// Apply `event` to `state`. Returns false when the event is not valid
    /// in the current phase and was ignored.
    pub fn reduce(&self, state: &mut SectionState, event: SectionEvent) -> bool {
        match (state.phase, event) {
            (SectionPhase::Idle, SectionEvent::LoadStarted) => {
                state.phase = SectionPhase::Loading;
                true
            }
            (SectionPhase::Loading, SectionEvent::LoadSucceeded { items }) => {
                if items.is_empty() {
                    state.phase = SectionPhase::Errored;
                    state.error = Some(NOTHING_TO_SHOW.to_string());
                } else {
                    state.phase = SectionPhase::Loaded;
                    state.items = items;
                    state.error = None;
                }
                true
            }
            (SectionPhase::Loading, SectionEvent::LoadFailed { message }) => {
                state.phase = SectionPhase::Errored;
                state.items.clear();
                state.error = Some(message);
                true
            }
            // Everything else: a duplicate trigger while loading, or anything
            // arriving once the section is terminal.
            _ => false,
        }
    }
}
