//! Per-section load state managed by the reducer.
//!
//! `SectionState` is only ever mutated through [`SectionReducer`]; the
//! controller owns the map of them.
//!
//! [`SectionReducer`]: super::reducer::SectionReducer

use marquee_common::EnrichedItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored,
}

impl SectionPhase {
    /// Loaded and errored sections never load again.
    pub fn is_terminal(self) -> bool {
        matches!(self, SectionPhase::Loaded | SectionPhase::Errored)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SectionState {
    pub items: Vec<EnrichedItem>,
    pub phase: SectionPhase,
    /// Set only in the errored phase.
    pub error: Option<String>,
}

impl SectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.phase == SectionPhase::Idle
    }

    /// Spacer cards needed to pad a loaded row out to `budget`.
    pub fn filler_count(&self, budget: usize) -> usize {
        match self.phase {
            SectionPhase::Loaded => budget.saturating_sub(self.items.len()),
            _ => 0,
        }
    }
}
