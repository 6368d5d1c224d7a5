//! Viewport visibility, modelled after an intersection observer.
//!
//! The host reports element and viewport geometry; the observer decides
//! which observed sections count as visible. The viewport is grown by a
//! lookahead margin on both edges so sections start loading just before
//! they scroll in.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    /// Pixels added above and below the viewport.
    pub root_margin_px: f64,
    /// Fraction of the element that must fall inside the grown viewport.
    pub threshold: f64,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            root_margin_px: 200.0,
            threshold: 0.1,
        }
    }
}

/// Vertical extent of a section, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub top: f64,
    pub height: f64,
}

/// The visible window, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityEntry {
    pub section_id: String,
    pub bounds: Bounds,
    pub viewport: Viewport,
}

impl ObserverOptions {
    /// Share of `bounds` inside the margin-grown viewport, in `0.0..=1.0`.
    pub fn intersection_ratio(&self, bounds: Bounds, viewport: Viewport) -> f64 {
        let root_top = viewport.top - self.root_margin_px;
        let root_bottom = viewport.top + viewport.height + self.root_margin_px;
        let bottom = bounds.top + bounds.height;

        if bounds.height <= 0.0 {
            return if bounds.top >= root_top && bounds.top <= root_bottom {
                1.0
            } else {
                0.0
            };
        }

        let overlap = bottom.min(root_bottom) - bounds.top.max(root_top);
        (overlap / bounds.height).clamp(0.0, 1.0)
    }

    pub fn is_visible(&self, bounds: Bounds, viewport: Viewport) -> bool {
        let ratio = self.intersection_ratio(bounds, viewport);
        ratio > 0.0 && ratio >= self.threshold
    }
}

#[derive(Debug, Default)]
pub struct VisibilityObserver {
    options: ObserverOptions,
    observed: HashSet<String>,
}

impl VisibilityObserver {
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            observed: HashSet::new(),
        }
    }

    pub fn options(&self) -> &ObserverOptions {
        &self.options
    }

    pub fn observe(&mut self, section_id: &str) {
        self.observed.insert(section_id.to_string());
    }

    pub fn unobserve(&mut self, section_id: &str) {
        self.observed.remove(section_id);
    }

    /// Stop observing everything.
    pub fn disconnect(&mut self) {
        self.observed.clear();
    }

    pub fn is_observing(&self, section_id: &str) -> bool {
        self.observed.contains(section_id)
    }

    /// Ids of observed sections that the entries report as visible, in
    /// entry order and without repeats.
    pub fn visible(&self, entries: &[VisibilityEntry]) -> Vec<String> {
        let mut seen = HashSet::new();
        entries
            .iter()
            .filter(|e| self.is_observing(&e.section_id))
            .filter(|e| self.options.is_visible(e.bounds, e.viewport))
            .filter(|e| seen.insert(e.section_id.as_str()))
            .map(|e| e.section_id.clone())
            .collect()
    }
}
