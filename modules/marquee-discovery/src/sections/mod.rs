//! Landing-page sections: static topics loaded lazily as they scroll into
//! view, each at most once.

pub mod config;
pub mod controller;
pub mod observer;
pub mod reducer;
pub mod state;

pub use config::{default_sections, SectionConfig};
pub use controller::SectionLoadController;
pub use observer::{Bounds, ObserverOptions, Viewport, VisibilityEntry, VisibilityObserver};
pub use reducer::{SectionEvent, SectionReducer};
pub use state::{SectionPhase, SectionState};
