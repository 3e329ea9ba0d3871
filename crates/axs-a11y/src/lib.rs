//! axs Accessibility
//!
//! Building blocks that rule actions use to retrofit accessibility onto a
//! document they do not own.
//!
//! Features:
//! - ARIA helpers (roles, labels, hidden, expanded, focus, owns)
//! - Per-instance id generation for relationship attributes
//! - Live regions with settle and clear delays
//! - State markers for detecting transitions between passes

pub mod aria;
pub mod ids;
pub mod live_region;
pub mod state;

pub use aria::AriaRole;
pub use ids::IdGenerator;
pub use live_region::{LiveRegions, PendingRegion};
pub use state::{CellEvent, CellState, MarkerState, StateMarker, Stone, Transition};

/// Accessibility error
#[derive(Debug, thiserror::Error)]
pub enum A11yError {
    #[error("live region id must not be empty")]
    InvalidRegionId,

    #[error("no container to attach live region {0:?}")]
    NoContainer(String),

    #[error(transparent)]
    Dom(#[from] axs_dom::DomError),
}
