//! axs Engine
//!
//! Declarative accessibility tweaks for documents the engine does not own.
//!
//! A site supplies two rule tables and an attribute allowlist. Load rules
//! run once at startup; dynamic rules run at startup and again on every
//! subtree the page inserts or every element whose watched attribute
//! changes. Each rule pairs a CSS selector with an action that writes ARIA
//! attributes or speaks through a live region.

pub mod apply;
pub mod cells;
pub mod config;
pub mod page;
pub mod rules;
pub mod tweaker;
pub mod tweaks;
pub mod watcher;

pub use apply::{apply_rules, PassStats};
pub use cells::{CellTracker, MovePhrases};
pub use config::EngineConfig;
pub use page::Page;
pub use rules::{Action, Rule, RuleSet, RuleSetBuilder, TweakArg};
pub use tweaker::{SiteProfile, Tweaker};
pub use watcher::MutationWatcher;

pub use axs_dom::{Document, NodeId};

use axs_a11y::A11yError;
use axs_dom::{DomError, SelectorError};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Outcome of one rule action on one element
pub type TweakResult = Result<(), TweakError>;

/// Failure of a single rule action
///
/// Always isolated to the element it happened on.
#[derive(Debug, thiserror::Error)]
pub enum TweakError {
    #[error(transparent)]
    Dom(#[from] DomError),

    #[error(transparent)]
    A11y(#[from] A11yError),

    #[error(transparent)]
    Selector(#[from] SelectorError),

    #[error("{tweak}: argument {index} should be {expected}")]
    BadArgument {
        tweak: &'static str,
        index: usize,
        expected: &'static str,
    },

    #[error("expected {0} is missing")]
    Missing(&'static str),

    #[error("unexpected markup: {0}")]
    Markup(String),
}

/// Engine setup error
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid selector {selector:?}: {source}")]
    InvalidSelector {
        selector: String,
        #[source]
        source: SelectorError,
    },

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("tweaker is already running")]
    AlreadyStarted,

    #[error("tweaker is not running")]
    NotStarted,

    #[error(transparent)]
    Dom(#[from] DomError),
}
