//! axs Sites
//!
//! Rule tables for specific game pages. Each module builds one
//! `SiteProfile`; rules within a profile are order dependent and say so
//! where they are.

pub mod board_viewer;
pub mod reversi;

use axs_dom::{Document, NodeId};
use axs_engine::{EngineConfig, EngineError, MovePhrases, SiteProfile, TweakError};

/// Known profile names
pub const SITES: &[&str] = &[reversi::NAME, board_viewer::NAME];

/// Build the profile called `name`
pub fn profile_for(name: &str, config: &EngineConfig, phrases: MovePhrases) -> Option<Result<SiteProfile, EngineError>> {
    tracing::debug!(site = name, "building site profile");
    match name {
        reversi::NAME => Some(reversi::profile(config, phrases)),
        board_viewer::NAME => Some(board_viewer::profile(config, phrases)),
        _ => None,
    }
}

/// Visible text of an element, whitespace trimmed
pub(crate) fn visible_text(doc: &Document, el: NodeId) -> String {
    doc.text_content(el).trim().to_string()
}

/// Element that has to be there for a rule to make sense
pub(crate) fn expect_node(node: Option<NodeId>, what: &'static str) -> Result<NodeId, TweakError> {
    node.ok_or(TweakError::Missing(what))
}
