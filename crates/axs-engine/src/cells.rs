//! Board cell tracking
//!
//! Game boards redraw cells by swapping image sources or class names.
//! Comparing the state derived from markup with the state stored on the
//! cell tells a fresh move apart from a plain redraw.

use axs_a11y::{CellEvent, CellState, StateMarker, Stone};
use axs_dom::NodeId;

use crate::config::EngineConfig;
use crate::page::Page;
use crate::TweakError;

/// Words used in labels and announcements
///
/// `moved`, `undone` and `placed` are templates: `{stone}` and `{coord}`
/// are replaced with the stone name and the cell coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePhrases {
    pub empty: String,
    pub black: String,
    pub white: String,
    pub moved: String,
    pub undone: String,
    /// Label for the most recently played stone
    pub placed: String,
}

impl MovePhrases {
    pub fn korean() -> Self {
        Self {
            empty: "빈칸".into(),
            black: "흑".into(),
            white: "백".into(),
            moved: "{stone} {coord}에 착수함".into(),
            undone: "{coord} 착수 취소됨".into(),
            placed: "{stone} 착수함".into(),
        }
    }

    pub fn stone(&self, stone: Stone) -> &str {
        match stone {
            Stone::Black => &self.black,
            Stone::White => &self.white,
        }
    }

    /// Short name of a cell state, as used in cell labels
    pub fn state(&self, state: CellState) -> &str {
        match state {
            CellState::Empty => &self.empty,
            CellState::Occupied(stone) => self.stone(stone),
        }
    }

    pub fn move_text(&self, stone: Stone, coord: &str) -> String {
        self.moved.replace("{stone}", self.stone(stone)).replace("{coord}", coord)
    }

    pub fn undo_text(&self, coord: &str) -> String {
        self.undone.replace("{coord}", coord)
    }

    pub fn placed_text(&self, stone: Stone) -> String {
        self.placed.replace("{stone}", self.stone(stone))
    }
}

impl Default for MovePhrases {
    fn default() -> Self {
        Self {
            empty: "Empty".into(),
            black: "Black".into(),
            white: "White".into(),
            moved: "{stone} {coord}".into(),
            undone: "{coord} undone".into(),
            placed: "{stone} placed".into(),
        }
    }
}

/// Detects moves and undos on board cells and announces them
#[derive(Debug, Clone)]
pub struct CellTracker {
    marker: StateMarker<CellState>,
    region: String,
    phrases: MovePhrases,
}

impl CellTracker {
    pub fn new(config: &EngineConfig, phrases: MovePhrases) -> Self {
        Self {
            marker: StateMarker::new(config.cell_marker.clone()),
            region: config.announce_region.clone(),
            phrases,
        }
    }

    pub fn phrases(&self) -> &MovePhrases {
        &self.phrases
    }

    /// Record `state` on `cell` and announce a move or an undo
    ///
    /// The marker is written before announcing, so a failed announcement
    /// never leaves a stale marker behind.
    pub fn track(&self, page: &mut Page, cell: NodeId, state: CellState, coord: &str) -> Result<CellEvent, TweakError> {
        let transition = self.marker.update(&mut page.document, cell, state)?;
        let event = transition.event();
        match event {
            CellEvent::Move(stone) => {
                page.announce(&self.phrases.move_text(stone, coord), &self.region)?;
            }
            CellEvent::Undo(_) => {
                page.announce(&self.phrases.undo_text(coord), &self.region)?;
            }
            CellEvent::Quiet => {}
        }
        if event != CellEvent::Quiet {
            tracing::debug!(cell = %cell, coord, ?event, "cell changed");
        }
        Ok(event)
    }
}
