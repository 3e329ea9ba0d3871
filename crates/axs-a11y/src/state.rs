//! Element state markers
//!
//! A marker is a data attribute holding the semantic state an element had
//! after the last successful pass. Rules derive the current state from the
//! markup, compare it with the marker, then overwrite the marker whether
//! or not anything changed.

use std::fmt;
use std::marker::PhantomData;

use axs_dom::{Document, DomError, NodeId};

/// A closed set of states that round-trips through an attribute value
pub trait MarkerState: Sized + Copy + PartialEq + fmt::Debug {
    fn encode(self) -> &'static str;
    fn decode(value: &str) -> Option<Self>;
}

/// Reads and writes one marker attribute
#[derive(Debug, Clone)]
pub struct StateMarker<S> {
    attribute: String,
    _state: PhantomData<S>,
}

impl<S: MarkerState> StateMarker<S> {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            _state: PhantomData,
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Stored state; missing or unrecognised values read as `None`
    pub fn read(&self, doc: &Document, el: NodeId) -> Option<S> {
        let raw = doc.get_attribute(el, &self.attribute)?;
        let state = S::decode(raw);
        if state.is_none() {
            tracing::debug!(attribute = %self.attribute, value = raw, "ignoring unknown marker value");
        }
        state
    }

    pub fn write(&self, doc: &mut Document, el: NodeId, state: S) -> Result<(), DomError> {
        doc.set_attribute(el, &self.attribute, state.encode())
    }

    /// Record `new` as the element's state and report what it replaced
    pub fn update(&self, doc: &mut Document, el: NodeId, new: S) -> Result<Transition<S>, DomError> {
        let from = self.read(doc, el);
        self.write(doc, el, new)?;
        Ok(Transition { from, to: new })
    }
}

/// Previous and current state of one element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<S> {
    /// State before this pass, `None` on first sighting
    pub from: Option<S>,
    pub to: S,
}

impl<S: PartialEq> Transition<S> {
    /// True when a previous state existed and differs
    pub fn changed(&self) -> bool {
        self.from.as_ref().is_some_and(|from| *from != self.to)
    }
}

impl MarkerState for bool {
    fn encode(self) -> &'static str {
        if self { "true" } else { "false" }
    }

    fn decode(value: &str) -> Option<Self> {
        match value {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }
}

/// Stone colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stone {
    Black,
    White,
}

/// State of a board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    Empty,
    Occupied(Stone),
}

impl MarkerState for CellState {
    fn encode(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Occupied(Stone::Black) => "black",
            Self::Occupied(Stone::White) => "white",
        }
    }

    fn decode(value: &str) -> Option<Self> {
        match value {
            "empty" => Some(Self::Empty),
            "black" => Some(Self::Occupied(Stone::Black)),
            "white" => Some(Self::Occupied(Stone::White)),
            _ => None,
        }
    }
}

/// What a cell transition means for the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellEvent {
    /// A stone was placed on an empty cell
    Move(Stone),
    /// A stone was taken back, leaving the cell empty
    Undo(Stone),
    /// Nothing worth announcing (first sighting, no change, or a flip)
    Quiet,
}

impl Transition<CellState> {
    pub fn event(&self) -> CellEvent {
        match (self.from, self.to) {
            (Some(CellState::Empty), CellState::Occupied(stone)) => CellEvent::Move(stone),
            (Some(CellState::Occupied(stone)), CellState::Empty) => CellEvent::Undo(stone),
            _ => CellEvent::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_cell() -> (Document, NodeId) {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let cell = doc.create_element("td");
        doc.append_child(body, cell).unwrap();
        (doc, cell)
    }

    #[test]
    fn test_update_always_writes() {
        let (mut doc, cell) = doc_with_cell();
        let marker = StateMarker::<CellState>::new("data-axs-cell");

        let t = marker.update(&mut doc, cell, CellState::Empty).unwrap();
        assert_eq!(t.from, None);
        assert!(!t.changed());
        assert_eq!(doc.get_attribute(cell, "data-axs-cell"), Some("empty"));

        let t = marker.update(&mut doc, cell, CellState::Empty).unwrap();
        assert_eq!(t.from, Some(CellState::Empty));
        assert!(!t.changed());

        let t = marker.update(&mut doc, cell, CellState::Occupied(Stone::White)).unwrap();
        assert!(t.changed());
        assert_eq!(doc.get_attribute(cell, "data-axs-cell"), Some("white"));
    }

    #[test]
    fn test_cell_events() {
        let event = |from: Option<CellState>, to: CellState| Transition { from, to }.event();
        let black = CellState::Occupied(Stone::Black);
        let white = CellState::Occupied(Stone::White);

        assert_eq!(event(Some(CellState::Empty), black), CellEvent::Move(Stone::Black));
        assert_eq!(event(Some(white), CellState::Empty), CellEvent::Undo(Stone::White));
        assert_eq!(event(Some(black), white), CellEvent::Quiet);
        assert_eq!(event(Some(black), black), CellEvent::Quiet);
        assert_eq!(event(None, black), CellEvent::Quiet);
    }

    #[test]
    fn test_unknown_marker_reads_as_none() {
        let (mut doc, cell) = doc_with_cell();
        doc.set_attribute(cell, "data-axs-cell", "purple").unwrap();
        let marker = StateMarker::<CellState>::new("data-axs-cell");
        assert_eq!(marker.read(&doc, cell), None);
    }

    #[test]
    fn test_boolean_flag_marker() {
        let (mut doc, cell) = doc_with_cell();
        let marker = StateMarker::<bool>::new("data-axS-empty-cell");
        marker.write(&mut doc, cell, true).unwrap();
        assert_eq!(doc.get_attribute(cell, "data-axs-empty-cell"), Some("true"));
        let t = marker.update(&mut doc, cell, false).unwrap();
        assert!(t.changed());
    }
}
