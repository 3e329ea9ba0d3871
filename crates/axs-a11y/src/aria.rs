//! ARIA Support
//!
//! Helpers that write accessibility semantics onto existing elements.
//! Every helper writes only ARIA-side attributes (`role`, `aria-*`,
//! `tabindex`) so that watching presentation attributes never sees them.

use axs_dom::{Document, DomError, NodeId};

/// ARIA roles assigned by the helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AriaRole {
    Button,
    Heading,
    Img,
    Presentation,
    Region,
}

impl AriaRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Heading => "heading",
            Self::Img => "img",
            Self::Presentation => "presentation",
            Self::Region => "region",
        }
    }
}

pub fn set_role(doc: &mut Document, el: NodeId, role: AriaRole) -> Result<(), DomError> {
    doc.set_attribute(el, "role", role.as_str())
}

pub fn make_heading(doc: &mut Document, el: NodeId, level: u32) -> Result<(), DomError> {
    set_role(doc, el, AriaRole::Heading)?;
    doc.set_attribute(el, "aria-level", &level.to_string())
}

pub fn make_region(doc: &mut Document, el: NodeId, label: &str) -> Result<(), DomError> {
    set_role(doc, el, AriaRole::Region)?;
    doc.set_attribute(el, "aria-label", label)
}

/// Button role, with a label only when one is given
pub fn make_button(doc: &mut Document, el: NodeId, label: Option<&str>) -> Result<(), DomError> {
    set_role(doc, el, AriaRole::Button)?;
    match label {
        Some(label) if !label.is_empty() => doc.set_attribute(el, "aria-label", label),
        _ => Ok(()),
    }
}

pub fn make_presentational(doc: &mut Document, el: NodeId) -> Result<(), DomError> {
    set_role(doc, el, AriaRole::Presentation)
}

pub fn set_label(doc: &mut Document, el: NodeId, label: &str) -> Result<(), DomError> {
    doc.set_attribute(el, "aria-label", label)
}

pub fn set_description(doc: &mut Document, el: NodeId, description: &str) -> Result<(), DomError> {
    doc.set_attribute(el, "aria-description", description)
}

pub fn make_hidden(doc: &mut Document, el: NodeId) -> Result<(), DomError> {
    doc.set_attribute(el, "aria-hidden", "true")
}

pub fn set_expanded(doc: &mut Document, el: NodeId, expanded: bool) -> Result<(), DomError> {
    doc.set_attribute(el, "aria-expanded", if expanded { "true" } else { "false" })
}

/// Focus an element even if the page never made it focusable
pub fn force_focus(doc: &mut Document, el: NodeId) -> Result<(), DomError> {
    if !doc.has_attribute(el, "tabindex") {
        doc.set_attribute(el, "tabindex", "-1")?;
    }
    doc.focus(el)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_div() -> (Document, NodeId) {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let div = doc.create_element("div");
        doc.append_child(body, div).unwrap();
        (doc, div)
    }

    #[test]
    fn test_heading_and_region() {
        let (mut doc, div) = doc_with_div();
        make_heading(&mut doc, div, 2).unwrap();
        assert_eq!(doc.get_attribute(div, "role"), Some("heading"));
        assert_eq!(doc.get_attribute(div, "aria-level"), Some("2"));

        make_region(&mut doc, div, "Game board").unwrap();
        assert_eq!(doc.get_attribute(div, "role"), Some("region"));
        assert_eq!(doc.get_attribute(div, "aria-label"), Some("Game board"));
    }

    #[test]
    fn test_button_without_label_keeps_existing_label() {
        let (mut doc, div) = doc_with_div();
        set_label(&mut doc, div, "Undo").unwrap();
        make_button(&mut doc, div, None).unwrap();
        assert_eq!(doc.get_attribute(div, "role"), Some("button"));
        assert_eq!(doc.get_attribute(div, "aria-label"), Some("Undo"));
    }

    #[test]
    fn test_force_focus_respects_existing_tabindex() {
        let (mut doc, div) = doc_with_div();
        force_focus(&mut doc, div).unwrap();
        assert_eq!(doc.get_attribute(div, "tabindex"), Some("-1"));
        assert_eq!(doc.active_element(), Some(div));

        doc.set_attribute(div, "tabindex", "0").unwrap();
        force_focus(&mut doc, div).unwrap();
        assert_eq!(doc.get_attribute(div, "tabindex"), Some("0"));
    }

    #[test]
    fn test_flags() {
        let (mut doc, div) = doc_with_div();
        make_hidden(&mut doc, div).unwrap();
        set_expanded(&mut doc, div, false).unwrap();
        make_presentational(&mut doc, div).unwrap();
        set_description(&mut doc, div, "d4").unwrap();
        assert_eq!(doc.get_attribute(div, "aria-hidden"), Some("true"));
        assert_eq!(doc.get_attribute(div, "aria-expanded"), Some("false"));
        assert_eq!(doc.get_attribute(div, "role"), Some("presentation"));
        assert_eq!(doc.get_attribute(div, "aria-description"), Some("d4"));
    }
}
