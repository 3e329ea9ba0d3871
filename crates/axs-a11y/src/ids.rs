//! Generated element ids
//!
//! Relationship attributes (`aria-owns`, `aria-labelledby`) need ids on
//! elements the page never named. Each generator is owned by one engine
//! instance, so independent instances never share a counter.

use axs_dom::{Document, DomError, NodeId};

/// Hands out `<prefix><n>` ids
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
    next: u64,
}

impl IdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), next: 0 }
    }

    /// Return the element's id, assigning a fresh one if it has none
    ///
    /// Skips candidates already used elsewhere in the document.
    pub fn ensure_id(&mut self, doc: &mut Document, el: NodeId) -> Result<String, DomError> {
        let data = doc.tree().element(el).ok_or(DomError::NotAnElement(el))?;
        if let Some(id) = data.id() {
            return Ok(id.to_string());
        }
        let id = loop {
            let candidate = format!("{}{}", self.prefix, self.next);
            self.next += 1;
            if doc.get_element_by_id(&candidate).is_none() {
                break candidate;
            }
        };
        doc.set_attribute(el, "id", &id)?;
        Ok(id)
    }

    /// Point `aria-owns` of `parent` at `nodes`, naming them as needed
    pub fn make_element_own(&mut self, doc: &mut Document, parent: NodeId, nodes: &[NodeId]) -> Result<(), DomError> {
        let ids = nodes.iter()
            .map(|&node| self.ensure_id(doc, node))
            .collect::<Result<Vec<_>, _>>()?;
        doc.set_attribute(parent, "aria-owns", &ids.join(" "))
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new("axsg-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_id_is_stable() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let a = doc.create_element("div");
        doc.append_child(body, a).unwrap();

        let mut ids = IdGenerator::default();
        let first = ids.ensure_id(&mut doc, a).unwrap();
        assert_eq!(first, "axsg-0");
        assert_eq!(ids.ensure_id(&mut doc, a).unwrap(), "axsg-0");
    }

    #[test]
    fn test_generators_are_independent_and_skip_taken_ids() {
        let mut doc = Document::default();
        let body = doc.body().unwrap();
        let taken = doc.create_element("div");
        doc.set_attribute(taken, "id", "axsg-0").unwrap();
        doc.append_child(body, taken).unwrap();
        let list = doc.create_element("ul");
        let a = doc.create_element("li");
        let b = doc.create_element("li");
        for node in [list, a, b] {
            doc.append_child(body, node).unwrap();
        }

        let mut ids = IdGenerator::default();
        ids.make_element_own(&mut doc, list, &[a, b]).unwrap();
        assert_eq!(doc.get_attribute(list, "aria-owns"), Some("axsg-1 axsg-2"));

        let mut other = IdGenerator::new("other-");
        let c = doc.create_element("li");
        doc.append_child(body, c).unwrap();
        assert_eq!(other.ensure_id(&mut doc, c).unwrap(), "other-0");
    }
}
