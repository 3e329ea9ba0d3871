//! Document - High-level document API
//!
//! All writes that observers must see go through `Document`; the raw
//! `DomTree` behind `tree_mut` is unobserved and meant for builders.

use crate::observer::ObserverRegistry;
use crate::{
    DomError, DomTree, MutationObserverInit, MutationRecord, NodeId, ObserverId, SelectorError,
    SelectorList,
};

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: String,
    observers: ObserverRegistry,
    focused: Option<NodeId>,
}

impl Document {
    /// Create a document with an `html`/`head`/`body` skeleton
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty(url);
        let built = Self::build_skeleton(&mut doc.tree);
        debug_assert!(built.is_ok(), "skeleton on a fresh tree: {built:?}");
        doc
    }

    fn build_skeleton(tree: &mut DomTree) -> Result<(), DomError> {
        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");
        tree.append_child(tree.root(), html)?;
        tree.append_child(html, head)?;
        tree.append_child(html, body)?;
        Ok(())
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            observers: ObserverRegistry::default(),
            focused: None,
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Get <html> element
    pub fn document_element(&self) -> Option<NodeId> {
        self.tree.first_element_child(self.root())
    }

    /// Get <head> element
    pub fn head(&self) -> Option<NodeId> {
        self.html_child("head")
    }

    /// Get <body> element
    pub fn body(&self) -> Option<NodeId> {
        self.html_child("body")
    }

    fn html_child(&self, tag: &str) -> Option<NodeId> {
        let html = self.document_element()?;
        self.tree.element_children(html)
            .find(|&c| self.tree.element(c).is_some_and(|e| e.is(tag)))
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Unobserved mutable access, for building documents
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Create a detached element
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.tree.create_element(name)
    }

    /// Create a detached text node
    pub fn create_text_node(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.tree.descendants(self.root())
            .find(|&n| self.tree.element(n).and_then(|e| e.id()) == Some(id))
    }

    pub fn get_attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        self.tree.element(element)?.get_attr(name)
    }

    pub fn has_attribute(&self, element: NodeId, name: &str) -> bool {
        self.tree.element(element).is_some_and(|e| e.has_attr(name))
    }

    /// Set an attribute, queueing an attribute record even if the value is unchanged
    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        validate_attribute_name(name)?;
        let data = self.element_data_mut(element)?;
        let old = data.set_attr(name, value);
        if !self.observers.is_empty() {
            self.observers.queue_attribute(&self.tree, element, name, old.as_deref());
        }
        Ok(())
    }

    /// Remove an attribute; absent attributes queue nothing
    pub fn remove_attribute(&mut self, element: NodeId, name: &str) -> Result<(), DomError> {
        let data = self.element_data_mut(element)?;
        if let Some(old) = data.remove_attr(name) {
            if !self.observers.is_empty() {
                self.observers.queue_attribute(&self.tree, element, name, Some(&old));
            }
        }
        Ok(())
    }

    fn element_data_mut(&mut self, element: NodeId) -> Result<&mut crate::ElementData, DomError> {
        if self.tree.get(element).is_none() {
            return Err(DomError::NoSuchNode(element));
        }
        self.tree.element_mut(element).ok_or(DomError::NotAnElement(element))
    }

    /// Append `child` to `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` under `parent` before `reference`, moving it if attached
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        let old_position = self.position(child);
        self.tree.insert_before(parent, child, reference)?;
        if self.observers.is_empty() {
            return Ok(());
        }
        if let Some((old_parent, prev, next)) = old_position {
            self.observers.queue_child_list(
                &self.tree,
                MutationRecord::child_list(old_parent, vec![], vec![child], prev, next),
            );
        }
        let (_, prev, next) = self.position(child).unwrap_or((parent, None, None));
        self.observers.queue_child_list(
            &self.tree,
            MutationRecord::child_list(parent, vec![child], vec![], prev, next),
        );
        Ok(())
    }

    /// Detach `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let (_, prev, next) = self.position(child).unwrap_or((parent, None, None));
        self.tree.remove_child(parent, child)?;
        if !self.observers.is_empty() {
            self.observers.queue_child_list(
                &self.tree,
                MutationRecord::child_list(parent, vec![], vec![child], prev, next),
            );
        }
        Ok(())
    }

    /// Detach `node` from whatever parent it has
    pub fn remove(&mut self, node: NodeId) -> Result<(), DomError> {
        let parent = self.tree.parent(node).ok_or(DomError::Detached(node))?;
        self.remove_child(parent, node)
    }

    fn position(&self, node: NodeId) -> Option<(NodeId, Option<NodeId>, Option<NodeId>)> {
        let n = self.tree.get(node)?;
        let parent = n.parent.some()?;
        Some((parent, n.prev_sibling.some(), n.next_sibling.some()))
    }

    /// Concatenated descendant text
    pub fn text_content(&self, node: NodeId) -> String {
        self.tree.text_content(node)
    }

    /// Replace all children of `node` with a single text node
    ///
    /// Queues one child-list record covering both the removed and added nodes.
    /// Removed children stay in the arena, so repeated calls grow it by one
    /// node each.
    pub fn set_text_content(&mut self, node: NodeId, text: &str) -> Result<(), DomError> {
        if self.tree.get(node).is_none() {
            return Err(DomError::NoSuchNode(node));
        }
        let removed: Vec<NodeId> = self.tree.children(node).collect();
        for &child in &removed {
            self.tree.remove_child(node, child)?;
        }
        let mut added = Vec::new();
        if !text.is_empty() {
            let text_node = self.tree.create_text(text);
            self.tree.append_child(node, text_node)?;
            added.push(text_node);
        }
        if !self.observers.is_empty() && !(removed.is_empty() && added.is_empty()) {
            self.observers.queue_child_list(
                &self.tree,
                MutationRecord::child_list(node, added, removed, None, None),
            );
        }
        Ok(())
    }

    /// Every descendant of `root` matching `selector`, in document order
    pub fn query_selector_all(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        Ok(SelectorList::parse(selector)?.select_all(&self.tree, root))
    }

    /// First descendant of `root` matching `selector`
    pub fn query_selector(&self, root: NodeId, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        Ok(self.query_selector_all(root, selector)?.into_iter().next())
    }

    /// Check if `element` matches `selector`
    pub fn matches(&self, element: NodeId, selector: &str) -> Result<bool, SelectorError> {
        Ok(SelectorList::parse(selector)?.matches(&self.tree, element))
    }

    /// Move focus to `element`
    pub fn focus(&mut self, element: NodeId) -> Result<(), DomError> {
        if self.tree.get(element).is_none() {
            return Err(DomError::NoSuchNode(element));
        }
        if !self.tree.is_element(element) {
            return Err(DomError::NotAnElement(element));
        }
        tracing::trace!("focus moved to {}", element);
        self.focused = Some(element);
        Ok(())
    }

    /// Currently focused element
    pub fn active_element(&self) -> Option<NodeId> {
        self.focused
    }

    /// Start observing `target`
    pub fn observe(&mut self, target: NodeId, options: MutationObserverInit) -> Result<ObserverId, DomError> {
        if self.tree.get(target).is_none() {
            return Err(DomError::NoSuchNode(target));
        }
        self.observers.observe(target, options)
    }

    /// Drain the queued records of an observer
    pub fn take_records(&mut self, observer: ObserverId) -> Result<Vec<MutationRecord>, DomError> {
        self.observers.take_records(observer)
    }

    /// Number of queued records for an observer
    pub fn pending_records(&self, observer: ObserverId) -> usize {
        self.observers.pending(observer)
    }

    /// Stop an observer, dropping its queued records
    pub fn disconnect(&mut self, observer: ObserverId) -> Result<(), DomError> {
        self.observers.disconnect(observer)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

fn validate_attribute_name(name: &str) -> Result<(), DomError> {
    let invalid = name.is_empty()
        || name.chars().any(|c| c.is_whitespace() || matches!(c, '/' | '>' | '=' | '"' | '\'' | '\0'));
    if invalid {
        return Err(DomError::InvalidAttributeName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_skeleton() {
        let doc = Document::new("about:blank");
        let html = doc.document_element().unwrap();
        assert_eq!(doc.tree().parent(html), Some(doc.root()));
        assert_eq!(doc.tree().parent(doc.head().unwrap()), Some(html));
        assert_eq!(doc.tree().parent(doc.body().unwrap()), Some(html));
        assert!(Document::empty("about:blank").body().is_none());
    }
}
