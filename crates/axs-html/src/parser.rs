//! HTML5 Parser implementation
//!
//! Parses with html5ever into an RcDom, then copies the nodes into our
//! arena. Whitespace-only text nodes are dropped on the way.

use axs_dom::{Document, DomTree, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::ParseError;

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, ParseError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, ParseError> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = self.parse_rcdom(html)?;
        let mut document = Document::empty(url);
        let root = document.root();
        self.convert_node(&dom.document, document.tree_mut(), root)?;

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Parse `html` as body content and append it under `parent`
    ///
    /// The nodes are built detached and then inserted through the document,
    /// so observers see one child-list record per top-level node. Returns
    /// the inserted top-level nodes.
    pub fn parse_fragment_into(
        &self,
        document: &mut Document,
        parent: NodeId,
        html: &str,
    ) -> Result<Vec<NodeId>, ParseError> {
        let dom = self.parse_rcdom(html)?;
        let body = find_body(&dom.document).ok_or(ParseError::NoBody)?;

        let mut inserted = Vec::new();
        for child in body.children.borrow().iter() {
            if let Some(id) = self.build_detached(child, document.tree_mut())? {
                inserted.push(id);
            }
        }
        for &id in &inserted {
            document.append_child(parent, id)?;
        }
        Ok(inserted)
    }

    fn parse_rcdom(&self, html: &str) -> Result<RcDom, ParseError> {
        Ok(parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?)
    }

    /// Convert an RcDom node and attach it under `parent`
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) -> Result<(), ParseError> {
        if let RcNodeData::Document = handle.data {
            for child in handle.children.borrow().iter() {
                self.convert_node(child, tree, parent)?;
            }
            return Ok(());
        }
        if let Some(id) = self.build_detached(handle, tree)? {
            tree.append_child(parent, id)?;
        }
        Ok(())
    }

    /// Build a detached copy of an RcDom subtree
    fn build_detached(&self, handle: &Handle, tree: &mut DomTree) -> Result<Option<NodeId>, ParseError> {
        let id = match &handle.data {
            RcNodeData::Document | RcNodeData::ProcessingInstruction { .. } => return Ok(None),
            RcNodeData::Doctype { name, .. } => tree.create_doctype(name),
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if text.trim().is_empty() {
                    return Ok(None);
                }
                tree.create_text(&text)
            }
            RcNodeData::Comment { contents } => tree.create_comment(contents),
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                if let Some(elem) = tree.element_mut(id) {
                    for attr in attrs.borrow().iter() {
                        elem.set_attr(&attr.name.local, &attr.value);
                    }
                }
                for child in handle.children.borrow().iter() {
                    if let Some(child_id) = self.build_detached(child, tree)? {
                        tree.append_child(id, child_id)?;
                    }
                }
                id
            }
        };
        Ok(Some(id))
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

fn find_body(handle: &Handle) -> Option<Handle> {
    if let RcNodeData::Element { name, .. } = &handle.data {
        if &*name.local == "body" {
            return Some(handle.clone());
        }
    }
    handle.children.borrow().iter().find_map(find_body)
}
