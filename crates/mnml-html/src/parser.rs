//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts it to our DOM format.

use html5ever::{local_name, ns, parse_document, parse_fragment, QualName};
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use mnml_dom::{Document, DomTree, NodeId};

use crate::HtmlError;

/// HTML5 parser
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, HtmlError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a document URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, HtmlError> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = read(html)?;
        let mut document = Document::empty(url);
        let root = document.tree().root();
        self.convert_node(&dom.document, document.tree_mut(), root)?;
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Parse markup as the contents of a `<template>` element. The
    /// top-level nodes are created detached inside `tree` and returned in
    /// source order; whitespace-only text between them is dropped.
    ///
    /// The template context accepts any content model, so table parts
    /// (`<tr>`, `<td>`) and `<option>` come through as written.
    pub fn parse_fragment(&self, markup: &str, tree: &mut DomTree) -> Result<Vec<NodeId>, HtmlError> {
        let context = QualName::new(None, ns!(html), local_name!("template"));
        let dom = parse_fragment(RcDom::default(), Default::default(), context, Vec::new(), false)
            .from_utf8()
            .read_from(&mut markup.as_bytes())?;

        // The fragment is the children of the synthetic <html> root
        let root = dom
            .document
            .children
            .borrow()
            .iter()
            .find(|child| matches!(child.data, RcNodeData::Element { .. }))
            .cloned();
        let Some(root) = root else {
            return Ok(Vec::new());
        };

        let mut top_level = Vec::new();
        for child in root.children.borrow().iter() {
            if is_blank_text(child) {
                continue;
            }
            if let Some(id) = self.convert_node(child, tree, NodeId::NONE)? {
                top_level.push(id);
            }
        }

        tracing::debug!(nodes = top_level.len(), "parsed HTML fragment");
        Ok(top_level)
    }

    /// Convert an RcDom node (and its subtree) to our DOM format. Returns the
    /// created node, if any; it is appended to `parent` when that is valid.
    fn convert_node(
        &self,
        handle: &Handle,
        tree: &mut DomTree,
        parent: NodeId,
    ) -> Result<Option<NodeId>, HtmlError> {
        let id = match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent)?;
                }
                return Ok(None);
            }
            RcNodeData::Doctype { name, public_id, system_id } => {
                tree.create_doctype(name, public_id, system_id)
            }
            RcNodeData::Text { contents } => tree.create_text(&contents.borrow()),
            RcNodeData::Comment { contents } => tree.create_comment(contents),
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                for attr in attrs.borrow().iter() {
                    tree.set_attribute(id, &attr.name.local, &attr.value)?;
                }
                id
            }
            RcNodeData::ProcessingInstruction { .. } => return Ok(None),
        };

        if parent.is_valid() {
            tree.append_child(parent, id)?;
        }
        for child in handle.children.borrow().iter() {
            self.convert_node(child, tree, id)?;
        }
        Ok(Some(id))
    }
}

fn read(markup: &str) -> Result<RcDom, HtmlError> {
    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut markup.as_bytes())?;
    Ok(dom)
}

fn is_blank_text(handle: &Handle) -> bool {
    match &handle.data {
        RcNodeData::Text { contents } => contents.borrow().trim().is_empty(),
        _ => false,
    }
}
