//! Document - High-level document API

use crate::{DomTree, InternedString, NodeId};

/// Document loading state, as exposed by `document.readyState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReadyState {
    /// Still parsing
    Loading,
    /// Parsed; "DOMContentLoaded" fires on entering this state
    Interactive,
    /// Subresources done; "load" fires on entering this state
    Complete,
}

impl ReadyState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Interactive => "interactive",
            Self::Complete => "complete",
        }
    }
}

/// HTML Document
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    ready_state: ReadyState,
}

impl Document {
    /// Create a new document with an html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut document = Self::empty(url);
        let tree = &mut document.tree;

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Freshly created nodes under the document node cannot violate hierarchy rules
        let linked = tree
            .append_child(tree.root(), html)
            .and_then(|_| tree.append_child(html, head))
            .and_then(|_| tree.append_child(html, body));
        debug_assert!(linked.is_ok());

        document.html_element = html;
        document.head_element = head;
        document.body_element = body;
        document
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            ready_state: ReadyState::Loading,
        }
    }

    /// Locate html/head/body after the tree was built externally (by a parser)
    pub fn finalize(&mut self) {
        let tree = &self.tree;
        let find_child = |parent: NodeId, tag: &str| {
            tree.element_children(parent)
                .find(|&child| tree.tag_name(child) == Some(tag))
                .unwrap_or(NodeId::NONE)
        };

        let html = find_child(tree.root(), "html");
        let (head, body) = if html.is_valid() {
            (find_child(html, "head"), find_child(html, "body"))
        } else {
            (NodeId::NONE, NodeId::NONE)
        };

        self.html_element = html;
        self.head_element = head;
        self.body_element = body;
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get document title
    pub fn title(&self) -> String {
        if !self.head_element.is_valid() {
            return String::new();
        }

        self.tree
            .element_children(self.head_element)
            .find(|&child| self.tree.tag_name(child) == Some("title"))
            .map(|title| self.tree.text_content(title))
            .unwrap_or_default()
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        let target: InternedString = self.tree.interner().lookup(id)?;
        self.tree
            .descendants(self.tree.root())
            .find(|&node| self.tree.element(node).is_some_and(|e| e.id == Some(target)))
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// Move the ready state forward. Returns the states entered, in order;
    /// empty if `next` is not ahead of the current state.
    pub fn advance_ready_state(&mut self, next: ReadyState) -> Vec<ReadyState> {
        let mut entered = Vec::new();
        while self.ready_state < next {
            self.ready_state = match self.ready_state {
                ReadyState::Loading => ReadyState::Interactive,
                ReadyState::Interactive | ReadyState::Complete => ReadyState::Complete,
            };
            entered.push(self.ready_state);
        }
        if entered.is_empty() {
            tracing::warn!(
                current = self.ready_state.as_str(),
                requested = next.as_str(),
                "ignoring ready state transition that does not move forward"
            );
        }
        entered
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton() {
        let doc = Document::new("https://example.com/");
        assert_eq!(doc.tree().tag_name(doc.document_element()), Some("html"));
        assert_eq!(doc.tree().parent(doc.body()), Some(doc.document_element()));
        assert_eq!(doc.ready_state(), ReadyState::Loading);
    }

    #[test]
    fn test_ready_state_skips_fill_in_intermediate_states() {
        let mut doc = Document::default();
        assert_eq!(
            doc.advance_ready_state(ReadyState::Complete),
            vec![ReadyState::Interactive, ReadyState::Complete]
        );
        assert!(doc.advance_ready_state(ReadyState::Interactive).is_empty());
    }

    #[test]
    fn test_get_element_by_id() {
        let mut doc = Document::default();
        let body = doc.body();
        let div = doc.tree_mut().create_element("div");
        doc.tree_mut().append_child(body, div).unwrap();
        doc.tree_mut().set_attribute(div, "id", "main").unwrap();

        assert_eq!(doc.get_element_by_id("main"), Some(div));
        assert_eq!(doc.get_element_by_id("missing"), None);
    }

    #[test]
    fn test_title_reads_edits_made_through_tree_mut() {
        let mut doc = Document::default();
        let head = doc.head();
        let title = doc.tree_mut().create_element("title");
        let text = doc.tree_mut().create_text("Inbox");
        doc.tree_mut().append_child(title, text).unwrap();
        doc.tree_mut().append_child(head, title).unwrap();

        assert_eq!(doc.title(), "Inbox");
        assert_eq!(doc.tree().parent(title), Some(head));
    }
}
