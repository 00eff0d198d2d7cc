//! DOM Tree (arena-based allocation)
//!
//! Nodes are never freed: removing a node only unlinks it, so `NodeId`s
//! handed out to callers stay valid for the lifetime of the tree.

use crate::{
    DomError, DomResult, ElementData, InternedString, Node, NodeData, NodeId, StringInterner,
};

/// Arena-based DOM tree for memory efficiency
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
    interner: StringInterner,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
            interner: StringInterner::new(),
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the tree, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// String interner shared by every node of this tree
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn interner_mut(&mut self) -> &mut StringInterner {
        &mut self.interner
    }

    /// Resolve an interned string
    #[inline]
    pub fn resolve(&self, id: InternedString) -> &str {
        self.interner.resolve(id)
    }

    fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    // ------------------------------------------------------------------
    // Node creation
    // ------------------------------------------------------------------

    /// Create a detached element; the tag name is lowercased
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let name = self.interner.intern(&tag.to_ascii_lowercase());
        self.push(Node::new(NodeData::Element(ElementData::new(name))))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::new(NodeData::Text(content.to_string())))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::new(NodeData::Comment(content.to_string())))
    }

    /// Create a detached doctype node
    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.push(Node::new(NodeData::Doctype {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        }))
    }

    // ------------------------------------------------------------------
    // Element data
    // ------------------------------------------------------------------

    /// Element data of `id`, if it is an element
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    #[inline]
    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Lowercased tag name
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| self.resolve(e.name))
    }

    /// Read an attribute by (case-insensitive) name
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        let elem = self.element(id)?;
        let name = self.interner.lookup(&name.to_ascii_lowercase())?;
        elem.get_attr(name)
    }

    /// Set an attribute, keeping the id/class caches in sync
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        if !self.node(id)?.is_element() {
            return Err(DomError::InvalidNodeType { node: id, expected: "an element" });
        }

        let lowered = name.to_ascii_lowercase();
        let name_id = self.interner.intern(&lowered);
        let cached_id = (lowered == "id").then(|| self.interner.intern(value));
        let cached_classes: Option<Vec<_>> = (lowered == "class").then(|| {
            value
                .split_ascii_whitespace()
                .map(|class| self.interner.intern(class))
                .collect()
        });

        let Some(elem) = self.nodes[id.index()].as_element_mut() else {
            return Err(DomError::InvalidNodeType { node: id, expected: "an element" });
        };
        match elem.attrs.iter_mut().find(|a| a.name == name_id) {
            Some(attr) => attr.value = value.to_string(),
            None => elem.attrs.push(crate::Attribute {
                name: name_id,
                value: value.to_string(),
            }),
        }
        if let Some(cached) = cached_id {
            elem.id = Some(cached);
        }
        if let Some(classes) = cached_classes {
            elem.classes = classes;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Append `child` as the last child of `parent`, moving it if attached
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let parent_node = self.node(parent)?;
        if !(parent_node.is_element() || parent_node.is_document()) {
            return Err(DomError::InvalidNodeType {
                node: parent,
                expected: "an element or document",
            });
        }
        if self.node(child)?.is_document() || self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child);

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
        Ok(())
    }

    /// Unlink a node from its parent and siblings. Its subtree stays intact.
    pub fn detach(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else { return };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else if parent.is_valid() {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else if parent.is_valid() {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Copy a node into a new detached node; `deep` copies the subtree too
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> DomResult<NodeId> {
        let data = self.node(id)?.data.clone();
        if matches!(data, NodeData::Document) {
            return Err(DomError::InvalidNodeType { node: id, expected: "a non-document node" });
        }
        let copy = self.push(Node::new(data));

        if deep {
            let children: Vec<NodeId> = self.children(id).map(|(child, _)| child).collect();
            for child in children {
                let child_copy = self.clone_node(child, true)?;
                self.append_child(copy, child_copy)?;
            }
        }
        Ok(copy)
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent.valid()
    }

    /// Parent, only if it is an element
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.is_element(p))
    }

    /// Iterate over direct children
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Direct children that are elements
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .filter(|(_, node)| node.is_element())
            .map(|(child, _)| child)
    }

    pub fn prev_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.get(id)?.prev_sibling;
        while current.is_valid() {
            if self.is_element(current) {
                return Some(current);
            }
            current = self.nodes[current.index()].prev_sibling;
        }
        None
    }

    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.get(id)?.next_sibling;
        while current.is_valid() {
            if self.is_element(current) {
                return Some(current);
            }
            current = self.nodes[current.index()].next_sibling;
        }
        None
    }

    /// Strict ancestors, innermost first, ending at the document (or the
    /// topmost node of a detached subtree)
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.parent),
        }
    }

    /// Strict descendants in document (pre-)order
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root: id,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Inclusive containment check
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// The event propagation path for `target`: the target itself, then
    /// every ancestor up to the document
    pub fn composed_path(&self, target: NodeId) -> Vec<NodeId> {
        if self.get(target).is_none() {
            return Vec::new();
        }
        std::iter::once(target).chain(self.ancestors(target)).collect()
    }

    /// Concatenated text of all descendant text nodes
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self.nodes[d.index()].as_text())
            .collect()
    }

    /// Preorder successor of `id` within the subtree rooted at `root`
    fn following(&self, id: NodeId, root: NodeId) -> NodeId {
        let node = &self.nodes[id.index()];
        if node.first_child.is_valid() {
            return node.first_child;
        }
        let mut current = id;
        while current != root {
            let node = &self.nodes[current.index()];
            if node.next_sibling.is_valid() {
                return node.next_sibling;
            }
            current = node.parent;
            if !current.is_valid() {
                break;
            }
        }
        NodeId::NONE
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for Children<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.valid()?;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Iterator over the strict ancestors of a node
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next.valid()?;
        self.next = self.tree.get(id).map_or(NodeId::NONE, |n| n.parent);
        Some(id)
    }
}

/// Preorder iterator over the strict descendants of a node
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next.valid()?;
        self.next = self.tree.following(id, self.root);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let div = tree.create_element("DIV");
        let span = tree.create_element("span");
        let text = tree.create_text("hi");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, span).unwrap();
        tree.append_child(span, text).unwrap();
        (tree, div, span, text)
    }

    #[test]
    fn test_tag_names_are_lowercased() {
        let (tree, div, _, _) = sample();
        assert_eq!(tree.tag_name(div), Some("div"));
    }

    #[test]
    fn test_append_rejects_cycles() {
        let (mut tree, div, span, _) = sample();
        let err = tree.append_child(span, div).unwrap_err();
        assert_eq!(err, DomError::HierarchyRequest { parent: span, child: div });
    }

    #[test]
    fn test_append_moves_attached_node() {
        let (mut tree, div, span, _) = sample();
        let other = tree.create_element("p");
        tree.append_child(tree.root(), other).unwrap();
        tree.append_child(other, span).unwrap();

        assert_eq!(tree.children(div).count(), 0);
        assert_eq!(tree.parent(span), Some(other));
    }

    #[test]
    fn test_descendants_preorder() {
        let (tree, div, span, text) = sample();
        let order: Vec<_> = tree.descendants(tree.root()).collect();
        assert_eq!(order, vec![div, span, text]);
        assert_eq!(tree.descendants(span).collect::<Vec<_>>(), vec![text]);
    }

    #[test]
    fn test_composed_path() {
        let (tree, div, span, text) = sample();
        assert_eq!(tree.composed_path(text), vec![text, span, div, NodeId::ROOT]);
    }

    #[test]
    fn test_class_cache_follows_attribute() {
        let (mut tree, div, _, _) = sample();
        tree.set_attribute(div, "CLASS", "a b").unwrap();
        tree.set_attribute(div, "class", "c").unwrap();

        let c = tree.interner().lookup("c").unwrap();
        let elem = tree.element(div).unwrap();
        assert_eq!(elem.classes, vec![c]);
        assert_eq!(tree.attribute(div, "class"), Some("c"));
        assert_eq!(elem.attrs.len(), 1);
    }
}
