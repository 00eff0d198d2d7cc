//! Selector matching against a `DomTree`
//!
//! Complex selectors are matched right to left: the last compound must match
//! the candidate, then each combinator walks towards the root looking for an
//! element that satisfies the previous compound.

use mnml_dom::{DomTree, Node, NodeId};

use crate::selectors::{
    Combinator, ComplexSelector, CompoundSelector, PseudoClass, SelectorComponent, SelectorList,
};

impl SelectorList {
    /// `element.matches(selector)`. Non-element nodes never match.
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        tree.is_element(node) && self.selectors.iter().any(|s| s.matches(tree, node))
    }

    /// `root.querySelector(selector)`: first matching strict descendant of
    /// `root` in document order
    pub fn query_first(&self, tree: &DomTree, root: NodeId) -> Option<NodeId> {
        tree.descendants(root).find(|&node| self.matches(tree, node))
    }

    /// `root.querySelectorAll(selector)`
    pub fn query_all(&self, tree: &DomTree, root: NodeId) -> Vec<NodeId> {
        tree.descendants(root)
            .filter(|&node| self.matches(tree, node))
            .collect()
    }
}

impl ComplexSelector {
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        match self.compounds.len() {
            0 => false,
            len => self.matches_from(tree, node, len - 1),
        }
    }

    fn matches_from(&self, tree: &DomTree, node: NodeId, idx: usize) -> bool {
        if !self.compounds[idx].matches(tree, node) {
            return false;
        }
        if idx == 0 {
            return true;
        }

        match self.combinators[idx - 1] {
            Combinator::Child => tree
                .parent_element(node)
                .is_some_and(|parent| self.matches_from(tree, parent, idx - 1)),
            Combinator::Descendant => tree
                .ancestors(node)
                .take_while(|&a| tree.is_element(a))
                .any(|ancestor| self.matches_from(tree, ancestor, idx - 1)),
            Combinator::NextSibling => tree
                .prev_element_sibling(node)
                .is_some_and(|prev| self.matches_from(tree, prev, idx - 1)),
            Combinator::SubsequentSibling => {
                let mut current = tree.prev_element_sibling(node);
                while let Some(prev) = current {
                    if self.matches_from(tree, prev, idx - 1) {
                        return true;
                    }
                    current = tree.prev_element_sibling(prev);
                }
                false
            }
        }
    }
}

impl CompoundSelector {
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        self.components.iter().all(|c| match_component(c, tree, node))
    }
}

/// Match a selector component against an element
pub fn match_component(component: &SelectorComponent, tree: &DomTree, node: NodeId) -> bool {
    let Some(element) = tree.element(node) else {
        return false;
    };

    match component {
        SelectorComponent::Universal => true,
        SelectorComponent::Type(tag) => tree.resolve(element.name) == tag,
        SelectorComponent::Id(id) => element.id.is_some_and(|i| tree.resolve(i) == id),
        SelectorComponent::Class(class) => {
            element.classes.iter().any(|&c| tree.resolve(c) == class)
        }
        SelectorComponent::Attribute(attr) => attr.matches(tree.attribute(node, &attr.name)),
        SelectorComponent::PseudoClass(pseudo) => match_pseudo_class(pseudo, tree, node),
    }
}

/// Match a pseudo-class against an element
pub fn match_pseudo_class(pseudo: &PseudoClass, tree: &DomTree, node: NodeId) -> bool {
    let has_attr = |name: &str| tree.attribute(node, name).is_some();

    match pseudo {
        PseudoClass::Link => tree.tag_name(node) == Some("a") && has_attr("href"),
        PseudoClass::Visited
        | PseudoClass::Hover
        | PseudoClass::Active
        | PseudoClass::Focus
        | PseudoClass::FocusVisible
        | PseudoClass::FocusWithin
        | PseudoClass::Target => false,

        PseudoClass::Enabled => !has_attr("disabled"),
        PseudoClass::Disabled => has_attr("disabled"),
        PseudoClass::Checked => has_attr("checked") || has_attr("selected"),
        PseudoClass::Required => has_attr("required"),
        PseudoClass::Optional => !has_attr("required"),

        PseudoClass::Root => tree
            .parent(node)
            .and_then(|p| tree.get(p))
            .is_some_and(Node::is_document),
        PseudoClass::Empty => tree
            .children(node)
            .all(|(_, child)| !(child.is_element() || child.is_text())),

        PseudoClass::FirstChild => position(tree, node, false).index == 1,
        PseudoClass::LastChild => {
            let pos = position(tree, node, false);
            pos.index == pos.count
        }
        PseudoClass::OnlyChild => position(tree, node, false).count == 1,
        PseudoClass::FirstOfType => position(tree, node, true).index == 1,
        PseudoClass::LastOfType => {
            let pos = position(tree, node, true);
            pos.index == pos.count
        }
        PseudoClass::OnlyOfType => position(tree, node, true).count == 1,
        PseudoClass::NthChild(expr) => expr.matches(position(tree, node, false).index as i32),
        PseudoClass::NthLastChild(expr) => expr.matches(position(tree, node, false).from_end()),
        PseudoClass::NthOfType(expr) => expr.matches(position(tree, node, true).index as i32),
        PseudoClass::NthLastOfType(expr) => expr.matches(position(tree, node, true).from_end()),

        PseudoClass::Not(compounds) => !compounds.iter().any(|c| c.matches(tree, node)),
    }
}

/// 1-based position among element siblings
struct SiblingPosition {
    index: usize,
    count: usize,
}

impl SiblingPosition {
    fn from_end(&self) -> i32 {
        (self.count - self.index + 1) as i32
    }
}

fn position(tree: &DomTree, node: NodeId, same_type: bool) -> SiblingPosition {
    let Some(parent) = tree.parent(node) else {
        return SiblingPosition { index: 1, count: 1 };
    };
    let tag = tree.element(node).map(|e| e.name);

    let mut index = 0;
    let mut count = 0;
    for sibling in tree.element_children(parent) {
        if same_type && tree.element(sibling).map(|e| e.name) != tag {
            continue;
        }
        count += 1;
        if sibling == node {
            index = count;
        }
    }
    SiblingPosition { index, count }
}
