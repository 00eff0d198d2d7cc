//! Selector lookups
//!
//! Compiled selectors are cached per page, keyed by their source text. The
//! ancestor helpers stop at the first non-element ancestor, so a walk ends at
//! the document node or at the top of a detached subtree.

use std::collections::HashMap;
use std::rc::Rc;

use mnml_css::{parse_selector, SelectorError, SelectorList};
use mnml_dom::{DomTree, NodeId};

/// Parsed selectors by source text
#[derive(Debug, Default)]
pub struct SelectorCache {
    compiled: HashMap<String, Rc<SelectorList>>,
}

impl SelectorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiled form of `selector`. Parse failures are not cached.
    pub fn get_or_parse(&mut self, selector: &str) -> Result<Rc<SelectorList>, SelectorError> {
        if let Some(compiled) = self.compiled.get(selector) {
            return Ok(Rc::clone(compiled));
        }

        let compiled = Rc::new(parse_selector(selector)?);
        tracing::trace!(selector, "selector compiled");
        self.compiled.insert(selector.to_string(), Rc::clone(&compiled));
        Ok(compiled)
    }

    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}

fn element_ancestors<'a>(tree: &'a DomTree, node: NodeId) -> impl Iterator<Item = NodeId> + 'a {
    tree.ancestors(node).take_while(move |&ancestor| tree.is_element(ancestor))
}

/// Nearest strict ancestor of `node` that matches `selector`
pub fn find_parent(tree: &DomTree, node: NodeId, selector: &SelectorList) -> Option<NodeId> {
    element_ancestors(tree, node).find(|&ancestor| selector.matches(tree, ancestor))
}

/// Every strict ancestor of `node` that matches `selector`, innermost first
pub fn find_parents(tree: &DomTree, node: NodeId, selector: &SelectorList) -> Vec<NodeId> {
    element_ancestors(tree, node)
        .filter(|&ancestor| selector.matches(tree, ancestor))
        .collect()
}
