//! Element construction
//!
//! `create_element` keeps one detached template element per tag name and
//! hands out shallow clones of it. `create_html` instantiates a markup string
//! as detached nodes and returns the first one, which must be an element.

use std::collections::HashMap;

use mnml_dom::{DomTree, NodeId};

use crate::error::{MnmlError, Result};

/// Detached template element per tag name, never evicted
#[derive(Debug, Default)]
pub struct ElementCache {
    templates: HashMap<String, NodeId>,
}

impl ElementCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh element for `tag`: a shallow clone of the cached template,
    /// created on first use
    pub fn create(&mut self, tree: &mut DomTree, tag: &str) -> Result<NodeId> {
        let template = match self.templates.get(tag) {
            Some(&template) => template,
            None => {
                let template = tree.create_element(tag);
                tracing::trace!(tag, %template, "element template cached");
                self.templates.insert(tag.to_string(), template);
                template
            }
        };
        Ok(tree.clone_node(template, false)?)
    }

    /// Number of cached tag templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Parse `markup` (trimmed) into detached nodes of `tree` and return the
/// first top-level node. Fails unless that node is an element.
pub fn create_html(tree: &mut DomTree, markup: &str) -> Result<NodeId> {
    let nodes = mnml_html::parse_fragment(markup.trim(), tree)?;
    let first = nodes.first().copied();

    match first.and_then(|node| tree.get(node).map(|n| (node, n))) {
        Some((node, n)) if n.is_element() => Ok(node),
        Some((_, n)) => Err(MnmlError::UnexpectedNodeKind {
            expected: "element",
            found: n.kind(),
        }),
        None => Err(MnmlError::UnexpectedNodeKind {
            expected: "element",
            found: "nothing",
        }),
    }
}
