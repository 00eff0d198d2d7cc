//! Delegated event registry
//!
//! `event name -> selector -> callbacks`. The page attaches one host listener
//! per event name, the first time that name is registered; that listener
//! walks every selector registered under the name and fires the callbacks of
//! those that match along the event's propagation path.

use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use mnml_css::SelectorList;
use mnml_dom::{DomTree, Event, NodeId};

/// Delegated callback: the triggering event and the matched element
pub type DelegateCallback = Rc<dyn Fn(&Event, NodeId)>;

/// Whether a registration needs a host listener attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    /// First registration for this event name
    Attach,
    /// A host listener already exists for this event name
    AlreadyAttached,
}

/// Selector-keyed callback index
#[derive(Default)]
pub struct DelegatedRegistry {
    index: IndexMap<String, IndexMap<String, Vec<DelegateCallback>>>,
    subscribed: HashSet<String>,
}

impl DelegatedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `(event_name, selector)`. With `replace`, the
    /// selector's earlier callbacks are dropped first.
    pub fn register(
        &mut self,
        event_name: &str,
        selector: &str,
        callback: DelegateCallback,
        replace: bool,
    ) -> Subscription {
        let callbacks = self
            .index
            .entry(event_name.to_string())
            .or_default()
            .entry(selector.to_string())
            .or_default();
        if replace {
            callbacks.clear();
        }
        callbacks.push(callback);

        if self.subscribed.insert(event_name.to_string()) {
            Subscription::Attach
        } else {
            Subscription::AlreadyAttached
        }
    }

    /// Snapshot of `(selector, callbacks)` for `event_name`, in selector
    /// registration order
    pub fn handlers(&self, event_name: &str) -> Vec<(String, Vec<DelegateCallback>)> {
        self.index
            .get(event_name)
            .map(|selectors| {
                selectors
                    .iter()
                    .map(|(selector, callbacks)| (selector.clone(), callbacks.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Selectors registered under `event_name`
    pub fn selectors(&self, event_name: &str) -> Vec<&str> {
        self.index
            .get(event_name)
            .map(|selectors| selectors.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Number of callbacks for an exact `(event_name, selector)` pair
    pub fn callback_count(&self, event_name: &str, selector: &str) -> usize {
        self.index
            .get(event_name)
            .and_then(|selectors| selectors.get(selector))
            .map_or(0, Vec::len)
    }

    pub fn is_subscribed(&self, event_name: &str) -> bool {
        self.subscribed.contains(event_name)
    }
}

impl fmt::Debug for DelegatedRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (event, selectors) in &self.index {
            let counts: Vec<(&str, usize)> = selectors
                .iter()
                .map(|(selector, callbacks)| (selector.as_str(), callbacks.len()))
                .collect();
            map.entry(event, &counts);
        }
        map.finish()
    }
}

/// First node along `path` (innermost first) that matches `selector`
pub fn innermost_match(path: &[NodeId], tree: &DomTree, selector: &SelectorList) -> Option<NodeId> {
    path.iter().copied().find(|&node| selector.matches(tree, node))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> DelegateCallback {
        Rc::new(|_, _| {})
    }

    #[test]
    fn test_first_registration_attaches_once() {
        let mut registry = DelegatedRegistry::new();
        assert_eq!(registry.register("click", ".a", noop(), true), Subscription::Attach);
        assert_eq!(registry.register("click", ".b", noop(), true), Subscription::AlreadyAttached);
        assert_eq!(registry.register("input", ".a", noop(), true), Subscription::Attach);
        assert!(registry.is_subscribed("click"));
        assert!(!registry.is_subscribed("keyup"));
    }

    #[test]
    fn test_replace_and_append() {
        let mut registry = DelegatedRegistry::new();
        registry.register("click", ".item", noop(), true);
        registry.register("click", ".item", noop(), true);
        assert_eq!(registry.callback_count("click", ".item"), 1);

        registry.register("click", ".item", noop(), false);
        assert_eq!(registry.callback_count("click", ".item"), 2);
    }

    #[test]
    fn test_selector_order_is_registration_order() {
        let mut registry = DelegatedRegistry::new();
        for selector in [".z", ".a", ".m"] {
            registry.register("click", selector, noop(), true);
        }
        // Re-registering keeps the first position
        registry.register("click", ".z", noop(), true);

        assert_eq!(registry.selectors("click"), vec![".z", ".a", ".m"]);
        let handlers = registry.handlers("click");
        assert_eq!(handlers.len(), 3);
        assert!(registry.handlers("missing").is_empty());
    }

    #[test]
    fn test_innermost_match() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        let span = tree.create_element("span");
        tree.append_child(tree.root(), outer).unwrap();
        tree.append_child(outer, inner).unwrap();
        tree.append_child(inner, span).unwrap();

        let path = tree.composed_path(span);
        let div = mnml_css::parse_selector("div").unwrap();
        let section = mnml_css::parse_selector("section").unwrap();

        assert_eq!(innermost_match(&path, &tree, &div), Some(inner));
        assert_eq!(innermost_match(&path, &tree, &section), None);
    }
}
