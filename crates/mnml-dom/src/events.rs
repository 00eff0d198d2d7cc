//! DOM Events
//!
//! Event objects and the document-level listener table. Listeners see the
//! event through a shared reference, so the cancellation flags use `Cell`.

use std::cell::Cell;
use std::collections::HashMap;

use crate::NodeId;

/// A dispatched event
#[derive(Debug, Clone)]
pub struct Event {
    name: String,
    target: NodeId,
    path: Vec<NodeId>,
    bubbles: bool,
    cancelable: bool,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
    immediate_propagation_stopped: Cell<bool>,
}

impl Event {
    /// A bubbling, cancelable event aimed at `target`
    pub fn new(name: impl Into<String>, target: NodeId) -> Self {
        Self {
            name: name.into(),
            target,
            path: Vec::new(),
            bubbles: true,
            cancelable: true,
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
            immediate_propagation_stopped: Cell::new(false),
        }
    }

    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    pub fn with_cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    /// Event type, e.g. "click"
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> NodeId {
        self.target
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn cancelable(&self) -> bool {
        self.cancelable
    }

    /// Propagation path, innermost first. Empty until dispatched.
    pub fn composed_path(&self) -> &[NodeId] {
        &self.path
    }

    /// Set by the dispatcher before listeners run
    pub fn set_composed_path(&mut self, path: Vec<NodeId>) {
        self.path = path;
    }

    /// Prevent default action
    pub fn prevent_default(&self) {
        if self.cancelable {
            self.default_prevented.set(true);
        }
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Stop propagation
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    /// Stop propagation and skip the remaining listeners on the current target
    pub fn stop_immediate_propagation(&self) {
        self.propagation_stopped.set(true);
        self.immediate_propagation_stopped.set(true);
    }

    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped.get()
    }
}

/// Listener handle, unique within one table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Document-level listeners grouped by event name, in attach order
#[derive(Debug)]
pub struct ListenerTable<L> {
    listeners: HashMap<String, Vec<(ListenerId, L)>>,
    next_id: u64,
}

impl<L: Clone> ListenerTable<L> {
    pub fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            next_id: 0,
        }
    }

    /// Attach a listener. Every call attaches a new one, even for the same
    /// event name.
    pub fn add(&mut self, event_name: &str, listener: L) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners
            .entry(event_name.to_string())
            .or_default()
            .push((id, listener));
        tracing::trace!(event = event_name, ?id, "host listener attached");
        id
    }

    /// Detach a listener by handle
    pub fn remove(&mut self, id: ListenerId) -> bool {
        for listeners in self.listeners.values_mut() {
            if let Some(pos) = listeners.iter().position(|(lid, _)| *lid == id) {
                listeners.remove(pos);
                return true;
            }
        }
        false
    }

    /// Copy of the listeners for `event_name`, so dispatch can run them
    /// while the table is free to change
    pub fn snapshot(&self, event_name: &str) -> Vec<L> {
        self.listeners
            .get(event_name)
            .map(|ls| ls.iter().map(|(_, l)| l.clone()).collect())
            .unwrap_or_default()
    }

    /// Number of listeners attached for `event_name`
    pub fn count(&self, event_name: &str) -> usize {
        self.listeners.get(event_name).map_or(0, Vec::len)
    }
}

impl<L: Clone> Default for ListenerTable<L> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prevent_default_requires_cancelable() {
        let event = Event::new("click", NodeId::ROOT).with_cancelable(false);
        event.prevent_default();
        assert!(!event.is_default_prevented());

        let event = Event::new("click", NodeId::ROOT);
        event.prevent_default();
        assert!(event.is_default_prevented());
    }

    #[test]
    fn test_stop_immediate_implies_stop() {
        let event = Event::new("click", NodeId::ROOT);
        event.stop_immediate_propagation();
        assert!(event.is_propagation_stopped());
        assert!(event.is_immediate_propagation_stopped());
    }

    #[test]
    fn test_listener_table_order_and_remove() {
        let mut table: ListenerTable<&'static str> = ListenerTable::new();
        let first = table.add("click", "a");
        table.add("click", "b");
        table.add("unload", "c");

        assert_eq!(table.snapshot("click"), vec!["a", "b"]);
        assert_eq!(table.count("unload"), 1);
        assert_eq!(table.count("missing"), 0);

        assert!(table.remove(first));
        assert!(!table.remove(first));
        assert_eq!(table.snapshot("click"), vec!["b"]);
    }
}
