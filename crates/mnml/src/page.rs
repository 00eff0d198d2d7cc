//! Page - the per-document handle
//!
//! A [`Page`] owns one document and every piece of mnml state tied to it:
//! the two lifecycle queues, the delegated event registry, the selector and
//! element caches and the params memo. Cloning a page clones the handle.
//!
//! No `RefCell` borrow is held while user code runs, so callbacks may call
//! back into the page (register, query, dispatch, mutate the document).
//! [`Page::document`] and [`Page::document_mut`] hand out borrows directly;
//! drop them before dispatching events or creating elements.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use mnml_css::SelectorList;
use mnml_dom::{Document, Event, ListenerId, ListenerTable, NodeId, ReadyState};
use mnml_html::HtmlParser;

use crate::config::PageConfig;
use crate::delegate::{innermost_match, DelegateCallback, DelegatedRegistry, Subscription};
use crate::elements::{self, ElementCache};
use crate::error::Result;
use crate::lifecycle::{run_boundary, LifecycleCallback, LifecycleQueue, Phase, Schedule};
use crate::listen::{Listen, ListenTarget};
use crate::params::{Params, ParamsCache};
use crate::query::{self, SelectorCache};

/// Document-level listener run by [`Page::dispatch_event`]
pub type HostListener = Rc<dyn Fn(&Event) -> Result<()>>;

struct PageInner {
    config: PageConfig,
    document: RefCell<Document>,
    host: RefCell<ListenerTable<HostListener>>,
    ready: RefCell<LifecycleQueue>,
    load: RefCell<LifecycleQueue>,
    delegated: RefCell<DelegatedRegistry>,
    selectors: RefCell<SelectorCache>,
    elements: RefCell<ElementCache>,
    params: RefCell<ParamsCache>,
}

impl PageInner {
    fn queue(&self, phase: Phase) -> &RefCell<LifecycleQueue> {
        match phase {
            Phase::Ready => &self.ready,
            Phase::Load => &self.load,
        }
    }
}

/// Handle to a document and its mnml state
#[derive(Clone)]
pub struct Page {
    inner: Rc<PageInner>,
}

impl Page {
    /// Page over a new, still loading document
    pub fn new(config: PageConfig) -> Self {
        let document = if config.skeleton {
            Document::new(&config.url)
        } else {
            Document::empty(&config.url)
        };
        Self::with_document(document, config)
    }

    /// Page over a document parsed from `html`
    pub fn from_html(html: &str, config: PageConfig) -> Result<Self> {
        let document = HtmlParser::new().parse_with_url(html, &config.url)?;
        Ok(Self::with_document(document, config))
    }

    /// Page over an existing document. The lifecycle queues are subscribed
    /// to "DOMContentLoaded" and "load" here.
    pub fn with_document(document: Document, config: PageConfig) -> Self {
        let inner = Rc::new(PageInner {
            params: RefCell::new(ParamsCache::new(config.params_cache_limit)),
            config,
            document: RefCell::new(document),
            host: RefCell::new(ListenerTable::new()),
            ready: RefCell::new(LifecycleQueue::new(Phase::Ready)),
            load: RefCell::new(LifecycleQueue::new(Phase::Load)),
            delegated: RefCell::new(DelegatedRegistry::new()),
            selectors: RefCell::new(SelectorCache::new()),
            elements: RefCell::new(ElementCache::new()),
        });
        let page = Self { inner };

        for phase in [Phase::Ready, Phase::Load] {
            let weak = Rc::downgrade(&page.inner);
            page.add_event_listener(phase.event_name(), move |event| {
                let Some(inner) = weak.upgrade() else { return Ok(()) };
                // Only the document's own boundary event drains the queue
                let (root, state) = {
                    let document = inner.document.borrow();
                    (document.tree().root(), document.ready_state())
                };
                if event.target() != root || state < phase.ready_state() {
                    tracing::trace!(
                        phase = phase.as_str(),
                        target = %event.target(),
                        "ignoring phase event outside the boundary"
                    );
                    return Ok(());
                }
                run_boundary(inner.queue(phase));
                Ok(())
            });
        }

        tracing::debug!(url = %page.inner.config.url, "page created");
        page
    }

    pub fn config(&self) -> &PageConfig {
        &self.inner.config
    }

    /// Borrow the document
    pub fn document(&self) -> Ref<'_, Document> {
        self.inner.document.borrow()
    }

    /// Borrow the document mutably
    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.inner.document.borrow_mut()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    pub fn ready_state(&self) -> ReadyState {
        self.inner.document.borrow().ready_state()
    }

    /// Move the document's ready state forward, firing "DOMContentLoaded" on
    /// entering `Interactive` and "load" on entering `Complete`. Transitions
    /// that do not move forward are ignored.
    pub fn set_ready_state(&self, state: ReadyState) -> Result<()> {
        let entered = self.inner.document.borrow_mut().advance_ready_state(state);
        for state in entered {
            let phase = match state {
                ReadyState::Loading => continue,
                ReadyState::Interactive => Phase::Ready,
                ReadyState::Complete => Phase::Load,
            };
            tracing::debug!(state = state.as_str(), "ready state changed");
            let event = Event::new(phase.event_name(), NodeId::ROOT)
                .with_bubbles(false)
                .with_cancelable(false);
            self.dispatch_event(event)?;
        }
        Ok(())
    }

    /// True once the "ready" callbacks have been drained
    pub fn is_ready(&self) -> bool {
        self.inner.ready.borrow().is_reached()
    }

    /// True once the "load" callbacks have been drained
    pub fn is_loaded(&self) -> bool {
        self.inner.load.borrow().is_reached()
    }

    fn schedule(&self, phase: Phase, callback: LifecycleCallback, priority: Option<i32>) {
        let priority = priority.unwrap_or(self.inner.config.default_priority);
        let outcome = self.inner.queue(phase).borrow_mut().schedule(callback, priority);
        if let Schedule::RunNow(callback) = outcome {
            tracing::trace!(phase = phase.as_str(), "phase already reached; running callback");
            callback();
        }
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    /// Register a listener
    pub fn listen(&self, listen: Listen) {
        match listen {
            Listen::Load { callback, priority } => self.schedule(Phase::Load, callback, priority),
            Listen::Ready { callback, priority } => self.schedule(Phase::Ready, callback, priority),
            Listen::Native { event, callback } => {
                self.add_event_listener(&event, move |ev| {
                    callback(ev);
                    Ok(())
                });
            }
            Listen::Delegated {
                event,
                selector,
                callback,
                replace,
            } => self.delegate(&event, &selector, callback, replace),
        }
    }

    /// Register a listener by event name; see [`Listen::from_event_name`]
    pub fn listen_str(
        &self,
        event_name: &str,
        target: impl Into<ListenTarget>,
        handler: impl Fn(Option<&Event>, Option<NodeId>) + 'static,
        replace: bool,
    ) -> Result<()> {
        let listen = Listen::from_event_name(event_name, target.into(), handler, replace)?;
        self.listen(listen);
        Ok(())
    }

    /// Run `callback` for `event_name` events whose path contains an element
    /// matching `selector`, replacing the selector's earlier callbacks
    pub fn on(&self, event_name: &str, selector: &str, callback: impl Fn(&Event, NodeId) + 'static) {
        self.delegate(event_name, selector, Rc::new(callback), true);
    }

    fn delegate(&self, event_name: &str, selector: &str, callback: DelegateCallback, replace: bool) {
        let subscription = self
            .inner
            .delegated
            .borrow_mut()
            .register(event_name, selector, callback, replace);

        if subscription == Subscription::Attach {
            let weak: Weak<PageInner> = Rc::downgrade(&self.inner);
            self.add_event_listener(event_name, move |event| match weak.upgrade() {
                Some(inner) => Page { inner }.run_delegated(event),
                None => Ok(()),
            });
            tracing::debug!(event = event_name, "delegated listener attached");
        }
    }

    fn run_delegated(&self, event: &Event) -> Result<()> {
        let handlers = self.inner.delegated.borrow().handlers(event.name());
        for (selector, callbacks) in handlers {
            let compiled = self.selector(&selector)?;
            let matched = {
                let document = self.inner.document.borrow();
                innermost_match(event.composed_path(), document.tree(), &compiled)
            };
            let Some(matched) = matched else { continue };

            tracing::trace!(
                event = event.name(),
                selector = %selector,
                %matched,
                callbacks = callbacks.len(),
                "delegated match"
            );
            for callback in callbacks {
                callback(event, matched);
            }
        }
        Ok(())
    }

    /// Attach a document-level listener. Every call attaches a new one.
    pub fn add_event_listener(
        &self,
        event_name: &str,
        listener: impl Fn(&Event) -> Result<()> + 'static,
    ) -> ListenerId {
        let listener: HostListener = Rc::new(listener);
        self.inner.host.borrow_mut().add(event_name, listener)
    }

    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.inner.host.borrow_mut().remove(id)
    }

    /// Number of document-level listeners for `event_name`
    pub fn host_listener_count(&self, event_name: &str) -> usize {
        self.inner.host.borrow().count(event_name)
    }

    /// Dispatch `event` to the document-level listeners. The event reaches
    /// them if it targets the document or bubbles up to it from an attached
    /// node.
    ///
    /// Every listener runs even if an earlier one failed, unless one calls
    /// `stop_immediate_propagation`. Returns the first failure, otherwise
    /// whether the default action is still allowed.
    pub fn dispatch_event(&self, mut event: Event) -> Result<bool> {
        let root = {
            let document = self.inner.document.borrow();
            event.set_composed_path(document.tree().composed_path(event.target()));
            document.tree().root()
        };

        let reaches_document = event.target() == root
            || (event.bubbles() && event.composed_path().last() == Some(&root));
        if !reaches_document {
            tracing::trace!(event = event.name(), target = %event.target(), "event does not reach the document");
            return Ok(!event.is_default_prevented());
        }

        let listeners = self.inner.host.borrow().snapshot(event.name());
        tracing::debug!(
            event = event.name(),
            target = %event.target(),
            listeners = listeners.len(),
            "dispatching event"
        );

        let mut first_error = None;
        for listener in listeners {
            if let Err(err) = listener(&event) {
                tracing::error!(event = event.name(), error = %err, "event listener failed");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
            if event.is_immediate_propagation_stopped() {
                break;
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(!event.is_default_prevented()),
        }
    }

    /// Dispatch a bubbling, cancelable event named `event_name` at `target`
    pub fn dispatch(&self, event_name: &str, target: NodeId) -> Result<bool> {
        self.dispatch_event(Event::new(event_name, target))
    }

    // ------------------------------------------------------------------
    // Elements and queries
    // ------------------------------------------------------------------

    /// A new detached element for `tag`
    pub fn create_element(&self, tag: &str) -> Result<NodeId> {
        let mut document = self.inner.document.borrow_mut();
        self.inner.elements.borrow_mut().create(document.tree_mut(), tag)
    }

    /// Instantiate `markup` as detached nodes and return the first, which
    /// must be an element
    pub fn create_html(&self, markup: &str) -> Result<NodeId> {
        let mut document = self.inner.document.borrow_mut();
        elements::create_html(document.tree_mut(), markup)
    }

    fn selector(&self, selector: &str) -> Result<Rc<SelectorList>> {
        Ok(self.inner.selectors.borrow_mut().get_or_parse(selector)?)
    }

    fn query_root(document: &Document, root: Option<NodeId>) -> NodeId {
        root.or_else(|| document.document_element().valid())
            .unwrap_or_else(|| document.tree().root())
    }

    /// First descendant of `root` (the document element by default) that
    /// matches `selector`
    pub fn find(&self, root: Option<NodeId>, selector: &str) -> Result<Option<NodeId>> {
        let compiled = self.selector(selector)?;
        let document = self.inner.document.borrow();
        let root = Self::query_root(&document, root);
        Ok(compiled.query_first(document.tree(), root))
    }

    /// Every descendant of `root` (the document element by default) that
    /// matches `selector`, in document order
    pub fn find_all(&self, root: Option<NodeId>, selector: &str) -> Result<Vec<NodeId>> {
        let compiled = self.selector(selector)?;
        let document = self.inner.document.borrow();
        let root = Self::query_root(&document, root);
        Ok(compiled.query_all(document.tree(), root))
    }

    /// Nearest strict ancestor of `node` that matches `selector`
    pub fn find_parent(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let compiled = self.selector(selector)?;
        let document = self.inner.document.borrow();
        Ok(query::find_parent(document.tree(), node, &compiled))
    }

    /// Every strict ancestor of `node` that matches `selector`, innermost first
    pub fn find_parents(&self, node: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let compiled = self.selector(selector)?;
        let document = self.inner.document.borrow();
        Ok(query::find_parents(document.tree(), node, &compiled))
    }

    pub fn matches(&self, node: NodeId, selector: &str) -> Result<bool> {
        let compiled = self.selector(selector)?;
        let document = self.inner.document.borrow();
        Ok(compiled.matches(document.tree(), node))
    }

    // ------------------------------------------------------------------
    // Query string
    // ------------------------------------------------------------------

    /// Parse `query`, or the document URL's query when `None`. Results are
    /// memoized per distinct input.
    pub fn params(&self, query: Option<&str>) -> Result<Rc<Params>> {
        let query = match query {
            Some(query) => query.to_string(),
            None => {
                let document = self.inner.document.borrow();
                let url = url::Url::parse(document.url())?;
                url.query().unwrap_or_default().to_string()
            }
        };
        Ok(self.inner.params.borrow_mut().get_or_parse(&query))
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(PageConfig::default())
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = &self.inner;
        f.debug_struct("Page")
            .field("url", &inner.config.url)
            .field("ready", &*inner.ready.borrow())
            .field("load", &*inner.load.borrow())
            .field("delegated", &*inner.delegated.borrow())
            .finish_non_exhaustive()
    }
}
