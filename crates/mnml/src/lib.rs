//! mnml - minimal DOM helpers
//!
//! Small conveniences over an `mnml_dom` document:
//!
//! - lifecycle queues: callbacks for "ready" and "load", run in priority
//!   order when the phase is reached and immediately after that
//! - event delegation: callbacks keyed by event name and CSS selector,
//!   served by a single document-level listener per event name
//! - element helpers: cached `create_element`, `create_html`, `find`,
//!   `find_all`, `find_parent`, `find_parents`
//! - `uuid`, query string `params`, and `any`/`all` truthiness checks
//!
//! All state hangs off a [`Page`], one per document.
//!
//! ```no_run
//! use mnml::{Listen, Page, PageConfig, ReadyState};
//!
//! let page = Page::new(PageConfig::default());
//! page.on("click", "button.save", |_event, button| {
//!     tracing::info!(%button, "save clicked");
//! });
//! page.listen(Listen::ready(|| tracing::info!("ready")).with_priority(1));
//! page.set_ready_state(ReadyState::Complete)?;
//! # Ok::<(), mnml::MnmlError>(())
//! ```

mod config;
mod delegate;
mod elements;
mod error;
mod id;
mod lifecycle;
mod listen;
mod page;
mod params;
mod query;
mod truthy;

pub use config::PageConfig;
pub use delegate::{innermost_match, DelegateCallback, DelegatedRegistry, Subscription};
pub use elements::{create_html, ElementCache};
pub use error::{MnmlError, Result};
pub use id::uuid;
pub use lifecycle::{run_boundary, LifecycleCallback, LifecycleQueue, Phase, PhaseState, Schedule};
pub use listen::{Listen, ListenTarget, NativeCallback, NATIVE_EVENTS};
pub use page::{HostListener, Page};
pub use params::{ParamValue, Params, ParamsCache};
pub use query::{find_parent, find_parents, SelectorCache};
pub use truthy::{all, any, Truthy};

pub use mnml_dom::{Event, NodeId, ReadyState};
