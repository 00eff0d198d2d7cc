//! Listener registration intents
//!
//! [`Listen`] names what a registration wants: a lifecycle callback, a plain
//! host listener, or a delegated callback keyed by selector.
//! [`Listen::from_event_name`] resolves the intent from an event name and an
//! untyped target for callers that only have strings and numbers to hand.

use std::fmt;
use std::rc::Rc;

use mnml_dom::{Event, NodeId};

use crate::delegate::DelegateCallback;
use crate::error::{MnmlError, Result};
use crate::lifecycle::{LifecycleCallback, Phase};

/// Host listener callback for events that are not delegated
pub type NativeCallback = Rc<dyn Fn(&Event)>;

/// Event names that attach a plain listener instead of a delegated one
pub const NATIVE_EVENTS: [&str; 2] = ["unload", "beforeunload"];

/// A listener registration
pub enum Listen {
    /// Run once the page has loaded
    Load {
        callback: LifecycleCallback,
        priority: Option<i32>,
    },
    /// Run once the document is parsed
    Ready {
        callback: LifecycleCallback,
        priority: Option<i32>,
    },
    /// Attach a listener directly to the document
    Native {
        event: String,
        callback: NativeCallback,
    },
    /// Run for events whose path contains an element matching `selector`
    Delegated {
        event: String,
        selector: String,
        callback: DelegateCallback,
        replace: bool,
    },
}

impl Listen {
    pub fn load(callback: impl FnOnce() + 'static) -> Self {
        Self::Load {
            callback: Box::new(callback),
            priority: None,
        }
    }

    pub fn ready(callback: impl FnOnce() + 'static) -> Self {
        Self::Ready {
            callback: Box::new(callback),
            priority: None,
        }
    }

    pub fn native(event: impl Into<String>, callback: impl Fn(&Event) + 'static) -> Self {
        Self::Native {
            event: event.into(),
            callback: Rc::new(callback),
        }
    }

    /// Delegated registration that replaces the selector's earlier callbacks
    pub fn delegated(
        event: impl Into<String>,
        selector: impl Into<String>,
        callback: impl Fn(&Event, NodeId) + 'static,
    ) -> Self {
        Self::Delegated {
            event: event.into(),
            selector: selector.into(),
            callback: Rc::new(callback),
            replace: true,
        }
    }

    /// Set the lifecycle priority. No effect on other intents.
    pub fn with_priority(mut self, value: i32) -> Self {
        if let Self::Load { priority, .. } | Self::Ready { priority, .. } = &mut self {
            *priority = Some(value);
        }
        self
    }

    /// Keep the selector's earlier callbacks. No effect on other intents.
    pub fn appending(mut self) -> Self {
        if let Self::Delegated { replace, .. } = &mut self {
            *replace = false;
        }
        self
    }

    /// Lifecycle phase this registration waits for, if any
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::Load { .. } => Some(Phase::Load),
            Self::Ready { .. } => Some(Phase::Ready),
            Self::Native { .. } | Self::Delegated { .. } => None,
        }
    }

    /// Resolve a registration from an event name.
    ///
    /// `"load"` and `"ready"` take no target or a numeric priority. Names in
    /// [`NATIVE_EVENTS`] take no target. Any other name needs a selector.
    /// `handler` receives the event and matched element where there is one.
    pub fn from_event_name(
        event_name: &str,
        target: ListenTarget,
        handler: impl Fn(Option<&Event>, Option<NodeId>) + 'static,
        replace: bool,
    ) -> Result<Self> {
        let lifecycle = match event_name {
            "load" => Some(Phase::Load),
            "ready" => Some(Phase::Ready),
            _ => None,
        };

        if let Some(phase) = lifecycle {
            let priority = match target {
                ListenTarget::None => None,
                ListenTarget::Priority(priority) => Some(priority),
                other => return Err(other.mismatch("number")),
            };
            let callback: LifecycleCallback = Box::new(move || handler(None, None));
            return Ok(match phase {
                Phase::Load => Self::Load { callback, priority },
                Phase::Ready => Self::Ready { callback, priority },
            });
        }

        if NATIVE_EVENTS.contains(&event_name) {
            return match target {
                ListenTarget::None => Ok(Self::Native {
                    event: event_name.to_string(),
                    callback: Rc::new(move |event: &Event| handler(Some(event), None)),
                }),
                other => Err(other.mismatch("none")),
            };
        }

        match target {
            ListenTarget::Selector(selector) => Ok(Self::Delegated {
                event: event_name.to_string(),
                selector,
                callback: Rc::new(move |event: &Event, matched: NodeId| {
                    handler(Some(event), Some(matched))
                }),
                replace,
            }),
            other => Err(other.mismatch("string")),
        }
    }
}

impl fmt::Debug for Listen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { priority, .. } => f.debug_struct("Load").field("priority", priority).finish(),
            Self::Ready { priority, .. } => f.debug_struct("Ready").field("priority", priority).finish(),
            Self::Native { event, .. } => f.debug_struct("Native").field("event", event).finish(),
            Self::Delegated {
                event,
                selector,
                replace,
                ..
            } => f
                .debug_struct("Delegated")
                .field("event", event)
                .field("selector", selector)
                .field("replace", replace)
                .finish(),
        }
    }
}

/// Untyped second argument of a name-based registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenTarget {
    None,
    Priority(i32),
    Selector(String),
}

impl ListenTarget {
    /// Name of the carried kind, as reported in type mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Priority(_) => "number",
            Self::Selector(_) => "string",
        }
    }

    fn mismatch(&self, expected: &'static str) -> MnmlError {
        MnmlError::TypeMismatch {
            param: "selector",
            expected,
            found: self.kind(),
        }
    }
}

impl From<i32> for ListenTarget {
    fn from(priority: i32) -> Self {
        Self::Priority(priority)
    }
}

impl From<&str> for ListenTarget {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for ListenTarget {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ignore(_: Option<&Event>, _: Option<NodeId>) {}

    #[test]
    fn test_lifecycle_names() {
        let load = Listen::from_event_name("load", ListenTarget::None, ignore, true).unwrap();
        assert!(matches!(load, Listen::Load { priority: None, .. }));

        let ready = Listen::from_event_name("ready", 3.into(), ignore, true).unwrap();
        assert!(matches!(ready, Listen::Ready { priority: Some(3), .. }));
        assert_eq!(ready.phase(), Some(Phase::Ready));
    }

    #[test]
    fn test_lifecycle_rejects_selector() {
        let err = Listen::from_event_name("load", ".x".into(), ignore, true).unwrap_err();
        assert_eq!(err.to_string(), "expected selector to be a number but was string");
    }

    #[test]
    fn test_delegated_requires_selector() {
        let err = Listen::from_event_name("click", 5.into(), ignore, true).unwrap_err();
        assert!(matches!(
            err,
            MnmlError::TypeMismatch {
                expected: "string",
                found: "number",
                ..
            }
        ));

        let err = Listen::from_event_name("click", ListenTarget::None, ignore, true).unwrap_err();
        assert!(matches!(err, MnmlError::TypeMismatch { found: "none", .. }));
    }

    #[test]
    fn test_delegated_keeps_replace_flag() {
        let listen = Listen::from_event_name("click", ".btn".into(), ignore, false).unwrap();
        match listen {
            Listen::Delegated {
                event,
                selector,
                replace,
                ..
            } => {
                assert_eq!(event, "click");
                assert_eq!(selector, ".btn");
                assert!(!replace);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_native_names() {
        let listen = Listen::from_event_name("beforeunload", ListenTarget::None, ignore, true).unwrap();
        assert!(matches!(listen, Listen::Native { ref event, .. } if event == "beforeunload"));
        assert!(Listen::from_event_name("unload", ".x".into(), ignore, true).is_err());
    }

    #[test]
    fn test_builders() {
        let listen = Listen::load(|| {}).with_priority(0);
        assert!(matches!(listen, Listen::Load { priority: Some(0), .. }));

        let listen = Listen::delegated("click", "a", |_, _| {}).appending().with_priority(4);
        assert!(matches!(listen, Listen::Delegated { replace: false, .. }));
    }
}
