//! Lifecycle queues
//!
//! One queue per page phase ("ready" and "load"). Until the host signals the
//! phase, callbacks wait in priority order; the signal drains them once, and
//! from then on callbacks run as soon as they are scheduled.
//!
//! ```text
//! Pending --signal--> Draining --queue empty--> Reached
//!    ^ schedule: queue   ^ schedule: queue        ^ schedule: run now
//! ```
//!
//! Entries are keyed by `(priority, sequence)`, so the drain always takes the
//! lowest priority first and equal priorities run in registration order.
//! Callbacks scheduled while the drain runs take their place among the entries
//! that have not run yet.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;

use mnml_dom::ReadyState;

/// One-shot lifecycle callback
pub type LifecycleCallback = Box<dyn FnOnce()>;

/// Page lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Document parsed ("DOMContentLoaded")
    Ready,
    /// Page fully loaded ("load")
    Load,
}

impl Phase {
    /// Host event that marks the phase boundary
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Ready => "DOMContentLoaded",
            Self::Load => "load",
        }
    }

    /// Ready state the document is in once the phase is reached
    pub fn ready_state(self) -> ReadyState {
        match self {
            Self::Ready => ReadyState::Interactive,
            Self::Load => ReadyState::Complete,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Load => "load",
        }
    }
}

/// Where a queue is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseState {
    Pending,
    Draining,
    Reached,
}

/// Outcome of [`LifecycleQueue::schedule`]
pub enum Schedule {
    /// Stored until the phase boundary
    Queued,
    /// The phase has passed; the caller must run the callback now
    RunNow(LifecycleCallback),
}

/// Priority-ordered one-shot callback queue for a single phase
pub struct LifecycleQueue {
    phase: Phase,
    state: PhaseState,
    entries: BTreeMap<(i32, u64), LifecycleCallback>,
    next_seq: u64,
}

impl LifecycleQueue {
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            state: PhaseState::Pending,
            entries: BTreeMap::new(),
            next_seq: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> PhaseState {
        self.state
    }

    /// True once the boundary drain has finished
    pub fn is_reached(&self) -> bool {
        self.state == PhaseState::Reached
    }

    /// Number of callbacks waiting
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queue `callback`, or hand it back if the phase has already passed
    pub fn schedule(&mut self, callback: LifecycleCallback, priority: i32) -> Schedule {
        if self.is_reached() {
            return Schedule::RunNow(callback);
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert((priority, seq), callback);
        tracing::trace!(phase = self.phase.as_str(), priority, seq, "lifecycle callback queued");
        Schedule::Queued
    }

    /// Enter the draining state. Returns false if the boundary was already
    /// signalled.
    pub fn begin_drain(&mut self) -> bool {
        if self.state != PhaseState::Pending {
            return false;
        }
        self.state = PhaseState::Draining;
        true
    }

    /// Remove the next callback to run: lowest priority, then oldest
    pub fn next_due(&mut self) -> Option<LifecycleCallback> {
        self.entries.pop_first().map(|(_, callback)| callback)
    }

    /// Flip to the reached state. Nothing is ever queued after this.
    pub fn finish_drain(&mut self) {
        debug_assert!(self.entries.is_empty(), "finish_drain with callbacks still queued");
        self.state = PhaseState::Reached;
    }
}

impl fmt::Debug for LifecycleQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleQueue")
            .field("phase", &self.phase)
            .field("state", &self.state)
            .field("queued", &self.entries.len())
            .finish()
    }
}

/// Run the phase boundary for `queue`: drain every callback (including ones
/// scheduled by callbacks during the drain), then mark the phase reached.
///
/// The `RefCell` is only borrowed between callbacks, so callbacks may
/// schedule on the same queue. Returns the number of callbacks run, or `None`
/// if the boundary had already been signalled.
pub fn run_boundary(queue: &RefCell<LifecycleQueue>) -> Option<usize> {
    let phase = {
        let mut queue = queue.borrow_mut();
        if !queue.begin_drain() {
            tracing::warn!(phase = queue.phase().as_str(), "phase boundary signalled twice; ignoring");
            return None;
        }
        queue.phase()
    };

    let mut ran = 0;
    loop {
        let next = queue.borrow_mut().next_due();
        let Some(callback) = next else { break };
        callback();
        ran += 1;
    }

    queue.borrow_mut().finish_drain();
    tracing::debug!(phase = phase.as_str(), ran, "lifecycle queue drained");
    Some(ran)
}
