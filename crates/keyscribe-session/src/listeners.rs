//! Listener registries for keystroke listeners and event sinks.
//!
//! A registry is a cheap handle; clones share the same list, so a listener
//! may hold one and (un)register from inside its own callback. Dispatch
//! iterates a snapshot taken before the first call.

use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::warn;

use keyscribe_core::keymap::VirtualKey;

use crate::types::EngineEvent;

pub type ListenerResult = Result<(), Box<dyn Error + Send + Sync>>;

/// Called after every accepted internal-source key.
///
/// Report failures by returning `Err`; the error is logged and the
/// remaining listeners still run. Implementations must not panic: a panic
/// unwinds out of `process_key_at` and the rest of that key's dispatch
/// (later listeners, spelling, event sinks) is skipped.
pub trait KeypressListener: Send + Sync {
    fn on_keypress(&self, key_history: &[VirtualKey], text: &str) -> ListenerResult;
}

/// Receives every event the engine emits.
///
/// Same contract as `KeypressListener`: return `Err` instead of panicking.
pub trait EventSink: Send + Sync {
    fn on_event(&self, event: &EngineEvent) -> ListenerResult;
}

pub type ForegroundCallback = Arc<dyn Fn(bool) + Send + Sync>;
pub type TrackingCallback = Arc<dyn Fn() + Send + Sync>;

pub struct ListenerRegistry<L: ?Sized> {
    listeners: Arc<Mutex<Vec<Arc<L>>>>,
}

impl<L: ?Sized> Clone for ListenerRegistry<L> {
    fn clone(&self) -> Self {
        Self {
            listeners: Arc::clone(&self.listeners),
        }
    }
}

impl<L: ?Sized> Default for ListenerRegistry<L> {
    fn default() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<L: ?Sized> fmt::Debug for ListenerRegistry<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("len", &self.len())
            .finish()
    }
}

fn same<L: ?Sized>(a: &Arc<L>, b: &Arc<L>) -> bool {
    Arc::as_ptr(a).cast::<()>() == Arc::as_ptr(b).cast::<()>()
}

impl<L: ?Sized> ListenerRegistry<L> {
    fn lock(&self) -> MutexGuard<'_, Vec<Arc<L>>> {
        // A listener that panicked mid-registration leaves a valid Vec.
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns false if the listener was already registered.
    pub fn register(&self, listener: Arc<L>) -> bool {
        let mut list = self.lock();
        if list.iter().any(|l| same(l, &listener)) {
            return false;
        }
        list.push(listener);
        true
    }

    /// Returns false if the listener was not registered.
    pub fn unregister(&self, listener: &Arc<L>) -> bool {
        let mut list = self.lock();
        let before = list.len();
        list.retain(|l| !same(l, listener));
        list.len() != before
    }

    pub fn contains(&self, listener: &Arc<L>) -> bool {
        self.lock().iter().any(|l| same(l, listener))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub(crate) fn snapshot(&self) -> Vec<Arc<L>> {
        self.lock().clone()
    }
}

impl ListenerRegistry<dyn KeypressListener> {
    pub(crate) fn notify(&self, key_history: &[VirtualKey], text: &str) {
        for listener in self.snapshot() {
            if let Err(err) = listener.on_keypress(key_history, text) {
                warn!(%err, "keypress listener failed");
            }
        }
    }
}

impl ListenerRegistry<dyn EventSink> {
    pub(crate) fn dispatch(&self, events: &[EngineEvent]) {
        if events.is_empty() {
            return;
        }
        let sinks = self.snapshot();
        for event in events {
            for sink in &sinks {
                if let Err(err) = sink.on_event(event) {
                    warn!(%err, ?event, "event sink failed");
                }
            }
        }
    }
}

/// `EventSink` that stores every event; handy for embedders and tests.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<EngineEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<EngineEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for EventLog {
    fn on_event(&self, event: &EngineEvent) -> ListenerResult {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
        Ok(())
    }
}

impl<F> KeypressListener for F
where
    F: Fn(&[VirtualKey], &str) -> ListenerResult + Send + Sync,
{
    fn on_keypress(&self, key_history: &[VirtualKey], text: &str) -> ListenerResult {
        self(key_history, text)
    }
}
