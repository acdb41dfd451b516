//! Synchronous, connection-ordered publish/subscribe.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, Weak,
};

/// The only externally observable state-transition signal a service emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Changed;

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;
type HandlerList<E> = Mutex<Vec<(u64, Handler<E>)>>;

/// Per-instance event channel. Delivery is synchronous, same-thread, and in
/// connection order; handlers connected while an emission is in flight are
/// first invoked on the next emission.
pub struct Emitter<E> {
    handlers: Arc<HandlerList<E>>,
    next_id: AtomicU64,
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Emitter<E> {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Registers a handler and returns its unsubscribe handle. Dropping the
    /// handle disconnects as well.
    pub fn connect(&self, handler: impl Fn(&E) + Send + Sync + 'static) -> Subscription
    where
        E: 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.handlers
            .lock()
            .unwrap()
            .push((id, Arc::new(handler)));

        let list = Arc::downgrade(&self.handlers);
        Subscription::new(move || {
            if let Some(list) = Weak::upgrade(&list) {
                list.lock().unwrap().retain(|(entry, _)| *entry != id);
            }
        })
    }

    /// Delivers `event` to every handler connected at this instant. The
    /// list lock is released before any handler runs, so handlers may
    /// connect, disconnect, or re-enter `emit` freely.
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Handler<E>> = self
            .handlers
            .lock()
            .unwrap()
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in snapshot {
            handler(event);
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.lock().unwrap().len()
    }
}

/// Explicit unsubscribe handle.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn disconnect(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

#[cfg(test)]
#[path = "tests/emitter_tests.rs"]
mod tests;
