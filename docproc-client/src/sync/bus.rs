//! Process-wide invalidation signals between components that share no state.
//!
//! Signals carry no payload. A subscriber reacts by refetching whatever it
//! derives from the backend.

use crate::sync::listeners::{ListenerSet, Subscription};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// A tag was attached to a document, possibly creating it.
    TagCreated,
}

#[derive(Clone, Default)]
pub struct InvalidationBus {
    listeners: ListenerSet<Signal>,
}

static GLOBAL_BUS: OnceLock<InvalidationBus> = OnceLock::new();

impl InvalidationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared bus, created on first use.
    pub fn global() -> &'static InvalidationBus {
        GLOBAL_BUS.get_or_init(InvalidationBus::new)
    }

    /// Returns the number of handlers notified.
    pub fn publish(&self, signal: Signal) -> usize {
        let notified = self.listeners.emit(&signal);
        tracing::debug!(?signal, notified, "Invalidation signal published");
        notified
    }

    /// Register `handler` for `signal` until the returned subscription is dropped.
    pub fn subscribe<F>(&self, signal: Signal, handler: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners.add(move |published| {
            if *published == signal {
                handler();
            }
        })
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}
