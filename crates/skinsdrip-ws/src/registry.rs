//! Subscriber handler registry
//!
//! Handlers are keyed by public event name and invoked in registration
//! order. A wildcard key matches every event; wildcard handlers run after
//! the exact matches. A panicking handler is caught and logged so it never
//! interrupts delivery to the remaining handlers.

use dashmap::DashMap;
use skinsdrip_types::MerchantEvent;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tracing::warn;

/// Wildcard key matching every event
pub const WILDCARD: &str = "*";

/// A subscriber callback for merchant events
pub type EventHandler = Arc<dyn Fn(&MerchantEvent) + Send + Sync>;

/// Registry of subscriber handlers keyed by public event name
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: DashMap<String, Vec<EventHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an event name
    pub fn on(&self, event: &str, handler: EventHandler) {
        self.handlers
            .entry(event.to_string())
            .or_default()
            .push(handler);
    }

    /// Number of handlers registered for an event name
    pub fn handler_count(&self, event: &str) -> usize {
        self.handlers.get(event).map(|h| h.len()).unwrap_or(0)
    }

    /// Deliver an event to every matching handler, exact matches first
    pub fn dispatch(&self, event: &str, payload: &MerchantEvent) {
        self.invoke_all(event, payload);
        if event != WILDCARD {
            self.invoke_all(WILDCARD, payload);
        }
    }

    fn invoke_all(&self, key: &str, payload: &MerchantEvent) {
        // Clone the handler list out of the map so a handler that
        // registers further subscriptions cannot deadlock dispatch.
        let handlers: Vec<EventHandler> = match self.handlers.get(key) {
            Some(entry) => entry.clone(),
            None => return,
        };

        for handler in handlers {
            if catch_unwind(AssertUnwindSafe(|| handler(payload))).is_err() {
                warn!(event = key, "Subscriber handler panicked");
            }
        }
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("events", &self.handlers.len())
            .finish()
    }
}
