//! Pending-Completion Tracker
//!
//! Correlates an asynchronous trade creation with its eventual completion,
//! guaranteeing the caller's callback fires at most once (and, absent an
//! upstream failure, exactly once) regardless of whether completion
//! arrives via the event stream or via the fallback poll.
//!
//! The entry map is mutated from two places: the channel's frame-receipt
//! path (`resolve_by_event`) and each entry's timer task. Both run on
//! separate tokio tasks, so access is serialized through a mutex and
//! removal under that lock is the single gate deciding which path wins.
//!
//! # Entry lifecycle
//!
//! ```text
//! ┌────────────┐  trade:update frame   ┌─────────────────┐
//! │ Registered │──────────────────────▶│ ResolvedByEvent │
//! └─────┬──────┘                       └─────────────────┘
//!       │ timeout elapsed
//!       ▼
//! ┌───────────────────┐
//! │ ResolvedByTimeout │  (single status poll, then callback)
//! └───────────────────┘
//! ```
//!
//! Either resolution removes the entry; a second resolution attempt is a
//! silent no-op, never an error, because races between the stream and the
//! timer are expected.

use async_trait::async_trait;
use parking_lot::Mutex;
use skinsdrip_rest::RestClient;
use skinsdrip_types::{Order, OrderStatus, SkinsdripError, SkinsdripResult, TradeUpdate};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Default time to wait for a completion event before polling
pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(600);

/// Default delay between requests when draining a backlog
pub const DEFAULT_DRAIN_DELAY: Duration = Duration::from_secs(5);

/// Source of order-status reads for the fallback poll and batch drain
#[async_trait]
pub trait OrderStatusSource: Send + Sync {
    /// Fetch the current status of a single order
    async fn fetch_order(&self, order_id: &str) -> SkinsdripResult<Order>;
}

#[async_trait]
impl OrderStatusSource for RestClient {
    async fn fetch_order(&self, order_id: &str) -> SkinsdripResult<Order> {
        Ok(self.order_status(order_id).await?)
    }
}

/// Which path delivered a completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionSource {
    /// A `trade:update` event arrived on the stream
    Stream,
    /// The fallback timer elapsed and the status was polled
    Poll,
}

/// Outcome handed to a completion callback
#[derive(Debug, Clone)]
pub struct TradeCompletion {
    /// Order identifier
    pub order_id: String,
    /// Order status at completion time
    pub status: OrderStatus,
    /// Which path resolved the order
    pub source: CompletionSource,
}

/// Caller-supplied completion callback, invoked at most once
pub type CompletionCallback = Box<dyn FnOnce(TradeCompletion) + Send + 'static>;

/// Per-order result of a batch drain
#[derive(Debug)]
pub struct DrainedOrder {
    /// Order identifier
    pub order_id: String,
    /// Fetched status, or the error for this identifier
    pub outcome: SkinsdripResult<Order>,
}

/// Configuration for the tracker
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Time to wait for a completion event before polling
    pub completion_timeout: Duration,
    /// Delay between requests when draining a backlog
    pub drain_delay: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            completion_timeout: DEFAULT_COMPLETION_TIMEOUT,
            drain_delay: DEFAULT_DRAIN_DELAY,
        }
    }
}

impl TrackerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the completion timeout
    pub fn with_completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = timeout;
        self
    }

    /// Set the drain delay
    pub fn with_drain_delay(mut self, delay: Duration) -> Self {
        self.drain_delay = delay;
        self
    }
}

struct PendingEntry {
    callback: Option<CompletionCallback>,
    registered_at: Instant,
    timer: JoinHandle<()>,
}

type EntryMap = Arc<Mutex<HashMap<String, PendingEntry>>>;

/// Tracker of trades awaiting completion
///
/// Owned by the SDK instance it serves; state is never process-global, so
/// multiple SDK instances cannot interfere with each other.
pub struct PendingTradeTracker {
    entries: EntryMap,
    orders: Arc<dyn OrderStatusSource>,
    config: TrackerConfig,
}

impl PendingTradeTracker {
    /// Create a tracker polling through the given status source
    pub fn new(orders: Arc<dyn OrderStatusSource>, config: TrackerConfig) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            orders,
            config,
        }
    }

    /// Number of trades currently awaiting completion
    pub fn pending_count(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check whether an order is still pending
    pub fn is_pending(&self, order_id: &str) -> bool {
        self.entries.lock().contains_key(order_id)
    }

    /// Record a pending trade and arm its fallback timer.
    ///
    /// # Errors
    /// `InvalidArgument` when `order_id` is empty or already registered;
    /// re-registering a live order is a programmer error, not a race.
    pub fn register(
        &self,
        order_id: &str,
        callback: Option<CompletionCallback>,
    ) -> SkinsdripResult<()> {
        self.register_with_timeout(order_id, callback, self.config.completion_timeout)
    }

    /// Record a pending trade with an explicit fallback timeout
    pub fn register_with_timeout(
        &self,
        order_id: &str,
        callback: Option<CompletionCallback>,
        timeout: Duration,
    ) -> SkinsdripResult<()> {
        if order_id.is_empty() {
            return Err(SkinsdripError::InvalidArgument(
                "order id is required".to_string(),
            ));
        }

        let mut entries = self.entries.lock();
        if entries.contains_key(order_id) {
            return Err(SkinsdripError::InvalidArgument(format!(
                "order {order_id} is already registered"
            )));
        }

        // The timer task blocks on the same lock, so inserting before the
        // lock is released cannot lose the race against a zero timeout.
        let timer = tokio::spawn(Self::fallback(
            Arc::clone(&self.entries),
            Arc::clone(&self.orders),
            order_id.to_string(),
            timeout,
        ));
        entries.insert(
            order_id.to_string(),
            PendingEntry {
                callback,
                registered_at: Instant::now(),
                timer,
            },
        );

        debug!(order_id = %order_id, ?timeout, "Registered pending trade");
        Ok(())
    }

    /// Eviction hook called by the event channel for completion frames.
    ///
    /// Silent no-op when the order is unknown (already resolved, or never
    /// registered).
    pub fn resolve_by_event(&self, update: &TradeUpdate) {
        let entry = self.entries.lock().remove(&update.order_id);
        let Some(entry) = entry else {
            debug!(order_id = %update.order_id, "Completion event for unknown order, ignoring");
            return;
        };

        entry.timer.abort();

        match entry.callback {
            Some(callback) => {
                debug!(order_id = %update.order_id, status = %update.status, "Resolved by stream event");
                callback(TradeCompletion {
                    order_id: update.order_id.clone(),
                    status: update.status,
                    source: CompletionSource::Stream,
                });
            }
            None => {
                debug!(
                    order_id = %update.order_id,
                    age_secs = entry.registered_at.elapsed().as_secs(),
                    "Completion observed for callback-less trade"
                );
            }
        }
    }

    /// Timer body: after the timeout, poll the order status once.
    async fn fallback(
        entries: EntryMap,
        orders: Arc<dyn OrderStatusSource>,
        order_id: String,
        timeout: Duration,
    ) {
        tokio::time::sleep(timeout).await;

        // Removal decides the race: if the stream resolved this order
        // first, the entry is gone and the timer is a no-op.
        let entry = entries.lock().remove(&order_id);
        let Some(entry) = entry else {
            return;
        };

        debug!(order_id = %order_id, "No completion event in time, polling order status");
        match orders.fetch_order(&order_id).await {
            Ok(order) => {
                if let Some(callback) = entry.callback {
                    callback(TradeCompletion {
                        order_id,
                        status: order.status,
                        source: CompletionSource::Poll,
                    });
                }
            }
            Err(e) => {
                warn!(order_id = %order_id, error = %e, "Fallback poll failed, completion callback not invoked");
            }
        }
    }

    /// Sequentially fetch status for a backlog of orders.
    ///
    /// A fixed delay separates consecutive requests so a large backlog
    /// cannot burst the merchant API. The pending map is not consulted:
    /// draining exists to reconcile orders whose in-memory entries were
    /// lost (e.g. across a process restart).
    #[instrument(skip(self, order_ids), fields(count = order_ids.len()))]
    pub async fn drain_all(&self, order_ids: &[String]) -> Vec<DrainedOrder> {
        info!(count = order_ids.len(), "Draining order backlog");

        let mut drained = Vec::with_capacity(order_ids.len());
        for (index, order_id) in order_ids.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.config.drain_delay).await;
            }
            let outcome = self.orders.fetch_order(order_id).await;
            drained.push(DrainedOrder {
                order_id: order_id.clone(),
                outcome,
            });
        }
        drained
    }
}

impl Drop for PendingTradeTracker {
    fn drop(&mut self) {
        for entry in self.entries.lock().values() {
            entry.timer.abort();
        }
    }
}

impl std::fmt::Debug for PendingTradeTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingTradeTracker")
            .field("pending", &self.pending_count())
            .field("config", &self.config)
            .finish()
    }
}
