//! Event channel: a self-healing connection to the merchant stream
//!
//! The channel owns one logical subscription to the merchant's event
//! stream and hides physical reconnects from subscribers. A supervision
//! loop connects, pumps frames, and on any connection loss sleeps a fixed
//! delay before trying again, forever. There is no attempt cap because
//! the upstream is expected to be eventually reachable and the client has
//! no user-facing signal to fail over to.
//!
//! Timer discipline: the keepalive interval is owned by the connection
//! future and the reconnect sleep is the only await between connection
//! attempts, so at most one heartbeat and at most one pending reconnect
//! can exist at any time, across any number of reconnects.

use crate::endpoint::Endpoint;
use crate::registry::{EventHandler, HandlerRegistry};

use futures_util::{SinkExt, StreamExt};
use parking_lot::{Mutex, RwLock};
use serde::Deserialize;
use serde_json::Value;
use skinsdrip_types::{
    public_event_name, MerchantEvent, SessionToken, SkinsdripError, SkinsdripResult, TradeUpdate,
};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, timeout, Duration, Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::COOKIE;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

/// Keepalive payload expected by the server (literal text, not JSON)
const KEEPALIVE_PAYLOAD: &str = "ping";

/// Event channel state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Not connected
    Disconnected,
    /// Connection in progress
    Connecting,
    /// Connected and delivering frames
    Connected,
}

/// Hook invoked for every `trade:update` frame, before subscriber delivery
pub type CompletionHook = Arc<dyn Fn(&TradeUpdate) + Send + Sync>;

/// Configuration for the event channel
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    /// Stream endpoint
    pub endpoint: Endpoint,
    /// Keepalive ping interval
    pub heartbeat_interval: Duration,
    /// Fixed delay between reconnect attempts
    pub reconnect_delay: Duration,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::Production,
            heartbeat_interval: Duration::from_secs(7),
            reconnect_delay: Duration::from_millis(7500),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ChannelConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the endpoint
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Set the keepalive interval
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// Set the reconnect delay
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Channel counters, readable at any time
#[derive(Debug, Default)]
struct ChannelStats {
    live_heartbeats: AtomicUsize,
    pending_reconnects: AtomicUsize,
    reconnect_attempts: AtomicU64,
    frames_dropped: AtomicU64,
    frames_delivered: AtomicU64,
}

/// Decrements the live-heartbeat counter when the connection future drops
struct HeartbeatGuard<'a>(&'a ChannelStats);

impl<'a> HeartbeatGuard<'a> {
    fn arm(stats: &'a ChannelStats) -> Self {
        stats.live_heartbeats.fetch_add(1, Ordering::SeqCst);
        Self(stats)
    }
}

impl Drop for HeartbeatGuard<'_> {
    fn drop(&mut self) {
        self.0.live_heartbeats.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Decrements the pending-reconnect counter when the sleep completes or drops
struct ReconnectGuard<'a>(&'a ChannelStats);

impl<'a> ReconnectGuard<'a> {
    fn arm(stats: &'a ChannelStats) -> Self {
        stats.pending_reconnects.fetch_add(1, Ordering::SeqCst);
        Self(stats)
    }
}

impl Drop for ReconnectGuard<'_> {
    fn drop(&mut self) {
        self.0.pending_reconnects.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A raw frame off the wire
#[derive(Debug, Deserialize)]
struct RawFrame {
    event: Option<String>,
    #[serde(default)]
    data: Value,
}

/// Event channel to the merchant stream
///
/// Constructed from a session token (the channel cannot exist without
/// one), connected on demand, and torn down with
/// [`disconnect`](EventChannel::disconnect), the only transition a
/// reconnect will not override.
pub struct EventChannel {
    core: Arc<ChannelCore>,
    run_handle: Mutex<Option<JoinHandle<()>>>,
}

struct ChannelCore {
    config: ChannelConfig,
    token: SessionToken,
    state: RwLock<ChannelState>,
    registry: HandlerRegistry,
    completion_hook: RwLock<Option<CompletionHook>>,
    shutdown: AtomicBool,
    shutdown_notify: Notify,
    stats: ChannelStats,
}

impl EventChannel {
    /// Create a new channel authenticated with the given session token
    pub fn new(token: SessionToken, config: ChannelConfig) -> Self {
        Self {
            core: Arc::new(ChannelCore {
                config,
                token,
                state: RwLock::new(ChannelState::Disconnected),
                registry: HandlerRegistry::new(),
                completion_hook: RwLock::new(None),
                shutdown: AtomicBool::new(false),
                shutdown_notify: Notify::new(),
                stats: ChannelStats::default(),
            }),
            run_handle: Mutex::new(None),
        }
    }

    /// Create a channel with default configuration
    pub fn with_defaults(token: SessionToken) -> Self {
        Self::new(token, ChannelConfig::default())
    }

    /// Get the current channel state
    pub fn state(&self) -> ChannelState {
        *self.core.state.read()
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.state() == ChannelState::Connected
    }

    /// Register a handler for a public event name.
    ///
    /// Multiple handlers per event are all invoked, in registration order.
    pub fn on(&self, event: &str, handler: impl Fn(&MerchantEvent) + Send + Sync + 'static) {
        self.core.registry.on(event, Arc::new(handler) as EventHandler);
    }

    /// Register a handler invoked for every event
    pub fn on_any(&self, handler: impl Fn(&MerchantEvent) + Send + Sync + 'static) {
        self.core
            .registry
            .on(crate::registry::WILDCARD, Arc::new(handler) as EventHandler);
    }

    /// Set the hook invoked for every `trade:update` frame.
    ///
    /// The hook runs exactly once per frame, before subscriber delivery.
    pub fn set_completion_hook(&self, hook: impl Fn(&TradeUpdate) + Send + Sync + 'static) {
        *self.core.completion_hook.write() = Some(Arc::new(hook));
    }

    /// Start the connection supervision loop.
    ///
    /// Idempotent: a no-op while the channel is connecting, connected, or
    /// waiting between reconnect attempts.
    pub fn connect(&self) {
        let mut handle = self.run_handle.lock();

        if handle.as_ref().map(|h| !h.is_finished()).unwrap_or(false) {
            debug!("connect() is a no-op, supervision loop already running");
            return;
        }

        self.core.shutdown.store(false, Ordering::SeqCst);
        debug!("Starting event channel supervision loop");
        let core = Arc::clone(&self.core);
        *handle = Some(tokio::spawn(async move { core.run().await }));
    }

    /// Tear down the channel.
    ///
    /// Cancels the heartbeat and any pending reconnect before returning;
    /// disconnect wins races with the reconnect timer.
    pub fn disconnect(&self) {
        info!("Disconnecting event channel");
        self.core.shutdown.store(true, Ordering::SeqCst);
        self.core.shutdown_notify.notify_waiters();

        if let Some(handle) = self.run_handle.lock().take() {
            handle.abort();
        }

        *self.core.state.write() = ChannelState::Disconnected;
    }

    // ========================================================================
    // Counters
    // ========================================================================

    /// Number of live keepalive timers (bounded by 1 by construction)
    pub fn live_heartbeats(&self) -> usize {
        self.core.stats.live_heartbeats.load(Ordering::SeqCst)
    }

    /// Number of pending reconnect timers (bounded by 1 by construction)
    pub fn pending_reconnects(&self) -> usize {
        self.core.stats.pending_reconnects.load(Ordering::SeqCst)
    }

    /// Total reconnect attempts since construction
    pub fn reconnect_attempts(&self) -> u64 {
        self.core.stats.reconnect_attempts.load(Ordering::SeqCst)
    }

    /// Frames dropped as malformed
    pub fn frames_dropped(&self) -> u64 {
        self.core.stats.frames_dropped.load(Ordering::SeqCst)
    }

    /// Frames delivered to dispatch
    pub fn frames_delivered(&self) -> u64 {
        self.core.stats.frames_delivered.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for EventChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventChannel")
            .field("state", &self.state())
            .field("endpoint", &self.core.config.endpoint)
            .finish()
    }
}

impl ChannelCore {
    fn set_state(&self, state: ChannelState) {
        *self.state.write() = state;
    }

    /// Supervision loop: connect, pump, sleep, repeat until shutdown.
    async fn run(self: Arc<Self>) {
        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }

            self.set_state(ChannelState::Connecting);

            match self.run_connection().await {
                Ok(()) => {
                    debug!("Event stream closed by disconnect");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "Event stream connection lost");
                }
            }

            self.set_state(ChannelState::Disconnected);

            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }

            self.stats.reconnect_attempts.fetch_add(1, Ordering::SeqCst);
            let delay = self.config.reconnect_delay;
            info!(?delay, "Scheduling reconnect");

            // The only reconnect timer: a new disconnect during this sleep
            // cancels it instead of stacking another.
            let reconnect_guard = ReconnectGuard::arm(&self.stats);
            let notified = self.shutdown_notify.notified();
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }
            let shutdown_requested = tokio::select! {
                _ = notified => true,
                _ = tokio::time::sleep(delay) => false,
            };
            drop(reconnect_guard);
            if shutdown_requested {
                break;
            }
        }

        self.set_state(ChannelState::Disconnected);
    }

    /// One physical connection: returns `Ok` only on requested shutdown.
    async fn run_connection(&self) -> SkinsdripResult<()> {
        let url = self.config.endpoint.url().to_string();
        info!(%url, "Connecting to the merchant event stream");

        let mut request = url
            .as_str()
            .into_client_request()
            .map_err(|e| SkinsdripError::Transport(e.to_string()))?;
        request.headers_mut().insert(
            COOKIE,
            HeaderValue::from_str(&self.token.cookie_value())
                .map_err(|e| SkinsdripError::Transport(e.to_string()))?,
        );

        let connect_result = timeout(self.config.connect_timeout, connect_async(request)).await;

        let (ws_stream, _response) = match connect_result {
            Ok(Ok(pair)) => pair,
            Ok(Err(e)) => {
                return Err(SkinsdripError::ConnectionFailed {
                    url,
                    source: std::io::Error::other(e.to_string()),
                });
            }
            Err(_) => {
                return Err(SkinsdripError::ConnectionTimeout {
                    url,
                    timeout: self.config.connect_timeout,
                });
            }
        };

        self.set_state(ChannelState::Connected);
        info!("Connected to the merchant event stream");

        let (mut write, mut read) = ws_stream.split();

        // The keepalive interval is owned by this future: it drops with
        // the connection, so it can never stack across reconnects.
        let mut heartbeat = interval_at(
            Instant::now() + self.config.heartbeat_interval,
            self.config.heartbeat_interval,
        );
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let _heartbeat_guard = HeartbeatGuard::arm(&self.stats);

        loop {
            let notified = self.shutdown_notify.notified();
            if self.shutdown.load(Ordering::SeqCst) {
                let _ = write.send(Message::Close(None)).await;
                return Ok(());
            }

            tokio::select! {
                _ = notified => {
                    let _ = write.send(Message::Close(None)).await;
                    return Ok(());
                }
                _ = heartbeat.tick() => {
                    if let Err(e) = write.send(Message::Text(KEEPALIVE_PAYLOAD.to_string())).await {
                        return Err(SkinsdripError::Transport(format!("keepalive failed: {e}")));
                    }
                }
                incoming = read.next() => {
                    match incoming {
                        Some(Ok(Message::Text(text))) => self.handle_frame(&text),
                        Some(Ok(Message::Ping(payload))) => {
                            let _ = write.send(Message::Pong(payload)).await;
                        }
                        Some(Ok(Message::Close(_))) => {
                            return Err(SkinsdripError::Transport("server closed connection".to_string()));
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            return Err(SkinsdripError::Transport(e.to_string()));
                        }
                        None => return Err(SkinsdripError::ChannelClosed),
                    }
                }
            }
        }
    }

    /// Parse and deliver one frame; malformed frames are dropped, never fatal.
    fn handle_frame(&self, text: &str) {
        let frame: RawFrame = match serde_json::from_str(text) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, bytes = text.len(), "Dropping malformed frame");
                self.stats.frames_dropped.fetch_add(1, Ordering::SeqCst);
                return;
            }
        };

        let Some(raw_name) = frame.event else {
            warn!("Dropping frame without event name");
            self.stats.frames_dropped.fetch_add(1, Ordering::SeqCst);
            return;
        };

        let public_name = public_event_name(&raw_name).to_string();
        let event = MerchantEvent::parse(&public_name, frame.data);

        // Completion eviction: exactly once per frame, before subscribers.
        if let MerchantEvent::TradeUpdate(update) = &event {
            let hook = self.completion_hook.read().clone();
            if let Some(hook) = hook {
                hook(update);
            }
        }

        self.registry.dispatch(&public_name, &event);
        self.stats.frames_delivered.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_config_builders() {
        let config = ChannelConfig::new()
            .with_endpoint(Endpoint::Test)
            .with_heartbeat_interval(Duration::from_secs(3))
            .with_reconnect_delay(Duration::from_secs(1))
            .with_connect_timeout(Duration::from_secs(5));

        assert_eq!(config.endpoint, Endpoint::Test);
        assert_eq!(config.heartbeat_interval, Duration::from_secs(3));
        assert_eq!(config.reconnect_delay, Duration::from_secs(1));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_default_intervals_match_server_policy() {
        let config = ChannelConfig::default();
        assert_eq!(config.heartbeat_interval, Duration::from_secs(7));
        assert_eq!(config.reconnect_delay, Duration::from_millis(7500));
    }

    #[test]
    fn test_new_channel_is_disconnected() {
        let channel = EventChannel::with_defaults(SessionToken::new("token"));
        assert_eq!(channel.state(), ChannelState::Disconnected);
        assert!(!channel.is_connected());
        assert_eq!(channel.live_heartbeats(), 0);
        assert_eq!(channel.pending_reconnects(), 0);
    }

    #[test]
    fn test_handle_frame_drops_malformed() {
        let channel = EventChannel::with_defaults(SessionToken::new("token"));
        channel.core.handle_frame("not json at all");
        channel.core.handle_frame("{\"data\": {}}");
        assert_eq!(channel.frames_dropped(), 2);
        assert_eq!(channel.frames_delivered(), 0);
    }

    #[test]
    fn test_handle_frame_strips_namespace_and_dispatches() {
        use std::sync::atomic::AtomicUsize;

        let channel = EventChannel::with_defaults(SessionToken::new("token"));
        let hits = Arc::new(AtomicUsize::new(0));

        let seen = hits.clone();
        channel.on("trade:update", move |event| {
            assert_eq!(event.name(), "trade:update");
            seen.fetch_add(1, Ordering::SeqCst);
        });

        channel
            .core
            .handle_frame(r#"{"event":"merchant:trade:update","data":{"orderId":"o1","status":"completed"}}"#);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(channel.frames_delivered(), 1);
    }

    #[test]
    fn test_completion_hook_fires_once_per_frame() {
        use std::sync::atomic::AtomicUsize;

        let channel = EventChannel::with_defaults(SessionToken::new("token"));
        let evictions = Arc::new(AtomicUsize::new(0));

        let seen = evictions.clone();
        channel.set_completion_hook(move |update| {
            assert_eq!(update.order_id, "o1");
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let frame = r#"{"event":"merchant:trade:update","data":{"orderId":"o1","status":"completed"}}"#;
        channel.core.handle_frame(frame);
        channel.core.handle_frame(frame);

        assert_eq!(evictions.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_non_namespaced_event_delivered_under_raw_name() {
        use std::sync::atomic::AtomicUsize;

        let channel = EventChannel::with_defaults(SessionToken::new("token"));
        let hits = Arc::new(AtomicUsize::new(0));

        let seen = hits.clone();
        channel.on("other:thing", move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        channel
            .core
            .handle_frame(r#"{"event":"other:thing","data":{"k":"v"}}"#);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
