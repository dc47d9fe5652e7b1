//! Resilient event channel for the Skinsdrip merchant stream
//!
//! This crate maintains a single logical subscription to the merchant's
//! event stream, abstracting physical reconnects from subscribers.
//!
//! # Features
//!
//! - Automatic reconnection on a fixed delay, retried forever
//! - Keepalive pings against idle-timeout policies, leak-free across
//!   reconnects
//! - Namespace translation (`merchant:trade:update` → `trade:update`)
//! - Per-handler panic isolation with in-order delivery
//! - Malformed frames logged and dropped, never fatal
//!
//! # Example
//!
//! ```no_run
//! use skinsdrip_types::SessionToken;
//! use skinsdrip_ws::{ChannelConfig, EventChannel};
//!
//! #[tokio::main]
//! async fn main() {
//!     let token = SessionToken::new("session-token-from-authenticate");
//!     let channel = EventChannel::new(token, ChannelConfig::default());
//!
//!     channel.on("trade:update", |event| {
//!         println!("trade update: {:?}", event);
//!     });
//!
//!     channel.connect();
//!     // ... the channel reconnects on its own until disconnect()
//!     channel.disconnect();
//! }
//! ```

pub mod channel;
pub mod endpoint;
pub mod registry;

// Re-export main types
pub use channel::{ChannelConfig, ChannelState, CompletionHook, EventChannel};
pub use endpoint::Endpoint;
pub use registry::{EventHandler, HandlerRegistry, WILDCARD};
