//! High-level SDK for the Skinsdrip merchant API
//!
//! This crate composes the signed REST client, the resilient event
//! channel, and the pending-completion tracker into a single facade. It
//! handles authentication, automatic stream reconnection, and the
//! correlation of trade creations with their asynchronous completion
//! notifications, with a polling fallback when the stream misses one.
//!
//! # Quick Start
//!
//! ```no_run
//! use skinsdrip_sdk::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SkinsdripClient::new("merchant_1", "merchant_secret")?;
//!     client.authenticate().await?;
//!
//!     // Stream notifications survive reconnects transparently
//!     client.subscribe("trade:update", |event| {
//!         println!("update: {:?}", event);
//!     })?;
//!
//!     // The completion callback fires exactly once, from the stream or
//!     // from the fallback poll, whichever happens first
//!     let receipt = client
//!         .create_trade(
//!             "76561198000000000",
//!             "https://steamcommunity.com/tradeoffer/new/?partner=1&token=x",
//!             vec![],
//!             vec![],
//!             Some(Box::new(|completion| {
//!                 println!("{} -> {}", completion.order_id, completion.status);
//!             })),
//!         )
//!         .await?;
//!     println!("order {}", receipt.order_id);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - **Signed REST calls**: canonical SHA-256 signatures on every request
//! - **Resilient event channel**: fixed-delay eternal reconnect, leak-free
//!   keepalive, namespace translation
//! - **Exactly-once completion**: stream event or fallback poll, never both
//! - **IPN verification**: [`verify_ipn`] for inbound notifications

pub mod builder;
pub mod client;
pub mod prelude;
pub mod tracker;

// Re-export main types
pub use builder::{SdkConfig, SkinsdripClientBuilder};
pub use client::SkinsdripClient;
pub use tracker::{
    CompletionCallback, CompletionSource, DrainedOrder, OrderStatusSource, PendingTradeTracker,
    TrackerConfig, TradeCompletion,
};

// Re-export commonly used types from dependencies
pub use skinsdrip_auth::{canonical_signature, verify_ipn, MerchantCredentials};
pub use skinsdrip_rest::{CreateTradeRequest, RestClient, RestConfig};
pub use skinsdrip_types::{
    MerchantEvent, Order, OrderStatus, SessionToken, SkinsdripError, SkinsdripResult, TradeItem,
    TradeReceipt, TradeUpdate,
};
pub use skinsdrip_ws::{ChannelConfig, ChannelState, Endpoint, EventChannel};
