//! Re-exports for convenience
//!
//! Import everything you need with:
//! ```
//! use skinsdrip_sdk::prelude::*;
//! ```

// Client
pub use crate::builder::{SdkConfig, SkinsdripClientBuilder};
pub use crate::client::SkinsdripClient;

// Completion tracking
pub use crate::tracker::{
    CompletionCallback, CompletionSource, DrainedOrder, OrderStatusSource, PendingTradeTracker,
    TrackerConfig, TradeCompletion,
};

// Types from skinsdrip-types
pub use skinsdrip_types::{
    Balance, HistoryEntry, InventoryItem, MarketItem, MerchantEvent, Order, OrderStatus,
    PaySession, SessionToken, SkinsdripError, SkinsdripResult, TradeItem, TradeReceipt,
    TradeUpdate,
};

// Signing and IPN verification
pub use skinsdrip_auth::{canonical_signature, verify_ipn, MerchantCredentials};

// REST types
pub use skinsdrip_rest::{CreateTradeRequest, RestClient, RestConfig};

// Event channel types
pub use skinsdrip_ws::{ChannelConfig, ChannelState, Endpoint, EventChannel};

// Decimal for prices
pub use skinsdrip_types::Decimal;
