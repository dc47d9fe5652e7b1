//! Domain models returned by the merchant REST API

use crate::events::OrderStatus;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Merchant account balance
#[derive(Debug, Clone, Deserialize)]
pub struct Balance {
    /// Available balance
    pub balance: Decimal,
    /// Balance currency (defaults to USD server-side)
    #[serde(default)]
    pub currency: Option<String>,
}

/// An item listed on the merchant market
#[derive(Debug, Clone, Deserialize)]
pub struct MarketItem {
    /// Steam market hash name
    #[serde(rename = "marketHashName")]
    pub market_hash_name: String,
    /// Listing price
    pub price: Decimal,
    /// Number of copies available
    #[serde(default)]
    pub stock: Option<u32>,
}

/// An item in a user's Steam inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Steam asset identifier
    #[serde(rename = "assetId")]
    pub asset_id: String,
    /// Steam market hash name
    #[serde(rename = "marketHashName")]
    pub market_hash_name: String,
    /// Appraised price
    pub price: Decimal,
    /// Whether the item can currently be traded
    #[serde(default)]
    pub tradable: bool,
}

/// An item side of a trade offer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeItem {
    /// Steam asset identifier
    #[serde(rename = "assetId")]
    pub asset_id: String,
    /// Steam market hash name
    #[serde(rename = "marketHashName")]
    pub market_hash_name: String,
    /// Agreed price for this item
    pub price: Decimal,
}

/// Response to a trade creation call, carrying the order identifier used
/// to correlate the eventual completion notification.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeReceipt {
    /// Server-assigned order identifier
    #[serde(rename = "orderId")]
    pub order_id: String,
    /// Initial order status, when reported
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

/// Current state of an order, as returned by the order-status endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    /// Server-assigned order identifier
    #[serde(rename = "orderId")]
    pub order_id: String,
    /// Current order status
    pub status: OrderStatus,
    /// Steam id of the trading user, when known
    #[serde(default)]
    pub steamid: Option<String>,
    /// Order creation time
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A settled withdrawal in the merchant history
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryEntry {
    /// Order identifier
    #[serde(rename = "orderId")]
    pub order_id: String,
    /// Final order status
    pub status: OrderStatus,
    /// Total order value
    #[serde(default)]
    pub total: Option<Decimal>,
    /// Order creation time
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// A hosted payment session for a user
#[derive(Debug, Clone, Deserialize)]
pub struct PaySession {
    /// Session identifier
    #[serde(rename = "sessionId")]
    pub session_id: String,
    /// Hosted checkout URL for the session
    #[serde(default)]
    pub url: Option<String>,
}
