//! Event names and payloads delivered over the merchant event stream
//!
//! The server prefixes merchant-facing events with an internal namespace
//! (`merchant:trade:update`). Subscribers see the public name with the
//! prefix stripped (`trade:update`). Events outside the namespace are
//! delivered under their raw name, unmodified.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Namespace prefix the server applies to merchant-facing events
pub const MERCHANT_NAMESPACE: &str = "merchant:";

/// Public name of the trade completion event
pub const TRADE_UPDATE: &str = "trade:update";

/// Derive the public (subscriber-facing) event name from a raw wire name.
///
/// Strips the recognized `merchant:` prefix; names outside the namespace
/// pass through verbatim.
pub fn public_event_name(raw: &str) -> &str {
    raw.strip_prefix(MERCHANT_NAMESPACE).unwrap_or(raw)
}

/// Trade lifecycle status reported by the merchant API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order created, trade offer not yet sent
    Pending,
    /// Trade offer sent to the user
    Sent,
    /// Trade offer accepted by the user
    Accepted,
    /// Order settled
    Completed,
    /// Trade offer declined by the user
    Declined,
    /// Order canceled
    Canceled,
    /// Trade offer expired
    Expired,
    /// Unrecognized status string
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Parse from a merchant status string
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pending" => Self::Pending,
            "sent" => Self::Sent,
            "accepted" => Self::Accepted,
            "completed" | "settled" => Self::Completed,
            "declined" => Self::Declined,
            "canceled" | "cancelled" => Self::Canceled,
            "expired" => Self::Expired,
            _ => Self::Unknown,
        }
    }

    /// Check if the order can still change state
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Sent | Self::Accepted)
    }

    /// Check if the order reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::Declined | Self::Canceled | Self::Expired
        )
    }

    /// Check if the order settled successfully
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Accepted => "accepted",
            Self::Completed => "completed",
            Self::Declined => "declined",
            Self::Canceled => "canceled",
            Self::Expired => "expired",
            Self::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// Payload of a `trade:update` event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeUpdate {
    /// Server-assigned order identifier
    #[serde(rename = "orderId")]
    pub order_id: String,
    /// Current order status
    pub status: OrderStatus,
}

/// A parsed event from the merchant stream.
///
/// Known event names carry a typed payload; everything else falls back to
/// the generic shape with the raw JSON data attached.
#[derive(Debug, Clone)]
pub enum MerchantEvent {
    /// Trade lifecycle notification
    TradeUpdate(TradeUpdate),
    /// Any other event, delivered under its public name
    Generic {
        /// Public event name
        event: String,
        /// Raw payload
        data: Value,
    },
}

impl MerchantEvent {
    /// Parse an event payload for the given public event name.
    ///
    /// A `trade:update` payload that does not carry an `orderId` degrades
    /// to the generic shape rather than being dropped.
    pub fn parse(public_name: &str, data: Value) -> Self {
        if public_name == TRADE_UPDATE {
            match serde_json::from_value::<TradeUpdate>(data.clone()) {
                Ok(update) => return Self::TradeUpdate(update),
                Err(_) => {
                    return Self::Generic {
                        event: public_name.to_string(),
                        data,
                    }
                }
            }
        }
        Self::Generic {
            event: public_name.to_string(),
            data,
        }
    }

    /// Public name of this event
    pub fn name(&self) -> &str {
        match self {
            Self::TradeUpdate(_) => TRADE_UPDATE,
            Self::Generic { event, .. } => event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_namespace_stripping() {
        assert_eq!(public_event_name("merchant:trade:update"), "trade:update");
        assert_eq!(public_event_name("merchant:balance:update"), "balance:update");
    }

    #[test]
    fn test_non_namespaced_names_pass_through() {
        assert_eq!(public_event_name("other:thing"), "other:thing");
        assert_eq!(public_event_name("trade:update"), "trade:update");
    }

    #[test]
    fn test_order_status_parsing() {
        assert_eq!(OrderStatus::parse("pending"), OrderStatus::Pending);
        assert_eq!(OrderStatus::parse("completed"), OrderStatus::Completed);
        assert_eq!(OrderStatus::parse("settled"), OrderStatus::Completed);
        assert_eq!(OrderStatus::parse("cancelled"), OrderStatus::Canceled);
        assert_eq!(OrderStatus::parse("weird"), OrderStatus::Unknown);
    }

    #[test]
    fn test_order_status_states() {
        assert!(OrderStatus::Pending.is_active());
        assert!(OrderStatus::Sent.is_active());
        assert!(!OrderStatus::Completed.is_active());

        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Declined.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());

        assert!(OrderStatus::Completed.is_success());
        assert!(!OrderStatus::Declined.is_success());
    }

    #[test]
    fn test_trade_update_parsing() {
        let event = MerchantEvent::parse(
            TRADE_UPDATE,
            json!({"orderId": "ord_1", "status": "completed"}),
        );
        match event {
            MerchantEvent::TradeUpdate(update) => {
                assert_eq!(update.order_id, "ord_1");
                assert_eq!(update.status, OrderStatus::Completed);
            }
            other => panic!("expected trade update, got {:?}", other),
        }
    }

    #[test]
    fn test_trade_update_without_order_id_degrades() {
        let event = MerchantEvent::parse(TRADE_UPDATE, json!({"status": "completed"}));
        assert!(matches!(event, MerchantEvent::Generic { .. }));
        assert_eq!(event.name(), TRADE_UPDATE);
    }

    #[test]
    fn test_unknown_event_is_generic() {
        let event = MerchantEvent::parse("balance:update", json!({"balance": "10.50"}));
        match event {
            MerchantEvent::Generic { event, data } => {
                assert_eq!(event, "balance:update");
                assert_eq!(data["balance"], "10.50");
            }
            other => panic!("expected generic event, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_status_deserializes() {
        let update: TradeUpdate =
            serde_json::from_value(json!({"orderId": "ord_2", "status": "teleported"})).unwrap();
        assert_eq!(update.status, OrderStatus::Unknown);
    }
}
