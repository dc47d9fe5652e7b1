//! Request and response types for the merchant REST API

use serde::{Deserialize, Serialize};
use skinsdrip_types::TradeItem;

use crate::error::{RestError, RestResult};

// ============================================================================
// API Response Envelope
// ============================================================================

/// Standard merchant API response envelope
///
/// Every endpoint answers `{error?, msg?, data?}`; `error: true` carries
/// the failure message in `msg`.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    /// Error flag (absent means success)
    #[serde(default)]
    pub error: bool,
    /// Human-readable message
    #[serde(default)]
    pub msg: Option<String>,
    /// Result data (present if successful)
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Check if the response indicates success
    pub fn is_success(&self) -> bool {
        !self.error
    }

    /// Get the data, returning an error if the API reported one
    pub fn into_result(self) -> RestResult<T> {
        if self.error {
            return Err(RestError::Upstream {
                message: self
                    .msg
                    .unwrap_or_else(|| "unknown upstream error".to_string()),
            });
        }
        self.data
            .ok_or_else(|| RestError::Parse("missing data in response".to_string()))
    }
}

// ============================================================================
// Trade Creation
// ============================================================================

/// The user side of a trade offer
#[derive(Debug, Clone, Serialize)]
pub struct TradeParty {
    /// Items offered by the user
    pub items: Vec<TradeItem>,
    /// Steam id of the user
    pub steamid: String,
    /// Steam trade offer URL of the user
    pub tradeurl: String,
}

/// Body of a trade creation call
#[derive(Debug, Clone, Serialize)]
pub struct CreateTradeRequest {
    /// User side of the trade
    pub user: TradeParty,
    /// Items offered by the bot
    #[serde(rename = "botItems")]
    pub bot_items: Vec<TradeItem>,
}

impl CreateTradeRequest {
    /// Assemble a trade creation request
    pub fn new(
        steamid: impl Into<String>,
        tradeurl: impl Into<String>,
        user_items: Vec<TradeItem>,
        bot_items: Vec<TradeItem>,
    ) -> Self {
        Self {
            user: TradeParty {
                items: user_items,
                steamid: steamid.into(),
                tradeurl: tradeurl.into(),
            },
            bot_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let response: ApiResponse<serde_json::Value> =
            serde_json::from_value(json!({"data": {"token": "t"}})).unwrap();
        assert!(response.is_success());
        assert_eq!(response.into_result().unwrap()["token"], "t");
    }

    #[test]
    fn test_error_envelope() {
        let response: ApiResponse<serde_json::Value> =
            serde_json::from_value(json!({"error": true, "msg": "bad signature"})).unwrap();
        assert!(!response.is_success());
        match response.into_result() {
            Err(RestError::Upstream { message }) => assert_eq!(message, "bad signature"),
            other => panic!("expected upstream error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_data_is_parse_error() {
        let response: ApiResponse<serde_json::Value> = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(response.into_result(), Err(RestError::Parse(_))));
    }

    #[test]
    fn test_create_trade_request_shape() {
        let request = CreateTradeRequest::new("76561198000000000", "https://steamcommunity.com/tradeoffer/new/?partner=1", vec![], vec![]);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["user"]["steamid"], "76561198000000000");
        assert!(value["botItems"].is_array());
    }
}
