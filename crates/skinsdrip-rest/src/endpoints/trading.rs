//! Trade lifecycle endpoints

use crate::client::RestClient;
use crate::error::{RestError, RestResult};
use crate::types::CreateTradeRequest;
use reqwest::Method;
use serde_json::json;
use skinsdrip_types::{Order, TradeReceipt};
use tracing::{debug, instrument};

/// Trade creation and order-status endpoints
pub struct TradingEndpoints<'a> {
    client: &'a RestClient,
}

impl<'a> TradingEndpoints<'a> {
    pub(crate) fn new(client: &'a RestClient) -> Self {
        Self { client }
    }

    /// Create a trade between a user and a bot.
    ///
    /// The returned receipt carries the server-assigned order identifier
    /// used to correlate the eventual `trade:update` notification.
    #[instrument(skip(self, request), fields(steamid = %request.user.steamid))]
    pub async fn create_trade(&self, request: &CreateTradeRequest) -> RestResult<TradeReceipt> {
        if request.user.steamid.is_empty() {
            return Err(RestError::InvalidParameter("steamid is required".to_string()));
        }
        if request.user.tradeurl.is_empty() {
            return Err(RestError::InvalidParameter(
                "tradeurl is required".to_string(),
            ));
        }

        let body = serde_json::to_value(request)
            .map_err(|e| RestError::Parse(e.to_string()))?;

        debug!("Creating trade");
        self.client.call(Method::POST, "/trading", body).await
    }

    /// Read the current status of a single order.
    ///
    /// Used by the completion tracker's fallback poll and batch drain.
    #[instrument(skip(self))]
    pub async fn order_status(&self, order_id: &str) -> RestResult<Order> {
        if order_id.is_empty() {
            return Err(RestError::InvalidParameter(
                "order id is required".to_string(),
            ));
        }

        debug!("Fetching order status");
        self.client
            .call(Method::POST, "/trading/order", json!({ "order_id": order_id }))
            .await
    }
}
