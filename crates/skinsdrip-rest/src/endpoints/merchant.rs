//! Merchant account endpoints
//!
//! These endpoints require a session token obtained via authenticate.

use crate::client::RestClient;
use crate::error::RestResult;
use reqwest::Method;
use serde_json::json;
use skinsdrip_types::{Balance, HistoryEntry, InventoryItem, MarketItem, PaySession};
use tracing::{debug, instrument};

/// Merchant account endpoints
pub struct MerchantEndpoints<'a> {
    client: &'a RestClient,
}

impl<'a> MerchantEndpoints<'a> {
    pub(crate) fn new(client: &'a RestClient) -> Self {
        Self { client }
    }

    /// Get the hosted payment session for a user
    ///
    /// # Arguments
    /// * `user_id` - The merchant-side user identifier
    #[instrument(skip(self))]
    pub async fn get_pay_session(&self, user_id: &str) -> RestResult<PaySession> {
        debug!("Fetching pay session");
        self.client
            .call(Method::POST, "/get_session", json!({ "user_id": user_id }))
            .await
    }

    /// Get the merchant market listing
    #[instrument(skip(self))]
    pub async fn get_market(&self) -> RestResult<Vec<MarketItem>> {
        debug!("Fetching market");
        self.client.call(Method::GET, "/market", json!({})).await
    }

    /// Get the merchant account balance
    #[instrument(skip(self))]
    pub async fn get_balance(&self) -> RestResult<Balance> {
        debug!("Fetching balance");
        self.client.call(Method::GET, "/balance", json!({})).await
    }

    /// Get a user's Steam inventory
    ///
    /// # Arguments
    /// * `steamid` - The user's Steam id
    #[instrument(skip(self))]
    pub async fn get_inventory(&self, steamid: &str) -> RestResult<Vec<InventoryItem>> {
        debug!("Fetching inventory");
        self.client
            .call(Method::GET, "/inventory", json!({ "user_id": steamid }))
            .await
    }

    /// Force a refresh of a user's Steam inventory and return the result
    #[instrument(skip(self))]
    pub async fn refresh_inventory(&self, steamid: &str) -> RestResult<Vec<InventoryItem>> {
        debug!("Refreshing inventory");
        self.client
            .call(
                Method::POST,
                "/inventory/refresh",
                json!({ "user_id": steamid }),
            )
            .await
    }

    /// Get the withdrawal history
    #[instrument(skip(self))]
    pub async fn get_history(&self) -> RestResult<Vec<HistoryEntry>> {
        debug!("Fetching withdrawal history");
        self.client
            .call(Method::POST, "/withdraw/history", json!({}))
            .await
    }
}
