//! High-level Skinsdrip client

use crate::builder::{SdkConfig, SkinsdripClientBuilder};
use crate::tracker::{
    CompletionCallback, DrainedOrder, OrderStatusSource, PendingTradeTracker,
};
use parking_lot::RwLock;
use skinsdrip_auth::MerchantCredentials;
use skinsdrip_rest::{CreateTradeRequest, RestClient};
use skinsdrip_types::{
    Balance, HistoryEntry, InventoryItem, MarketItem, MerchantEvent, Order, PaySession,
    SkinsdripError, SkinsdripResult, TradeItem, TradeReceipt,
};
use skinsdrip_ws::{ChannelState, EventChannel};
use std::sync::Arc;
use tracing::{info, instrument};

/// High-level client for the Skinsdrip merchant API
///
/// Composes the signed REST client, the resilient event channel, and the
/// pending-completion tracker. The channel is constructed lazily on the
/// first [`subscribe`](SkinsdripClient::subscribe) call, after a
/// successful [`authenticate`](SkinsdripClient::authenticate).
///
/// # Example
///
/// ```no_run
/// use skinsdrip_sdk::SkinsdripClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = SkinsdripClient::new("merchant_1", "merchant_secret")?;
///     client.authenticate().await?;
///
///     client.subscribe("trade:update", |event| {
///         println!("trade update: {:?}", event);
///     })?;
///
///     let receipt = client
///         .create_trade(
///             "76561198000000000",
///             "https://steamcommunity.com/tradeoffer/new/?partner=1",
///             vec![],
///             vec![],
///             Some(Box::new(|completion| {
///                 println!("trade {} finished: {}", completion.order_id, completion.status);
///             })),
///         )
///         .await?;
///     println!("created order {}", receipt.order_id);
///
///     Ok(())
/// }
/// ```
pub struct SkinsdripClient {
    rest: Arc<RestClient>,
    tracker: Arc<PendingTradeTracker>,
    channel: RwLock<Option<Arc<EventChannel>>>,
    config: SdkConfig,
}

impl SkinsdripClient {
    /// Create a client with default configuration.
    ///
    /// # Errors
    /// `Configuration` when the merchant id or secret is empty. Fatal,
    /// surfaced immediately.
    pub fn new(
        merchant_id: impl Into<String>,
        merchant_secret: impl Into<String>,
    ) -> SkinsdripResult<Self> {
        Self::builder(merchant_id, merchant_secret).build()
    }

    /// Create a client builder
    pub fn builder(
        merchant_id: impl Into<String>,
        merchant_secret: impl Into<String>,
    ) -> SkinsdripClientBuilder {
        SkinsdripClientBuilder::new(merchant_id, merchant_secret)
    }

    pub(crate) fn from_builder(
        merchant_id: String,
        merchant_secret: String,
        config: SdkConfig,
    ) -> SkinsdripResult<Self> {
        let credentials = MerchantCredentials::new(merchant_id, merchant_secret)?;
        let rest = Arc::new(RestClient::with_config(credentials, config.rest.clone()));
        let tracker = Arc::new(PendingTradeTracker::new(
            Arc::clone(&rest) as Arc<dyn OrderStatusSource>,
            config.tracker.clone(),
        ));

        info!(testmode = config.testmode, "Created Skinsdrip client");

        Ok(Self {
            rest,
            tracker,
            channel: RwLock::new(None),
            config,
        })
    }

    /// Authenticate against the merchant API.
    ///
    /// Must succeed before `subscribe` or any domain call.
    #[instrument(skip(self))]
    pub async fn authenticate(&self) -> SkinsdripResult<()> {
        self.rest.authenticate().await?;
        Ok(())
    }

    /// Check whether the client holds a session
    pub fn is_authenticated(&self) -> bool {
        self.rest.is_authenticated()
    }

    /// Subscribe to a public event name.
    ///
    /// Lazily constructs and connects the event channel on first call.
    ///
    /// # Errors
    /// `Unauthenticated` before a successful authenticate. The
    /// subscription is never silently queued.
    pub fn subscribe(
        &self,
        event: &str,
        handler: impl Fn(&MerchantEvent) + Send + Sync + 'static,
    ) -> SkinsdripResult<()> {
        if event.is_empty() {
            return Err(SkinsdripError::InvalidArgument(
                "event name is required".to_string(),
            ));
        }

        let channel = self.ensure_channel()?;
        channel.on(event, handler);
        Ok(())
    }

    fn ensure_channel(&self) -> SkinsdripResult<Arc<EventChannel>> {
        let token = self
            .rest
            .session_token()
            .ok_or(SkinsdripError::Unauthenticated)?;

        let mut guard = self.channel.write();
        if let Some(channel) = guard.as_ref() {
            return Ok(Arc::clone(channel));
        }

        info!("Creating event channel");
        let channel = Arc::new(EventChannel::new(token, self.config.channel.clone()));

        // Completion frames evict their tracker entry before subscribers
        // see them.
        let tracker = Arc::clone(&self.tracker);
        channel.set_completion_hook(move |update| tracker.resolve_by_event(update));

        channel.connect();
        *guard = Some(Arc::clone(&channel));
        Ok(channel)
    }

    /// Current state of the event channel
    pub fn channel_state(&self) -> ChannelState {
        self.channel
            .read()
            .as_ref()
            .map(|channel| channel.state())
            .unwrap_or(ChannelState::Disconnected)
    }

    /// Number of trades currently awaiting completion
    pub fn pending_trades(&self) -> usize {
        self.tracker.pending_count()
    }

    /// Tear down the event channel, cancelling all its timers
    pub fn shutdown(&self) {
        if let Some(channel) = self.channel.read().as_ref() {
            channel.disconnect();
        }
    }

    // ========================================================================
    // Merchant operations
    // ========================================================================

    /// Get the hosted payment session for a user
    pub async fn get_pay_session(&self, user_id: &str) -> SkinsdripResult<PaySession> {
        Ok(self.rest.get_pay_session(user_id).await?)
    }

    /// Get the merchant market listing
    pub async fn get_market(&self) -> SkinsdripResult<Vec<MarketItem>> {
        Ok(self.rest.get_market().await?)
    }

    /// Get the merchant account balance
    pub async fn get_balance(&self) -> SkinsdripResult<Balance> {
        Ok(self.rest.get_balance().await?)
    }

    /// Get a user's Steam inventory
    pub async fn get_inventory(&self, steamid: &str) -> SkinsdripResult<Vec<InventoryItem>> {
        Ok(self.rest.get_inventory(steamid).await?)
    }

    /// Force a refresh of a user's Steam inventory
    pub async fn refresh_inventory(&self, steamid: &str) -> SkinsdripResult<Vec<InventoryItem>> {
        Ok(self.rest.refresh_inventory(steamid).await?)
    }

    /// Get the withdrawal history
    pub async fn get_history(&self) -> SkinsdripResult<Vec<HistoryEntry>> {
        Ok(self.rest.get_history().await?)
    }

    /// Read the current status of a single order
    pub async fn get_order(&self, order_id: &str) -> SkinsdripResult<Order> {
        Ok(self.rest.order_status(order_id).await?)
    }

    // ========================================================================
    // Trading
    // ========================================================================

    /// Create a trade between a user and a bot.
    ///
    /// The returned receipt carries the server-assigned order id. The
    /// optional callback fires exactly once with the trade's completion:
    /// from the stream event when it arrives in time, otherwise from a
    /// single fallback status poll.
    #[instrument(skip(self, user_items, bot_items, callback))]
    pub async fn create_trade(
        &self,
        steamid: &str,
        tradeurl: &str,
        user_items: Vec<TradeItem>,
        bot_items: Vec<TradeItem>,
        callback: Option<CompletionCallback>,
    ) -> SkinsdripResult<TradeReceipt> {
        if steamid.is_empty() {
            return Err(SkinsdripError::InvalidArgument(
                "steamid is required".to_string(),
            ));
        }
        if tradeurl.is_empty() {
            return Err(SkinsdripError::InvalidArgument(
                "tradeurl is required".to_string(),
            ));
        }

        let request = CreateTradeRequest::new(steamid, tradeurl, user_items, bot_items);
        let receipt = self.rest.create_trade(&request).await?;

        self.tracker.register(&receipt.order_id, callback)?;

        info!(order_id = %receipt.order_id, "Created trade");
        Ok(receipt)
    }

    /// Reconcile a backlog of orders with sequential, rate-limited status
    /// reads. Delegates to the tracker's batch drain.
    pub async fn fetch_orders(&self, order_ids: &[String]) -> SkinsdripResult<Vec<DrainedOrder>> {
        if !self.is_authenticated() {
            return Err(SkinsdripError::Unauthenticated);
        }
        Ok(self.tracker.drain_all(order_ids).await)
    }
}

impl std::fmt::Debug for SkinsdripClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkinsdripClient")
            .field("is_authenticated", &self.is_authenticated())
            .field("channel_state", &self.channel_state())
            .field("pending_trades", &self.pending_trades())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials_fail_construction() {
        assert!(matches!(
            SkinsdripClient::new("", "secret"),
            Err(SkinsdripError::Configuration(_))
        ));
        assert!(matches!(
            SkinsdripClient::new("merchant_1", ""),
            Err(SkinsdripError::Configuration(_))
        ));
    }

    #[test]
    fn test_new_client_state() {
        let client = SkinsdripClient::new("merchant_1", "secret").unwrap();
        assert!(!client.is_authenticated());
        assert_eq!(client.channel_state(), ChannelState::Disconnected);
        assert_eq!(client.pending_trades(), 0);
    }

    #[test]
    fn test_subscribe_before_authenticate_fails() {
        let client = SkinsdripClient::new("merchant_1", "secret").unwrap();
        let result = client.subscribe("trade:update", |_| {});
        assert!(matches!(result, Err(SkinsdripError::Unauthenticated)));
    }

    #[test]
    fn test_subscribe_requires_event_name() {
        let client = SkinsdripClient::new("merchant_1", "secret").unwrap();
        let result = client.subscribe("", |_| {});
        assert!(matches!(result, Err(SkinsdripError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_create_trade_validates_arguments() {
        let client = SkinsdripClient::new("merchant_1", "secret").unwrap();

        let result = client
            .create_trade("", "https://steamcommunity.com/tradeoffer/new/", vec![], vec![], None)
            .await;
        assert!(matches!(result, Err(SkinsdripError::InvalidArgument(_))));

        let result = client
            .create_trade("76561198000000000", "", vec![], vec![], None)
            .await;
        assert!(matches!(result, Err(SkinsdripError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_fetch_orders_before_authenticate_fails() {
        let client = SkinsdripClient::new("merchant_1", "secret").unwrap();
        let result = client.fetch_orders(&["ord_1".to_string()]).await;
        assert!(matches!(result, Err(SkinsdripError::Unauthenticated)));
    }
}
