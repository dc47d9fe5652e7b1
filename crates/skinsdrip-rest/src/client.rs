//! Main REST client implementation

use crate::endpoints::{MerchantEndpoints, TradingEndpoints};
use crate::error::{RestError, RestResult};
use crate::types::ApiResponse;
use parking_lot::RwLock;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use skinsdrip_auth::{canonical_signature, MerchantCredentials, SIGNATURE_FIELD};
use skinsdrip_types::SessionToken;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Production REST base URL
const PRODUCTION_URL: &str = "https://api.skinsdrip.com/merchant";

/// Test-mode REST base URL
const TEST_URL: &str = "https://api.test.skinsdrip.com/merchant";

/// Default request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Response data of the authenticate endpoint
#[derive(Debug, Deserialize)]
struct AuthData {
    token: String,
}

/// Skinsdrip merchant REST client
///
/// Signs every call with the merchant secret and attaches the session
/// cookie once [`authenticate`](RestClient::authenticate) has succeeded.
///
/// # Example
///
/// ```no_run
/// use skinsdrip_auth::MerchantCredentials;
/// use skinsdrip_rest::RestClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let creds = MerchantCredentials::from_env()?;
///     let client = RestClient::new(creds);
///
///     client.authenticate().await?;
///     let balance = client.get_balance().await?;
///     println!("balance: {}", balance.balance);
///
///     Ok(())
/// }
/// ```
pub struct RestClient {
    http_client: Client,
    credentials: MerchantCredentials,
    base_url: String,
    session: RwLock<Option<SessionToken>>,
}

impl RestClient {
    /// Create a new client with default configuration
    pub fn new(credentials: MerchantCredentials) -> Self {
        Self::with_config(credentials, RestConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(credentials: MerchantCredentials, config: RestConfig) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(
                config
                    .user_agent
                    .as_deref()
                    .unwrap_or("skinsdrip-rest/0.1.0"),
            )
            .build()
            .expect("Failed to create HTTP client");

        info!(base_url = %config.base_url, "Created Skinsdrip REST client");

        Self {
            http_client,
            credentials,
            base_url: config.base_url,
            session: RwLock::new(None),
        }
    }

    /// Check if the client holds a session token
    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_some()
    }

    /// Get the current session token, if authenticated
    pub fn session_token(&self) -> Option<SessionToken> {
        self.session.read().clone()
    }

    /// Authenticate against the merchant API and store the session token
    ///
    /// # Errors
    /// Returns an upstream error when the API rejects the credentials.
    #[instrument(skip(self))]
    pub async fn authenticate(&self) -> RestResult<SessionToken> {
        let data: AuthData = self
            .call(Method::POST, "/authenticate", serde_json::json!({}))
            .await?;

        let token = SessionToken::new(data.token);
        *self.session.write() = Some(token.clone());

        info!("Authenticated with the merchant API");
        Ok(token)
    }

    /// Get merchant endpoints (requires authentication)
    pub fn merchant(&self) -> RestResult<MerchantEndpoints<'_>> {
        if !self.is_authenticated() {
            return Err(RestError::AuthRequired);
        }
        Ok(MerchantEndpoints::new(self))
    }

    /// Get trading endpoints (requires authentication)
    pub fn trading(&self) -> RestResult<TradingEndpoints<'_>> {
        if !self.is_authenticated() {
            return Err(RestError::AuthRequired);
        }
        Ok(TradingEndpoints::new(self))
    }

    // ========================================================================
    // Merchant Endpoints
    // ========================================================================

    /// Get the hosted payment session for a user
    pub async fn get_pay_session(
        &self,
        user_id: &str,
    ) -> RestResult<skinsdrip_types::PaySession> {
        self.merchant()?.get_pay_session(user_id).await
    }

    /// Get the merchant market listing
    pub async fn get_market(&self) -> RestResult<Vec<skinsdrip_types::MarketItem>> {
        self.merchant()?.get_market().await
    }

    /// Get the merchant account balance
    pub async fn get_balance(&self) -> RestResult<skinsdrip_types::Balance> {
        self.merchant()?.get_balance().await
    }

    /// Get a user's Steam inventory
    pub async fn get_inventory(
        &self,
        steamid: &str,
    ) -> RestResult<Vec<skinsdrip_types::InventoryItem>> {
        self.merchant()?.get_inventory(steamid).await
    }

    /// Force a refresh of a user's Steam inventory
    pub async fn refresh_inventory(
        &self,
        steamid: &str,
    ) -> RestResult<Vec<skinsdrip_types::InventoryItem>> {
        self.merchant()?.refresh_inventory(steamid).await
    }

    /// Get the withdrawal history
    pub async fn get_history(&self) -> RestResult<Vec<skinsdrip_types::HistoryEntry>> {
        self.merchant()?.get_history().await
    }

    // ========================================================================
    // Trading Endpoints
    // ========================================================================

    /// Create a trade between a user and a bot
    pub async fn create_trade(
        &self,
        request: &crate::types::CreateTradeRequest,
    ) -> RestResult<skinsdrip_types::TradeReceipt> {
        self.trading()?.create_trade(request).await
    }

    /// Read the current status of an order
    pub async fn order_status(&self, order_id: &str) -> RestResult<skinsdrip_types::Order> {
        self.trading()?.order_status(order_id).await
    }

    // ========================================================================
    // Core signed call
    // ========================================================================

    /// Issue a signed call against the merchant API.
    ///
    /// The body must be a JSON object; its canonical signature is computed
    /// over the top-level scalar fields and attached as `signature`.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Value,
    ) -> RestResult<T> {
        let signature = canonical_signature(&body, self.credentials.secret());

        let mut payload = body;
        let fields = payload.as_object_mut().ok_or_else(|| {
            RestError::InvalidParameter("request body must be a JSON object".to_string())
        })?;
        fields.insert(SIGNATURE_FIELD.to_string(), Value::String(signature));

        let url = format!("{}{}", self.base_url, path);
        debug!(%method, path, "Issuing signed merchant call");

        let mut request = self
            .http_client
            .request(method, &url)
            .header("merchant-id", self.credentials.merchant_id())
            .json(&payload);

        if let Some(token) = self.session_token() {
            request = request.header(reqwest::header::COOKIE, token.cookie_value());
        }

        let response: ApiResponse<T> = request.send().await?.json().await?;
        response.into_result()
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .field("is_authenticated", &self.is_authenticated())
            .finish()
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// REST base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Custom user agent
    pub user_agent: Option<String>,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: PRODUCTION_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

impl RestConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration pointing at the test-mode API
    pub fn test_mode() -> Self {
        Self {
            base_url: TEST_URL.to_string(),
            ..Self::default()
        }
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set a custom user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
